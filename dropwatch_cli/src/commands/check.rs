use anyhow::Result;
use clap::Args;
use dropwatch_lib::config::{normalize_tickers, Config};
use dropwatch_lib::runner::evaluate_tickers;

use crate::output::{print_evaluations_table, print_json, OutputFormat};

#[derive(Args)]
pub struct CheckArgs {
    /// Tickers to evaluate instead of the configured watchlist
    #[arg(long, value_delimiter = ',')]
    pub tickers: Vec<String>,
}

pub async fn run(args: &CheckArgs, config_path: &str, format: &OutputFormat) -> Result<()> {
    let config = Config::from_file(config_path)?;
    let tickers = if args.tickers.is_empty() {
        config.tickers.clone()
    } else {
        normalize_tickers(&args.tickers)?
    };
    let yahoo = super::yahoo_client()?;

    let (evaluations, skipped) =
        evaluate_tickers(&yahoo, &tickers, &config.detector_params()).await;

    match format {
        OutputFormat::Table => {
            if evaluations.is_empty() {
                eprintln!("No tickers could be evaluated.");
            } else {
                print_evaluations_table(&evaluations);
            }
        }
        OutputFormat::Json => print_json(&evaluations),
    }

    for skip in &skipped {
        eprintln!("Skipped {}: {}", skip.ticker, skip.reason);
    }

    Ok(())
}
