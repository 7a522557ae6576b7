use anyhow::{bail, Result};
use clap::Args;
use dropwatch_lib::config::Config;
use dropwatch_lib::runner::{run_cycle, ProbeStatus};

use crate::output::{print_alerts_table, print_json, OutputFormat};

#[derive(Args)]
pub struct RunArgs {
    /// Evaluate and report but send nothing to Telegram
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn run(args: &RunArgs, config_path: &str, format: &OutputFormat) -> Result<()> {
    let config = Config::from_file(config_path)?;
    let yahoo = super::yahoo_client()?;
    let telegram = if args.dry_run {
        eprintln!("Dry run: alerts will not be sent.");
        None
    } else {
        Some(super::telegram_client(&config)?)
    };

    eprintln!("Evaluating {} tickers...", config.tickers.len());

    let report = run_cycle(&config, &yahoo, telegram.as_ref()).await;

    match format {
        OutputFormat::Table => {
            if report.alerts.is_empty() {
                eprintln!("No drops crossed the threshold.");
            } else {
                print_alerts_table(&report.alerts);
            }
        }
        OutputFormat::Json => print_json(&report),
    }

    for skip in &report.skipped {
        eprintln!("Skipped {}: {}", skip.ticker, skip.reason);
    }

    eprintln!(
        "Cycle complete: {} evaluated, {} skipped, {} alert(s), {} sent",
        report.evaluations.len(),
        report.skipped.len(),
        report.alerts.len(),
        report.dispatched
    );

    if !report.dispatch_failures.is_empty() {
        bail!(
            "{} alert(s) could not be delivered",
            report.dispatch_failures.len()
        );
    }
    if let ProbeStatus::Failed(reason) = &report.probe {
        bail!("Data source probe failed: {}", reason);
    }

    Ok(())
}
