mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "dropwatch")]
#[command(about = "Watch tickers for daily price drops and alert a Telegram chat")]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, default_value = "config.json", global = true)]
    config: String,

    /// Output format: table or json
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one alert cycle: fetch closes, evaluate drops, send alerts
    Run(commands::run::RunArgs),
    /// Evaluate tickers and print the verdicts without sending anything
    Check(commands::check::CheckArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dropwatch_lib=info".parse().unwrap())
                .add_directive("dropwatch_cli=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };

    match &cli.command {
        Commands::Run(args) => commands::run::run(args, &cli.config, &format).await?,
        Commands::Check(args) => commands::check::run(args, &cli.config, &format).await?,
    }

    Ok(())
}
