use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use trendigest::config::Config;

mod commands;

#[derive(Parser)]
#[command(
    name = "trendigest",
    version,
    about = "App review trend analyzer with rolling-window topic aggregation",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a review file and produce a trend report
    Analyze {
        /// JSON file of review records
        #[arg(short, long)]
        input: PathBuf,

        /// Write the full JSON report here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a deterministic mock review file
    Mock {
        /// First calendar date of the generated stream (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Number of consecutive days to generate
        #[arg(long, default_value = "30")]
        days: usize,

        /// Target reviews per day
        #[arg(long, default_value = "50")]
        per_day: usize,

        /// RNG seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Output file path
        #[arg(short, long, default_value = "reviews.json")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose)?;

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    match cli.command {
        Commands::Analyze { input, output } => {
            tracing::info!(input = %input.display(), "starting analyze command");
            commands::analyze(config, input, output).await?;
        }

        Commands::Mock {
            start,
            days,
            per_day,
            seed,
            output,
        } => {
            tracing::info!(%start, days, per_day, seed, "starting mock command");
            commands::mock(start, days, per_day, seed, output)?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    match format {
        "json" => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    Ok(())
}
