use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use proffy::config::Config;

mod commands;

#[derive(Parser)]
#[command(
    name = "proffy",
    version,
    about = "Publish tutor schedules and search for available tutors",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML config file (defaults to environment variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the config file
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Override the configured bind address
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Register a tutor from a JSON request file
    Register {
        /// JSON file with profile, offering and schedule
        file: PathBuf,
    },

    /// Search for tutors available at a weekday and time
    Search {
        /// Subject to search for
        #[arg(short, long)]
        subject: String,

        /// Weekday, 0 (Sunday) to 6
        #[arg(short, long)]
        week_day: i64,

        /// Clock time, HH:MM
        #[arg(short, long)]
        time: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let bind = match &cli.command {
        Commands::Serve { bind } => bind.clone(),
        _ => None,
    };
    let config = Config::load(cli.config.as_deref())?.with_overrides(cli.log_format, bind)?;

    setup_tracing(&config.logging.format, &config.logging.level, cli.verbose)?;

    match cli.command {
        Commands::Serve { .. } => {
            tracing::info!(bind = %config.server.bind_address, "Starting serve command");
            commands::serve(config).await?;
        }

        Commands::Register { file } => {
            tracing::info!(file = %file.display(), "Starting register command");
            commands::register(&config, &file)?;
        }

        Commands::Search {
            subject,
            week_day,
            time,
        } => {
            tracing::info!(
                subject = %subject,
                week_day = %week_day,
                time = %time,
                "Starting search command"
            );
            commands::search(&config, &subject, week_day, &time)?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("proffy=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("proffy={level},warn")))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
