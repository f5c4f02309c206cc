use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use coinchart::core::Timeframe;
use coinchart::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for coinchart::AppCommand {
    fn from(cmd: Commands) -> coinchart::AppCommand {
        match cmd {
            Commands::Top { limit } => coinchart::AppCommand::Top { limit },
            Commands::Chart {
                asset_id,
                timeframe,
            } => coinchart::AppCommand::Chart {
                asset_id,
                timeframe,
            },
            Commands::Compare {
                asset_ids,
                timeframe,
            } => coinchart::AppCommand::Compare {
                asset_ids,
                timeframe,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List the top cryptocurrencies by market cap
    Top {
        /// Number of assets to list
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show the price chart of one cryptocurrency
    Chart {
        /// Asset id, e.g. "bitcoin"; defaults to the top ranked asset
        asset_id: Option<String>,
        /// One of 1D, 1W, 1M, 3M, 1Y, 5Y
        #[arg(short, long)]
        timeframe: Option<Timeframe>,
    },
    /// Compare the price history of up to four cryptocurrencies
    Compare {
        /// Asset ids, e.g. "bitcoin ethereum"
        #[arg(required = true)]
        asset_ids: Vec<String>,
        /// One of 1D, 1W, 1M, 3M, 1Y, 5Y
        #[arg(short, long)]
        timeframe: Option<Timeframe>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => coinchart::cli::setup::setup(),
        Some(cmd) => coinchart::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
