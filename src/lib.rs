pub mod cli;
pub mod core;
pub mod dashboard;
pub mod providers;
pub mod store;

use crate::core::Timeframe;
use crate::core::config::AppConfig;
use crate::dashboard::Dashboard;
use crate::providers::caching::CachingMarketDataProvider;
use crate::providers::coingecko::CoinGeckoProvider;
use anyhow::Result;
use std::io::Write;
use tracing::{debug, info};

pub enum AppCommand {
    /// Ranked asset listing
    Top { limit: Option<usize> },
    /// Price history of one asset; the top ranked asset when none is given
    Chart {
        asset_id: Option<String>,
        timeframe: Option<Timeframe>,
    },
    /// Side by side price history of several assets
    Compare {
        asset_ids: Vec<String>,
        timeframe: Option<Timeframe>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    run_command_with_writer(command, config_path, &mut std::io::stdout()).await
}

/// Runs `command`, writing reports and notices to `out`. Loading and chart
/// views still go to the terminal.
pub async fn run_command_with_writer(
    command: AppCommand,
    config_path: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    info!("coinchart starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = CachingMarketDataProvider::new(
        CoinGeckoProvider::new(config.coingecko_base_url(), &config.currency)?,
        config.stale_after(),
    );

    match command {
        AppCommand::Top { limit } => {
            let limit = limit.unwrap_or(config.asset_limit);
            let mut dashboard = Dashboard::new(provider, config.timeframe(), limit)
                .with_currency(&config.currency);
            cli::top::run(&mut dashboard, out).await
        }
        AppCommand::Chart {
            asset_id,
            timeframe,
        } => {
            let timeframe = timeframe.unwrap_or_else(|| config.timeframe());
            let mut dashboard = Dashboard::new(provider, timeframe, config.asset_limit)
                .with_currency(&config.currency);
            cli::chart::run(&mut dashboard, asset_id.as_deref(), out).await
        }
        AppCommand::Compare {
            asset_ids,
            timeframe,
        } => {
            let timeframe = timeframe.unwrap_or_else(|| config.timeframe());
            let mut dashboard = Dashboard::new(provider, timeframe, config.asset_limit)
                .with_currency(&config.currency);
            cli::compare::run(&mut dashboard, &asset_ids, out).await
        }
    }
}
