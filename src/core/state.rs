//! Application state and the transitions that produce the next state.
//!
//! Every transition consumes the current state and returns its successor, so
//! a reader always holds a complete, consistent snapshot.
use crate::core::cache::{FetchTicket, HistoricalDataCache};
use crate::core::chart::{self, ComparisonChart, PriceChart};
use crate::core::comparison::{ComparisonOutcome, ComparisonSet, MAX_COMPARISON_ASSETS};
use crate::core::format::DEFAULT_CURRENCY;
use crate::core::market::{Asset, HistoricalSeries};
use crate::core::timeframe::Timeframe;
use std::fmt::Display;
use tracing::debug;

/// User-facing outcome of a transition or fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Added { name: String },
    AlreadyPresent { name: String },
    ComparisonFull,
    UnknownAsset { id: String },
    AssetsUnavailable,
    HistoryUnavailable,
    ComparisonUnavailable,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::Added { .. })
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::Added { name } => write!(f, "Added {name} to comparison"),
            Notice::AlreadyPresent { name } => {
                write!(f, "{name} is already in your comparison list")
            }
            Notice::ComparisonFull => write!(
                f,
                "You can compare up to {MAX_COMPARISON_ASSETS} cryptocurrencies at once"
            ),
            Notice::UnknownAsset { id } => write!(f, "Unknown asset: {id}"),
            Notice::AssetsUnavailable => {
                write!(f, "Failed to load crypto assets. Please try again later.")
            }
            Notice::HistoryUnavailable => {
                write!(f, "Failed to load historical data. Please try again later.")
            }
            Notice::ComparisonUnavailable => {
                write!(f, "Failed to load comparison data. Please try again later.")
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    assets: Vec<Asset>,
    selected: Option<String>,
    timeframe: Timeframe,
    comparison: ComparisonSet,
    cache: HistoricalDataCache,
    currency: String,
}

impl AppState {
    pub fn new(timeframe: Timeframe) -> Self {
        Self {
            timeframe,
            currency: DEFAULT_CURRENCY.to_string(),
            ..Default::default()
        }
    }

    /// Sets the quote currency all values are shown in.
    pub fn with_currency(mut self, currency: &str) -> Self {
        self.currency = currency.to_string();
        self
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn asset(&self, asset_id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == asset_id)
    }

    pub fn selected_asset(&self) -> Option<&Asset> {
        self.selected.as_deref().and_then(|id| self.asset(id))
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn comparison(&self) -> &ComparisonSet {
        &self.comparison
    }

    pub fn cache(&self) -> &HistoricalDataCache {
        &self.cache
    }

    /// Replaces the asset list wholesale. The top asset becomes the selection
    /// when nothing valid is selected.
    pub fn with_assets(mut self, assets: Vec<Asset>) -> Self {
        self.assets = assets;
        if self.selected_asset().is_none() {
            self.selected = self.assets.first().map(|a| a.id.clone());
        }
        self
    }

    pub fn select_asset(mut self, asset_id: &str) -> (Self, Option<Notice>) {
        if self.asset(asset_id).is_none() {
            return (
                self,
                Some(Notice::UnknownAsset {
                    id: asset_id.to_string(),
                }),
            );
        }
        self.selected = Some(asset_id.to_string());
        (self, None)
    }

    pub fn with_timeframe(mut self, timeframe: Timeframe) -> Self {
        if self.timeframe != timeframe {
            debug!(from = %self.timeframe, to = %timeframe, "Timeframe changed");
        }
        self.timeframe = timeframe;
        self
    }

    pub fn add_to_comparison(mut self, asset_id: &str) -> (Self, Notice) {
        let Some(asset) = self.asset(asset_id).cloned() else {
            return (
                self,
                Notice::UnknownAsset {
                    id: asset_id.to_string(),
                },
            );
        };
        let name = asset.name.clone();
        let notice = match self.comparison.add(asset) {
            ComparisonOutcome::Added => Notice::Added { name },
            ComparisonOutcome::AlreadyPresent => Notice::AlreadyPresent { name },
            ComparisonOutcome::Full => Notice::ComparisonFull,
        };
        (self, notice)
    }

    pub fn remove_from_comparison(mut self, asset_id: &str) -> Self {
        self.comparison.remove(asset_id);
        self
    }

    /// Issues fetch tickets for `asset_ids` under the current timeframe.
    pub fn begin_fetch<'a>(
        mut self,
        asset_ids: impl IntoIterator<Item = &'a str>,
    ) -> (Self, Vec<FetchTicket>) {
        let timeframe = self.timeframe;
        let tickets = asset_ids
            .into_iter()
            .map(|id| self.cache.issue(id, timeframe))
            .collect();
        (self, tickets)
    }

    /// Writes a fully settled batch. Superseded tickets are dropped.
    pub fn apply_fetched(
        mut self,
        results: Vec<(FetchTicket, Option<HistoricalSeries>)>,
    ) -> Self {
        let total = results.len();
        let kept = self.cache.apply_batch(results);
        debug!(total, kept, "Applied fetch batch");
        self
    }

    /// Series for `asset_id` under the active timeframe.
    pub fn series(&self, asset_id: &str) -> Option<&HistoricalSeries> {
        self.cache.get_for(asset_id, self.timeframe)
    }

    pub fn price_chart(&self) -> PriceChart {
        match self.selected_asset() {
            Some(asset) => {
                chart::build_price_chart(
                self.series(&asset.id),
                self.timeframe,
                &asset.symbol,
                &self.currency,
            )
            }
            None => PriceChart::NoData,
        }
    }

    pub fn comparison_chart(&self) -> ComparisonChart {
        let entries: Vec<(&Asset, Option<&HistoricalSeries>)> = self
            .comparison
            .assets()
            .iter()
            .map(|asset| (asset, self.series(&asset.id)))
            .collect();
        chart::build_comparison_chart(&entries, self.timeframe, &self.currency)
    }
}
