//! Drives the application state from user actions and provider responses.
use crate::core::cache::FetchTicket;
use crate::core::market::{HistoricalSeries, MarketDataProvider};
use crate::core::state::{AppState, Notice};
use crate::core::timeframe::Timeframe;
use futures::future::join_all;
use tracing::{debug, info};

/// Runs every ticket concurrently and returns once all of them settled.
pub async fn fetch_batch<P: MarketDataProvider + ?Sized>(
    provider: &P,
    tickets: Vec<FetchTicket>,
) -> Vec<(FetchTicket, Option<HistoricalSeries>)> {
    let futures = tickets.into_iter().map(|ticket| async move {
        let series = provider
            .fetch_historical_series(ticket.asset_id(), ticket.timeframe())
            .await;
        (ticket, series)
    });
    join_all(futures).await
}

pub struct Dashboard<P: MarketDataProvider> {
    provider: P,
    state: AppState,
    asset_limit: usize,
}

impl<P: MarketDataProvider> Dashboard<P> {
    pub fn new(provider: P, timeframe: Timeframe, asset_limit: usize) -> Self {
        Self {
            provider,
            state: AppState::new(timeframe),
            asset_limit,
        }
    }

    /// Shows every value in `currency`, which must match what the provider quotes.
    pub fn with_currency(mut self, currency: &str) -> Self {
        self.transition(|state| state.with_currency(currency));
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    fn transition(&mut self, f: impl FnOnce(AppState) -> AppState) {
        self.state = f(std::mem::take(&mut self.state));
    }

    /// Reloads the ranked asset list. An empty answer keeps the previous list.
    pub async fn load_assets(&mut self) -> Option<Notice> {
        let assets = self.provider.fetch_asset_list(self.asset_limit).await;
        if assets.is_empty() {
            return Some(Notice::AssetsUnavailable);
        }
        info!("Loaded {} assets", assets.len());
        self.transition(|state| state.with_assets(assets));
        None
    }

    pub async fn select_asset(&mut self, asset_id: &str) -> Option<Notice> {
        let (state, notice) = std::mem::take(&mut self.state).select_asset(asset_id);
        self.state = state;
        if notice.is_some() {
            return notice;
        }
        self.refresh_selected().await
    }

    /// Switches timeframe and refetches everything that is on screen.
    pub async fn set_timeframe(&mut self, timeframe: Timeframe) -> Vec<Notice> {
        self.transition(|state| state.with_timeframe(timeframe));
        let mut notices = Vec::new();
        notices.extend(self.refresh_selected().await);
        notices.extend(self.refresh_comparison().await);
        notices
    }

    /// Adds to the comparison set and, if accepted, fetches the set again.
    pub async fn add_to_comparison(&mut self, asset_id: &str) -> Vec<Notice> {
        self.add_all_to_comparison([asset_id]).await
    }

    /// Adds every id in order, then fetches the set once if any was accepted.
    pub async fn add_all_to_comparison<'a>(
        &mut self,
        asset_ids: impl IntoIterator<Item = &'a str>,
    ) -> Vec<Notice> {
        let mut notices = Vec::new();
        for asset_id in asset_ids {
            let (state, notice) = std::mem::take(&mut self.state).add_to_comparison(asset_id);
            self.state = state;
            notices.push(notice);
        }
        if notices.iter().any(|n| !n.is_error()) {
            notices.extend(self.refresh_comparison().await);
        }
        notices
    }

    pub fn remove_from_comparison(&mut self, asset_id: &str) {
        self.transition(|state| state.remove_from_comparison(asset_id));
    }

    pub async fn refresh_selected(&mut self) -> Option<Notice> {
        let asset_id = self.state.selected_asset()?.id.clone();
        let results = self.fetch(vec![asset_id]).await;
        let failed = results.iter().any(|(_, series)| series.is_none());
        self.transition(|state| state.apply_fetched(results));
        failed.then_some(Notice::HistoryUnavailable)
    }

    pub async fn refresh_comparison(&mut self) -> Option<Notice> {
        let ids: Vec<String> = self
            .state
            .comparison()
            .assets()
            .iter()
            .map(|a| a.id.clone())
            .collect();
        if ids.is_empty() {
            return None;
        }
        let results = self.fetch(ids).await;
        let failed = results.iter().any(|(_, series)| series.is_none());
        self.transition(|state| state.apply_fetched(results));
        failed.then_some(Notice::ComparisonUnavailable)
    }

    async fn fetch(&mut self, ids: Vec<String>) -> Vec<(FetchTicket, Option<HistoricalSeries>)> {
        let (state, tickets) =
            std::mem::take(&mut self.state).begin_fetch(ids.iter().map(String::as_str));
        self.state = state;
        debug!(count = tickets.len(), timeframe = %self.state.timeframe(), "Fetching batch");
        fetch_batch(&self.provider, tickets).await
    }
}
