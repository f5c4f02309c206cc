use crate::core::market::{Asset, HistoricalSeries, MarketDataProvider};
use crate::core::timeframe::Timeframe;
use crate::store::memory::MemoryCache;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Serves repeated requests from memory until they are `stale_after` old.
///
/// Empty asset lists and absent series are never remembered, so the next
/// call after a failure goes back to the inner provider.
pub struct CachingMarketDataProvider<T: MarketDataProvider> {
    inner: T,
    stale_after: Duration,
    assets: MemoryCache<usize, Vec<Asset>>,
    series: MemoryCache<(String, Timeframe), HistoricalSeries>,
}

impl<T: MarketDataProvider> CachingMarketDataProvider<T> {
    pub fn new(inner: T, stale_after: Duration) -> Self {
        Self {
            inner,
            stale_after,
            assets: MemoryCache::new(),
            series: MemoryCache::new(),
        }
    }
}

#[async_trait]
impl<T: MarketDataProvider> MarketDataProvider for CachingMarketDataProvider<T> {
    async fn fetch_asset_list(&self, limit: usize) -> Vec<Asset> {
        if let Some(cached) = self.assets.get(&limit).await {
            return cached;
        }
        let assets = self.inner.fetch_asset_list(limit).await;
        if !assets.is_empty() {
            self.assets
                .put(limit, assets.clone(), Some(self.stale_after))
                .await;
        }
        assets
    }

    async fn fetch_historical_series(
        &self,
        asset_id: &str,
        timeframe: Timeframe,
    ) -> Option<HistoricalSeries> {
        let key = (asset_id.to_string(), timeframe);
        if let Some(cached) = self.series.get(&key).await {
            return Some(cached);
        }
        let series = self.inner.fetch_historical_series(asset_id, timeframe).await;
        match &series {
            Some(s) => self.series.put(key, s.clone(), Some(self.stale_after)).await,
            None => debug!("Not caching absent series for {asset_id} ({timeframe})"),
        }
        series
    }
}
