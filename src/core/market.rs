//! Market data abstractions and core types

use crate::core::timeframe::Timeframe;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Snapshot of one tradable asset as reported by the market data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub image: Option<String>,
    pub current_price: f64,
    pub market_cap: f64,
    pub market_cap_rank: Option<u32>,
    pub change_24h: Option<f64>,
    pub change_7d: Option<f64>,
    pub change_30d: Option<f64>,
    pub change_1y: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
    pub value: f64,
}

impl PricePoint {
    pub fn new(timestamp_ms: i64, value: f64) -> Self {
        Self {
            timestamp_ms,
            value,
        }
    }
}

/// Price, market cap and volume samples for one asset.
///
/// The timeframe that produced the series is tracked by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub prices: Vec<PricePoint>,
    pub market_caps: Vec<PricePoint>,
    pub total_volumes: Vec<PricePoint>,
}

impl HistoricalSeries {
    pub fn from_prices(prices: Vec<PricePoint>) -> Self {
        Self {
            prices,
            ..Default::default()
        }
    }

    pub fn has_prices(&self) -> bool {
        !self.prices.is_empty()
    }

    pub fn first_price(&self) -> Option<f64> {
        self.prices.first().map(|p| p.value)
    }

    pub fn last_price(&self) -> Option<f64> {
        self.prices.last().map(|p| p.value)
    }
}

/// Remote source of asset rankings and historical series.
///
/// Implementations never fail past this boundary: an empty list or `None`
/// means the data is currently unavailable.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Top `limit` assets ordered by descending market cap.
    async fn fetch_asset_list(&self, limit: usize) -> Vec<Asset>;

    async fn fetch_historical_series(
        &self,
        asset_id: &str,
        timeframe: Timeframe,
    ) -> Option<HistoricalSeries>;
}
