use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::core::market::{Asset, HistoricalSeries, MarketDataProvider, PricePoint};
use crate::core::timeframe::Timeframe;

/// Client for the CoinGecko v3 REST API.
pub struct CoinGeckoProvider {
    base_url: String,
    currency: String,
    client: reqwest::Client,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str, currency: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("coinchart/1.0")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(CoinGeckoProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            currency: currency.to_lowercase(),
            client,
        })
    }

    async fn get_json(&self, url: &str, what: &str) -> Result<Value> {
        debug!("Requesting {} from {}", what, url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for {}", e, what))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} for {}", response.status(), what));
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", what, e))
    }

    pub async fn request_asset_list(&self, limit: usize) -> Result<Vec<Asset>> {
        let url = format!(
            "{}/coins/markets?vs_currency={}&order=market_cap_desc&per_page={}&page=1&sparkline=false&price_change_percentage=24h,7d,30d,1y",
            self.base_url, self.currency, limit
        );
        let body = self.get_json(&url, "asset list").await?;
        let items = body
            .as_array()
            .ok_or_else(|| anyhow!("Unexpected asset list payload: expected an array"))?;

        let assets = items
            .iter()
            .filter_map(|item| match serde_json::from_value::<MarketItem>(item.clone()) {
                Ok(item) => item.into_asset(),
                Err(e) => {
                    debug!("Skipping malformed asset entry: {}", e);
                    None
                }
            })
            .collect();
        Ok(assets)
    }

    pub async fn request_historical_series(
        &self,
        asset_id: &str,
        timeframe: Timeframe,
    ) -> Result<HistoricalSeries> {
        let params = timeframe.range_params();
        let url = format!(
            "{}/coins/{}/market_chart?vs_currency={}&days={}&interval={}",
            self.base_url, asset_id, self.currency, params.days, params.interval
        );
        let body = self
            .get_json(&url, &format!("historical data of {asset_id}"))
            .await?;
        let chart: MarketChartResponse = serde_json::from_value(body)
            .map_err(|e| anyhow!("Unexpected market chart payload for {}: {}", asset_id, e))?;

        Ok(HistoricalSeries {
            prices: parse_points(&chart.prices),
            market_caps: parse_points(&chart.market_caps),
            total_volumes: parse_points(&chart.total_volumes),
        })
    }
}

#[derive(Deserialize, Debug)]
struct MarketItem {
    id: Option<String>,
    name: Option<String>,
    symbol: Option<String>,
    image: Option<String>,
    current_price: Option<f64>,
    market_cap: Option<f64>,
    market_cap_rank: Option<u32>,
    price_change_percentage_24h_in_currency: Option<f64>,
    price_change_percentage_24h: Option<f64>,
    price_change_percentage_7d_in_currency: Option<f64>,
    price_change_percentage_7d: Option<f64>,
    price_change_percentage_30d_in_currency: Option<f64>,
    price_change_percentage_30d: Option<f64>,
    price_change_percentage_1y_in_currency: Option<f64>,
    price_change_percentage_1y: Option<f64>,
}

impl MarketItem {
    fn into_asset(self) -> Option<Asset> {
        let id = self.id.filter(|id| !id.is_empty())?;
        Some(Asset {
            name: self.name.unwrap_or_else(|| id.clone()),
            symbol: self.symbol.unwrap_or_default(),
            image: self.image,
            current_price: self.current_price.unwrap_or_default().max(0.0),
            market_cap: self.market_cap.unwrap_or_default(),
            market_cap_rank: self.market_cap_rank.filter(|rank| *rank > 0),
            change_24h: self
                .price_change_percentage_24h_in_currency
                .or(self.price_change_percentage_24h),
            change_7d: self
                .price_change_percentage_7d_in_currency
                .or(self.price_change_percentage_7d),
            change_30d: self
                .price_change_percentage_30d_in_currency
                .or(self.price_change_percentage_30d),
            change_1y: self
                .price_change_percentage_1y_in_currency
                .or(self.price_change_percentage_1y),
            id,
        })
    }
}

#[derive(Deserialize, Debug)]
struct MarketChartResponse {
    #[serde(default)]
    prices: Vec<Value>,
    #[serde(default)]
    market_caps: Vec<Value>,
    #[serde(default)]
    total_volumes: Vec<Value>,
}

/// Keeps `[timestamp, value]` pairs where both are numbers.
fn parse_points(raw: &[Value]) -> Vec<PricePoint> {
    raw.iter()
        .filter_map(|pair| {
            let pair = pair.as_array()?;
            let ts = pair.first()?.as_f64()?;
            let value = pair.get(1)?.as_f64()?;
            Some(PricePoint::new(ts as i64, value))
        })
        .collect()
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    #[instrument(name = "CoinGeckoAssetList", skip(self))]
    async fn fetch_asset_list(&self, limit: usize) -> Vec<Asset> {
        match self.request_asset_list(limit).await {
            Ok(assets) => assets,
            Err(e) => {
                warn!(error = %e, "Error fetching top crypto assets");
                Vec::new()
            }
        }
    }

    #[instrument(
        name = "CoinGeckoHistoricalFetch",
        skip(self),
        fields(asset_id = %asset_id, timeframe = %timeframe)
    )]
    async fn fetch_historical_series(
        &self,
        asset_id: &str,
        timeframe: Timeframe,
    ) -> Option<HistoricalSeries> {
        match self.request_historical_series(asset_id, timeframe).await {
            Ok(series) => Some(series),
            Err(e) => {
                warn!(error = %e, "Error fetching historical data for {}", asset_id);
                None
            }
        }
    }
}
