use crate::core::format::DEFAULT_CURRENCY;
use crate::core::timeframe::Timeframe;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CoinGeckoProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub coingecko: Option<CoinGeckoProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            coingecko: Some(CoinGeckoProviderConfig {
                base_url: DEFAULT_COINGECKO_URL.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_asset_limit")]
    pub asset_limit: usize,
    #[serde(default = "default_stale_after_secs")]
    pub stale_after_secs: u64,
    #[serde(default = "default_timeframe")]
    pub default_timeframe: String,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_asset_limit() -> usize {
    20
}

fn default_stale_after_secs() -> u64 {
    300
}

fn default_timeframe() -> String {
    Timeframe::default().to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            currency: default_currency(),
            asset_limit: default_asset_limit(),
            stale_after_secs: default_stale_after_secs(),
            default_timeframe: default_timeframe(),
        }
    }
}

impl AppConfig {
    /// Loads the config at the default location, or defaults when none exists.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "coinchart", "coinchart")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn coingecko_base_url(&self) -> &str {
        self.providers
            .coingecko
            .as_ref()
            .map_or(DEFAULT_COINGECKO_URL, |p| &p.base_url)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }

    /// The configured timeframe; invalid tokens fall back to one month.
    pub fn timeframe(&self) -> Timeframe {
        self.default_timeframe.parse().unwrap_or_else(|_| {
            warn!(
                "Invalid default_timeframe {:?} in config, using {}",
                self.default_timeframe,
                Timeframe::default()
            );
            Timeframe::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  coingecko:
    base_url: "http://example.com/api/v3"
currency: "eur"
asset_limit: 50
stale_after_secs: 60
default_timeframe: "1Y"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.coingecko_base_url(), "http://example.com/api/v3");
        assert_eq!(config.currency, "eur");
        assert_eq!(config.asset_limit, 50);
        assert_eq!(config.stale_after(), Duration::from_secs(60));
        assert_eq!(config.timeframe(), Timeframe::OneYear);
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("currency: usd").unwrap();
        assert_eq!(config.coingecko_base_url(), DEFAULT_COINGECKO_URL);
        assert_eq!(config.asset_limit, 20);
        assert_eq!(config.stale_after_secs, 300);
        assert_eq!(config.timeframe(), Timeframe::OneMonth);

        let config: AppConfig = serde_yaml::from_str("providers:\n  coingecko: null").unwrap();
        assert_eq!(config.coingecko_base_url(), DEFAULT_COINGECKO_URL);
    }

    #[test]
    fn test_invalid_timeframe_falls_back() {
        let config: AppConfig = serde_yaml::from_str("default_timeframe: 2W").unwrap();
        assert_eq!(config.timeframe(), Timeframe::OneMonth);
    }

    #[test]
    fn test_load_from_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "asset_limit: 5\n").unwrap();
        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.asset_limit, 5);

        let err = AppConfig::load_from_path("/nonexistent/coinchart.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
