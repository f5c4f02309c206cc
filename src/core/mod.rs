//! Core business logic abstractions

pub mod cache;
pub mod chart;
pub mod comparison;
pub mod config;
pub mod format;
pub mod log;
pub mod market;
pub mod render;
pub mod state;
pub mod timeframe;

// Re-export main types for cleaner imports
pub use market::{Asset, HistoricalSeries, MarketDataProvider, PricePoint};
pub use state::{AppState, Notice};
pub use timeframe::Timeframe;
