pub mod caching;
pub mod coingecko;
