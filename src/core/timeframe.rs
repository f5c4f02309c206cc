//! Display windows and their mapping onto provider query parameters

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub enum Timeframe {
    OneDay,
    OneWeek,
    #[default]
    OneMonth,
    ThreeMonths,
    OneYear,
    FiveYears,
}

impl Timeframe {
    pub const ALL: [Timeframe; 6] = [
        Timeframe::OneDay,
        Timeframe::OneWeek,
        Timeframe::OneMonth,
        Timeframe::ThreeMonths,
        Timeframe::OneYear,
        Timeframe::FiveYears,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Timeframe::OneDay => "1D",
            Timeframe::OneWeek => "1W",
            Timeframe::OneMonth => "1M",
            Timeframe::ThreeMonths => "3M",
            Timeframe::OneYear => "1Y",
            Timeframe::FiveYears => "5Y",
        }
    }

    /// Parses a token, falling back to one month for anything unknown.
    pub fn parse_or_default(token: &str) -> Self {
        token.parse().unwrap_or_else(|_| {
            debug!("Unknown timeframe token {token:?}, using 1M");
            Timeframe::default()
        })
    }

    pub fn range_params(&self) -> RangeParams {
        match self {
            Timeframe::OneDay => RangeParams::new(DayRange::Days(1), Interval::Hourly),
            Timeframe::OneWeek => RangeParams::new(DayRange::Days(7), Interval::Daily),
            Timeframe::OneMonth => RangeParams::new(DayRange::Days(30), Interval::Daily),
            Timeframe::ThreeMonths => RangeParams::new(DayRange::Days(90), Interval::Daily),
            Timeframe::OneYear => RangeParams::new(DayRange::Days(365), Interval::Daily),
            Timeframe::FiveYears => RangeParams::new(DayRange::Max, Interval::Weekly),
        }
    }
}

impl Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for Timeframe {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "1D" => Ok(Timeframe::OneDay),
            "1W" => Ok(Timeframe::OneWeek),
            "1M" => Ok(Timeframe::OneMonth),
            "3M" => Ok(Timeframe::ThreeMonths),
            "1Y" => Ok(Timeframe::OneYear),
            "5Y" => Ok(Timeframe::FiveYears),
            _ => Err(anyhow::anyhow!("Invalid timeframe: {}", s)),
        }
    }
}

/// How far back the provider should look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayRange {
    Days(u32),
    Max,
}

impl Display for DayRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayRange::Days(days) => write!(f, "{days}"),
            DayRange::Max => write!(f, "max"),
        }
    }
}

/// Sampling cadence requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Hourly,
    Daily,
    Weekly,
}

impl Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Interval::Hourly => "hourly",
                Interval::Daily => "daily",
                Interval::Weekly => "weekly",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeParams {
    pub days: DayRange,
    pub interval: Interval,
}

impl RangeParams {
    pub fn new(days: DayRange, interval: Interval) -> Self {
        Self { days, interval }
    }

    /// Maps a raw timeframe token. Unknown tokens get the one month range.
    pub fn for_token(token: &str) -> Self {
        Timeframe::parse_or_default(token).range_params()
    }
}
