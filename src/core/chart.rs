//! Shapes historical series into chart-ready structures.
//!
//! Nothing here draws. The builders produce labels, numeric lines and
//! presentation metadata; value formatting for tooltips and axis ticks is
//! exposed on [`ChartData`] so a renderer only has to call back into it.
use crate::core::format::{format_currency, format_timestamp};
use crate::core::market::{Asset, HistoricalSeries};
use crate::core::timeframe::Timeframe;

pub const UP_COLOR: &str = "rgb(74, 222, 128)";
pub const DOWN_COLOR: &str = "rgb(248, 113, 113)";
const UP_FILL: [&str; 2] = ["rgba(74, 222, 128, 0.2)", "rgba(74, 222, 128, 0)"];
const DOWN_FILL: [&str; 2] = ["rgba(248, 113, 113, 0.2)", "rgba(248, 113, 113, 0)"];

/// Line colors for comparison charts, assigned by position.
pub const COMPARISON_PALETTE: [&str; 6] = [
    "rgb(75, 192, 192)",
    "rgb(153, 102, 255)",
    "rgb(255, 159, 64)",
    "rgb(54, 162, 235)",
    "rgb(255, 99, 132)",
    "rgb(255, 206, 86)",
];

pub const LINE_TENSION: f64 = 0.4;
pub const MAX_X_TICKS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// Compares the first and last price; a flat series counts as up.
    pub fn of(series: &HistoricalSeries) -> Option<Self> {
        let first = series.first_price()?;
        let last = series.last_price()?;
        Some(if first <= last { Trend::Up } else { Trend::Down })
    }

    pub fn color(&self) -> &'static str {
        match self {
            Trend::Up => UP_COLOR,
            Trend::Down => DOWN_COLOR,
        }
    }

    fn gradient(&self) -> Vec<GradientStop> {
        let stops = match self {
            Trend::Up => UP_FILL,
            Trend::Down => DOWN_FILL,
        };
        vec![
            GradientStop::new(0.0, stops[0]),
            GradientStop::new(1.0, stops[1]),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: String,
}

impl GradientStop {
    fn new(offset: f64, color: &str) -> Self {
        Self {
            offset,
            color: color.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Solid(String),
    /// Top-to-bottom vertical gradient.
    Gradient(Vec<GradientStop>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Legend text.
    pub label: String,
    /// Name shown in front of a hovered value.
    pub series_name: String,
    pub data: Vec<f64>,
    pub border_color: String,
    pub background: Background,
    pub border_width: u32,
    pub tension: f64,
    pub fill: bool,
    pub point_radius: u32,
    pub point_hover_radius: u32,
}

impl Dataset {
    fn line(label: String, series_name: String, data: Vec<f64>, color: &str) -> Self {
        Self {
            label,
            series_name,
            data,
            border_color: color.to_string(),
            background: Background::Solid(color.to_string()),
            border_width: 2,
            tension: LINE_TENSION,
            fill: false,
            point_radius: 0,
            point_hover_radius: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    /// Set for single-series charts only.
    pub trend: Option<Trend>,
    pub show_legend: bool,
    /// Quote currency of every value, e.g. `usd`.
    pub currency: String,
}

impl ChartData {
    /// Tooltip text for a value of the given dataset, e.g. `BTC: $43,210.00`.
    pub fn tooltip_label(&self, dataset: usize, value: f64) -> String {
        let name = self
            .datasets
            .get(dataset)
            .map_or("", |d| d.series_name.as_str());
        format!("{name}: {}", format_currency(value, &self.currency, false))
    }

    /// Compact y-axis tick text, e.g. `$43.21K`.
    pub fn axis_tick(&self, value: f64) -> String {
        format_currency(value, &self.currency, true)
    }

    /// Evenly spread indices into `labels`, always including both ends.
    pub fn sample_indices(&self, max: usize) -> Vec<usize> {
        let len = self.labels.len();
        if len <= max {
            return (0..len).collect();
        }
        if max <= 1 {
            return vec![0];
        }
        let mut indices: Vec<usize> = (0..max).map(|i| i * (len - 1) / (max - 1)).collect();
        indices.dedup();
        indices
    }

    /// The x-axis labels a renderer should show.
    pub fn tick_labels(&self) -> Vec<&str> {
        self.sample_indices(MAX_X_TICKS)
            .into_iter()
            .map(|i| self.labels[i].as_str())
            .collect()
    }

    /// Lowest and highest value over all datasets.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.datasets
            .iter()
            .flat_map(|d| d.data.iter().copied())
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PriceChart {
    Ready(ChartData),
    NoData,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonChart {
    Ready(ChartData),
    /// Nothing selected for comparison.
    Empty,
    /// At least one asset has no series yet; ids in comparison order.
    Incomplete { missing: Vec<String> },
}

/// Builds the single-asset price chart.
pub fn build_price_chart(
    series: Option<&HistoricalSeries>,
    timeframe: Timeframe,
    symbol: &str,
    currency: &str,
) -> PriceChart {
    let Some(series) = series.filter(|s| s.has_prices()) else {
        return PriceChart::NoData;
    };
    let Some(trend) = Trend::of(series) else {
        return PriceChart::NoData;
    };

    let symbol = symbol.to_uppercase();
    let labels = series
        .prices
        .iter()
        .map(|p| format_timestamp(p.timestamp_ms, timeframe))
        .collect();
    let data = series.prices.iter().map(|p| p.value).collect();

    let mut dataset = Dataset::line(format!("{symbol} Price"), symbol, data, trend.color());
    dataset.background = Background::Gradient(trend.gradient());
    dataset.fill = true;

    PriceChart::Ready(ChartData {
        labels,
        datasets: vec![dataset],
        trend: Some(trend),
        show_legend: false,
        currency: currency.to_string(),
    })
}

/// Builds the comparison chart on the first asset's timeline.
///
/// All assets are assumed to share the sampling cadence of the active
/// timeframe, so series are aligned by index and cut to the reference length.
pub fn build_comparison_chart(
    entries: &[(&Asset, Option<&HistoricalSeries>)],
    timeframe: Timeframe,
    currency: &str,
) -> ComparisonChart {
    if entries.is_empty() {
        return ComparisonChart::Empty;
    }

    let missing: Vec<String> = entries
        .iter()
        .filter(|(_, series)| !series.is_some_and(HistoricalSeries::has_prices))
        .map(|(asset, _)| asset.id.clone())
        .collect();
    if !missing.is_empty() {
        return ComparisonChart::Incomplete { missing };
    }

    let series: Vec<(&Asset, &HistoricalSeries)> = entries
        .iter()
        .filter_map(|(asset, series)| series.map(|s| (*asset, s)))
        .collect();
    let reference = series[0].1;
    let labels: Vec<String> = reference
        .prices
        .iter()
        .map(|p| format_timestamp(p.timestamp_ms, timeframe))
        .collect();

    let datasets = series
        .iter()
        .enumerate()
        .map(|(index, (asset, series))| {
            let symbol = asset.symbol.to_uppercase();
            let data = series
                .prices
                .iter()
                .take(labels.len())
                .map(|p| p.value)
                .collect();
            let color = COMPARISON_PALETTE[index % COMPARISON_PALETTE.len()];
            Dataset::line(symbol.clone(), symbol, data, color)
        })
        .collect();

    ComparisonChart::Ready(ChartData {
        labels,
        datasets,
        trend: None,
        show_legend: true,
        currency: currency.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::market::test_util::{asset, series};

    fn ready(chart: PriceChart) -> ChartData {
        match chart {
            PriceChart::Ready(data) => data,
            PriceChart::NoData => panic!("Expected a chart"),
        }
    }

    #[test]
    fn test_price_chart_shape() {
        let s = series(&[10.0, 12.0, 11.0, 15.0]);
        let chart = ready(build_price_chart(Some(&s), Timeframe::OneDay, "btc", "usd"));

        assert_eq!(chart.labels, vec!["00:00", "01:00", "02:00", "03:00"]);
        assert_eq!(chart.datasets.len(), 1);
        let line = &chart.datasets[0];
        assert_eq!(line.label, "BTC Price");
        assert_eq!(line.data, vec![10.0, 12.0, 11.0, 15.0]);
        assert_eq!(line.border_color, UP_COLOR);
        assert!(line.fill);
        assert_eq!(line.tension, LINE_TENSION);
        assert!(!chart.show_legend);
    }

    #[test]
    fn test_trend_direction() {
        let down = series(&[15.0, 12.0, 10.0]);
        let chart = ready(build_price_chart(Some(&down), Timeframe::OneWeek, "eth", "usd"));
        assert_eq!(chart.trend, Some(Trend::Down));
        assert_eq!(chart.datasets[0].border_color, DOWN_COLOR);
        match &chart.datasets[0].background {
            Background::Gradient(stops) => {
                assert_eq!(stops.len(), 2);
                assert_eq!(stops[0].color, "rgba(248, 113, 113, 0.2)");
                assert_eq!(stops[1].offset, 1.0);
            }
            other => panic!("Expected gradient, got {other:?}"),
        }

        // equal first and last counts as an uptrend
        let flat = series(&[10.0, 5.0, 10.0]);
        let chart = ready(build_price_chart(Some(&flat), Timeframe::OneWeek, "eth", "usd"));
        assert_eq!(chart.trend, Some(Trend::Up));
    }

    #[test]
    fn test_price_chart_without_data() {
        assert_eq!(
            build_price_chart(None, Timeframe::OneMonth, "btc", "usd"),
            PriceChart::NoData
        );
        let empty = HistoricalSeries::default();
        assert_eq!(
            build_price_chart(Some(&empty), Timeframe::OneMonth, "btc", "usd"),
            PriceChart::NoData
        );
    }

    #[test]
    fn test_value_callbacks() {
        let s = series(&[43210.0, 43300.5]);
        let chart = ready(build_price_chart(Some(&s), Timeframe::OneDay, "btc", "usd"));
        assert_eq!(chart.tooltip_label(0, 43300.5), "BTC: $43,300.50");
        assert_eq!(chart.axis_tick(43300.5), "$43.30K");
        assert_eq!(chart.value_range(), Some((43210.0, 43300.5)));
    }

    #[test]
    fn test_value_callbacks_follow_currency() {
        let s = series(&[39000.0, 39100.0]);
        let chart = ready(build_price_chart(Some(&s), Timeframe::OneDay, "btc", "eur"));
        assert_eq!(chart.tooltip_label(0, 39100.0), "BTC: €39,100.00");
        assert_eq!(chart.axis_tick(39100.0), "€39.10K");

        let ComparisonChart::Ready(chart) = build_comparison_chart(
            &[(&asset("bitcoin", "btc"), Some(&s))],
            Timeframe::OneDay,
            "chf",
        ) else {
            panic!("Expected a chart");
        };
        assert_eq!(chart.tooltip_label(0, 39100.0), "BTC: CHF 39,100.00");
    }

    #[test]
    fn test_tick_sampling() {
        let values: Vec<f64> = (0..24).map(f64::from).collect();
        let s = series(&values);
        let chart = ready(build_price_chart(Some(&s), Timeframe::OneDay, "btc", "usd"));

        let ticks = chart.tick_labels();
        assert_eq!(ticks.len(), MAX_X_TICKS);
        assert_eq!(ticks.first(), Some(&"00:00"));
        assert_eq!(ticks.last(), Some(&"23:00"));
        assert_eq!(chart.sample_indices(30).len(), 24);
    }

    #[test]
    fn test_comparison_chart_uses_first_timeline() {
        let btc = asset("bitcoin", "btc");
        let eth = asset("ethereum", "eth");
        let sol = asset("solana", "sol");
        let s1 = series(&[1.0, 2.0, 3.0]);
        let s2 = series(&[4.0, 5.0, 6.0, 7.0]);
        let s3 = series(&[8.0, 9.0, 10.0]);

        let chart = build_comparison_chart(
            &[(&btc, Some(&s1)), (&eth, Some(&s2)), (&sol, Some(&s3))],
            Timeframe::OneDay,
            "usd",
        );
        let ComparisonChart::Ready(chart) = chart else {
            panic!("Expected a chart");
        };

        assert_eq!(chart.labels.len(), 3);
        let labels: Vec<&str> = chart.datasets.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["BTC", "ETH", "SOL"]);
        assert_eq!(chart.datasets[1].data, vec![4.0, 5.0, 6.0]);
        assert!(chart.show_legend);
        assert_eq!(chart.tooltip_label(2, 9.0), "SOL: $9.00");
    }

    fn colors(entries: &[(&Asset, Option<&HistoricalSeries>)]) -> Vec<(String, String)> {
        match build_comparison_chart(entries, Timeframe::OneMonth, "usd") {
            ComparisonChart::Ready(chart) => chart
                .datasets
                .into_iter()
                .map(|d| (d.label, d.border_color))
                .collect(),
            other => panic!("Expected a chart, got {other:?}"),
        }
    }

    #[test]
    fn test_comparison_colors_follow_position() {
        let btc = asset("bitcoin", "btc");
        let eth = asset("ethereum", "eth");
        let s = series(&[1.0, 2.0]);

        let first = colors(&[(&btc, Some(&s)), (&eth, Some(&s))]);
        let swapped = colors(&[(&eth, Some(&s)), (&btc, Some(&s))]);
        assert_eq!(first[0], ("BTC".to_string(), COMPARISON_PALETTE[0].to_string()));
        assert_eq!(swapped[1], ("BTC".to_string(), COMPARISON_PALETTE[1].to_string()));
    }

    #[test]
    fn test_comparison_incomplete_when_any_series_missing() {
        let btc = asset("bitcoin", "btc");
        let eth = asset("ethereum", "eth");
        let sol = asset("solana", "sol");
        let s = series(&[1.0, 2.0]);
        let empty = HistoricalSeries::default();

        let chart = build_comparison_chart(
            &[(&btc, Some(&s)), (&eth, None), (&sol, Some(&s))],
            Timeframe::OneMonth,
            "usd",
        );
        assert_eq!(
            chart,
            ComparisonChart::Incomplete {
                missing: vec!["ethereum".to_string()]
            }
        );

        let chart = build_comparison_chart(
            &[(&btc, Some(&empty)), (&eth, Some(&s))],
            Timeframe::OneMonth,
            "usd",
        );
        assert!(matches!(chart, ComparisonChart::Incomplete { .. }));

        assert_eq!(
            build_comparison_chart(&[], Timeframe::OneMonth, "usd"),
            ComparisonChart::Empty
        );
    }
}
