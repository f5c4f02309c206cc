//! Label and value formatting shared by the chart builders and the tables.
use crate::core::timeframe::Timeframe;
use chrono::{DateTime, Utc};

const COMPACT_SUFFIXES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

/// Formats a millisecond timestamp as an x-axis label for the given timeframe.
///
/// Labels are rendered in UTC.
pub fn format_timestamp(timestamp_ms: i64, timeframe: Timeframe) -> String {
    let pattern = match timeframe {
        Timeframe::OneDay => "%H:%M",
        Timeframe::OneWeek | Timeframe::OneMonth => "%b %-d",
        Timeframe::ThreeMonths | Timeframe::OneYear => "%b %Y",
        Timeframe::FiveYears => "%b %y",
    };
    format_with(timestamp_ms, pattern)
}

/// Formats a label from a raw timeframe token. Unknown tokens get the full date.
pub fn label_for_token(timestamp_ms: i64, token: &str) -> String {
    match token.parse::<Timeframe>() {
        Ok(timeframe) => format_timestamp(timestamp_ms, timeframe),
        Err(_) => format_with(timestamp_ms, "%b %-d, %Y"),
    }
}

fn format_with(timestamp_ms: i64, pattern: &str) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format(pattern).to_string())
        .unwrap_or_default()
}

/// Quote currency used when none is configured.
pub const DEFAULT_CURRENCY: &str = "usd";

/// Text placed before an amount in `currency`: a symbol for common codes,
/// otherwise the uppercase code and a space.
pub fn currency_prefix(currency: &str) -> String {
    let code = currency.trim().to_ascii_lowercase();
    let symbol = match code.as_str() {
        "" => "",
        "usd" => "$",
        "eur" => "€",
        "gbp" => "£",
        "jpy" | "cny" => "¥",
        "inr" => "₹",
        "krw" => "₩",
        "btc" => "₿",
        _ => return format!("{} ", code.to_ascii_uppercase()),
    };
    symbol.to_string()
}

/// Formats an amount in `currency`. Values below one keep 4 to 6 fraction digits.
pub fn format_currency(value: f64, currency: &str, compact: bool) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    let prefix = currency_prefix(currency);

    if compact {
        if let Some((scaled, suffix)) = compact_parts(abs, 2) {
            return format!("{sign}{prefix}{scaled:.2}{suffix}");
        }
    }

    if abs < 1.0 {
        let fixed = format!("{abs:.6}");
        let decimals = fixed
            .trim_end_matches('0')
            .split('.')
            .nth(1)
            .map_or(0, str::len);
        return format!("{sign}{prefix}{abs:.prec$}", prec = decimals.max(4));
    }
    format!("{sign}{prefix}{}", group_thousands(&format!("{abs:.2}")))
}

/// Formats a plain number, optionally with a K/M/B/T suffix.
pub fn format_number(value: f64, compact: bool) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();

    if compact {
        if let Some((scaled, suffix)) = compact_parts(abs, 1) {
            let text = if scaled < 100.0 {
                format!("{scaled:.1}")
            } else {
                format!("{scaled:.0}")
            };
            let text = text.trim_end_matches(".0");
            return format!("{sign}{text}{suffix}");
        }
    }

    let fixed = format!("{abs:.3}");
    let fixed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{sign}{}", group_thousands(fixed))
}

/// Formats a signed percentage change, e.g. `+1.23%`.
pub fn format_percent_change(value: f64) -> String {
    // folds -0.0 into +0.0
    let value = value + 0.0;
    if value >= 0.0 {
        format!("+{value:.2}%")
    } else {
        format!("{value:.2}%")
    }
}

/// Picks the largest suffix for `abs`, promoting when rounding reaches 1000.
fn compact_parts(abs: f64, decimals: i32) -> Option<(f64, &'static str)> {
    let factor = 10f64.powi(decimals);
    let idx = COMPACT_SUFFIXES
        .iter()
        .position(|(threshold, _)| abs >= *threshold)?;
    let (threshold, suffix) = COMPACT_SUFFIXES[idx];
    let scaled = (abs / threshold * factor).round() / factor;
    if scaled >= 1000.0 && idx > 0 {
        let (bigger, bigger_suffix) = COMPACT_SUFFIXES[idx - 1];
        return Some(((abs / bigger * factor).round() / factor, bigger_suffix));
    }
    Some((scaled, suffix))
}

fn group_thousands(digits: &str) -> String {
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{grouped}.{frac}"),
        None => grouped,
    }
}
