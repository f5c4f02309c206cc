use super::ui;
use crate::core::format::format_currency;
use crate::core::{Asset, MarketDataProvider};
use crate::dashboard::Dashboard;
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};
use std::io::Write;

/// Renders the ranked asset table with amounts in `currency`.
pub fn display_assets(assets: &[Asset], currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Name"),
        ui::header_cell("Symbol"),
        ui::header_cell("Price"),
        ui::header_cell("Market Cap"),
        ui::header_cell("24h"),
        ui::header_cell("7d"),
        ui::header_cell("30d"),
        ui::header_cell("1y"),
    ]);

    for asset in assets {
        table.add_row(vec![
            ui::format_optional_cell(asset.market_cap_rank, |r| r.to_string()),
            Cell::new(&asset.name),
            Cell::new(asset.symbol.to_uppercase()),
            Cell::new(format_currency(asset.current_price, currency, false))
                .set_alignment(CellAlignment::Right),
            Cell::new(format_currency(asset.market_cap, currency, true))
                .set_alignment(CellAlignment::Right),
            ui::change_cell(asset.change_24h),
            ui::change_cell(asset.change_7d),
            ui::change_cell(asset.change_30d),
            ui::change_cell(asset.change_1y),
        ]);
    }

    table.to_string()
}

pub async fn run<P: MarketDataProvider>(
    dashboard: &mut Dashboard<P>,
    out: &mut impl Write,
) -> Result<()> {
    let pb = ui::new_spinner("Fetching assets...");
    let notice = dashboard.load_assets().await;
    pb.finish_and_clear();

    match notice {
        Some(notice) => writeln!(out, "{}", ui::notice_text(&notice))?,
        None => {
            let state = dashboard.state();
            writeln!(
                out,
                "{}\n",
                ui::style_text("Top Cryptocurrencies", ui::StyleType::Title)
            )?;
            writeln!(out, "{}", display_assets(state.assets(), state.currency()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::market::test_util::asset;

    #[test]
    fn test_display_assets() {
        let mut btc = asset("bitcoin", "btc");
        btc.name = "Bitcoin".to_string();
        btc.current_price = 43210.5;
        btc.market_cap = 846_000_000_000.0;
        btc.change_24h = Some(-1.5);
        btc.change_7d = Some(3.25);

        let output = display_assets(&[btc], "usd");
        assert!(output.contains("Bitcoin"));
        assert!(output.contains("BTC"));
        assert!(output.contains("$43,210.50"));
        assert!(output.contains("$846.00B"));
        assert!(output.contains("-1.50%"));
        assert!(output.contains("+3.25%"));
        assert!(output.contains("N/A"));
    }

    #[test]
    fn test_display_assets_in_configured_currency() {
        let mut btc = asset("bitcoin", "btc");
        btc.current_price = 39000.0;
        btc.market_cap = 760_000_000_000.0;

        let output = display_assets(std::slice::from_ref(&btc), "eur");
        assert!(output.contains("€39,000.00"));
        assert!(output.contains("€760.00B"));
        assert!(!output.contains('$'));

        let output = display_assets(&[btc], "chf");
        assert!(output.contains("CHF 39,000.00"));
    }
}
