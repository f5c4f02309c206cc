use super::ui;
use crate::core::format::{format_currency, format_number};
use crate::core::render::{ChartSlot, ChartView};
use crate::core::{Asset, MarketDataProvider, Notice};
use crate::dashboard::Dashboard;
use anyhow::Result;
use comfy_table::Cell;
use std::io::Write;

/// Headline figures for one asset, amounts in `currency`.
pub fn display_overview(asset: &Asset, volume: Option<f64>, currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Current Price"),
        ui::header_cell("Market Cap"),
        ui::header_cell("Rank"),
        ui::header_cell("24h Change"),
        ui::header_cell("7d Change"),
        ui::header_cell("Volume"),
    ]);
    table.add_row(vec![
        Cell::new(format_currency(asset.current_price, currency, false)),
        Cell::new(format_currency(asset.market_cap, currency, true)),
        ui::format_optional_cell(asset.market_cap_rank, |r| format!("#{r}")),
        ui::change_cell(asset.change_24h),
        ui::change_cell(asset.change_7d),
        ui::format_optional_cell(volume, |v| format_number(v, true)),
    ]);

    format!(
        "{} ({})\n{}",
        ui::style_text(&asset.name, ui::StyleType::Title),
        asset.symbol.to_uppercase(),
        table
    )
}

pub async fn run<P: MarketDataProvider>(
    dashboard: &mut Dashboard<P>,
    asset_id: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    let pb = ui::new_spinner("Fetching assets...");
    let notice = dashboard.load_assets().await;
    pb.finish_and_clear();
    if let Some(notice) = notice {
        writeln!(out, "{}", ui::notice_text(&notice))?;
        return Ok(());
    }

    let state = dashboard.state();
    let asset = match asset_id {
        Some(id) => state.asset(id),
        None => state.selected_asset(),
    };
    let Some(asset) = asset.cloned() else {
        let notice = Notice::UnknownAsset {
            id: asset_id.unwrap_or_default().to_string(),
        };
        writeln!(out, "{}", ui::notice_text(&notice))?;
        return Ok(());
    };

    let mut slot = ChartSlot::new(ui::TerminalSurface::stdout());
    slot.mount(&ChartView::Loading("Loading chart data...".to_string()));
    let notice = dashboard.select_asset(&asset.id).await;
    slot.unmount();

    let state = dashboard.state();
    let volume = state
        .series(&asset.id)
        .and_then(|s| s.total_volumes.last())
        .map(|p| p.value);
    writeln!(out, "{}\n", display_overview(&asset, volume, state.currency()))?;
    writeln!(
        out,
        "{} {}",
        ui::style_text("Price Chart", ui::StyleType::Title),
        state.timeframe()
    )?;
    if let Some(notice) = notice {
        writeln!(out, "{}", ui::notice_text(&notice))?;
    }
    out.flush()?;
    slot.mount(&state.price_chart().into());
    Ok(())
}
