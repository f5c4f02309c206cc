use super::{top, ui};
use crate::core::MarketDataProvider;
use crate::core::render::{ChartSlot, ChartView};
use crate::dashboard::Dashboard;
use anyhow::Result;
use std::io::Write;

pub async fn run<P: MarketDataProvider>(
    dashboard: &mut Dashboard<P>,
    asset_ids: &[String],
    out: &mut impl Write,
) -> Result<()> {
    let pb = ui::new_spinner("Fetching assets...");
    let notice = dashboard.load_assets().await;
    pb.finish_and_clear();
    if let Some(notice) = notice {
        writeln!(out, "{}", ui::notice_text(&notice))?;
        return Ok(());
    }

    let mut slot = ChartSlot::new(ui::TerminalSurface::stdout());
    slot.mount(&ChartView::Loading("Loading comparison data...".to_string()));
    let notices = dashboard
        .add_all_to_comparison(asset_ids.iter().map(String::as_str))
        .await;
    slot.unmount();

    for notice in &notices {
        writeln!(out, "{}", ui::notice_text(notice))?;
    }

    let state = dashboard.state();
    if !state.comparison().is_empty() {
        writeln!(
            out,
            "\n{} {}",
            ui::style_text("Comparison View", ui::StyleType::Title),
            state.timeframe()
        )?;
        writeln!(
            out,
            "{}",
            top::display_assets(state.comparison().assets(), state.currency())
        )?;
    }
    out.flush()?;
    slot.mount(&state.comparison_chart().into());
    Ok(())
}
