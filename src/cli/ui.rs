use crate::core::chart::{ChartData, Trend};
use crate::core::format::{format_currency, format_percent_change};
use crate::core::render::{ChartSurface, ChartView};
use crate::core::state::Notice;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::debug;

/// Rows shown when a chart is printed as a table.
const CHART_ROWS: usize = 12;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Success,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Success => style(text).green(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

pub fn notice_text(notice: &Notice) -> String {
    let style_type = if notice.is_error() {
        StyleType::Error
    } else {
        StyleType::Success
    };
    style_text(&notice.to_string(), style_type)
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format_fn(v)).set_alignment(CellAlignment::Right),
    )
}

/// Creates a cell for displaying percentage change with color coding.
pub fn change_cell(change: Option<f64>) -> Cell {
    match change {
        Some(change) => {
            let color = if change >= 0.0 { Color::Green } else { Color::Red };
            Cell::new(format_percent_change(change))
                .fg(color)
                .set_alignment(CellAlignment::Right)
        }
        None => format_optional_cell(None::<f64>, |_| String::new()),
    }
}

/// Parses `rgb(r, g, b)` into a terminal color.
pub fn parse_rgb(color: &str) -> Option<Color> {
    let inner = color.trim().strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(|p| p.trim().parse::<u8>());
    let (r, g, b) = (parts.next()?.ok()?, parts.next()?.ok()?, parts.next()?.ok()?);
    if parts.next().is_some() {
        return None;
    }
    Some(Color::Rgb { r, g, b })
}

/// Renders chart data as a table of sampled points plus axis summary.
pub fn render_chart(chart: &ChartData) -> String {
    let mut table = new_styled_table();

    let mut header = vec![header_cell("Time")];
    for dataset in &chart.datasets {
        let mut cell = Cell::new(&dataset.label).add_attribute(Attribute::Bold);
        if let Some(color) = parse_rgb(&dataset.border_color) {
            cell = cell.fg(color);
        }
        header.push(cell);
    }
    table.set_header(header);

    for index in chart.sample_indices(CHART_ROWS) {
        let mut row = vec![Cell::new(&chart.labels[index])];
        for dataset in &chart.datasets {
            row.push(format_optional_cell(dataset.data.get(index).copied(), |v| {
                format_currency(v, &chart.currency, false)
            }));
        }
        table.add_row(row);
    }

    let mut output = table.to_string();

    if let Some((lo, hi)) = chart.value_range() {
        output.push_str(&format!(
            "\n{} {} .. {}",
            style_text("Range:", StyleType::Subtle),
            chart.axis_tick(lo),
            chart.axis_tick(hi)
        ));
    }
    output.push_str(&format!(
        "\n{} {}",
        style_text("Axis:", StyleType::Subtle),
        chart.tick_labels().join(" | ")
    ));

    if let (Some(trend), Some(dataset)) = (chart.trend, chart.datasets.first()) {
        if let (Some(first), Some(last)) = (dataset.data.first(), dataset.data.last()) {
            let change = if *first != 0.0 {
                (last - first) / first * 100.0
            } else {
                0.0
            };
            let text = format!("{} {}", dataset.series_name, format_percent_change(change));
            let styled = match trend {
                Trend::Up => style_text(&text, StyleType::Success),
                Trend::Down => style_text(&text, StyleType::Error),
            };
            output.push_str(&format!("\n{} {styled}", style_text("Trend:", StyleType::Subtle)));
        }
    }

    output
}

pub fn render_view(view: &ChartView) -> String {
    match view {
        ChartView::Loading(message) | ChartView::Message(message) => {
            style_text(message, StyleType::Subtle)
        }
        ChartView::Chart(chart) => render_chart(chart),
    }
}

/// Draws views on the terminal. On an interactive terminal a released view
/// is erased so the next one takes its place.
pub struct TerminalSurface {
    term: Term,
    erase_on_release: bool,
}

impl TerminalSurface {
    pub fn stdout() -> Self {
        let term = Term::stdout();
        let erase_on_release = term.is_term();
        Self {
            term,
            erase_on_release,
        }
    }
}

impl ChartSurface for TerminalSurface {
    /// Number of lines drawn.
    type Handle = usize;

    fn draw(&mut self, view: &ChartView) -> usize {
        let text = render_view(view);
        if let Err(e) = self.term.write_line(&text) {
            debug!("Failed to draw chart: {}", e);
            return 0;
        }
        text.lines().count()
    }

    fn release(&mut self, lines: usize) {
        if self.erase_on_release && lines > 0 {
            if let Err(e) = self.term.clear_last_lines(lines) {
                debug!("Failed to clear chart: {}", e);
            }
        }
    }
}

/// Creates a spinner shown while requests are in flight.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
