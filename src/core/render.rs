//! Boundary between chart data and whatever draws it.
use crate::core::chart::{ChartData, ComparisonChart, PriceChart};
use tracing::debug;

/// What a mounted view shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartView {
    Loading(String),
    Message(String),
    Chart(ChartData),
}

impl From<PriceChart> for ChartView {
    fn from(chart: PriceChart) -> Self {
        match chart {
            PriceChart::Ready(data) => ChartView::Chart(data),
            PriceChart::NoData => ChartView::Message("No chart data available".to_string()),
        }
    }
}

impl From<ComparisonChart> for ChartView {
    fn from(chart: ComparisonChart) -> Self {
        match chart {
            ComparisonChart::Ready(data) => ChartView::Chart(data),
            ComparisonChart::Empty => {
                ChartView::Message("Select cryptocurrencies to compare".to_string())
            }
            ComparisonChart::Incomplete { .. } => {
                ChartView::Message("Some data is missing. Try again later.".to_string())
            }
        }
    }
}

/// A drawing facility. Every handle returned by `draw` must be given back to
/// `release` before the surface draws over the same view again.
pub trait ChartSurface {
    type Handle;

    fn draw(&mut self, view: &ChartView) -> Self::Handle;

    fn release(&mut self, handle: Self::Handle);
}

/// Holds at most one drawn view on a surface.
pub struct ChartSlot<S: ChartSurface> {
    surface: S,
    mounted: Option<S::Handle>,
}

impl<S: ChartSurface> ChartSlot<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            mounted: None,
        }
    }

    /// Releases the current drawing, then draws `view`.
    pub fn mount(&mut self, view: &ChartView) {
        self.unmount();
        self.mounted = Some(self.surface.draw(view));
    }

    pub fn unmount(&mut self) {
        if let Some(handle) = self.mounted.take() {
            debug!("Releasing mounted chart");
            self.surface.release(handle);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
