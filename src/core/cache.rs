//! Per-asset store of the most recently fetched historical series.
use crate::core::market::HistoricalSeries;
use crate::core::timeframe::Timeframe;
use std::collections::HashMap;
use tracing::debug;

/// Identifies one outstanding fetch. Only the latest ticket issued for an
/// asset may write its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    asset_id: String,
    timeframe: Timeframe,
    generation: u64,
}

impl FetchTicket {
    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }
}

#[derive(Debug, Clone)]
struct Slot {
    timeframe: Timeframe,
    series: Option<HistoricalSeries>,
}

/// One slot per asset. Each slot remembers which timeframe produced it so a
/// series is never served under a different timeframe.
#[derive(Debug, Clone, Default)]
pub struct HistoricalDataCache {
    slots: HashMap<String, Slot>,
    latest: HashMap<String, u64>,
    next_generation: u64,
}

impl HistoricalDataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whatever the slot holds, regardless of timeframe.
    pub fn get(&self, asset_id: &str) -> Option<&HistoricalSeries> {
        self.slots.get(asset_id).and_then(|slot| slot.series.as_ref())
    }

    /// Returns the slot only if it was produced for `timeframe`.
    pub fn get_for(&self, asset_id: &str, timeframe: Timeframe) -> Option<&HistoricalSeries> {
        match self.slots.get(asset_id) {
            Some(slot) if slot.timeframe == timeframe => slot.series.as_ref(),
            Some(slot) => {
                debug!(
                    asset_id,
                    cached = %slot.timeframe,
                    requested = %timeframe,
                    "Ignoring series cached for another timeframe"
                );
                None
            }
            None => None,
        }
    }

    /// Overwrites the slot unconditionally.
    pub fn set(&mut self, asset_id: &str, timeframe: Timeframe, series: Option<HistoricalSeries>) {
        debug!(asset_id, %timeframe, present = series.is_some(), "Cache PUT");
        self.slots
            .insert(asset_id.to_string(), Slot { timeframe, series });
    }

    /// Starts a fetch, superseding every earlier ticket for the same asset.
    pub fn issue(&mut self, asset_id: &str, timeframe: Timeframe) -> FetchTicket {
        self.next_generation += 1;
        self.latest
            .insert(asset_id.to_string(), self.next_generation);
        FetchTicket {
            asset_id: asset_id.to_string(),
            timeframe,
            generation: self.next_generation,
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.latest.get(&ticket.asset_id) == Some(&ticket.generation)
    }

    /// Writes the result if the ticket is still the latest for its asset.
    pub fn apply(&mut self, ticket: &FetchTicket, series: Option<HistoricalSeries>) -> bool {
        if !self.is_current(ticket) {
            debug!(
                asset_id = ticket.asset_id,
                timeframe = %ticket.timeframe,
                generation = ticket.generation,
                "Discarding superseded response"
            );
            return false;
        }
        self.set(&ticket.asset_id, ticket.timeframe, series);
        true
    }

    /// Applies a settled batch in one step. Returns how many results were kept.
    pub fn apply_batch(
        &mut self,
        results: impl IntoIterator<Item = (FetchTicket, Option<HistoricalSeries>)>,
    ) -> usize {
        let mut kept = 0;
        for (ticket, series) in results {
            if self.apply(&ticket, series) {
                kept += 1;
            }
        }
        kept
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
