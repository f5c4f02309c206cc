//! The bounded, ordered set of assets charted side by side.
use crate::core::market::Asset;
use tracing::debug;

pub const MAX_COMPARISON_ASSETS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOutcome {
    Added,
    AlreadyPresent,
    Full,
}

/// Ordered, duplicate-free set of at most four assets charted together.
#[derive(Debug, Clone, Default)]
pub struct ComparisonSet {
    assets: Vec<Asset>,
}

impl ComparisonSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `asset` unless it is already present or the set is full.
    /// Rejections leave the set untouched.
    pub fn add(&mut self, asset: Asset) -> ComparisonOutcome {
        if self.contains(&asset.id) {
            debug!(asset_id = asset.id, "Asset already in comparison");
            return ComparisonOutcome::AlreadyPresent;
        }
        if self.assets.len() >= MAX_COMPARISON_ASSETS {
            debug!(asset_id = asset.id, "Comparison set is full");
            return ComparisonOutcome::Full;
        }
        self.assets.push(asset);
        ComparisonOutcome::Added
    }

    pub fn remove(&mut self, asset_id: &str) -> bool {
        let before = self.assets.len();
        self.assets.retain(|a| a.id != asset_id);
        self.assets.len() != before
    }

    pub fn contains(&self, asset_id: &str) -> bool {
        self.assets.iter().any(|a| a.id == asset_id)
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
