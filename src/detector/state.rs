//! Tracking state carried between frames.
use crate::fit::{LaneFit, PolynomialFit};
use crate::types::{FitSource, PerSide};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TrackingOptions {
    /// Consecutive failed frames a side may reuse its last fit for.
    pub max_stale_frames: u32,
}

impl Default for TrackingOptions {
    fn default() -> Self {
        Self {
            max_stale_frames: 5,
        }
    }
}

/// Last usable fit of one side and how many frames it has gone unconfirmed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SideTrack {
    fit: Option<LaneFit>,
    misses: u32,
}

impl SideTrack {
    pub fn fit(&self) -> Option<&LaneFit> {
        self.fit.as_ref()
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    /// Pixel-space prior for the next search; only a fit confirmed on the
    /// previous frame qualifies.
    pub fn prior_for_search(&self) -> Option<PolynomialFit> {
        match (&self.fit, self.misses) {
            (Some(fit), 0) => Some(fit.pixel),
            _ => None,
        }
    }

    pub fn record_fresh(&mut self, fit: LaneFit) -> FitSource {
        self.fit = Some(fit);
        self.misses = 0;
        FitSource::Fresh
    }

    /// Age the stored fit; drop it once it exceeds `max_stale_frames`.
    pub fn record_miss(&mut self, max_stale_frames: u32) -> FitSource {
        if self.fit.is_none() {
            return FitSource::Missing;
        }
        self.misses += 1;
        if self.misses > max_stale_frames {
            self.fit = None;
            self.misses = 0;
            return FitSource::Missing;
        }
        FitSource::Carried { age: self.misses }
    }
}

/// Everything one tracking session remembers between frames.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackingState {
    pub sides: PerSide<SideTrack>,
    pub frames_processed: u64,
}

impl TrackingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all fits, e.g. after a scene cut.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True while at least one side holds a fit.
    pub fn is_tracking(&self) -> bool {
        self.sides.iter().any(|(_, s)| s.fit.is_some())
    }

    pub fn fits(&self) -> PerSide<Option<&LaneFit>> {
        PerSide::new(self.sides.left.fit(), self.sides.right.fit())
    }
}
