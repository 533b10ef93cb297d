//! Lane-pixel search in the top-down mask.
//!
//! - [`histogram`]: column histogram over the lower half, giving the start
//!   x of each line.
//! - [`sliding_window`]: band-by-band scan from the bottom, re-centering on
//!   the evidence found in each band. Used when no trusted prior exists.
//! - [`prior`]: collect pixels inside a margin around last frame's curve.

pub mod histogram;
pub mod prior;
pub mod sliding_window;

pub use histogram::{locate_bases, BasePositions};
pub use prior::PriorSearchOptions;
pub use sliding_window::{SideSearch, SlidingWindowOptions};

use crate::types::Side;
use serde::Serialize;

/// Strategy that produced a side's pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchMode {
    SlidingWindow,
    PriorGuided,
}

/// Candidate pixels of one lane line, as integer (x, y) in top-down space.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LanePixels {
    points: Vec<[u32; 2]>,
}

impl LanePixels {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, x: usize, y: usize) {
        self.points.push([x as u32, y as u32]);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[[u32; 2]] {
        &self.points
    }

    /// Points as `[x, y]` floats scaled per axis.
    pub fn scaled(&self, sx: f64, sy: f64) -> Vec<[f64; 2]> {
        self.points
            .iter()
            .map(|p| [p[0] as f64 * sx, p[1] as f64 * sy])
            .collect()
    }
}

impl FromIterator<[u32; 2]> for LanePixels {
    fn from_iter<I: IntoIterator<Item = [u32; 2]>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// One sliding-window rectangle: columns `[x0, x1)`, rows `[y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchWindow {
    pub side: Side,
    /// Band index counted from the bottom of the frame.
    pub band: usize,
    pub x0: usize,
    pub x1: usize,
    pub y0: usize,
    pub y1: usize,
    pub pixel_count: usize,
}
