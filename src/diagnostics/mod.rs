//! Intermediate artifacts of a frame, for tooling and visualization.
//!
//! `LanePipeline::process_with_diagnostics` returns these next to the
//! regular [`FrameReport`]. Nothing here feeds back into the estimate.

pub mod timing;

pub use timing::{StageTiming, TimingBreakdown};

use crate::fit::LaneFit;
use crate::image::LaneMask;
use crate::search::{LanePixels, SearchWindow};
use crate::types::{FrameReport, PerSide};

/// Stage outputs captured while processing one frame.
#[derive(Clone, Debug)]
pub struct FrameDiagnostics {
    /// Extractor output in camera space; `None` when the pipeline was fed
    /// a top-down mask directly.
    pub binary: Option<LaneMask>,
    /// Extractor output warped into the top-down canvas.
    pub top_down: LaneMask,
    /// Column sums over the lower half of `top_down`.
    pub histogram: Vec<u32>,
    pub pixels: PerSide<LanePixels>,
    /// Sliding-window rectangles, empty for prior-guided sides.
    pub windows: Vec<SearchWindow>,
    /// Fits used for the estimate (fresh or carried).
    pub fits: PerSide<Option<LaneFit>>,
}

/// Report plus diagnostics.
#[derive(Clone, Debug)]
pub struct DetailedFrame {
    pub report: FrameReport,
    pub diagnostics: FrameDiagnostics,
}
