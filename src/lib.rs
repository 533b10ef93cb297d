#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod control;
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod estimate;
pub mod fit;
pub mod image;
pub mod overlay;
pub mod perspective;
pub mod types;

// Stage internals, public for tooling and tests.
pub mod config;
pub mod edges;
pub mod homography;
pub mod search;
pub mod threshold;

// --- High-level re-exports -------------------------------------------------

// Main entry points: pipeline, detector, parameters and results.
pub use crate::detector::{LaneDetector, LaneParams, LanePipeline, TrackingState};
pub use crate::error::{CalibrationError, FitError, FrameError, IoError};
pub use crate::perspective::{Calibration, PerspectiveTransformer};
pub use crate::types::{
    CurveDirection, Estimate, EstimateBasis, FitSource, FrameReport, FrameStatus, PerSide, Side,
    SideIssue, SideReport,
};

// Detailed output for tools.
pub use crate::diagnostics::{DetailedFrame, FrameDiagnostics};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use lane_estimator::prelude::*;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let (w, h) = (640usize, 480usize);
/// let rgb = vec![0u8; 3 * w * h];
/// let frame = ImageRgb8::packed(w, h, &rgb)?;
///
/// let mut det = LaneDetector::new(&Calibration::proportional(w, h), LaneParams::default())?;
/// let report = det.process(&frame)?;
/// println!("status={:?} estimate={:?}", report.status, report.estimate);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ImageRgb8;
    pub use crate::{Calibration, FrameReport, FrameStatus, LaneDetector, LaneParams};
}
