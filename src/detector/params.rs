//! Parameter types configuring the pipeline stages.
//!
//! Defaults reproduce a 1280×720-class dash camera setup; the pixel scale
//! in particular must match the calibration's top-down canvas.
use super::state::TrackingOptions;
use crate::estimate::EstimatorOptions;
use crate::fit::{FitOptions, PixelScale};
use crate::search::{PriorSearchOptions, SlidingWindowOptions};
use crate::threshold::ThresholdOptions;
use serde::Deserialize;

/// Pipeline-wide parameters.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct LaneParams {
    pub threshold: ThresholdOptions,
    pub sliding_window: SlidingWindowOptions,
    pub prior_search: PriorSearchOptions,
    pub fit: FitOptions,
    pub scale: PixelScale,
    pub estimator: EstimatorOptions,
    pub tracking: TrackingOptions,
    /// Search and fit the two sides on the rayon pool.
    pub parallel_sides: bool,
}
