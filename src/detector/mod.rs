//! Per-frame orchestration of the lane pipeline.
//!
//! Overview
//! - Extract binary lane evidence from the color frame.
//! - Warp it into the top-down canvas.
//! - Locate the line bases from the column histogram of the lower half.
//! - Per side, search around last frame's fit when that fit is fresh,
//!   otherwise (or when the prior search comes up short) run the sliding
//!   window from the base.
//! - Fit quadratics in pixel and world space and derive offset and radius.
//!
//! Modules
//! - [`params`] – configuration of every stage.
//! - [`state`] – [`TrackingState`], the only data carried across frames.
//! - `pipeline` – the stateless [`LanePipeline`] and the owning
//!   [`LaneDetector`] wrapper.
//!
//! Key Ideas
//! - A side that fails to fit keeps its previous fit for a bounded number
//!   of frames (`Carried`), then drops it (`Missing`).
//! - Frames of the wrong size are rejected before any state changes.

pub mod params;
mod pipeline;
pub mod state;

pub use params::LaneParams;
pub use pipeline::{LaneDetector, LanePipeline};
pub use state::{SideTrack, TrackingOptions, TrackingState};
