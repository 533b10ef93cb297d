//! Lane pipeline driving one frame end-to-end.
//!
//! [`LanePipeline`] is immutable once built and owns no per-session data:
//! the caller hands in the [`TrackingState`] for every frame. For the common
//! single-camera case [`LaneDetector`] bundles one pipeline with one state.
//!
//! Typical usage:
//! ```no_run
//! use lane_estimator::{Calibration, LaneDetector, LaneParams};
//! use lane_estimator::image::ImageRgb8;
//!
//! # fn example(frame: ImageRgb8) -> Result<(), Box<dyn std::error::Error>> {
//! let calibration = Calibration::proportional(frame.w, frame.h);
//! let mut detector = LaneDetector::new(&calibration, LaneParams::default())?;
//! let report = detector.process(&frame)?;
//! if let Some(est) = report.estimate {
//!     println!("offset {:.1} cm, radius {:.0} m", est.offset_cm(), est.mean_radius_m);
//! }
//! # Ok(())
//! # }
//! ```
use super::params::LaneParams;
use super::state::TrackingState;
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{DetailedFrame, FrameDiagnostics, TimingBreakdown};
use crate::error::{CalibrationError, FrameError};
use crate::estimate::estimate_lane;
use crate::fit::{fit_lane, LaneFit, PolynomialFit};
use crate::image::{ImageRgb8, ImageView, LaneMask};
use crate::perspective::{Calibration, PerspectiveTransformer};
use crate::search::{locate_bases, prior, sliding_window, LanePixels, SearchMode, SearchWindow};
use crate::threshold::extract_lane_evidence;
use crate::types::{FitSource, FrameReport, FrameStatus, PerSide, Side, SideIssue, SideReport};
use log::{debug, warn};
use std::time::Instant;

/// Stateless lane pipeline: calibration plus stage parameters.
#[derive(Clone, Debug)]
pub struct LanePipeline {
    params: LaneParams,
    transformer: PerspectiveTransformer,
}

/// Search and fit result of one side before it is merged into the state.
struct SideOutcome {
    search: SearchMode,
    pixels: LanePixels,
    windows: Vec<SearchWindow>,
    fit: Result<LaneFit, SideIssue>,
}

impl LanePipeline {
    /// Build the pipeline. Fails when the calibration is degenerate.
    pub fn new(calibration: &Calibration, params: LaneParams) -> Result<Self, CalibrationError> {
        let transformer = PerspectiveTransformer::new(calibration)?;
        Ok(Self {
            params,
            transformer,
        })
    }

    pub fn params(&self) -> &LaneParams {
        &self.params
    }

    pub fn transformer(&self) -> &PerspectiveTransformer {
        &self.transformer
    }

    /// Process a camera frame and return the compact report.
    pub fn process(
        &self,
        frame: &ImageRgb8,
        state: &mut TrackingState,
    ) -> Result<FrameReport, FrameError> {
        self.process_with_diagnostics(frame, state)
            .map(|detailed| detailed.report)
    }

    /// Process a camera frame and keep every intermediate artifact.
    pub fn process_with_diagnostics(
        &self,
        frame: &ImageRgb8,
        state: &mut TrackingState,
    ) -> Result<DetailedFrame, FrameError> {
        self.transformer.check_camera_dims(frame.dims())?;
        let (w, h) = frame.dims();
        debug!(
            "LanePipeline::process frame={} w={} h={}",
            state.frames_processed, w, h
        );
        let total_start = Instant::now();
        let mut timing = TimingBreakdown::default();

        let binary = timing.time("threshold", || {
            extract_lane_evidence(frame, &self.params.threshold)
        });
        let top_down = timing.time("warp", || self.transformer.to_top_down(&binary))?;

        let mut detailed = self.track(top_down, state, timing);
        detailed.diagnostics.binary = Some(binary);
        detailed.report.timing.total_ms = elapsed_ms(total_start);
        Ok(detailed)
    }

    /// Run the stages after the warp on an already top-down binary mask.
    pub fn process_top_down(
        &self,
        top_down: &LaneMask,
        state: &mut TrackingState,
    ) -> Result<DetailedFrame, FrameError> {
        let expected = self.transformer.top_down_size();
        if top_down.dims() != expected {
            return Err(FrameError::DimensionMismatch {
                expected,
                actual: top_down.dims(),
            });
        }
        let total_start = Instant::now();
        let mut detailed = self.track(top_down.clone(), state, TimingBreakdown::default());
        detailed.report.timing.total_ms = elapsed_ms(total_start);
        Ok(detailed)
    }

    fn track(
        &self,
        top_down: LaneMask,
        state: &mut TrackingState,
        mut timing: TimingBreakdown,
    ) -> DetailedFrame {
        let bases = timing.time("histogram", || locate_bases(&top_down));
        let priors = state.sides.as_ref().map(|_, track| track.prior_for_search());

        let outcomes = timing.time("search_fit", || {
            if self.params.parallel_sides {
                let (left, right) = rayon::join(
                    || self.search_and_fit(&top_down, Side::Left, bases.bases.left, priors.left),
                    || self.search_and_fit(&top_down, Side::Right, bases.bases.right, priors.right),
                );
                PerSide::new(left, right)
            } else {
                PerSide::from_fn(|side| {
                    self.search_and_fit(&top_down, side, *bases.bases.get(side), *priors.get(side))
                })
            }
        });

        let max_stale = self.params.tracking.max_stale_frames;
        let mut pixels = PerSide::<LanePixels>::default();
        let mut windows = Vec::new();
        let sides = outcomes.map(|side, outcome| {
            let track = state.sides.get_mut(side);
            let had_fit = track.fit().is_some();
            let (source, issue) = match outcome.fit {
                Ok(fit) => (track.record_fresh(fit), None),
                Err(issue) => (track.record_miss(max_stale), Some(issue)),
            };
            if had_fit && source == FitSource::Missing {
                warn!(
                    "{} line lost after {} stale frames",
                    side.as_str(),
                    max_stale
                );
            }
            let report = SideReport {
                search: outcome.search,
                base_x: *bases.bases.get(side),
                pixel_count: outcome.pixels.len(),
                source,
                issue,
            };
            *pixels.get_mut(side) = outcome.pixels;
            windows.extend(outcome.windows);
            report
        });

        let fits = state.fits();
        let estimate = timing.time("estimate", || {
            estimate_lane(
                fits,
                self.transformer.top_down_size(),
                &self.params.scale,
                &self.params.estimator,
            )
        });

        let status = match (&estimate, sides.left.source, sides.right.source) {
            (None, _, _) => FrameStatus::NoEstimate,
            (Some(_), FitSource::Fresh, FitSource::Fresh) => FrameStatus::Tracking,
            _ => FrameStatus::Degraded,
        };
        if status == FrameStatus::NoEstimate {
            warn!("frame {}: no usable lane line", state.frames_processed);
        }
        debug!(
            "frame {} status={:?} left={:?} right={:?}",
            state.frames_processed, status, sides.left.source, sides.right.source
        );

        let report = FrameReport {
            frame_index: state.frames_processed,
            status,
            estimate,
            sides,
            timing,
        };
        let diagnostics = FrameDiagnostics {
            binary: None,
            top_down,
            histogram: bases.histogram,
            pixels,
            windows,
            fits: fits.map(|_, f| f.copied()),
        };
        state.frames_processed += 1;
        DetailedFrame {
            report,
            diagnostics,
        }
    }

    fn search_and_fit(
        &self,
        mask: &LaneMask,
        side: Side,
        base: Option<usize>,
        prior_fit: Option<PolynomialFit>,
    ) -> SideOutcome {
        let params = &self.params;
        if let Some(prior_fit) = prior_fit {
            let pixels = prior::search_side(mask, &prior_fit, &params.prior_search);
            if pixels.len() >= params.prior_search.min_pixels {
                match fit_lane(&pixels, &params.scale, &params.fit) {
                    Ok(fit) => {
                        return SideOutcome {
                            search: SearchMode::PriorGuided,
                            pixels,
                            windows: Vec::new(),
                            fit: Ok(fit),
                        }
                    }
                    Err(err) => debug!("{} prior-guided fit rejected: {err}", side.as_str()),
                }
            } else {
                debug!(
                    "{} prior-guided search found {} pixels, falling back",
                    side.as_str(),
                    pixels.len()
                );
            }
        }

        let found = sliding_window::search_side(mask, side, base, &params.sliding_window);
        let fit = if found.pixels.is_empty() {
            Err(SideIssue::EvidenceAbsent)
        } else {
            fit_lane(&found.pixels, &params.scale, &params.fit)
                .map_err(SideIssue::FitUnderdetermined)
        };
        SideOutcome {
            search: SearchMode::SlidingWindow,
            pixels: found.pixels,
            windows: found.windows,
            fit,
        }
    }
}

/// One pipeline plus the tracking state of a single camera stream.
#[derive(Clone, Debug)]
pub struct LaneDetector {
    pipeline: LanePipeline,
    state: TrackingState,
}

impl LaneDetector {
    pub fn new(calibration: &Calibration, params: LaneParams) -> Result<Self, CalibrationError> {
        Ok(Self::from_pipeline(LanePipeline::new(calibration, params)?))
    }

    pub fn from_pipeline(pipeline: LanePipeline) -> Self {
        Self {
            pipeline,
            state: TrackingState::new(),
        }
    }

    pub fn process(&mut self, frame: &ImageRgb8) -> Result<FrameReport, FrameError> {
        self.pipeline.process(frame, &mut self.state)
    }

    pub fn process_with_diagnostics(
        &mut self,
        frame: &ImageRgb8,
    ) -> Result<DetailedFrame, FrameError> {
        self.pipeline.process_with_diagnostics(frame, &mut self.state)
    }

    pub fn process_top_down(&mut self, top_down: &LaneMask) -> Result<DetailedFrame, FrameError> {
        self.pipeline.process_top_down(top_down, &mut self.state)
    }

    pub fn pipeline(&self) -> &LanePipeline {
        &self.pipeline
    }

    pub fn state(&self) -> &TrackingState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }
}
