use crate::diagnostics::TimingBreakdown;
use crate::error::FitError;
use crate::search::SearchMode;
use serde::Serialize;

/// Which lane line a value belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// A left/right pair. Every per-line quantity in the pipeline is carried in
/// one of these so both lines go through identical code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PerSide<T> {
    pub left: T,
    pub right: T,
}

impl<T> PerSide<T> {
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    /// Build both sides from a per-side constructor.
    pub fn from_fn(mut f: impl FnMut(Side) -> T) -> Self {
        Self {
            left: f(Side::Left),
            right: f(Side::Right),
        }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn as_ref(&self) -> PerSide<&T> {
        PerSide {
            left: &self.left,
            right: &self.right,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(Side, T) -> U) -> PerSide<U> {
        PerSide {
            left: f(Side::Left, self.left),
            right: f(Side::Right, self.right),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        [(Side::Left, &self.left), (Side::Right, &self.right)].into_iter()
    }
}

/// Road bend direction as seen from the vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CurveDirection {
    Left,
    Right,
    Straight,
}

/// Which lines an estimate was computed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EstimateBasis {
    BothSides,
    LeftOnly,
    RightOnly,
}

/// Per-frame numeric output.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    /// Vehicle center minus lane center in meters at the frame bottom.
    /// Negative: vehicle left of the lane center.
    pub center_offset_m: f64,
    /// Radius of each usable line in meters.
    pub radius_m: PerSide<Option<f64>>,
    /// Mean over the usable lines.
    pub mean_radius_m: f64,
    pub curve_direction: CurveDirection,
    pub basis: EstimateBasis,
}

impl Estimate {
    pub fn offset_cm(&self) -> f64 {
        self.center_offset_m * 100.0
    }
}

/// Where a side's fit for the current frame came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum FitSource {
    /// Fitted from this frame's pixels.
    Fresh,
    /// Reused from an earlier frame; `age` counts consecutive misses.
    Carried { age: u32 },
    /// No usable fit.
    Missing,
}

/// Why a side produced no fresh fit this frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SideIssue {
    /// No lane pixels were found.
    EvidenceAbsent,
    /// Pixels were found but the regression was rejected.
    FitUnderdetermined(FitError),
}

/// What happened to one lane line during a frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SideReport {
    pub search: SearchMode,
    /// Base x from the histogram, if the side had any evidence.
    pub base_x: Option<usize>,
    pub pixel_count: usize,
    pub source: FitSource,
    pub issue: Option<SideIssue>,
}

/// Aggregate tracking health for a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FrameStatus {
    /// Both lines fitted from fresh evidence.
    Tracking,
    /// An estimate exists but relies on a carried fit or a single line.
    Degraded,
    /// No usable line; `estimate` is `None`.
    NoEstimate,
}

/// Result of processing one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameReport {
    /// Zero-based index of the frame within the tracking session.
    pub frame_index: u64,
    pub status: FrameStatus,
    pub estimate: Option<Estimate>,
    pub sides: PerSide<SideReport>,
    pub timing: TimingBreakdown,
}
