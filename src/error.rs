//! Error types.
//!
//! Only construction-time misconfiguration and malformed input frames are
//! surfaced as `Err`. Missing lane evidence and failed fits are recoverable
//! and reported inside [`crate::FrameReport`] instead.
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Why a calibration could not produce a usable homography pair.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CalibrationError {
    #[error("calibration point {index} is not finite")]
    NonFinitePoint { index: usize },
    #[error("{which} points {i}, {j}, {k} are collinear (area {area:.3e})")]
    CollinearPoints {
        which: &'static str,
        i: usize,
        j: usize,
        k: usize,
        area: f64,
    },
    #[error("canvas {name} has zero size ({w}x{h})")]
    EmptyCanvas {
        name: &'static str,
        w: usize,
        h: usize,
    },
    #[error("homography solve is singular")]
    Singular,
}

/// Hard per-frame failure. The frame is dropped and tracking state is left
/// untouched.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
pub enum FrameError {
    #[error("frame is {actual:?} but calibration expects {expected:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("frame buffer holds {actual} bytes, {needed} required")]
    ShortBuffer { needed: usize, actual: usize },
}

/// Reasons a quadratic fit was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error, Serialize)]
pub enum FitError {
    #[error("insufficient points ({found} < {minimum})")]
    InsufficientPoints { found: usize, minimum: usize },
    #[error("points span only {distinct} distinct rows")]
    DegenerateRows { distinct: usize },
    #[error("normal equations ill-conditioned (rcond {rcond:.3e})")]
    IllConditioned { rcond: f64 },
}

/// Failures of the file-facing helpers (config, image and JSON I/O).
#[derive(Debug, Error)]
pub enum IoError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize JSON for {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("image error for {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        source: ::image::ImageError,
    },
    #[error("invalid buffer for {}", .path.display())]
    Buffer { path: PathBuf },
}
