//! Edge filters used by the lane-evidence extractor.
//!
//! - Sobel gradient computation returning `gx`, `gy` and magnitude.
//! - A small 3×3 Gaussian blur applied before differentiation.

pub mod grad;

pub use grad::{gaussian_blur_3x3, sobel_gradients, Grad};
