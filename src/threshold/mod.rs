//! Binary lane-evidence extraction.
//!
//! A pixel is marked as plausible lane paint when any of three rules fires:
//!
//! - **gradient**: the Sobel magnitude of the blurred lightness mask
//!   (`L >= lightness_min`) lies inside `[gradient_min, gradient_max]`. This
//!   keeps the borders of bright markings under shadow or low contrast.
//! - **yellow**: saturation `S >= saturation_min` and red `R >= red_min`.
//! - **white**: lightness `L >= white_lightness_min`.
//!
//! The result is a pure function of the frame and [`ThresholdOptions`]. An
//! all-off mask is a valid output.

pub mod color;

use crate::edges::{gaussian_blur_3x3, sobel_gradients};
use crate::image::{ImageF32, ImageRgb8, LaneMask};
use color::lightness_saturation;
use serde::Deserialize;

/// Sobel magnitude of a 0/255 step is `4 * 255`; dividing by this brings
/// the response back to the 8-bit range the thresholds are expressed in.
const SOBEL_GAIN: f32 = 4.0;

/// Thresholds for the evidence rules (8-bit units).
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThresholdOptions {
    pub lightness_min: u8,
    pub gradient_min: f32,
    pub gradient_max: f32,
    pub saturation_min: u8,
    pub red_min: u8,
    pub white_lightness_min: u8,
}

impl Default for ThresholdOptions {
    fn default() -> Self {
        Self {
            lightness_min: 120,
            gradient_min: 110.0,
            gradient_max: 255.0,
            saturation_min: 80,
            red_min: 120,
            white_lightness_min: 200,
        }
    }
}

/// Convert a color frame into a binary lane-evidence mask of the same size.
pub fn extract_lane_evidence(frame: &ImageRgb8, opts: &ThresholdOptions) -> LaneMask {
    let (w, h) = frame.dims();
    let mut lightness = vec![0u8; w * h];
    let mut saturation = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            let (l, s) = lightness_saturation(frame.get(x, y));
            lightness[y * w + x] = l;
            saturation[y * w + x] = s;
        }
    }

    let bright = ImageF32::from_fn(w, h, |x, y| {
        if lightness[y * w + x] >= opts.lightness_min {
            255.0
        } else {
            0.0
        }
    });
    let grad = sobel_gradients(&gaussian_blur_3x3(&bright));

    LaneMask::from_fn(w, h, |x, y| {
        let i = y * w + x;
        let scaled = (grad.mag.get(x, y) / SOBEL_GAIN).min(255.0);
        let gradient = scaled >= opts.gradient_min && scaled <= opts.gradient_max;
        let yellow = saturation[i] >= opts.saturation_min && frame.get(x, y)[0] >= opts.red_min;
        let white = lightness[i] >= opts.white_lightness_min;
        gradient || yellow || white
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ImageView, RgbImage8};

    const ROAD: [u8; 3] = [90, 90, 90];

    fn road_with_stripe(color: [u8; 3], x0: usize, x1: usize) -> RgbImage8 {
        let mut img = RgbImage8::filled(40, 20, ROAD);
        for y in 0..20 {
            for x in x0..x1 {
                img.set(x, y, color);
            }
        }
        img
    }

    #[test]
    fn dark_frame_yields_empty_mask() {
        let img = RgbImage8::filled(16, 12, [0, 0, 0]);
        let mask = extract_lane_evidence(&img.as_view(), &ThresholdOptions::default());
        assert_eq!((mask.width(), mask.height()), (16, 12));
        assert!(mask.is_empty());
    }

    #[test]
    fn plain_road_is_rejected() {
        let img = RgbImage8::filled(16, 12, ROAD);
        let mask = extract_lane_evidence(&img.as_view(), &ThresholdOptions::default());
        assert!(mask.is_empty(), "grey asphalt must not produce evidence");
    }

    #[test]
    fn yellow_stripe_is_detected() {
        let img = road_with_stripe([230, 190, 20], 10, 14);
        let mask = extract_lane_evidence(&img.as_view(), &ThresholdOptions::default());
        for y in 0..20 {
            for x in 10..14 {
                assert!(mask.is_on(x, y), "expected yellow paint at ({x}, {y})");
            }
            assert!(!mask.is_on(30, y));
        }
    }

    #[test]
    fn white_stripe_is_detected() {
        let img = road_with_stripe([250, 250, 250], 25, 28);
        let mask = extract_lane_evidence(&img.as_view(), &ThresholdOptions::default());
        assert!(mask.is_on(26, 10));
        assert!(!mask.is_on(5, 10));
    }

    #[test]
    fn extraction_is_deterministic() {
        let img = road_with_stripe([250, 250, 250], 5, 9);
        let opts = ThresholdOptions::default();
        let a = extract_lane_evidence(&img.as_view(), &opts);
        let b = extract_lane_evidence(&img.as_view(), &opts);
        assert_eq!(a, b);
    }
}
