//! Lane-region overlay for visual inspection.
//!
//! The region between the two fitted lines is filled in the top-down canvas,
//! warped back into the camera frame and alpha-blended onto a copy of the
//! input. Nothing here feeds back into the estimate.
use crate::error::FrameError;
use crate::fit::LaneFit;
use crate::image::{ImageRgb8, ImageView, LaneMask, RgbImage8};
use crate::perspective::PerspectiveTransformer;
use crate::types::PerSide;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverlayOptions {
    pub color: [u8; 3],
    /// Weight of `color` in the blend, clamped to `[0, 1]`.
    pub alpha: f32,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            color: [0, 255, 0],
            alpha: 0.3,
        }
    }
}

/// Top-down mask of the pixels between the left and right pixel-space fits.
pub fn lane_region_mask(left: &LaneFit, right: &LaneFit, size: (usize, usize)) -> LaneMask {
    let (w, h) = size;
    let mut mask = LaneMask::new(w, h);
    for y in 0..h {
        let yf = y as f64;
        let (xl, xr) = (left.pixel.x_at(yf), right.pixel.x_at(yf));
        if !xl.is_finite() || !xr.is_finite() {
            continue;
        }
        let (lo, hi) = if xl <= xr { (xl, xr) } else { (xr, xl) };
        if hi < 0.0 || lo >= w as f64 {
            continue;
        }
        let x0 = lo.max(0.0).ceil() as usize;
        let x1 = (hi.floor() as usize).min(w.saturating_sub(1));
        for x in x0..=x1 {
            mask.set(x, y, true);
        }
    }
    mask
}

/// Copy of `frame` with the lane region tinted. Without both fits the frame
/// is returned unchanged.
pub fn render_lane_overlay(
    frame: &ImageRgb8,
    transformer: &PerspectiveTransformer,
    fits: PerSide<Option<&LaneFit>>,
    opts: &OverlayOptions,
) -> Result<RgbImage8, FrameError> {
    transformer.check_camera_dims(frame.dims())?;
    let mut out = frame.to_owned_image();
    let (Some(left), Some(right)) = (fits.left, fits.right) else {
        return Ok(out);
    };
    let region = lane_region_mask(left, right, transformer.top_down_size());
    let camera_region = transformer.to_camera(&region)?;

    let alpha = opts.alpha.clamp(0.0, 1.0);
    for (y, row) in camera_region.rows().enumerate() {
        for (x, &on) in row.iter().enumerate() {
            if on != 0 {
                out.set(x, y, blend(out.get(x, y), opts.color, alpha));
            }
        }
    }
    Ok(out)
}

#[inline]
fn blend(base: [u8; 3], tint: [u8; 3], alpha: f32) -> [u8; 3] {
    let mix = |b: u8, t: u8| (b as f32 * (1.0 - alpha) + t as f32 * alpha).round() as u8;
    [
        mix(base[0], tint[0]),
        mix(base[1], tint[1]),
        mix(base[2], tint[2]),
    ]
}
