//! Prior-guided line search around last frame's pixel-space curve.
use super::LanePixels;
use crate::fit::PolynomialFit;
use crate::image::{ImageView, LaneMask};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PriorSearchOptions {
    /// Half-width of the band around the prior curve, in pixels.
    pub margin: f64,
    /// Fewer pixels than this sends the side back to the sliding window.
    pub min_pixels: usize,
}

impl Default for PriorSearchOptions {
    fn default() -> Self {
        Self {
            margin: 100.0,
            min_pixels: 50,
        }
    }
}

/// Collect on pixels with `|x - prior(y)| < margin`, row by row.
pub fn search_side(
    mask: &LaneMask,
    prior: &PolynomialFit,
    opts: &PriorSearchOptions,
) -> LanePixels {
    let (w, h) = mask.dims();
    let mut pixels = LanePixels::new();
    for y in 0..h {
        let cx = prior.x_at(y as f64);
        if !cx.is_finite() {
            continue;
        }
        let lo = cx - opts.margin;
        let hi = cx + opts.margin;
        if hi <= 0.0 || lo >= w as f64 {
            continue;
        }
        // Smallest integer strictly above `lo`, largest strictly below `hi`.
        let x0 = if lo < 0.0 { 0 } else { lo.floor() as usize + 1 };
        let x1 = (hi.ceil() as usize).min(w);
        let row = mask.row(y);
        for (x, &px) in row.iter().enumerate().take(x1).skip(x0) {
            if px != 0 {
                pixels.push(x, y);
            }
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical(c: f64) -> PolynomialFit {
        PolynomialFit { a: 0.0, b: 0.0, c }
    }

    #[test]
    fn collects_only_inside_margin() {
        let mask = LaneMask::from_fn(100, 20, |x, _| x == 40 || x == 80);
        let opts = PriorSearchOptions {
            margin: 10.0,
            min_pixels: 1,
        };
        let pixels = search_side(&mask, &vertical(42.0), &opts);
        assert_eq!(pixels.len(), 20);
        assert!(pixels.points().iter().all(|p| p[0] == 40));
    }

    #[test]
    fn margin_bounds_are_strict() {
        let mask = LaneMask::from_fn(50, 4, |x, _| x == 10 || x == 30);
        let opts = PriorSearchOptions {
            margin: 10.0,
            min_pixels: 1,
        };
        // |10 - 20| == 10 and |30 - 20| == 10: both excluded.
        assert!(search_side(&mask, &vertical(20.0), &opts).is_empty());
    }

    #[test]
    fn follows_curved_prior() {
        let curve = PolynomialFit {
            a: 0.01,
            b: -0.5,
            c: 50.0,
        };
        let mask = LaneMask::from_fn(120, 60, |x, y| x == curve.x_at(y as f64).round() as usize);
        let pixels = search_side(&mask, &curve, &PriorSearchOptions::default());
        assert_eq!(pixels.len(), 60);
    }

    #[test]
    fn prior_outside_frame_yields_nothing() {
        let mask = LaneMask::from_fn(50, 10, |_, _| true);
        let opts = PriorSearchOptions {
            margin: 5.0,
            min_pixels: 1,
        };
        assert!(search_side(&mask, &vertical(-20.0), &opts).is_empty());
        assert!(search_side(&mask, &vertical(80.0), &opts).is_empty());
    }
}
