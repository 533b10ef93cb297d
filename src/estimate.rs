//! Curvature and lateral offset from the fitted lane lines.
//!
//! Everything is evaluated at the bottom row of the top-down canvas, which
//! is the row closest to the vehicle.
use crate::fit::{LaneFit, PixelScale};
use crate::types::{CurveDirection, Estimate, EstimateBasis, PerSide};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct EstimatorOptions {
    /// Assumed lane width, used when only one line is available.
    pub lane_width_m: f64,
    /// Radii above this (and straight lines) are reported as this value.
    pub max_radius_m: f64,
    /// Mean radius at or above which the road counts as straight.
    pub straight_radius_m: f64,
}

impl Default for EstimatorOptions {
    fn default() -> Self {
        Self {
            lane_width_m: 3.7,
            max_radius_m: 1e5,
            straight_radius_m: 3000.0,
        }
    }
}

/// Offset and radius from whichever sides have a usable fit.
///
/// `canvas` is the top-down (width, height). Returns `None` when neither
/// side has a fit.
pub fn estimate_lane(
    fits: PerSide<Option<&LaneFit>>,
    canvas: (usize, usize),
    scale: &PixelScale,
    opts: &EstimatorOptions,
) -> Option<Estimate> {
    let (w, h) = canvas;
    let y_px = h.saturating_sub(1) as f64;
    let y_m = y_px * scale.ym_per_pix;

    let radius_m = fits.map(|_, fit| fit.map(|f| capped_radius(f, y_m, opts.max_radius_m)));
    let bottom_x = fits.map(|_, fit| fit.map(|f| f.pixel.x_at(y_px)));
    let half_width_px = 0.5 * opts.lane_width_m / scale.xm_per_pix;

    let (lane_center, basis) = match (bottom_x.left, bottom_x.right) {
        (Some(l), Some(r)) => (0.5 * (l + r), EstimateBasis::BothSides),
        (Some(l), None) => (l + half_width_px, EstimateBasis::LeftOnly),
        (None, Some(r)) => (r - half_width_px, EstimateBasis::RightOnly),
        (None, None) => return None,
    };
    let vehicle_center = w as f64 / 2.0;
    let center_offset_m = (vehicle_center - lane_center) * scale.xm_per_pix;

    let radii: Vec<f64> = radius_m.iter().filter_map(|(_, r)| *r).collect();
    let mean_radius_m = radii.iter().sum::<f64>() / radii.len() as f64;

    let bend: f64 = fits.iter().filter_map(|(_, f)| f.map(|f| f.world.a)).sum();
    let curve_direction = if mean_radius_m >= opts.straight_radius_m || bend == 0.0 {
        CurveDirection::Straight
    } else if bend > 0.0 {
        CurveDirection::Right
    } else {
        CurveDirection::Left
    };

    Some(Estimate {
        center_offset_m,
        radius_m,
        mean_radius_m,
        curve_direction,
        basis,
    })
}

fn capped_radius(fit: &LaneFit, y_m: f64, max_radius_m: f64) -> f64 {
    let r = fit.world.radius_at(y_m);
    if r.is_finite() {
        r.min(max_radius_m)
    } else {
        max_radius_m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::{fit_lane, FitOptions};
    use crate::search::LanePixels;

    const W: usize = 800;
    const H: usize = 720;

    fn line_fit(f: impl Fn(f64) -> f64, scale: &PixelScale) -> LaneFit {
        let pixels: LanePixels = (0..H as u32)
            .map(|y| [f(y as f64).round() as u32, y])
            .collect();
        fit_lane(&pixels, scale, &FitOptions::default()).expect("fit")
    }

    fn vertical(x: f64, scale: &PixelScale) -> LaneFit {
        line_fit(|_| x, scale)
    }

    #[test]
    fn centered_lane_has_zero_offset() {
        let scale = PixelScale::default();
        let (l, r) = (vertical(250.0, &scale), vertical(550.0, &scale));
        let est = estimate_lane(
            PerSide::new(Some(&l), Some(&r)),
            (W, H),
            &scale,
            &EstimatorOptions::default(),
        )
        .expect("estimate");
        assert!(est.center_offset_m.abs() < 1e-6);
        assert_eq!(est.basis, EstimateBasis::BothSides);
        assert_eq!(est.curve_direction, CurveDirection::Straight);
        assert_eq!(est.mean_radius_m, 1e5);
    }

    #[test]
    fn shifted_lane_reports_offset() {
        let scale = PixelScale::default();
        let d = 40.0;
        let (l, r) = (vertical(250.0 + d, &scale), vertical(550.0 + d, &scale));
        let est = estimate_lane(
            PerSide::new(Some(&l), Some(&r)),
            (W, H),
            &scale,
            &EstimatorOptions::default(),
        )
        .expect("estimate");
        let expected = -d * scale.xm_per_pix;
        assert!(
            (est.center_offset_m - expected).abs() < 1e-6,
            "offset {} expected {}",
            est.center_offset_m,
            expected
        );
        assert!(est.offset_cm() < 0.0, "vehicle sits left of the lane center");
    }

    #[test]
    fn radius_of_synthetic_curve_within_tolerance() {
        let scale = PixelScale {
            xm_per_pix: 0.01,
            ym_per_pix: 0.01,
        };
        // Tangent is vertical at the bottom row; radius there is 1/(2a) in
        // meters when both axes share a scale.
        let r_m = 100.0;
        let a_m = 1.0 / (2.0 * r_m);
        let a_px = a_m * scale.ym_per_pix * scale.ym_per_pix / scale.xm_per_pix;
        let yb = (H - 1) as f64;
        let curve = |x0: f64| move |y: f64| a_px * (y - yb).powi(2) + x0;
        let (l, r) = (line_fit(curve(200.0), &scale), line_fit(curve(600.0), &scale));
        let est = estimate_lane(
            PerSide::new(Some(&l), Some(&r)),
            (W, H),
            &scale,
            &EstimatorOptions::default(),
        )
        .expect("estimate");
        let rel = (est.mean_radius_m - r_m).abs() / r_m;
        assert!(rel < 0.05, "radius {} vs {}", est.mean_radius_m, r_m);
        assert_eq!(est.curve_direction, CurveDirection::Right);
    }

    #[test]
    fn single_side_assumes_lane_width() {
        let scale = PixelScale::default();
        let opts = EstimatorOptions::default();
        let half_px = 0.5 * opts.lane_width_m / scale.xm_per_pix;
        let l = vertical((400.0 - half_px).round(), &scale);
        let est = estimate_lane(PerSide::new(Some(&l), None), (W, H), &scale, &opts)
            .expect("estimate");
        assert_eq!(est.basis, EstimateBasis::LeftOnly);
        assert!(est.radius_m.right.is_none());
        assert!(est.center_offset_m.abs() < scale.xm_per_pix);
    }

    #[test]
    fn no_sides_no_estimate() {
        assert!(estimate_lane(
            PerSide::new(None, None),
            (W, H),
            &PixelScale::default(),
            &EstimatorOptions::default()
        )
        .is_none());
    }
}
