//! Quadratic lane-line model `x = a·y² + b·y + c`.
//!
//! Lines are fitted as x over y because lane lines are close to vertical
//! in the top-down view. The regression works on y normalized to zero mean
//! and unit spread; without that, the `y²` column of a 720-row canvas sits
//! six orders of magnitude above the constant column and the normal
//! equations lose most of their precision.
use crate::error::FitError;
use crate::search::LanePixels;
use nalgebra::{Matrix3, SymmetricEigen, Vector3};
use serde::{Deserialize, Serialize};

const EPS: f64 = 1e-12;

/// Coefficients of `x = a·y² + b·y + c`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolynomialFit {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl PolynomialFit {
    #[inline]
    pub fn x_at(&self, y: f64) -> f64 {
        (self.a * y + self.b) * y + self.c
    }

    /// dx/dy.
    #[inline]
    pub fn slope_at(&self, y: f64) -> f64 {
        2.0 * self.a * y + self.b
    }

    /// Radius of curvature `(1 + x'²)^1.5 / |x''|`; infinite for a line.
    pub fn radius_at(&self, y: f64) -> f64 {
        let second = (2.0 * self.a).abs();
        if second <= EPS {
            return f64::INFINITY;
        }
        let d = self.slope_at(y);
        (1.0 + d * d).powf(1.5) / second
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct FitOptions {
    pub min_points: usize,
    /// Smallest accepted `λ_min / λ_max` of the normal matrix.
    pub min_rcond: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            min_points: 3,
            min_rcond: 1e-10,
        }
    }
}

/// Meters per top-down pixel along each axis.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PixelScale {
    pub xm_per_pix: f64,
    pub ym_per_pix: f64,
}

impl Default for PixelScale {
    fn default() -> Self {
        Self {
            xm_per_pix: 3.7 / 781.0,
            ym_per_pix: 10.0 / 1000.0,
        }
    }
}

/// Same line fitted in top-down pixels and in meters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaneFit {
    pub pixel: PolynomialFit,
    pub world: PolynomialFit,
}

/// Least-squares quadratic through `[x, y]` points.
pub fn fit_quadratic(points: &[[f64; 2]], opts: &FitOptions) -> Result<PolynomialFit, FitError> {
    let minimum = opts.min_points.max(3);
    if points.len() < minimum {
        return Err(FitError::InsufficientPoints {
            found: points.len(),
            minimum,
        });
    }
    let distinct = distinct_rows(points);
    if distinct < 3 {
        return Err(FitError::DegenerateRows { distinct });
    }

    let n = points.len() as f64;
    let mean = points.iter().map(|p| p[1]).sum::<f64>() / n;
    let var = points.iter().map(|p| (p[1] - mean).powi(2)).sum::<f64>() / n;
    let scale = var.sqrt().max(EPS);

    let mut ata = Matrix3::<f64>::zeros();
    let mut atb = Vector3::<f64>::zeros();
    for p in points {
        let t = (p[1] - mean) / scale;
        let row = Vector3::new(1.0, t, t * t);
        ata += row * row.transpose();
        atb += row * p[0];
    }

    let eig = SymmetricEigen::new(ata);
    let max = eig.eigenvalues.max();
    let min = eig.eigenvalues.min();
    let rcond = if max > 0.0 { min / max } else { 0.0 };
    if !rcond.is_finite() || rcond < opts.min_rcond {
        return Err(FitError::IllConditioned { rcond });
    }
    let chol = ata
        .cholesky()
        .ok_or(FitError::IllConditioned { rcond })?;
    let q = chol.solve(&atb);
    let (q0, q1, q2) = (q[0], q[1], q[2]);

    // x = q2·t² + q1·t + q0 with t = (y - mean) / scale.
    let s2 = scale * scale;
    let fit = PolynomialFit {
        a: q2 / s2,
        b: q1 / scale - 2.0 * q2 * mean / s2,
        c: q2 * mean * mean / s2 - q1 * mean / scale + q0,
    };
    if !(fit.a.is_finite() && fit.b.is_finite() && fit.c.is_finite()) {
        return Err(FitError::IllConditioned { rcond });
    }
    Ok(fit)
}

/// Fit a side's pixels in pixel space and in world space.
pub fn fit_lane(
    pixels: &LanePixels,
    scale: &PixelScale,
    opts: &FitOptions,
) -> Result<LaneFit, FitError> {
    let pixel = fit_quadratic(&pixels.scaled(1.0, 1.0), opts)?;
    let world = fit_quadratic(&pixels.scaled(scale.xm_per_pix, scale.ym_per_pix), opts)?;
    Ok(LaneFit { pixel, world })
}

fn distinct_rows(points: &[[f64; 2]]) -> usize {
    let mut ys: Vec<f64> = points.iter().map(|p| p[1]).collect();
    ys.sort_by(|a, b| a.total_cmp(b));
    ys.dedup();
    ys.len()
}
