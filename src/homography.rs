//! Four-point homography estimation and point mapping.
//!
//! The calibration homography is solved exactly from four correspondences
//! (eight unknowns, `h33 = 1`) with an LU decomposition. Degenerate input is
//! rejected before solving: every triple of source and destination points
//! must span a triangle of non-negligible area.
use crate::error::CalibrationError;
use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

const EPS: f64 = 1e-12;
/// Minimum triangle area, relative to the squared extent of the point set.
const COLLINEAR_REL_TOL: f64 = 1e-6;

/// Forward/inverse homography pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Homography {
    /// camera → top-down
    pub forward: Matrix3<f64>,
    /// top-down → camera
    pub inverse: Matrix3<f64>,
}

impl Homography {
    /// Solve `forward` so that `dst[i] ≈ forward(src[i])`, and its inverse.
    pub fn from_correspondences(
        src: &[[f64; 2]; 4],
        dst: &[[f64; 2]; 4],
    ) -> Result<Self, CalibrationError> {
        let forward = homography_from_points(src, dst)?;
        let inverse = forward.try_inverse().ok_or(CalibrationError::Singular)?;
        Ok(Self { forward, inverse })
    }
}

/// Exact homography mapping four `src` points onto four `dst` points.
pub fn homography_from_points(
    src: &[[f64; 2]; 4],
    dst: &[[f64; 2]; 4],
) -> Result<Matrix3<f64>, CalibrationError> {
    for (index, p) in src.iter().chain(dst.iter()).enumerate() {
        if !p[0].is_finite() || !p[1].is_finite() {
            return Err(CalibrationError::NonFinitePoint { index });
        }
    }
    check_non_collinear("source", src)?;
    check_non_collinear("destination", dst)?;

    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();
    for i in 0..4 {
        let [x, y] = src[i];
        let [u, v] = dst[i];
        let r = 2 * i;
        a[(r, 0)] = x;
        a[(r, 1)] = y;
        a[(r, 2)] = 1.0;
        a[(r, 6)] = -x * u;
        a[(r, 7)] = -y * u;
        b[r] = u;

        a[(r + 1, 3)] = x;
        a[(r + 1, 4)] = y;
        a[(r + 1, 5)] = 1.0;
        a[(r + 1, 6)] = -x * v;
        a[(r + 1, 7)] = -y * v;
        b[r + 1] = v;
    }

    let h = a.lu().solve(&b).ok_or(CalibrationError::Singular)?;
    let m = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0);
    if !m.iter().all(|v| v.is_finite()) || m.determinant().abs() <= EPS {
        return Err(CalibrationError::Singular);
    }
    Ok(m)
}

fn check_non_collinear(which: &'static str, pts: &[[f64; 2]; 4]) -> Result<(), CalibrationError> {
    let mut extent_sq = 0.0f64;
    for p in pts {
        for q in pts {
            extent_sq = extent_sq.max((p[0] - q[0]).powi(2) + (p[1] - q[1]).powi(2));
        }
    }
    let tol = COLLINEAR_REL_TOL * extent_sq.max(EPS);
    const TRIPLES: [(usize, usize, usize); 4] = [(0, 1, 2), (0, 1, 3), (0, 2, 3), (1, 2, 3)];
    for (i, j, k) in TRIPLES {
        let area = triangle_area(&pts[i], &pts[j], &pts[k]);
        if area <= tol {
            return Err(CalibrationError::CollinearPoints {
                which,
                i,
                j,
                k,
                area,
            });
        }
    }
    Ok(())
}

#[inline]
fn triangle_area(a: &[f64; 2], b: &[f64; 2], c: &[f64; 2]) -> f64 {
    0.5 * ((b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])).abs()
}

/// Map a single point; `None` when it lands on the line at infinity.
#[inline]
pub fn apply_homography_point(h: &Matrix3<f64>, p: [f64; 2]) -> Option<[f64; 2]> {
    let v = h * Vector3::new(p[0], p[1], 1.0);
    let w = v[2];
    if !w.is_finite() || w.abs() <= EPS || !v[0].is_finite() || !v[1].is_finite() {
        return None;
    }
    Some([v[0] / w, v[1] / w])
}

/// Map a batch of points; `None` if any of them is not representable.
pub fn apply_homography_points(h: &Matrix3<f64>, pts: &[[f64; 2]]) -> Option<Vec<[f64; 2]>> {
    pts.iter().map(|&p| apply_homography_point(h, p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: [[f64; 2]; 4] = [[364.0, 326.0], [0.0, 599.0], [766.0, 599.0], [494.0, 326.0]];
    const DST: [[f64; 2]; 4] = [[200.0, 0.0], [200.0, 600.0], [600.0, 600.0], [600.0, 0.0]];

    fn close(a: [f64; 2], b: [f64; 2], tol: f64) -> bool {
        (a[0] - b[0]).abs() < tol && (a[1] - b[1]).abs() < tol
    }

    #[test]
    fn maps_calibration_points_exactly() {
        let h = Homography::from_correspondences(&SRC, &DST).expect("valid calibration");
        let mapped = apply_homography_points(&h.forward, &SRC).expect("finite mapping");
        for (m, d) in mapped.iter().zip(DST.iter()) {
            assert!(close(*m, *d, 1e-6), "mapped {m:?} expected {d:?}");
        }
        let back = apply_homography_points(&h.inverse, &DST).expect("finite mapping");
        for (b, s) in back.iter().zip(SRC.iter()) {
            assert!(close(*b, *s, 1e-6), "inverse {b:?} expected {s:?}");
        }
    }

    #[test]
    fn identity_for_identical_points() {
        let h = homography_from_points(&DST, &DST).expect("valid");
        assert!((h - Matrix3::identity()).norm() < 1e-9);
    }

    #[test]
    fn rejects_collinear_source() {
        let src = [[0.0, 0.0], [10.0, 10.0], [20.0, 20.0], [0.0, 30.0]];
        let err = homography_from_points(&src, &DST).unwrap_err();
        assert!(
            matches!(err, CalibrationError::CollinearPoints { which: "source", .. }),
            "unexpected error {err:?}"
        );
    }

    #[test]
    fn rejects_non_finite_points() {
        let mut dst = DST;
        dst[2][1] = f64::NAN;
        assert_eq!(
            homography_from_points(&SRC, &dst),
            Err(CalibrationError::NonFinitePoint { index: 6 })
        );
    }
}
