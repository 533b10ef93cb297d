//! Camera ↔ top-down resampling through a fixed calibration homography.
//!
//! Both directions use inverse mapping with nearest-neighbour sampling: every
//! output pixel is mapped back into the source frame and copies the closest
//! source pixel, or stays off when it falls outside. Applying
//! [`PerspectiveTransformer::to_top_down`] followed by
//! [`PerspectiveTransformer::to_camera`] reproduces the input up to
//! resampling error.
use crate::error::{CalibrationError, FrameError};
use crate::homography::{apply_homography_point, Homography};
use crate::image::{ImageRgb8, ImageView, LaneMask, RgbImage8};
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// Four point correspondences plus the frame sizes they were measured for.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Calibration {
    /// Road trapezoid in the camera frame (pixels).
    pub src: [[f64; 2]; 4],
    /// Where `src` lands in the top-down canvas (pixels).
    pub dst: [[f64; 2]; 4],
    /// Camera frame (width, height).
    pub camera_size: (usize, usize),
    /// Top-down canvas (width, height).
    pub top_down_size: (usize, usize),
}

impl Calibration {
    /// Trapezoid expressed as fractions of the frame, mapped onto a
    /// rectangle with a quarter-width margin on each side.
    ///
    /// Point order: top-left, bottom-left, bottom-right, top-right.
    pub fn proportional(width: usize, height: usize) -> Self {
        let w = width as f64;
        let h = height as f64;
        let bottom = (h - 1.0).max(0.0);
        let top = (0.544 * h).floor();
        let pad = (0.25 * w).floor();
        Self {
            src: [
                [(0.456 * w).floor(), top],
                [0.0, bottom],
                [(0.958 * w).floor(), bottom],
                [(0.6183 * w).floor(), top],
            ],
            dst: [[pad, 0.0], [pad, h], [w - pad, h], [w - pad, 0.0]],
            camera_size: (width, height),
            top_down_size: (width, height),
        }
    }
}

/// Fixed homography pair with the canvas sizes it operates on.
#[derive(Clone, Debug)]
pub struct PerspectiveTransformer {
    homography: Homography,
    camera_size: (usize, usize),
    top_down_size: (usize, usize),
}

impl PerspectiveTransformer {
    /// Solve the homography pair. Fails on degenerate calibration input.
    pub fn new(calibration: &Calibration) -> Result<Self, CalibrationError> {
        for (name, (w, h)) in [
            ("camera", calibration.camera_size),
            ("top-down", calibration.top_down_size),
        ] {
            if w == 0 || h == 0 {
                return Err(CalibrationError::EmptyCanvas { name, w, h });
            }
        }
        let homography = Homography::from_correspondences(&calibration.src, &calibration.dst)?;
        Ok(Self {
            homography,
            camera_size: calibration.camera_size,
            top_down_size: calibration.top_down_size,
        })
    }

    pub fn homography(&self) -> &Homography {
        &self.homography
    }

    pub fn camera_size(&self) -> (usize, usize) {
        self.camera_size
    }

    pub fn top_down_size(&self) -> (usize, usize) {
        self.top_down_size
    }

    /// Fail with `DimensionMismatch` unless `actual` equals the camera size.
    pub fn check_camera_dims(&self, actual: (usize, usize)) -> Result<(), FrameError> {
        check_dims(self.camera_size, actual)
    }

    /// Warp a camera-space mask into the top-down canvas.
    pub fn to_top_down(&self, mask: &LaneMask) -> Result<LaneMask, FrameError> {
        check_dims(self.camera_size, mask.dims())?;
        Ok(warp_mask(
            mask,
            &self.homography.inverse,
            self.top_down_size,
        ))
    }

    /// Warp a top-down mask back into the camera frame.
    pub fn to_camera(&self, mask: &LaneMask) -> Result<LaneMask, FrameError> {
        check_dims(self.top_down_size, mask.dims())?;
        Ok(warp_mask(mask, &self.homography.forward, self.camera_size))
    }

    /// Warp a color camera frame into the top-down canvas (debug views).
    pub fn to_top_down_rgb(&self, frame: &ImageRgb8) -> Result<RgbImage8, FrameError> {
        check_dims(self.camera_size, frame.dims())?;
        let (out_w, out_h) = self.top_down_size;
        let mut out = RgbImage8::filled(out_w, out_h, [0, 0, 0]);
        for_each_source_pixel(
            &self.homography.inverse,
            self.top_down_size,
            frame.dims(),
            |x, y, sx, sy| out.set(x, y, frame.get(sx, sy)),
        );
        Ok(out)
    }

    /// Camera point → top-down point.
    pub fn project_to_top_down(&self, p: [f64; 2]) -> Option<[f64; 2]> {
        apply_homography_point(&self.homography.forward, p)
    }

    /// Top-down point → camera point.
    pub fn project_to_camera(&self, p: [f64; 2]) -> Option<[f64; 2]> {
        apply_homography_point(&self.homography.inverse, p)
    }
}

fn check_dims(expected: (usize, usize), actual: (usize, usize)) -> Result<(), FrameError> {
    if expected != actual {
        return Err(FrameError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

fn warp_mask(src: &LaneMask, out_to_src: &Matrix3<f64>, out_size: (usize, usize)) -> LaneMask {
    let mut out = LaneMask::new(out_size.0, out_size.1);
    for_each_source_pixel(out_to_src, out_size, src.dims(), |x, y, sx, sy| {
        if src.is_on(sx, sy) {
            out.set(x, y, true);
        }
    });
    out
}

/// Visit every output pixel whose back-projection lands inside the source.
fn for_each_source_pixel(
    out_to_src: &Matrix3<f64>,
    out_size: (usize, usize),
    src_size: (usize, usize),
    mut visit: impl FnMut(usize, usize, usize, usize),
) {
    let (src_w, src_h) = (src_size.0 as f64, src_size.1 as f64);
    for y in 0..out_size.1 {
        for x in 0..out_size.0 {
            let Some([sx, sy]) = apply_homography_point(out_to_src, [x as f64, y as f64]) else {
                continue;
            };
            let (sx, sy) = (sx.round(), sy.round());
            if sx < 0.0 || sy < 0.0 || sx >= src_w || sy >= src_h {
                continue;
            }
            visit(x, y, sx as usize, sy as usize);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transformer() -> PerspectiveTransformer {
        PerspectiveTransformer::new(&Calibration::proportional(800, 600)).expect("valid")
    }

    #[test]
    fn output_uses_configured_canvas() {
        let mut calib = Calibration::proportional(800, 600);
        calib.top_down_size = (400, 300);
        calib.dst = [[100.0, 0.0], [100.0, 300.0], [300.0, 300.0], [300.0, 0.0]];
        let t = PerspectiveTransformer::new(&calib).expect("valid");
        let warped = t.to_top_down(&LaneMask::new(800, 600)).expect("dims match");
        assert_eq!(warped.dims(), (400, 300));
        assert!(warped.is_empty());
    }

    #[test]
    fn rejects_wrong_frame_size() {
        let t = transformer();
        let err = t.to_top_down(&LaneMask::new(640, 480)).unwrap_err();
        assert_eq!(
            err,
            FrameError::DimensionMismatch {
                expected: (800, 600),
                actual: (640, 480)
            }
        );
    }

    #[test]
    fn rejects_empty_canvas() {
        let mut calib = Calibration::proportional(800, 600);
        calib.top_down_size = (0, 600);
        assert!(matches!(
            PerspectiveTransformer::new(&calib),
            Err(CalibrationError::EmptyCanvas { .. })
        ));
    }

    #[test]
    fn point_projection_round_trips() {
        let t = transformer();
        let p = [420.0, 450.0];
        let top = t.project_to_top_down(p).expect("finite");
        let back = t.project_to_camera(top).expect("finite");
        assert!((back[0] - p[0]).abs() < 1e-6 && (back[1] - p[1]).abs() < 1e-6);
    }

    #[test]
    fn trapezoid_edges_become_vertical() {
        let t = transformer();
        let calib = Calibration::proportional(800, 600);
        let top_left = t.project_to_top_down(calib.src[0]).expect("finite");
        let bottom_left = t.project_to_top_down(calib.src[1]).expect("finite");
        assert!((top_left[0] - bottom_left[0]).abs() < 1e-6);
    }
}
