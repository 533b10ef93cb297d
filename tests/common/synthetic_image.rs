use lane_estimator::image::{LaneMask, RgbImage8};
use lane_estimator::PerspectiveTransformer;

pub const ROAD: [u8; 3] = [40, 40, 40];
pub const PAINT: [u8; 3] = [255, 255, 255];

/// Top-down mask with one line per curve; each line is `2 * half_width + 1`
/// pixels wide. Curves give x as a function of y.
pub fn lane_mask(
    width: usize,
    height: usize,
    lines: &[&dyn Fn(f64) -> f64],
    half_width: usize,
) -> LaneMask {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    LaneMask::from_fn(width, height, |x, y| {
        lines.iter().any(|line| {
            let cx = line(y as f64).round();
            (x as f64 - cx).abs() <= half_width as f64
        })
    })
}

/// Two vertical lines at `left` and `right`.
pub fn straight_lanes(width: usize, height: usize, left: f64, right: f64) -> LaneMask {
    lane_mask(width, height, &[&move |_: f64| left, &move |_: f64| right], 2)
}

/// Parabola `x = a·(y - y_bottom)² + x0`, vertical at the bottom row.
pub fn bend(a: f64, x0: f64, height: usize) -> impl Fn(f64) -> f64 {
    let yb = (height - 1) as f64;
    move |y| a * (y - yb).powi(2) + x0
}

/// Camera frame whose road surface, seen through `transformer`, carries
/// paint wherever `top_down` is on.
pub fn camera_frame(transformer: &PerspectiveTransformer, top_down: &LaneMask) -> RgbImage8 {
    let (w, h) = transformer.camera_size();
    let (tw, th) = transformer.top_down_size();
    let mut frame = RgbImage8::filled(w, h, ROAD);
    for y in 0..h {
        for x in 0..w {
            let Some([tx, ty]) = transformer.project_to_top_down([x as f64, y as f64]) else {
                continue;
            };
            let (tx, ty) = (tx.round(), ty.round());
            if tx < 0.0 || ty < 0.0 || tx >= tw as f64 || ty >= th as f64 {
                continue;
            }
            if top_down.is_on(tx as usize, ty as usize) {
                frame.set(x, y, PAINT);
            }
        }
    }
    frame
}
