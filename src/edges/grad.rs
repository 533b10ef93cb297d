//! 3×3 Sobel gradients and a 3×3 Gaussian blur with border clamping.
//!
//! Borders replicate the nearest pixel. Complexity is O(W·H) per pass.
use crate::image::{ImageF32, ImageView, ImageViewMut};

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Binomial approximation of a σ≈0.85 Gaussian, normalized to 1.
const GAUSSIAN_KERNEL: Kernel3 = [
    [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
    [2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0],
    [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
];

/// Per-pixel gradient buffers.
#[derive(Clone, Debug)]
pub struct Grad {
    /// Horizontal derivative
    pub gx: ImageF32,
    /// Vertical derivative
    pub gy: ImageF32,
    /// `sqrt(gx^2 + gy^2)`
    pub mag: ImageF32,
}

#[inline]
fn convolve_at(rows: &[&[f32]; 3], x_idx: &[usize; 3], kernel: &Kernel3) -> f32 {
    let mut sum = 0.0;
    for (row, k_row) in rows.iter().zip(kernel.iter()) {
        sum += row[x_idx[0]] * k_row[0] + row[x_idx[1]] * k_row[1] + row[x_idx[2]] * k_row[2];
    }
    sum
}

#[inline]
fn clamped_neighbours(i: usize, len: usize) -> [usize; 3] {
    [i.saturating_sub(1), i, (i + 1).min(len - 1)]
}

/// Compute Sobel gradients on a single-channel float image.
pub fn sobel_gradients(l: &ImageF32) -> Grad {
    let (w, h) = (l.w, l.h);
    let mut gx = ImageF32::new(w, h);
    let mut gy = ImageF32::new(w, h);
    let mut mag = ImageF32::new(w, h);
    if w == 0 || h == 0 {
        return Grad { gx, gy, mag };
    }

    for y in 0..h {
        let y_idx = clamped_neighbours(y, h);
        let rows = [l.row(y_idx[0]), l.row(y_idx[1]), l.row(y_idx[2])];
        let out_gx = gx.row_mut(y);
        let out_gy = gy.row_mut(y);
        let out_mag = mag.row_mut(y);
        for x in 0..w {
            let x_idx = clamped_neighbours(x, w);
            let sum_x = convolve_at(&rows, &x_idx, &SOBEL_KERNEL_X);
            let sum_y = convolve_at(&rows, &x_idx, &SOBEL_KERNEL_Y);
            out_gx[x] = sum_x;
            out_gy[x] = sum_y;
            out_mag[x] = (sum_x * sum_x + sum_y * sum_y).sqrt();
        }
    }

    Grad { gx, gy, mag }
}

/// 3×3 Gaussian blur.
pub fn gaussian_blur_3x3(l: &ImageF32) -> ImageF32 {
    let (w, h) = (l.w, l.h);
    let mut out = ImageF32::new(w, h);
    if w == 0 || h == 0 {
        return out;
    }
    for y in 0..h {
        let y_idx = clamped_neighbours(y, h);
        let rows = [l.row(y_idx[0]), l.row(y_idx[1]), l.row(y_idx[2])];
        let dst = out.row_mut(y);
        for (x, px) in dst.iter_mut().enumerate() {
            *px = convolve_at(&rows, &clamped_neighbours(x, w), &GAUSSIAN_KERNEL);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_image(width: usize, height: usize, split_x: usize) -> ImageF32 {
        ImageF32::from_fn(width, height, |x, _| if x < split_x { 0.0 } else { 1.0 })
    }

    #[test]
    fn sobel_responds_to_vertical_step() {
        let img = step_image(8, 6, 4);
        let grad = sobel_gradients(&img);
        assert!((grad.gx.get(4, 3) - 4.0).abs() < 1e-6);
        assert!(grad.gy.get(4, 3).abs() < 1e-6);
        assert!(grad.mag.get(1, 3).abs() < 1e-6, "flat region must be zero");
    }

    #[test]
    fn blur_preserves_constant_image() {
        let img = ImageF32::from_fn(5, 5, |_, _| 3.0);
        let blurred = gaussian_blur_3x3(&img);
        for &v in &blurred.data {
            assert!((v - 3.0).abs() < 1e-5);
        }
    }
}
