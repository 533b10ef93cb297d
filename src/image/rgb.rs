//! Three-channel 8-bit color frames (RGB byte order).
//!
//! `ImageRgb8` is the borrowed view the pipeline consumes; `RgbImage8` is an
//! owned buffer produced by file loading and the overlay renderer.
use crate::error::FrameError;

/// Borrowed interleaved RGB frame.
#[derive(Clone, Copy, Debug)]
pub struct ImageRgb8<'a> {
    pub w: usize,
    pub h: usize,
    /// Bytes between rows (`>= 3 * w`).
    pub stride: usize,
    pub data: &'a [u8],
}

impl<'a> ImageRgb8<'a> {
    /// Tightly packed view over `data` (`stride == 3 * w`). Fails when
    /// `data` holds fewer than `3 * w * h` bytes.
    pub fn packed(w: usize, h: usize, data: &'a [u8]) -> Result<Self, FrameError> {
        let needed = 3 * w * h;
        if data.len() < needed {
            return Err(FrameError::ShortBuffer {
                needed,
                actual: data.len(),
            });
        }
        Ok(Self {
            w,
            h,
            stride: 3 * w,
            data,
        })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [u8; 3] {
        let i = y * self.stride + 3 * x;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Interleaved bytes of row `y` (length `3 * w`).
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + 3 * self.w]
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    /// Copy into an owned, tightly packed buffer.
    pub fn to_owned_image(&self) -> RgbImage8 {
        let mut data = Vec::with_capacity(3 * self.w * self.h);
        for y in 0..self.h {
            data.extend_from_slice(self.row(y));
        }
        RgbImage8::new(self.w, self.h, data)
    }
}

/// Owned, tightly packed RGB buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct RgbImage8 {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbImage8 {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), 3 * width * height);
        Self {
            width,
            height,
            data,
        }
    }

    /// Uniformly filled buffer.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(3 * width * height);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Self::new(width, height, data)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> [u8; 3] {
        let i = 3 * (y * self.width + x);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    pub fn set(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = 3 * (y * self.width + x);
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    pub fn as_view(&self) -> ImageRgb8<'_> {
        ImageRgb8 {
            w: self.width,
            h: self.height,
            stride: 3 * self.width,
            data: &self.data,
        }
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_rejects_short_buffer() {
        let data = vec![0u8; 3 * 4 * 3 - 1];
        assert_eq!(
            ImageRgb8::packed(4, 3, &data).unwrap_err(),
            FrameError::ShortBuffer {
                needed: 36,
                actual: 35
            }
        );
    }

    #[test]
    fn packed_view_reads_rows() {
        let data: Vec<u8> = (0..18).collect();
        let view = ImageRgb8::packed(3, 2, &data).expect("buffer large enough");
        assert_eq!(view.get(1, 1), [12, 13, 14]);
        assert_eq!(view.row(1), &data[9..18]);
        assert_eq!(view.to_owned_image().as_view().get(2, 0), [6, 7, 8]);
    }
}
