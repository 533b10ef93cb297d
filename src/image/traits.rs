//! Row access shared by the single-channel buffers ([`super::LaneMask`],
//! [`super::ImageF32`]). Both are tightly packed and row-major.
use std::ops::Range;

pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;

    fn row(&self, y: usize) -> &[Self::Pixel];

    /// Width and height as a pair.
    fn dims(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Pixel at `(x, y)`. Panics outside the buffer.
    #[inline]
    fn pixel(&self, x: usize, y: usize) -> Self::Pixel {
        self.row(y)[x]
    }

    /// Rows from top to bottom.
    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows {
            image: self,
            ys: 0..self.height(),
        }
    }
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];
}

pub struct Rows<'a, I: ImageView> {
    image: &'a I,
    ys: Range<usize>,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        self.ys.next().map(|y| self.image.row(y))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ys.size_hint()
    }
}

impl<I: ImageView> DoubleEndedIterator for Rows<'_, I> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.ys.next_back().map(|y| self.image.row(y))
    }
}

impl<I: ImageView> ExactSizeIterator for Rows<'_, I> {}
