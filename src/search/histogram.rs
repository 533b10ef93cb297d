//! Base-position locator.
//!
//! Sums on pixels per column over the lower half of the top-down mask,
//! where lines are closest to the vehicle and least distorted. The left base
//! is the first column reaching the maximum in `[0, w/2)`, the right base the
//! first column reaching the maximum in `[w/2, w)`. A half without any on
//! pixel has no base.
use crate::image::{ImageView, LaneMask};
use crate::types::{PerSide, Side};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasePositions {
    pub histogram: Vec<u32>,
    pub bases: PerSide<Option<usize>>,
}

/// Per-column on-pixel counts over rows `[h/2, h)`.
pub fn column_histogram(mask: &LaneMask) -> Vec<u32> {
    let (w, h) = mask.dims();
    let mut hist = vec![0u32; w];
    for y in h / 2..h {
        for (bin, &px) in hist.iter_mut().zip(mask.row(y)) {
            *bin += u32::from(px != 0);
        }
    }
    hist
}

pub fn locate_bases(mask: &LaneMask) -> BasePositions {
    let histogram = column_histogram(mask);
    let mid = histogram.len() / 2;
    let bases = PerSide::from_fn(|side| match side {
        Side::Left => first_argmax(&histogram[..mid]),
        Side::Right => first_argmax(&histogram[mid..]).map(|x| x + mid),
    });
    BasePositions { histogram, bases }
}

/// Index of the first maximum; `None` when the slice is empty or all zero.
fn first_argmax(bins: &[u32]) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (i, &v) in bins.iter().enumerate() {
        if v > best.map_or(0, |(_, b)| b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_peaks_in_each_half() {
        let mask = LaneMask::from_fn(20, 10, |x, _| x == 3 || x == 15);
        let found = locate_bases(&mask);
        assert_eq!(found.bases, PerSide::new(Some(3), Some(15)));
        assert_eq!(found.histogram[3], 5, "only the lower half is counted");
    }

    #[test]
    fn ties_resolve_to_leftmost_column() {
        let mask = LaneMask::from_fn(20, 10, |x, _| x == 2 || x == 6 || x == 12 || x == 18);
        let found = locate_bases(&mask);
        assert_eq!(found.bases, PerSide::new(Some(2), Some(12)));
    }

    #[test]
    fn empty_half_has_no_base() {
        let mask = LaneMask::from_fn(20, 10, |x, y| x == 14 && y >= 5);
        let found = locate_bases(&mask);
        assert_eq!(found.bases.left, None);
        assert_eq!(found.bases.right, Some(14));
    }

    #[test]
    fn upper_half_evidence_is_ignored() {
        let mask = LaneMask::from_fn(20, 10, |x, y| x == 4 && y < 5);
        let found = locate_bases(&mask);
        assert!(found.histogram.iter().all(|&v| v == 0));
        assert_eq!(found.bases, PerSide::new(None, None));
    }
}
