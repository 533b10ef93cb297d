//! Sliding-window line search.
//!
//! The frame height is split into `windows` bands. Starting from the base
//! position, each band (bottom to top) collects the on pixels inside
//! `[center - margin, center + margin)`. When a band holds more than
//! `min_pixels` pixels, the next band is centered on their mean x;
//! otherwise the center is kept so empty bands do not drift.
use super::{LanePixels, SearchWindow};
use crate::image::{ImageView, LaneMask};
use crate::types::{PerSide, Side};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SlidingWindowOptions {
    /// Number of horizontal bands.
    pub windows: usize,
    /// Window half-width in pixels.
    pub margin: usize,
    /// Pixels a band needs (strictly more than) to recenter the next band.
    pub min_pixels: usize,
}

impl Default for SlidingWindowOptions {
    fn default() -> Self {
        Self {
            windows: 9,
            margin: 60,
            min_pixels: 40,
        }
    }
}

/// Pixels and window trace of one side.
#[derive(Clone, Debug, Default)]
pub struct SideSearch {
    pub pixels: LanePixels,
    pub windows: Vec<SearchWindow>,
}

/// Scan one side from its base. A missing base yields no pixels.
pub fn search_side(
    mask: &LaneMask,
    side: Side,
    base: Option<usize>,
    opts: &SlidingWindowOptions,
) -> SideSearch {
    let (w, h) = mask.dims();
    let mut out = SideSearch::default();
    let Some(mut center) = base else {
        return out;
    };
    if w == 0 || h == 0 {
        return out;
    }

    let bands = opts.windows.max(1);
    for band in 0..bands {
        let y0 = h * (bands - band - 1) / bands;
        let y1 = h * (bands - band) / bands;
        let x0 = center.saturating_sub(opts.margin).min(w);
        let x1 = center.saturating_add(opts.margin).min(w);

        let mut count = 0usize;
        let mut sum_x = 0usize;
        for y in y0..y1 {
            let row = mask.row(y);
            for (x, &px) in row.iter().enumerate().take(x1).skip(x0) {
                if px != 0 {
                    out.pixels.push(x, y);
                    sum_x += x;
                    count += 1;
                }
            }
        }

        out.windows.push(SearchWindow {
            side,
            band,
            x0,
            x1,
            y0,
            y1,
            pixel_count: count,
        });

        if count > opts.min_pixels {
            center = sum_x / count;
        }
    }
    out
}

/// Scan both sides independently.
pub fn search(
    mask: &LaneMask,
    bases: &PerSide<Option<usize>>,
    opts: &SlidingWindowOptions,
) -> PerSide<SideSearch> {
    PerSide::from_fn(|side| search_side(mask, side, *bases.get(side), opts))
}
