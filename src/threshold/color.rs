//! Color-space helpers.

/// HLS lightness and saturation of an RGB pixel, both scaled to 0..=255
/// following the usual 8-bit HLS convention. Hue is not needed by the
/// extractor and is not computed.
#[inline]
pub fn lightness_saturation(rgb: [u8; 3]) -> (u8, u8) {
    let r = rgb[0] as f32 / 255.0;
    let g = rgb[1] as f32 / 255.0;
    let b = rgb[2] as f32 / 255.0;
    let vmax = r.max(g).max(b);
    let vmin = r.min(g).min(b);
    let l = 0.5 * (vmax + vmin);
    let delta = vmax - vmin;
    let s = if delta <= f32::EPSILON {
        0.0
    } else if l < 0.5 {
        delta / (vmax + vmin)
    } else {
        delta / (2.0 - vmax - vmin)
    };
    (to_u8(l), to_u8(s))
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grey_has_no_saturation() {
        assert_eq!(lightness_saturation([100, 100, 100]), (100, 0));
        assert_eq!(lightness_saturation([255, 255, 255]), (255, 0));
    }

    #[test]
    fn yellow_is_fully_saturated() {
        let (l, s) = lightness_saturation([255, 200, 0]);
        assert_eq!(l, 128);
        assert_eq!(s, 255);
    }
}
