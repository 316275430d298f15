//! RGB → luma reduction shared by every thresholding method.

use crate::{Plane, Raster};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Rec. 601 luma weights for R, G, B.
pub const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// Luma of one pixel, `round(0.299 R + 0.587 G + 0.114 B)`.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = LUMA_WEIGHTS[0] * r as f64 + LUMA_WEIGHTS[1] * g as f64 + LUMA_WEIGHTS[2] * b as f64;
    // The weights sum to 1 only up to rounding, so saturate.
    crate::round_half_up(y).min(255.0) as u8
}

/// Grayscale map with the raster's dimensions.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(raster), fields(width = raster.width(), height = raster.height()))
)]
pub fn to_gray(raster: &Raster) -> Plane {
    let [r, g, b] = raster.channels();
    let data: Vec<u8> = r
        .as_raw()
        .iter()
        .zip(g.as_raw())
        .zip(b.as_raw())
        .map(|((&r, &g), &b)| luma(r, g, b))
        .collect();
    Plane::from_parts(raster.width(), raster.height(), data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma_extremes() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(255, 0, 0), 76);
        assert_eq!(luma(0, 255, 0), 150);
        assert_eq!(luma(0, 0, 255), 29);
    }

    #[test]
    fn gray_keeps_dimensions() {
        let raster = Raster::from_interleaved_rgb(3, 1, &[10, 10, 10, 200, 100, 50, 0, 0, 0]).unwrap();
        let gray = to_gray(&raster);
        assert_eq!((gray.width(), gray.height()), (3, 1));
        // 0.299*200 + 0.587*100 + 0.114*50 = 124.2
        assert_eq!(gray.as_raw(), &[10, 124, 0]);
    }
}
