//! Raster model, luma reduction and histogram engine for `histothresh`.
//!
//! Everything here is a pure function of its inputs. Planes are row-major
//! `u8` buffers, so sample range is guaranteed by the type once a plane has
//! been constructed; building one from wider integers goes through
//! [`Plane::from_rows`], which reports out-of-range samples.

mod error;
mod gray;
mod histogram;
mod logger;
mod plane;
mod raster;

pub use error::ImageError;
pub use gray::{luma, to_gray, LUMA_WEIGHTS};
pub use histogram::{build_histogram, ChannelHistogram, Histogram, NUM_BINS};
pub use plane::Plane;
pub use raster::{Channel, Raster};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;
pub use logger::{init_with_level, parse_level};

/// Mask value for foreground / strong pixels.
pub const FOREGROUND: u8 = 255;
/// Mask value for background pixels.
pub const BACKGROUND: u8 = 0;

/// Round half toward positive infinity, `floor(x + 0.5)`.
#[inline]
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Round half-up and saturate into the sample range.
#[inline]
pub fn to_sample(x: f64) -> u8 {
    round_half_up(x).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(2.49), 2.0);
    }

    #[test]
    fn samples_saturate() {
        assert_eq!(to_sample(-12.0), 0);
        assert_eq!(to_sample(254.5), 255);
        assert_eq!(to_sample(400.0), 255);
        assert_eq!(to_sample(f64::NAN), 0);
    }
}
