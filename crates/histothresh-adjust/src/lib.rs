//! Point transforms on RGB rasters.
//!
//! Every transform maps each sample independently, identically on all three
//! channels, and saturates to `0..=255`. Real-valued curves are evaluated
//! once per input level into a lookup table and rounded half-up.

mod adjustment;
mod levels;
mod tone;

pub use adjustment::{
    add_constant, adjust_contrast, brighten_with_range, clamp, normalize, stretch_histogram,
    AdjustError, Adjustment,
};
pub use tone::BrightenMode;
