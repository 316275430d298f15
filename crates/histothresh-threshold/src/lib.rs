//! Binarization of grayscale planes.
//!
//! - [`global`]: manual cut, bimodal valley and Otsu (`gray >= t`).
//! - [`region`]: double threshold and hysteresis from strong to weak pixels.
//! - [`adaptive`]: Niblack, Sauvola and Wolf–Jolion over sliding windows
//!   (`gray > t`).
//! - [`window`]: the clipped window statistics behind the adaptive methods.
//!
//! Inputs are grayscale maps from [`histothresh_core::to_gray`]. Outputs are
//! freshly allocated masks containing only 0 and 255. With the `rayon`
//! feature, adaptive thresholds and the hysteresis propagation pass run
//! row-parallel.

pub mod adaptive;
mod error;
pub mod global;
mod method;
pub mod region;
mod rows;
pub mod window;

pub use adaptive::{
    adaptive_threshold, threshold_niblack, threshold_sauvola, threshold_wolf_jolion,
    NiblackParams, SauvolaParams, WolfJolionParams,
};
pub use error::ThresholdError;
pub use global::{
    histogram_peaks, select_bimodal_valley, select_otsu, threshold_bimodal_valley,
    threshold_manual, threshold_otsu, BimodalSelection, OtsuSelection,
    BIMODAL_FALLBACK_THRESHOLD,
};
pub use method::ThresholdMethod;
pub use region::{
    classify_hysteresis, propagate_hysteresis, threshold_double, threshold_double_hysteresis,
};
pub use window::{
    naive_window_stats, SummedAreaTable, WindowSize, WindowStats, DEFAULT_WINDOW_SIZE,
};
