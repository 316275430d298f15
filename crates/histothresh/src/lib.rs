//! High-level facade for the `histothresh-*` workspace.
//!
//! This crate provides:
//! - re-exports of the histogram/raster core, the point transforms and the
//!   threshold engines
//! - [`ops::Operation`], a serializable name for every processing step
//! - JSON pipeline configs ([`config`]) and histogram reports ([`report`])
//! - (feature `image`) file I/O for rasters and masks
//! - (feature `cli`) the `histothresh` binary
//!
//! ## Quickstart
//!
//! ```no_run
//! use histothresh::io::{load_raster, save_plane};
//! use histothresh::threshold::{threshold_sauvola, SauvolaParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let raster = load_raster("page.bmp")?;
//! let gray = histothresh::core::to_gray(&raster);
//! let mask = threshold_sauvola(&gray, &SauvolaParams::default())?;
//! save_plane(&mask, "page_mask.bmp")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `histothresh::core`: planes, rasters, luma, histograms, logging.
//! - `histothresh::adjust`: clamp, normalize, add, brighten, contrast, stretch.
//! - `histothresh::threshold`: global, region and adaptive binarization.

pub use histothresh_adjust as adjust;
pub use histothresh_core as core;
pub use histothresh_threshold as threshold;

pub use histothresh_core::{Histogram, Plane, Raster};

pub mod config;
mod error;
#[cfg(feature = "image")]
pub mod io;
pub mod ops;
pub mod report;

pub use config::{PipelineConfig, PipelineReport};
#[cfg(feature = "image")]
pub use config::run_pipeline;
pub use error::{IoError, PipelineError};
pub use ops::{run_steps, Operation, Output};
pub use report::{ChannelReport, HistogramReport};
