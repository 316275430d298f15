//! JSON pipeline configuration and runner.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{ops::Operation, IoError};

#[cfg(feature = "image")]
use crate::{ops::run_steps, report::HistogramReport, PipelineError};
#[cfg(feature = "image")]
use log::info;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Configuration for a batch run over one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub input_path: String,
    #[serde(default)]
    pub output_path: Option<String>,
    /// Histogram of the input, written before any step runs.
    #[serde(default)]
    pub histogram_path: Option<String>,
    /// Include the luma channel in the histogram report.
    #[serde(default)]
    pub histogram_gray: bool,
    #[serde(default)]
    pub steps: Vec<Operation>,
}

impl PipelineConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output image path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("output.bmp"))
    }
}

/// Summary of a finished [`run_pipeline`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub input_path: String,
    pub output_path: String,
    #[serde(default)]
    pub histogram_path: Option<String>,
    pub width: usize,
    pub height: usize,
    pub steps: Vec<String>,
}

/// Load the input, optionally write its histogram, apply every step and save.
#[cfg(feature = "image")]
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(config), fields(input = %config.input_path, steps = config.steps.len()))
)]
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineReport, PipelineError> {
    let raster = crate::io::load_raster(&config.input_path)?;

    if let Some(path) = &config.histogram_path {
        HistogramReport::from_raster(&raster, config.histogram_gray)?
            .with_source(config.input_path.clone())
            .write_json(path)?;
        info!("histogram written to {path}");
    }

    let (width, height) = (raster.width(), raster.height());
    let result = run_steps(raster, &config.steps)?;

    let output = config.output_path();
    crate::io::save_raster(&result, &output)?;

    Ok(PipelineReport {
        input_path: config.input_path.clone(),
        output_path: output.display().to_string(),
        histogram_path: config.histogram_path.clone(),
        width,
        height,
        steps: config.steps.iter().map(Operation::name).collect(),
    })
}
