//! Histogram reports: the hand-off format for chart sinks.

use std::{fs, path::Path};

use histothresh_core::{build_histogram, to_gray, ChannelHistogram, Histogram, Raster};
use serde::{Deserialize, Serialize};

use crate::{IoError, PipelineError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelReport {
    pub counts: ChannelHistogram,
    /// Lowest occupied sample value.
    pub min: Option<u8>,
    /// Highest occupied sample value.
    pub max: Option<u8>,
}

impl ChannelReport {
    pub fn new(counts: ChannelHistogram) -> Self {
        let range = counts.occupied_range();
        Self {
            min: range.map(|r| r.0),
            max: range.map(|r| r.1),
            counts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramReport {
    #[serde(default)]
    pub source: Option<String>,
    pub width: usize,
    pub height: usize,
    pub total_pixels: u64,
    /// Bar labels `0..=255`.
    pub labels: Vec<u8>,
    pub red: ChannelReport,
    pub green: ChannelReport,
    pub blue: ChannelReport,
    /// Luma histogram, the input of the histogram-based thresholds.
    #[serde(default)]
    pub gray: Option<ChannelReport>,
}

impl HistogramReport {
    /// Build a report for `raster`, with the luma channel when `with_gray` is set.
    pub fn from_raster(raster: &Raster, with_gray: bool) -> Result<Self, PipelineError> {
        let hist = Histogram::from_raster(raster)?;
        let gray = if with_gray {
            Some(ChannelReport::new(build_histogram(&to_gray(raster))?))
        } else {
            None
        };
        Ok(Self {
            source: None,
            width: raster.width(),
            height: raster.height(),
            total_pixels: hist.red.total(),
            labels: (0..=255).collect(),
            red: ChannelReport::new(hist.red),
            green: ChannelReport::new(hist.green),
            blue: ChannelReport::new(hist.blue),
            gray,
        })
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn to_json(&self) -> Result<String, IoError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON, creating parent directories.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
