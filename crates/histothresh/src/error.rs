use histothresh_adjust::AdjustError;
use histothresh_core::ImageError;
use histothresh_threshold::ThresholdError;

/// Errors from reading or writing images, configs and reports.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "image")]
    #[error(transparent)]
    Codec(#[from] image::ImageError),

    #[error(transparent)]
    Raster(#[from] ImageError),

    #[error("image dimensions {width}x{height} do not fit the encoder")]
    Dimensions { width: usize, height: usize },
}

/// Errors produced while running operations or pipelines.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Adjust(#[from] AdjustError),

    #[error(transparent)]
    Threshold(#[from] ThresholdError),
}
