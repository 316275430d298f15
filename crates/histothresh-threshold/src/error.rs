use histothresh_core::ImageError;

/// Errors returned by the threshold engines.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ThresholdError {
    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("window size must be odd and positive (got {size})")]
    InvalidWindowSize { size: usize },

    #[error("invalid parameter {name} = {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("window around (x={x}, y={y}) contains no pixels")]
    EmptyWindow { x: usize, y: usize },
}
