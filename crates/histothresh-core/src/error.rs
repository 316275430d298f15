/// Errors raised when a plane or raster violates the shape or sample invariants.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("image is empty (width={width}, height={height})")]
    EmptyImage { width: usize, height: usize },

    #[error("image dimensions {width}x{height} overflow the sample count")]
    DimensionsOverflow { width: usize, height: usize },

    #[error("invalid sample buffer length (expected {expected} samples, got {got})")]
    BufferLength { expected: usize, got: usize },

    #[error("row {row} has {got} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("sample {value} at (x={x}, y={y}) is outside 0..=255")]
    SampleOutOfRange { x: usize, y: usize, value: i64 },

    #[error("channel planes disagree on dimensions ({expected_w}x{expected_h} vs {got_w}x{got_h})")]
    DimensionMismatch {
        expected_w: usize,
        expected_h: usize,
        got_w: usize,
        got_h: usize,
    },
}
