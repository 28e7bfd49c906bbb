use peakfind_core::ImageError;

/// Errors returned by the peak detector.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PeakError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("{what} is {}x{}, expected {}x{}", .got.0, .got.1, .expected.0, .expected.1)]
    DimensionMismatch {
        what: &'static str,
        expected: (usize, usize),
        got: (usize, usize),
    },
    #[error("roi {x},{y} {width}x{height} exceeds the {image_width}x{image_height} image")]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        image_width: usize,
        image_height: usize,
    },
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("extraction cancelled after {peaks_found} peaks")]
    Cancelled { peaks_found: usize },
}
