use crate::{core, peaks};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("invalid grayscale image buffer length (expected {expected} bytes, got {got})")]
    InvalidGrayBuffer { expected: usize, got: usize },

    #[error("invalid grayscale image dimensions (width={width}, height={height})")]
    InvalidGrayDimensions { width: u32, height: u32 },

    #[error(transparent)]
    Peak(#[from] peaks::PeakError),
}

/// Wrap a raw row-major 8-bit buffer.
pub fn gray_view_from_raw(
    width: u32,
    height: u32,
    data: &[u8],
) -> Result<core::GrayImageView<'_>, DetectError> {
    let (w, h) = (width as usize, height as usize);
    let expected = w
        .checked_mul(h)
        .ok_or(DetectError::InvalidGrayDimensions { width, height })?;
    if data.len() != expected {
        return Err(DetectError::InvalidGrayBuffer {
            expected,
            got: data.len(),
        });
    }
    Ok(core::GrayImageView {
        width: w,
        height: h,
        data,
    })
}

/// Run detection on a raw buffer; `roi = None` processes the whole image.
pub fn detect_peaks_raw(
    width: u32,
    height: u32,
    data: &[u8],
    roi: Option<core::Roi>,
    params: peaks::PeakParams,
) -> Result<peaks::PeakDetectionResult, DetectError> {
    let view = gray_view_from_raw(width, height, data)?;
    let roi = roi.unwrap_or_else(|| core::Roi::full(view.width, view.height));
    let detector = peaks::PeakDetector::new(params)?;
    Ok(detector.detect(&view, &roi, None)?)
}

/// Convert an `image::GrayImage` into the lightweight `peakfind-core` view type.
#[cfg(feature = "image")]
pub fn gray_view(img: &::image::GrayImage) -> core::GrayImageView<'_> {
    core::GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Run the detector end-to-end on an `image::GrayImage`.
///
/// `aux_mask` is an optional inclusion mask of the same size (0 = excluded).
#[cfg(feature = "image")]
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(img, aux_mask, params),
        fields(width = img.width(), height = img.height())
    )
)]
pub fn detect_peaks_image(
    img: &::image::GrayImage,
    roi: Option<core::Roi>,
    aux_mask: Option<&::image::GrayImage>,
    params: peaks::PeakParams,
) -> Result<peaks::PeakDetectionResult, DetectError> {
    let view = gray_view(img);
    let roi = roi.unwrap_or_else(|| core::Roi::full(view.width, view.height));
    let mask = aux_mask.map(gray_view);
    let detector = peaks::PeakDetector::new(params)?;
    Ok(detector.detect(&view, &roi, mask.as_ref())?)
}

/// Convenience overload using `PeakParams::default()` on the whole image.
#[cfg(feature = "image")]
pub fn detect_peaks_image_default(
    img: &::image::GrayImage,
) -> Result<peaks::PeakDetectionResult, DetectError> {
    detect_peaks_image(img, None, None, peaks::PeakParams::default())
}
