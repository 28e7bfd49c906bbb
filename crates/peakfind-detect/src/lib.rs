//! Matched-filter peak detection for blob-like objects such as cell nuclei.
//!
//! Pipeline:
//! - [`Kernel`]: zero-sum Laplacian-of-Gaussian filter from one aperture width.
//! - [`convolve_roi`]: filter response over the region of interest, then
//!   clipped with a [`ThresholdPolicy`].
//! - [`ValidityMask`]: border margin plus an optional (dilated) auxiliary mask.
//! - [`extract_peaks`]: greedy local-maximum extraction with a minimum
//!   separation between peaks.
//!
//! [`PeakDetector`] wires the stages together:
//!
//! ```
//! use peakfind_core::{GrayImage, Roi};
//! use peakfind_detect::{PeakDetector, PeakParams};
//!
//! let mut img = GrayImage::new_filled(20, 20, 0);
//! for y in 5..10 {
//!     for x in 5..10 {
//!         img.set(x, y, 255);
//!     }
//! }
//! let params = PeakParams { width: 11, ..PeakParams::default() };
//! let detector = PeakDetector::new(params)?;
//! let result = detector.detect(&img.view(), &Roi::full(20, 20), None)?;
//! assert_eq!(result.absolute_peaks(), vec![(7, 7)]);
//! # Ok::<(), peakfind_detect::PeakError>(())
//! ```

mod cancel;
mod detector;
mod error;
mod extract;
pub mod io;
mod kernel;
mod mask;
mod offsets;
mod params;
mod response;

pub use cancel::CancelToken;
pub use detector::{PeakDetectionResult, PeakDetector};
pub use error::PeakError;
pub use extract::{extract_peaks, Extraction, Peak};
pub use kernel::Kernel;
pub use mask::{ValidityMask, BORDER_MARGIN};
pub use offsets::NeighborOffsets;
pub use params::{PeakParams, ThresholdPolicy};
pub use response::{convolve_roi, ResponseMap, RESPONSE_NOISE_FLOOR};
