//! High-level facade crate for the `peakfind-*` workspace.
//!
//! This crate provides:
//! - re-exports of the core types and the detector crate
//! - (feature-gated) helpers that run detection directly on `image::GrayImage`
//! - multi-channel runs, parallel with the `rayon` feature
//!
//! ## Quickstart
//!
//! ```no_run
//! use peakfind::detect;
//! use peakfind::PeakParams;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::GrayImage::new(256, 256);
//! let params = PeakParams {
//!     width: 12,
//!     min_dist: 8.0,
//!     threshold: 5.0,
//!     ..PeakParams::default()
//! };
//! let result = detect::detect_peaks_image(&img, None, None, params)?;
//! println!("nuclei: {}", result.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `peakfind::core`: grayscale views, ROI, logger setup.
//! - `peakfind::peaks`: kernel, response map, validity mask, extraction, detector.
//! - `peakfind::detect`: end-to-end helpers from raw buffers and `image::GrayImage`.
//! - `peakfind::channels`: one independent run per channel.

pub use peakfind_core as core;
pub use peakfind_detect as peaks;

pub use peakfind_core::{GrayImage, GrayImageView, Roi};
pub use peakfind_detect::{
    CancelToken, Peak, PeakDetectionResult, PeakDetector, PeakError, PeakParams, ThresholdPolicy,
};

pub mod channels;
pub mod detect;

/// Route `log` records into `tracing` and install the fmt subscriber.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let _ = tracing_log::LogTracer::init();
    peakfind_core::init_tracing(json);
}
