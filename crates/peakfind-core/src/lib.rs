//! Core types for matched-filter peak detection.
//!
//! This crate only carries data: grayscale buffers, the region of interest
//! a detection runs on, and logger installation helpers. The detection
//! pipeline itself lives in `peakfind-detect`.

mod image;
mod logger;
mod roi;

pub use image::{GrayImage, GrayImageView, ImageError};
pub use roi::Roi;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
