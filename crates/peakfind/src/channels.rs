//! Independent detection runs over several channels of one image.
//!
//! Runs share nothing mutable, so with the `rayon` feature they execute on the
//! rayon pool. Results come back in channel order either way.

use crate::core::{GrayImageView, Roi};
use crate::peaks::{PeakDetectionResult, PeakDetector, PeakError};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Detect peaks in every channel with the same detector, ROI and mask.
pub fn detect_channels(
    detector: &PeakDetector,
    channels: &[GrayImageView<'_>],
    roi: &Roi,
    aux_mask: Option<&GrayImageView<'_>>,
) -> Vec<Result<PeakDetectionResult, PeakError>> {
    let run = |channel: &GrayImageView<'_>| detector.detect(channel, roi, aux_mask);

    #[cfg(feature = "rayon")]
    let results: Vec<_> = channels.par_iter().map(run).collect();
    #[cfg(not(feature = "rayon"))]
    let results: Vec<_> = channels.iter().map(run).collect();

    log::debug!(
        "detected peaks in {} channels: {:?}",
        results.len(),
        results
            .iter()
            .map(|r| r.as_ref().map_or(0, PeakDetectionResult::len))
            .collect::<Vec<_>>()
    );
    results
}
