use peakfind_core::{GrayImageView, Roi};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::cancel::CancelToken;
use crate::error::PeakError;
use crate::extract::{extract_peaks, Peak};
use crate::kernel::Kernel;
use crate::mask::ValidityMask;
use crate::offsets::NeighborOffsets;
use crate::params::PeakParams;
use crate::response::convolve_roi;

/// Result of one detection run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PeakDetectionResult {
    pub roi: Roi,
    /// Peaks relative to `roi`, in acceptance order.
    pub peaks: Vec<Peak>,
    pub candidates_evaluated: usize,
    pub candidates_rejected: usize,
}

impl PeakDetectionResult {
    fn empty(roi: Roi) -> Self {
        Self {
            roi,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    /// Peaks translated to image coordinates.
    pub fn absolute_peaks(&self) -> Vec<(usize, usize)> {
        self.peaks
            .iter()
            .map(|p| self.roi.to_image(p.x, p.y))
            .collect()
    }
}

/// Matched-filter peak detector.
///
/// Holds the kernel and both neighbourhoods, so one detector can be reused
/// across images and shared between threads.
#[derive(Clone, Debug)]
pub struct PeakDetector {
    params: PeakParams,
    kernel: Kernel,
    verify: NeighborOffsets,
    suppress: NeighborOffsets,
}

impl PeakDetector {
    pub fn new(params: PeakParams) -> Result<Self, PeakError> {
        params.validate()?;
        let kernel = Kernel::laplacian_of_gaussian(params.width)?;
        let verify = NeighborOffsets::verification(params.verification_radius());
        let suppress = NeighborOffsets::suppression(params.min_dist);
        Ok(Self {
            params,
            kernel,
            verify,
            suppress,
        })
    }

    pub fn params(&self) -> &PeakParams {
        &self.params
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Detect peaks of `img` inside `roi`.
    ///
    /// `aux_mask` must have the same dimensions as `img`; zero pixels are
    /// excluded (after a one-pixel dilation of the included region).
    pub fn detect(
        &self,
        img: &GrayImageView<'_>,
        roi: &Roi,
        aux_mask: Option<&GrayImageView<'_>>,
    ) -> Result<PeakDetectionResult, PeakError> {
        self.run(img, roi, aux_mask, None)
    }

    /// Like [`PeakDetector::detect`], polling `cancel` once per candidate.
    pub fn detect_with_cancel(
        &self,
        img: &GrayImageView<'_>,
        roi: &Roi,
        aux_mask: Option<&GrayImageView<'_>>,
        cancel: &CancelToken,
    ) -> Result<PeakDetectionResult, PeakError> {
        self.run(img, roi, aux_mask, Some(cancel))
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, img, aux_mask, cancel),
            fields(width = img.width, height = img.height, roi_w = roi.width, roi_h = roi.height)
        )
    )]
    fn run(
        &self,
        img: &GrayImageView<'_>,
        roi: &Roi,
        aux_mask: Option<&GrayImageView<'_>>,
        cancel: Option<&CancelToken>,
    ) -> Result<PeakDetectionResult, PeakError> {
        self.check_inputs(img, roi, aux_mask)?;
        if roi.is_empty() {
            return Ok(PeakDetectionResult::empty(*roi));
        }

        let mut response = convolve_roi(img, roi, &self.kernel, self.params.dark_peaks)?;
        response.apply_threshold(self.params.threshold, self.params.threshold_policy);

        let mut mask = ValidityMask::build(roi, aux_mask)?;
        let extraction = extract_peaks(&response, &mut mask, &self.verify, &self.suppress, cancel)?;

        log::debug!(
            "roi {}x{} at ({}, {}): {} peaks from {} candidates ({} rejected)",
            roi.width,
            roi.height,
            roi.x,
            roi.y,
            extraction.peaks.len(),
            extraction.evaluated,
            extraction.rejected
        );

        Ok(PeakDetectionResult {
            roi: *roi,
            peaks: extraction.peaks,
            candidates_evaluated: extraction.evaluated,
            candidates_rejected: extraction.rejected,
        })
    }

    fn check_inputs(
        &self,
        img: &GrayImageView<'_>,
        roi: &Roi,
        aux_mask: Option<&GrayImageView<'_>>,
    ) -> Result<(), PeakError> {
        let expected = img.width * img.height;
        if img.data.len() != expected {
            return Err(peakfind_core::ImageError::BufferLength {
                expected,
                got: img.data.len(),
            }
            .into());
        }
        if let Some(mask) = aux_mask {
            if mask.dims() != img.dims() {
                return Err(PeakError::DimensionMismatch {
                    what: "auxiliary mask",
                    expected: img.dims(),
                    got: mask.dims(),
                });
            }
            if mask.data.len() != mask.width * mask.height {
                return Err(peakfind_core::ImageError::BufferLength {
                    expected: mask.width * mask.height,
                    got: mask.data.len(),
                }
                .into());
            }
        }
        if !roi.fits_within(img.width, img.height) {
            return Err(PeakError::RoiOutOfBounds {
                x: roi.x,
                y: roi.y,
                width: roi.width,
                height: roi.height,
                image_width: img.width,
                image_height: img.height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peakfind_core::GrayImage;

    #[test]
    fn invalid_width_fails_at_construction() {
        let err = PeakDetector::new(PeakParams {
            width: 1,
            ..PeakParams::default()
        })
        .unwrap_err();
        assert!(matches!(err, PeakError::InvalidParameter { name: "width", .. }));
    }

    #[test]
    fn zero_area_roi_is_empty_not_an_error() {
        let detector = PeakDetector::new(PeakParams::default()).unwrap();
        let img = GrayImage::new_filled(16, 16, 255);
        let res = detector
            .detect(&img.view(), &Roi::new(4, 4, 0, 8), None)
            .unwrap();
        assert!(res.is_empty());
        assert_eq!(res.roi, Roi::new(4, 4, 0, 8));
    }

    #[test]
    fn mask_of_wrong_size_is_rejected() {
        let detector = PeakDetector::new(PeakParams::default()).unwrap();
        let img = GrayImage::new_filled(16, 16, 0);
        let aux = GrayImage::new_filled(16, 15, 1);
        let err = detector
            .detect(&img.view(), &Roi::full(16, 16), Some(&aux.view()))
            .unwrap_err();
        assert_eq!(
            err,
            PeakError::DimensionMismatch {
                what: "auxiliary mask",
                expected: (16, 16),
                got: (16, 15),
            }
        );
    }

    #[test]
    fn inconsistent_view_is_rejected() {
        let detector = PeakDetector::new(PeakParams::default()).unwrap();
        let data = vec![0u8; 10];
        let view = GrayImageView {
            width: 4,
            height: 4,
            data: &data,
        };
        let err = detector.detect(&view, &Roi::full(4, 4), None).unwrap_err();
        assert!(matches!(err, PeakError::Image(_)));
    }

    #[test]
    fn absolute_peaks_add_roi_origin() {
        let res = PeakDetectionResult {
            roi: Roi::new(10, 20, 5, 5),
            peaks: vec![Peak { x: 1, y: 2 }],
            ..PeakDetectionResult::default()
        };
        assert_eq!(res.absolute_peaks(), vec![(11, 22)]);
    }
}
