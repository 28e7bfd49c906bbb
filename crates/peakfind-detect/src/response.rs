//! Matched-filter response over a region of interest.

use peakfind_core::{GrayImageView, ImageError, Roi};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::error::PeakError;
use crate::kernel::Kernel;
use crate::params::ThresholdPolicy;

/// Responses within this fraction of the largest possible magnitude
/// (`255 * kernel.abs_sum()`) are rounding residue and are stored as `0.0`.
pub const RESPONSE_NOISE_FLOOR: f64 = 1e-9;

/// Filter response, row-major, same extent as the processed rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseMap {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f64>,
}

impl ResponseMap {
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[y * self.width + x]
    }

    /// Value at signed coordinates, `None` outside the map.
    #[inline]
    pub fn get_signed(&self, x: isize, y: isize) -> Option<f64> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.get(x as usize, y as usize))
    }

    pub fn max_value(&self) -> Option<f64> {
        self.data.iter().copied().reduce(f64::max)
    }

    /// Clip every value in place according to `policy`.
    pub fn apply_threshold(&mut self, threshold: f64, policy: ThresholdPolicy) {
        for v in self.data.iter_mut() {
            *v = policy.apply(*v, threshold);
        }
    }
}

/// Convolve the `roi` part of `img` with `kernel`.
///
/// Bright peaks are detected on inverted intensities (`255 - v`), dark
/// peaks on raw intensities. The rectangle is treated as the whole buffer:
/// kernel taps that fall outside it are skipped entirely, so responses near
/// the rectangle edges carry a magnitude bias. This is accepted, not corrected.
///
/// A zero-sum kernel leaves floating-point residue on flat regions; values
/// below [`RESPONSE_NOISE_FLOOR`] of the kernel's full scale are snapped to
/// exactly zero so that flat input never produces candidates.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(img, kernel), fields(kernel = kernel.size()))
)]
pub fn convolve_roi(
    img: &GrayImageView<'_>,
    roi: &Roi,
    kernel: &Kernel,
    dark_peaks: bool,
) -> Result<ResponseMap, PeakError> {
    let expected = img.width * img.height;
    if img.data.len() != expected {
        return Err(ImageError::BufferLength {
            expected,
            got: img.data.len(),
        }
        .into());
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

    let (w, h) = (roi.width, roi.height);
    let mut out = ResponseMap::zeros(w, h);
    if roi.is_empty() {
        return Ok(out);
    }

    let k = kernel.size();
    let half = kernel.half() as isize;
    let noise = RESPONSE_NOISE_FLOOR * 255.0 * kernel.abs_sum();

    for x in 0..w {
        for y in 0..h {
            let mut acc = 0.0;
            for i in 0..k {
                let sx = x as isize + i as isize - half;
                if sx < 0 || sx as usize >= w {
                    continue;
                }
                for j in 0..k {
                    let sy = y as isize + j as isize - half;
                    if sy < 0 || sy as usize >= h {
                        continue;
                    }
                    let raw = img.data[(roi.y + sy as usize) * img.width + roi.x + sx as usize];
                    let value = if dark_peaks { raw } else { 255 - raw };
                    acc += value as f64 * kernel.at(i, j);
                }
            }
            out.data[y * w + x] = if acc.abs() <= noise { 0.0 } else { acc };
        }
    }

    Ok(out)
}
