//! Per-pixel eligibility mask for peak extraction.

use peakfind_core::{GrayImageView, Roi};

use crate::error::PeakError;

/// Pixels this close to any rectangle edge are never eligible.
pub const BORDER_MARGIN: usize = 1;

/// Boolean grid over the processed rectangle, row-major.
///
/// Entries only ever go from `true` to `false`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidityMask {
    width: usize,
    height: usize,
    data: Vec<bool>,
}

impl ValidityMask {
    /// Build the initial mask for `roi`.
    ///
    /// `aux` is in image coordinates (0 = excluded). It is dilated once with
    /// a 3x3 element before sampling, so the included region grows by one
    /// pixel ring.
    pub fn build(roi: &Roi, aux: Option<&GrayImageView<'_>>) -> Result<Self, PeakError> {
        if let Some(aux) = aux {
            if !roi.fits_within(aux.width, aux.height) {
                return Err(PeakError::RoiOutOfBounds {
                    x: roi.x,
                    y: roi.y,
                    width: roi.width,
                    height: roi.height,
                    image_width: aux.width,
                    image_height: aux.height,
                });
            }
        }

        let (w, h) = (roi.width, roi.height);
        let mut data = vec![false; w * h];
        for j in 0..h {
            for i in 0..w {
                if within_border(i, j, w, h) {
                    continue;
                }
                let included = aux.is_none_or(|m| dilated_at(m, roi.x + i, roi.y + j));
                data[j * w + i] = included;
            }
        }

        Ok(Self {
            width: w,
            height: h,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn is_valid(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.data[y * self.width + x]
    }

    /// Mark `(x, y)` ineligible. Signed so callers can pass raw neighbour
    /// offsets; coordinates outside the mask are ignored.
    #[inline]
    pub fn invalidate(&mut self, x: isize, y: isize) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = false;
        }
    }

    pub fn count_valid(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }
}

#[inline]
fn within_border(i: usize, j: usize, w: usize, h: usize) -> bool {
    i < BORDER_MARGIN
        || j < BORDER_MARGIN
        || i + BORDER_MARGIN >= w
        || j + BORDER_MARGIN >= h
}

/// Value of the 3x3-dilated mask at image pixel `(x, y)`.
fn dilated_at(mask: &GrayImageView<'_>, x: usize, y: usize) -> bool {
    for dy in -1isize..=1 {
        for dx in -1isize..=1 {
            if mask
                .get_signed(x as isize + dx, y as isize + dy)
                .is_some_and(|v| v != 0)
            {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use peakfind_core::GrayImage;

    #[test]
    fn border_ring_is_excluded() {
        let mask = ValidityMask::build(&Roi::full(5, 4), None).unwrap();
        assert_eq!(mask.count_valid(), 3 * 2);
        assert!(!mask.is_valid(0, 1));
        assert!(!mask.is_valid(4, 1));
        assert!(!mask.is_valid(1, 3));
        assert!(mask.is_valid(1, 1));
        assert!(mask.is_valid(3, 2));
    }

    #[test]
    fn tiny_rectangles_have_no_valid_pixels() {
        for (w, h) in [(0, 0), (1, 5), (2, 2), (5, 2)] {
            let mask = ValidityMask::build(&Roi::full(w, h), None).unwrap();
            assert_eq!(mask.count_valid(), 0, "{w}x{h}");
        }
    }

    #[test]
    fn aux_mask_is_dilated_by_one_ring() {
        // Included region is the column x >= 10.
        let aux = GrayImage::from_fn(20, 12, |x, _| if x >= 10 { 255 } else { 0 });
        let mask = ValidityMask::build(&Roi::full(20, 12), Some(&aux.view())).unwrap();
        assert!(!mask.is_valid(8, 5));
        assert!(mask.is_valid(9, 5));
        assert!(mask.is_valid(10, 5));
        assert!(!mask.is_valid(19, 5));
    }

    #[test]
    fn aux_mask_is_sampled_in_image_coordinates() {
        let mut aux = GrayImage::new_filled(30, 30, 0);
        aux.set(15, 15, 1);
        let roi = Roi::new(10, 10, 10, 10);
        let mask = ValidityMask::build(&roi, Some(&aux.view())).unwrap();
        assert_eq!(mask.count_valid(), 9);
        for j in 4..=6 {
            for i in 4..=6 {
                assert!(mask.is_valid(i, j));
            }
        }
    }

    #[test]
    fn invalidate_ignores_out_of_range() {
        let mut mask = ValidityMask::build(&Roi::full(4, 4), None).unwrap();
        mask.invalidate(-1, 2);
        mask.invalidate(2, 7);
        assert_eq!(mask.count_valid(), 4);
        mask.invalidate(1, 1);
        mask.invalidate(1, 1);
        assert_eq!(mask.count_valid(), 3);
    }

    #[test]
    fn roi_larger_than_aux_is_rejected() {
        let aux = GrayImage::new_filled(8, 8, 1);
        let err = ValidityMask::build(&Roi::full(9, 8), Some(&aux.view())).unwrap_err();
        assert!(matches!(err, PeakError::RoiOutOfBounds { .. }));
    }
}
