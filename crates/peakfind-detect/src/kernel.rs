//! Zero-sum Laplacian-of-Gaussian matched filter.

use nalgebra::DMatrix;

use crate::error::PeakError;

/// Square matched-filter kernel, indexed as `(i, j)` with `i` along x.
///
/// Coefficients sum to zero, so a locally constant background produces no
/// response. The centre lobe is negative: bright blobs respond positively
/// once intensities are inverted (see [`crate::convolve_roi`]).
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    width: usize,
    sigma: f64,
    coeffs: DMatrix<f64>,
}

impl Kernel {
    /// Build the kernel for aperture `width`.
    ///
    /// `sigma = (width - 1) / 3`. Offsets run from `-bounds` to `bounds` in unit
    /// steps with `bounds = (width - 1) / 2`, which is fractional for even
    /// widths; the per-axis sample count is derived from that continuous range.
    pub fn laplacian_of_gaussian(width: usize) -> Result<Self, PeakError> {
        if width < 2 {
            return Err(PeakError::InvalidParameter {
                name: "width",
                reason: format!("kernel aperture must be at least 2 (got {width})"),
            });
        }

        let sigma = (width as f64 - 1.0) / 3.0;
        let variance = sigma * sigma;
        let bounds = (width as f64 - 1.0) / 2.0;
        let n = axis_sample_count(-bounds, bounds, 1.0);
        debug_assert_eq!(n, width);

        let mut h = Vec::with_capacity(n * n);
        let mut hg_sum = 0.0;
        let mut h_sum = 0.0;
        for a in 0..n {
            let n1 = -bounds + a as f64;
            for b in 0..n {
                let n2 = -bounds + b as f64;
                let r2 = n1 * n1 + n2 * n2;
                let hg = (-r2 / (2.0 * variance)).exp();
                hg_sum += hg;
                let v = (r2 - 2.0 * variance) * hg / (variance * variance);
                h_sum += v;
                h.push(v);
            }
        }

        let cells = (n * n) as f64;
        let dc = h_sum / cells;
        for v in h.iter_mut() {
            *v = (*v - dc) / hg_sum;
        }

        let k_sum: f64 = h.iter().sum();
        let offset = k_sum / cells;
        for v in h.iter_mut() {
            *v -= offset;
        }

        Ok(Self {
            width: n,
            sigma,
            coeffs: DMatrix::from_row_slice(n, n, &h),
        })
    }

    /// Side length in pixels.
    #[inline]
    pub fn size(&self) -> usize {
        self.width
    }

    /// Offset of the anchor pixel from the kernel's top-left corner.
    #[inline]
    pub fn half(&self) -> usize {
        (self.width - 1) / 2
    }

    /// Coefficient at column `i`, row `j`.
    #[inline]
    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.coeffs[(i, j)]
    }

    /// Gaussian scale, `(width - 1) / 3`.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Square of [`Kernel::sigma`].
    pub fn variance(&self) -> f64 {
        self.sigma * self.sigma
    }

    /// Sum of all coefficients; zero up to rounding.
    pub fn sum(&self) -> f64 {
        self.coeffs.sum()
    }

    /// Sum of absolute coefficients, the scale of the worst-case response.
    pub fn abs_sum(&self) -> f64 {
        self.coeffs.iter().map(|v| v.abs()).sum()
    }

    /// Underlying coefficient matrix.
    pub fn coefficients(&self) -> &DMatrix<f64> {
        &self.coeffs
    }
}

/// Number of values visited by `for (v = start; v <= stop; v += step)`.
fn axis_sample_count(start: f64, stop: f64, step: f64) -> usize {
    if stop < start {
        return 0;
    }
    ((stop - start) / step).floor() as usize + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_degenerate_widths() {
        for width in [0, 1] {
            assert!(matches!(
                Kernel::laplacian_of_gaussian(width),
                Err(PeakError::InvalidParameter { name: "width", .. })
            ));
        }
    }

    #[test]
    fn width_ten_has_sigma_three() {
        let k = Kernel::laplacian_of_gaussian(10).unwrap();
        assert_relative_eq!(k.sigma(), 3.0);
        assert_relative_eq!(k.variance(), 9.0);
        assert_eq!(k.size(), 10);
        assert_eq!(k.coefficients().shape(), (10, 10));
        assert_eq!(k.half(), 4);
    }

    #[test]
    fn sample_count_matches_width_for_odd_and_even() {
        for width in 2..=40usize {
            let bounds = (width as f64 - 1.0) / 2.0;
            assert_eq!(axis_sample_count(-bounds, bounds, 1.0), width);
        }
    }

    #[test]
    fn coefficients_sum_to_zero() {
        for width in 2..=25 {
            let k = Kernel::laplacian_of_gaussian(width).unwrap();
            let scale = k.abs_sum();
            assert!(
                k.sum().abs() <= 1e-9 * scale,
                "width {width}: sum {} vs scale {scale}",
                k.sum()
            );
        }
    }

    #[test]
    fn kernel_is_point_symmetric() {
        for width in 2..=25 {
            let k = Kernel::laplacian_of_gaussian(width).unwrap();
            let last = k.size() - 1;
            for i in 0..k.size() {
                for j in 0..k.size() {
                    assert_relative_eq!(
                        k.at(i, j),
                        k.at(last - i, last - j),
                        epsilon = 1e-12,
                        max_relative = 1e-12
                    );
                }
            }
        }
    }

    #[test]
    fn centre_lobe_is_negative() {
        let k = Kernel::laplacian_of_gaussian(11).unwrap();
        assert!(k.at(5, 5) < 0.0);
        assert!(k.at(0, 5) > k.at(5, 5));
    }
}
