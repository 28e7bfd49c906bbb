use serde::{Deserialize, Serialize};

use crate::error::PeakError;

/// How the response map is clipped against `threshold` before extraction.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPolicy {
    /// `r' = max(r, t) - t`: sub-threshold values become 0, the rest shift down by `t`.
    #[default]
    ClipSubtract,
    /// `r' = r` if `r >= t`, else 0.
    ClipZero,
}

impl ThresholdPolicy {
    #[inline]
    pub fn apply(self, value: f64, threshold: f64) -> f64 {
        match self {
            ThresholdPolicy::ClipSubtract => value.max(threshold) - threshold,
            ThresholdPolicy::ClipZero => {
                if value >= threshold {
                    value
                } else {
                    0.0
                }
            }
        }
    }
}

/// Parameters for one detection run.
///
/// Built once per run and never mutated by the detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakParams {
    /// Kernel aperture in pixels. Implies `sigma = (width - 1) / 3`.
    pub width: usize,
    /// Minimum separation between emitted peaks, in pixels.
    ///
    /// Values `<= 0` reduce suppression to the candidate pixel itself.
    pub min_dist: f64,
    /// Response threshold, in filter response units.
    pub threshold: f64,
    /// Detect locally dark blobs instead of bright ones.
    pub dark_peaks: bool,
    pub threshold_policy: ThresholdPolicy,
}

impl Default for PeakParams {
    fn default() -> Self {
        Self {
            width: 10,
            min_dist: 5.0,
            threshold: 0.0,
            dark_peaks: false,
            threshold_policy: ThresholdPolicy::ClipSubtract,
        }
    }
}

impl PeakParams {
    pub fn validate(&self) -> Result<(), PeakError> {
        if self.width < 2 {
            return Err(PeakError::InvalidParameter {
                name: "width",
                reason: format!("must be at least 2 (got {})", self.width),
            });
        }
        if !self.min_dist.is_finite() {
            return Err(PeakError::InvalidParameter {
                name: "min_dist",
                reason: format!("must be finite (got {})", self.min_dist),
            });
        }
        if !self.threshold.is_finite() {
            return Err(PeakError::InvalidParameter {
                name: "threshold",
                reason: format!("must be finite (got {})", self.threshold),
            });
        }
        Ok(())
    }

    pub fn sigma(&self) -> f64 {
        (self.width as f64 - 1.0) / 3.0
    }

    /// Radius of the local-maximum check, `floor(width / 3)`.
    pub fn verification_radius(&self) -> usize {
        self.width / 3
    }
}
