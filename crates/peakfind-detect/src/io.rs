//! JSON configuration for peak detection runs.

use std::{fs, path::Path};

use peakfind_core::Roi;
use serde::{Deserialize, Serialize};

use crate::{PeakDetector, PeakError, PeakParams};

#[derive(thiserror::Error, Debug)]
pub enum PeakIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Stored detection setup: parameters plus an optional fixed ROI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeakDetectConfig {
    #[serde(default)]
    pub params: PeakParams,
    /// Rectangle to analyse; `None` means the whole image.
    #[serde(default)]
    pub roi: Option<Roi>,
}

impl PeakDetectConfig {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, PeakIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), PeakIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// ROI to use on a `width x height` image.
    pub fn roi_for(&self, width: usize, height: usize) -> Roi {
        self.roi.unwrap_or_else(|| Roi::full(width, height))
    }

    pub fn build_detector(&self) -> Result<PeakDetector, PeakError> {
        PeakDetector::new(self.params.clone())
    }
}
