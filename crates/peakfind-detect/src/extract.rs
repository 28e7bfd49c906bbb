//! Greedy, distance-constrained local-maximum extraction.
//!
//! Each iteration takes the strongest still-eligible pixel (ties resolved by
//! raster order, x outer and y inner), checks it against the verification
//! neighbourhood, and then clears the suppression neighbourhood from the
//! mask whether or not the candidate was accepted. A rejected candidate is
//! also cleared individually. The loop stops when no eligible pixel has a
//! response above zero.
//!
//! Because the response is fixed and the mask only shrinks, "strongest
//! eligible pixel" can be read off a single pre-sorted candidate list instead
//! of re-scanning the rectangle per iteration. The emitted order is the same.

use serde::{Deserialize, Serialize};

use crate::cancel::CancelToken;
use crate::error::PeakError;
use crate::mask::ValidityMask;
use crate::offsets::NeighborOffsets;
use crate::response::ResponseMap;

const BASELINE: f64 = 0.0;

/// Detected peak in rectangle-relative pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Peak {
    pub x: usize,
    pub y: usize,
}

impl Peak {
    pub fn distance(&self, other: &Peak) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        dx.hypot(dy)
    }
}

/// Output of one extraction run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Extraction {
    /// Accepted peaks, in acceptance order.
    pub peaks: Vec<Peak>,
    /// Candidates taken off the queue (accepted + rejected).
    pub evaluated: usize,
    pub rejected: usize,
}

/// Run the extraction loop, consuming `mask`.
pub fn extract_peaks(
    response: &ResponseMap,
    mask: &mut ValidityMask,
    verify: &NeighborOffsets,
    suppress: &NeighborOffsets,
    cancel: Option<&CancelToken>,
) -> Result<Extraction, PeakError> {
    if (mask.width(), mask.height()) != (response.width, response.height) {
        return Err(PeakError::DimensionMismatch {
            what: "validity mask",
            expected: (response.width, response.height),
            got: (mask.width(), mask.height()),
        });
    }

    let queue = candidate_queue(response, mask);
    let mut out = Extraction::default();

    for &(x, y) in &queue {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(PeakError::Cancelled {
                peaks_found: out.peaks.len(),
            });
        }
        if !mask.is_valid(x, y) {
            continue;
        }

        let value = response.get(x, y);
        let (xi, yi) = (x as isize, y as isize);
        out.evaluated += 1;

        let verified = verify.iter().all(|(di, dj)| {
            response
                .get_signed(xi + di, yi + dj)
                .is_none_or(|neighbour| neighbour <= value)
        });

        if verified {
            log::trace!("peak at ({x}, {y}) response {value:.4}");
            out.peaks.push(Peak { x, y });
        } else {
            out.rejected += 1;
            mask.invalidate(xi, yi);
        }

        for (di, dj) in suppress.iter() {
            mask.invalidate(xi + di, yi + dj);
        }
    }

    Ok(out)
}

/// Eligible pixels above the baseline, strongest first, raster order on ties.
fn candidate_queue(response: &ResponseMap, mask: &ValidityMask) -> Vec<(usize, usize)> {
    let h = response.height;
    let mut queue: Vec<(usize, usize)> = (0..response.width)
        .flat_map(|x| (0..h).map(move |y| (x, y)))
        .filter(|&(x, y)| mask.is_valid(x, y) && response.get(x, y) > BASELINE)
        .collect();

    queue.sort_unstable_by(|&(ax, ay), &(bx, by)| {
        response
            .get(bx, by)
            .total_cmp(&response.get(ax, ay))
            .then((ax * h + ay).cmp(&(bx * h + by)))
    });
    queue
}
