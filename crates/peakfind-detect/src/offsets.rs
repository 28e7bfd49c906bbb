/// Precomputed integer neighbourhood inside a circular radius.
///
/// Built once per detector and reused for every candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeighborOffsets {
    offsets: Vec<(isize, isize)>,
}

impl NeighborOffsets {
    /// Offsets used to confirm a local maximum.
    ///
    /// Only `(i, j)` with `i != 0`, `j != 0` and `i^2 + j^2 <= eps^2`: offsets
    /// on either axis are left out, so direct horizontal and vertical
    /// neighbours never veto a candidate.
    pub fn verification(eps: usize) -> Self {
        let r = eps as isize;
        let r2 = r * r;
        let mut offsets = Vec::new();
        for i in -r..=r {
            for j in -r..=r {
                if i != 0 && j != 0 && i * i + j * j <= r2 {
                    offsets.push((i, j));
                }
            }
        }
        Self { offsets }
    }

    /// Offsets cleared from the mask after each candidate, origin included.
    ///
    /// A non-positive `min_dist` leaves just the origin.
    pub fn suppression(min_dist: f64) -> Self {
        let radius = min_dist.max(0.0);
        let r = radius.floor() as isize;
        let r2 = radius * radius;
        let mut offsets = Vec::new();
        for i in -r..=r {
            for j in -r..=r {
                if ((i * i + j * j) as f64) <= r2 {
                    offsets.push((i, j));
                }
            }
        }
        Self { offsets }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (isize, isize)> + '_ {
        self.offsets.iter().copied()
    }

    pub fn as_slice(&self) -> &[(isize, isize)] {
        &self.offsets
    }
}
