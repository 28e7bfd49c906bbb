use serde::{Deserialize, Serialize};

/// Axis-aligned region of interest in image pixel coordinates.
///
/// Detection runs on the rectangle only; everything produced by the
/// detector is expressed relative to `(x, y)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Roi {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Roi {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole image.
    pub fn full(width: usize, height: usize) -> Self {
        Self::new(0, 0, width, height)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Whether rectangle-relative `(i, j)` lies inside the rectangle.
    #[inline]
    pub fn contains_rel(&self, i: isize, j: isize) -> bool {
        i >= 0 && j >= 0 && (i as usize) < self.width && (j as usize) < self.height
    }

    /// Whether the rectangle fits inside a `width x height` image.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.x
            .checked_add(self.width)
            .is_some_and(|right| right <= width)
            && self
                .y
                .checked_add(self.height)
                .is_some_and(|bottom| bottom <= height)
    }

    /// Translate rectangle-relative coordinates to image coordinates.
    #[inline]
    pub fn to_image(&self, i: usize, j: usize) -> (usize, usize) {
        (self.x + i, self.y + j)
    }
}
