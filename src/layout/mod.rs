//! Recursive weighted bisection of records into rectangles.
//!
//! - [`Region`]: axis-aligned rectangle in page units
//! - [`partition`]: per-group weight totals and greedy two-bucket balancing
//! - [`Splitter`]: the recursion that turns a record table into draw ops

pub mod partition;
mod splitter;

pub use partition::{Buckets, GroupWeight, KeyOrder};
pub use splitter::Splitter;

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle `(x0, y0)`–`(x1, y1)`, with `x0 < x1` and `y0 < y1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// Direction in which a region is cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitAxis {
    /// Side by side, cut at an `x` coordinate.
    Vertical,
    /// Stacked, cut at a `y` coordinate.
    Horizontal,
}

impl Region {
    /// Create a region from its corners.
    #[must_use]
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Create a region from an origin and a size.
    #[must_use]
    pub fn from_origin(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Center point `(x, y)`.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (
            self.x0 + self.width() / 2.0,
            self.y0 + self.height() / 2.0,
        )
    }

    /// Taller than wide.
    #[must_use]
    pub fn is_portrait(&self) -> bool {
        self.height() / self.width() > 1.0
    }

    /// Both extents positive and finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0 && self.area().is_finite()
    }

    /// Axis along which [`Region::split`] cuts this region.
    #[must_use]
    pub fn split_axis(&self) -> SplitAxis {
        if self.is_portrait() {
            SplitAxis::Horizontal
        } else {
            SplitAxis::Vertical
        }
    }

    /// Cut into two regions, the first taking `share` (0..=1) of the split axis.
    ///
    /// The two halves share the cut coordinate exactly.
    #[must_use]
    pub fn split(&self, share: f64) -> (Self, Self) {
        match self.split_axis() {
            SplitAxis::Horizontal => {
                let y_mid = self.y0 + share * self.height();
                (
                    Self::new(self.x0, self.y0, self.x1, y_mid),
                    Self::new(self.x0, y_mid, self.x1, self.y1),
                )
            }
            SplitAxis::Vertical => {
                let x_mid = self.x0 + share * self.width();
                (
                    Self::new(self.x0, self.y0, x_mid, self.y1),
                    Self::new(x_mid, self.y0, self.x1, self.y1),
                )
            }
        }
    }
}
