//! Coordinate and size types shared by the canvas, the UI viewport, and figures.
//!
//! Data space uses [`RealCoords`]; panel (screen) space uses [`IntCoords`].
//! [`Extent`] is a pixel size and [`RealRect`] an axis-aligned data-space box.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// A point in panel space, in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct IntCoords {
    pub x: i32,
    pub y: i32,
}

impl IntCoords {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Both axes negated, saturating at `i32::MAX`.
    #[must_use]
    pub fn negated(self) -> Self {
        Self { x: self.x.saturating_neg(), y: self.y.saturating_neg() }
    }
}

/// A point in data space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RealCoords {
    pub x: f64,
    pub y: f64,
}

impl RealCoords {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Extent {
    pub width: i32,
    pub height: i32,
}

impl Extent {
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero or negative.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether `self` fits inside `bounds` on both axes.
    #[must_use]
    pub fn fits_within(self, bounds: Extent) -> bool {
        self.width <= bounds.width && self.height <= bounds.height
    }
}

/// An axis-aligned rectangle in data space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RealRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RealRect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle spanning two corners given in any order.
    #[must_use]
    pub fn from_corners(a: RealCoords, b: RealCoords) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self { x, y, width: (a.x - b.x).abs(), height: (a.y - b.y).abs() }
    }

    /// Top-left corner.
    #[must_use]
    pub fn origin(&self) -> RealCoords {
        RealCoords::new(self.x, self.y)
    }

    /// Bottom-right corner.
    #[must_use]
    pub fn far_corner(&self) -> RealCoords {
        RealCoords::new(self.x + self.width, self.y + self.height)
    }

    #[must_use]
    pub fn center(&self) -> RealCoords {
        RealCoords::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Smallest rectangle covering both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &RealRect) -> RealRect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        RealRect { x, y, width: right - x, height: bottom - y }
    }

    /// Half-open containment test: the far edges are excluded.
    #[must_use]
    pub fn contains(&self, p: RealCoords) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.x + self.width && p.y < self.y + self.height
    }
}
