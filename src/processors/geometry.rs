//! Geometric primitives for layout reconciliation.
//!
//! Every provider (layout model, native text extraction, OCR) reports its
//! observations as axis-aligned rectangles. This module provides the
//! [`BoundingBox`] type and the containment/overlap predicates the merger and
//! the reading-order reconstructor are built on.

use crate::core::LayoutError;
use serde::{Deserialize, Serialize};

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X-coordinate of the point.
    pub x: f32,
    /// Y-coordinate of the point.
    pub y: f32,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Size of the coordinate system a box was measured in.
///
/// Providers do not share a coordinate system: native text extraction reports
/// PDF points while the layout model and OCR report pixels of the rendered
/// page image. Boxes are converted between spaces with [`BoundingBox::convert`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateSpace {
    /// Width of the space.
    pub width: f32,
    /// Height of the space.
    pub height: f32,
}

impl CoordinateSpace {
    /// Creates a coordinate space of the given size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns true if both dimensions are finite and positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// An axis-aligned bounding box `(x1, y1, x2, y2)` in page space.
///
/// The invariant `x1 <= x2 && y1 <= y2` is checked by [`BoundingBox::try_new`].
/// [`BoundingBox::from_coords`] does not check it, so geometry reported by a
/// misbehaving provider can still be carried through the pipeline and rejected
/// later by [`BoundingBox::is_valid`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub x1: f32,
    /// Top edge.
    pub y1: f32,
    /// Right edge.
    pub x2: f32,
    /// Bottom edge.
    pub y2: f32,
}

impl BoundingBox {
    /// Creates a bounding box from coordinates without validating them.
    pub fn from_coords(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Creates a bounding box, rejecting inverted, negative or non-finite coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidGeometry`] when the box violates the invariant.
    pub fn try_new(x1: f32, y1: f32, x2: f32, y2: f32) -> Result<Self, LayoutError> {
        let bbox = Self::from_coords(x1, y1, x2, y2);
        if !bbox.is_well_formed() {
            return Err(LayoutError::invalid_geometry(format!(
                "box ({x1}, {y1}, {x2}, {y2}) must be finite, non-negative and ordered"
            )));
        }
        Ok(bbox)
    }

    /// Creates the smallest box enclosing every box in the iterator.
    ///
    /// Returns `None` for an empty iterator.
    pub fn enclosing<'a>(boxes: impl IntoIterator<Item = &'a BoundingBox>) -> Option<Self> {
        boxes.into_iter().fold(None, |acc, b| {
            Some(match acc {
                None => *b,
                Some(a) => a.union(b),
            })
        })
    }

    /// Gets the minimum x-coordinate.
    #[inline]
    pub fn x_min(&self) -> f32 {
        self.x1
    }

    /// Gets the minimum y-coordinate.
    #[inline]
    pub fn y_min(&self) -> f32 {
        self.y1
    }

    /// Gets the maximum x-coordinate.
    #[inline]
    pub fn x_max(&self) -> f32 {
        self.x2
    }

    /// Gets the maximum y-coordinate.
    #[inline]
    pub fn y_max(&self) -> f32 {
        self.y2
    }

    /// Width of the box, never negative.
    #[inline]
    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    /// Height of the box, never negative.
    #[inline]
    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    /// Area of the box.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Centre point of the box.
    pub fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Returns true when the coordinates are finite, non-negative and ordered.
    ///
    /// Zero-width or zero-height boxes are well formed.
    pub fn is_well_formed(&self) -> bool {
        let coords = [self.x1, self.y1, self.x2, self.y2];
        coords.iter().all(|c| c.is_finite() && *c >= 0.0) && self.x1 <= self.x2 && self.y1 <= self.y2
    }

    /// Returns true for a well-formed box with a positive area.
    ///
    /// Only valid boxes take part in XY-cut reading-order reconstruction.
    pub fn is_valid(&self) -> bool {
        self.is_well_formed() && self.x1 < self.x2 && self.y1 < self.y2
    }

    /// Area of the intersection with another box.
    pub fn intersection_area(&self, other: &BoundingBox) -> f32 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        (x2 - x1).max(0.0) * (y2 - y1).max(0.0)
    }

    /// Fraction of this box covered by `other`: `area(self ∩ other) / area(self)`.
    ///
    /// Returns 0.0 when this box has no area.
    pub fn overlap_ratio(&self, other: &BoundingBox) -> f32 {
        let area = self.area();
        if area > 0.0 {
            self.intersection_area(other) / area
        } else {
            0.0
        }
    }

    /// Returns true if this box is an almost-subregion of `other` at `threshold`.
    ///
    /// The test is `area(self ∩ other) / area(self) >= threshold`. Lowering the
    /// threshold never turns a `true` into a `false`.
    pub fn is_almost_subregion_of(&self, other: &BoundingBox, threshold: f32) -> bool {
        self.area() > 0.0 && self.overlap_ratio(other) >= threshold
    }

    /// Largest distance between corresponding corners of the two boxes.
    ///
    /// Both the top-left and the bottom-right corners are compared; the
    /// result is the larger of the two Euclidean distances.
    pub fn corner_distance(&self, other: &BoundingBox) -> f32 {
        let top_left = Point::new(self.x1, self.y1).distance(&Point::new(other.x1, other.y1));
        let bottom_right = Point::new(self.x2, self.y2).distance(&Point::new(other.x2, other.y2));
        top_left.max(bottom_right)
    }

    /// Smallest box enclosing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::from_coords(
            self.x1.min(other.x1),
            self.y1.min(other.y1),
            self.x2.max(other.x2),
            self.y2.max(other.y2),
        )
    }

    /// Returns a copy scaled toward its own centroid by `factor`.
    ///
    /// A factor of 1.0 returns the box unchanged; 0.9 keeps 90% of the width
    /// and height around the same centre.
    pub fn shrink(&self, factor: f32) -> BoundingBox {
        let c = self.center();
        let half_w = (self.x2 - self.x1) * factor / 2.0;
        let half_h = (self.y2 - self.y1) * factor / 2.0;
        BoundingBox::from_coords(c.x - half_w, c.y - half_h, c.x + half_w, c.y + half_h)
    }

    /// Returns a copy grown by `padding` on every side, clamped to `[0, width] x [0, height]`.
    pub fn pad_within(&self, padding: f32, width: f32, height: f32) -> BoundingBox {
        BoundingBox::from_coords(
            (self.x1 - padding).max(0.0),
            (self.y1 - padding).max(0.0),
            (self.x2 + padding).min(width),
            (self.y2 + padding).min(height),
        )
    }

    /// Rescales the box from one coordinate space into another.
    pub fn convert(&self, from: &CoordinateSpace, to: &CoordinateSpace) -> BoundingBox {
        let sx = to.width / from.width;
        let sy = to.height / from.height;
        BoundingBox::from_coords(self.x1 * sx, self.y1 * sy, self.x2 * sx, self.y2 * sy)
    }
}
