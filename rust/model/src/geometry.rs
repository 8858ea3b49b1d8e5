// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometric primitives shared by the model and the construction pipeline.
//!
//! All lengths are millimetres. Plan coordinates (`Point2`) live in the
//! storey plane; 3D coordinates add elevation along +z.

use serde::{Deserialize, Serialize};

// Re-export nalgebra types for convenience
pub use nalgebra::{Isometry3, Point2, Point3, Translation3, UnitQuaternion, Vector2, Vector3};

/// Axis-aligned 3D bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds3 {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Bounds3 {
    /// Creates bounds from two corners, normalising the order per axis.
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Bounds of a box with the given size whose minimum corner is at `origin`.
    pub fn from_origin_size(origin: Point3<f64>, size: Vector3<f64>) -> Self {
        Self::new(origin, origin + size)
    }

    /// Smallest bounds containing every point, or `None` for no points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bounds = Self {
            min: first,
            max: first,
        };
        for p in iter {
            bounds.include(p);
        }
        Some(bounds)
    }

    /// Grows the bounds to contain `p`.
    pub fn include(&mut self, p: &Point3<f64>) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Axis-aligned union: elementwise min of the minima, elementwise max of
    /// the maxima.
    pub fn union(&self, other: &Bounds3) -> Bounds3 {
        Bounds3 {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Union of two optional bounds. A missing side yields the other side.
    pub fn merge(a: Option<Bounds3>, b: Option<Bounds3>) -> Option<Bounds3> {
        match (a, b) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, None) => a,
            (None, b) => b,
        }
    }

    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// The eight corner points.
    pub fn corners(&self) -> [Point3<f64>; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point3::new(a.x, a.y, a.z),
            Point3::new(b.x, a.y, a.z),
            Point3::new(a.x, b.y, a.z),
            Point3::new(b.x, b.y, a.z),
            Point3::new(a.x, a.y, b.z),
            Point3::new(b.x, a.y, b.z),
            Point3::new(a.x, b.y, b.z),
            Point3::new(b.x, b.y, b.z),
        ]
    }

    /// Axis-aligned bounds of this box after applying `transform`.
    pub fn transformed(&self, transform: &Isometry3<f64>) -> Bounds3 {
        let corners = self.corners().map(|c| transform * c);
        // Eight corners, never empty.
        let mut bounds = Bounds3 {
            min: corners[0],
            max: corners[0],
        };
        for c in &corners[1..] {
            bounds.include(c);
        }
        bounds
    }
}

/// Signed area of a closed polygon (shoelace formula). Positive for
/// counter-clockwise winding.
pub fn signed_area(outline: &[Point2<f64>]) -> f64 {
    let n = outline.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = outline[i];
        let b = outline[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}

/// Axis-aligned bounding rectangle of a polygon as `(min, max)`.
pub fn bounding_rect(outline: &[Point2<f64>]) -> Option<(Point2<f64>, Point2<f64>)> {
    let first = *outline.first()?;
    let (mut min, mut max) = (first, first);
    for p in &outline[1..] {
        min = min.inf(p);
        max = max.sup(p);
    }
    Some((min, max))
}

/// `true` if `a` and `b` point the same way within `tolerance`, measured as
/// the sine of the angle between them.
pub fn same_direction(a: &Vector2<f64>, b: &Vector2<f64>, tolerance: f64) -> bool {
    let (la, lb) = (a.norm(), b.norm());
    if la < 1e-12 || lb < 1e-12 {
        return false;
    }
    let cross = a.x * b.y - a.y * b.x;
    (cross / (la * lb)).abs() <= tolerance && a.dot(b) > 0.0
}

/// Placement of a straight segment in the plane: origin at `start`, local
/// +x along the segment, +z up.
pub fn segment_placement(start: &Point2<f64>, end: &Point2<f64>, elevation: f64) -> Isometry3<f64> {
    let dir = end - start;
    let angle = dir.y.atan2(dir.x);
    Isometry3::from_parts(
        Translation3::new(start.x, start.y, elevation),
        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angle),
    )
}
