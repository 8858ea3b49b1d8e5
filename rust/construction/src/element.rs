// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The element tree of a materialized model.
//!
//! Groups are pure geometric containers (a transform plus children); leaves
//! carry a shape, a material and optionally the part information used by the
//! parts list. Traversal uses an explicit stack so deeply nested groups
//! cannot overflow the call stack, and is bounded by a maximum depth.

use std::sync::atomic::{AtomicU64, Ordering};

use framewright_model::{Bounds3, Isometry3, MaterialId, Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide unique element id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ElementId(u64);

impl ElementId {
    /// Allocates a fresh id.
    pub fn next() -> Self {
        ElementId(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "el-{}", self.0)
    }
}

/// Identity of "the same part" for the parts list, e.g. a canonical size
/// signature of a piece of dimensional stock.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(String);

impl PartId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PartId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for PartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Geometry of a leaf in its local frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Shape {
    /// Box from the local origin to `size`.
    Cuboid { size: Vector3<f64> },
    /// Planar outline extruded along +z.
    Extrusion {
        outline: Vec<Point2<f64>>,
        thickness: f64,
    },
}

impl Shape {
    pub fn local_bounds(&self) -> Bounds3 {
        match self {
            Shape::Cuboid { size } => Bounds3::from_origin_size(Point3::origin(), *size),
            Shape::Extrusion { outline, thickness } => {
                match framewright_model::geometry::bounding_rect(outline) {
                    Some((min, max)) => Bounds3::new(
                        Point3::new(min.x, min.y, 0.0),
                        Point3::new(max.x, max.y, *thickness),
                    ),
                    None => Bounds3::new(Point3::origin(), Point3::new(0.0, 0.0, *thickness)),
                }
            }
        }
    }
}

/// Parts list information attached to a leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartInfo {
    pub part_id: PartId,
    /// What the part is, e.g. `post`, `header`, `layer`.
    pub kind: String,
    pub size: Vector3<f64>,
}

impl PartInfo {
    pub fn volume(&self) -> f64 {
        self.size.x * self.size.y * self.size.z
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementLeaf {
    pub id: ElementId,
    pub shape: Shape,
    pub material: MaterialId,
    #[serde(default)]
    pub transform: Option<Isometry3<f64>>,
    #[serde(default)]
    pub part_info: Option<PartInfo>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementGroup {
    pub id: ElementId,
    pub transform: Isometry3<f64>,
    pub children: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "kebab-case")]
pub enum Element {
    Group(ElementGroup),
    Leaf(ElementLeaf),
}

impl Element {
    /// Creates a group with a fresh id.
    pub fn group(transform: Isometry3<f64>, children: Vec<Element>) -> Self {
        Element::Group(ElementGroup {
            id: ElementId::next(),
            transform,
            children,
        })
    }

    pub fn id(&self) -> ElementId {
        match self {
            Element::Group(g) => g.id,
            Element::Leaf(l) => l.id,
        }
    }

    pub fn as_leaf(&self) -> Option<&ElementLeaf> {
        match self {
            Element::Leaf(l) => Some(l),
            Element::Group(_) => None,
        }
    }
}

/// A leaf reached during traversal, with its accumulated world transform.
#[derive(Debug, Clone, Copy)]
pub struct LeafVisit<'a> {
    pub leaf: &'a ElementLeaf,
    pub world: Isometry3<f64>,
    pub depth: usize,
}

impl LeafVisit<'_> {
    /// World-space bounds of the leaf's shape.
    pub fn bounds(&self) -> Bounds3 {
        self.leaf.shape.local_bounds().transformed(&self.world)
    }
}

/// Depth-first, left-to-right traversal over the leaves of an element forest.
///
/// Groups deeper than `max_depth` are not descended into; the number of
/// skipped groups is available through [`Walk::truncated`].
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<(&'a Element, Isometry3<f64>, usize)>,
    max_depth: usize,
    truncated: usize,
}

impl<'a> Walk<'a> {
    pub fn new(roots: &'a [Element], max_depth: usize) -> Self {
        let stack = roots
            .iter()
            .rev()
            .map(|e| (e, Isometry3::identity(), 0))
            .collect();
        Self {
            stack,
            max_depth,
            truncated: 0,
        }
    }

    /// Number of groups skipped because they exceeded the depth bound.
    pub fn truncated(&self) -> usize {
        self.truncated
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = LeafVisit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((element, parent, depth)) = self.stack.pop() {
            match element {
                Element::Leaf(leaf) => {
                    let world = match &leaf.transform {
                        Some(t) => parent * t,
                        None => parent,
                    };
                    return Some(LeafVisit { leaf, world, depth });
                }
                Element::Group(group) => {
                    if depth >= self.max_depth {
                        self.truncated += 1;
                        tracing::warn!(
                            group = %group.id,
                            depth,
                            max_depth = self.max_depth,
                            "Element tree exceeds depth bound, skipping group"
                        );
                        continue;
                    }
                    let world = parent * group.transform;
                    for child in group.children.iter().rev() {
                        self.stack.push((child, world, depth + 1));
                    }
                }
            }
        }
        None
    }
}

/// World-space bounds of every leaf in the forest.
pub fn forest_bounds(roots: &[Element], max_depth: usize) -> Option<Bounds3> {
    Walk::new(roots, max_depth)
        .map(|visit| visit.bounds())
        .reduce(|a, b| a.union(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn leaf(size: Vector3<f64>) -> Element {
        Element::Leaf(ElementLeaf {
            id: ElementId::next(),
            shape: Shape::Cuboid { size },
            material: MaterialId::from("m"),
            transform: None,
            part_info: None,
            tags: Vec::new(),
        })
    }

    #[test]
    fn ids_are_unique() {
        let a = ElementId::next();
        let b = ElementId::next();
        assert_ne!(a, b);
        assert!(a.to_string().starts_with("el-"));
    }

    #[test]
    fn walk_is_depth_first_in_order() {
        let a = leaf(Vector3::new(1.0, 1.0, 1.0));
        let b = leaf(Vector3::new(2.0, 1.0, 1.0));
        let c = leaf(Vector3::new(3.0, 1.0, 1.0));
        let (ida, idb, idc) = (a.id(), b.id(), c.id());
        let roots = vec![
            Element::group(
                Isometry3::identity(),
                vec![a, Element::group(Isometry3::identity(), vec![b])],
            ),
            c,
        ];

        let order: Vec<ElementId> = Walk::new(&roots, 16).map(|v| v.leaf.id).collect();
        assert_eq!(order, vec![ida, idb, idc]);
    }

    #[test]
    fn transforms_accumulate() {
        let shift = |x: f64| Isometry3::translation(x, 0.0, 0.0);
        let roots = vec![Element::group(
            shift(100.0),
            vec![Element::group(shift(10.0), vec![leaf(Vector3::new(1.0, 1.0, 1.0))])],
        )];

        let bounds = forest_bounds(&roots, 16).unwrap();
        assert_relative_eq!(bounds.min.x, 110.0);
        assert_relative_eq!(bounds.max.x, 111.0);
    }

    #[test]
    fn depth_bound_stops_descent() {
        let mut node = leaf(Vector3::new(1.0, 1.0, 1.0));
        for _ in 0..10 {
            node = Element::group(Isometry3::identity(), vec![node]);
        }
        let roots = vec![node, leaf(Vector3::new(1.0, 1.0, 1.0))];

        let mut walk = Walk::new(&roots, 4);
        let visited = walk.by_ref().count();
        assert_eq!(visited, 1);
        assert_eq!(walk.truncated(), 1);

        assert_eq!(Walk::new(&roots, 64).count(), 2);
    }

    #[test]
    fn extrusion_bounds_cover_outline() {
        let shape = Shape::Extrusion {
            outline: vec![Point2::new(0.0, 0.0), Point2::new(5.0, 0.0), Point2::new(5.0, 3.0)],
            thickness: 2.0,
        };
        let b = shape.local_bounds();
        assert_eq!(b.max, Point3::new(5.0, 3.0, 2.0));
    }
}
