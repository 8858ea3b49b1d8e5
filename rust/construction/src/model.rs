// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Materialized models: the concrete element tree plus diagnostics produced
//! for one entity.
//!
//! Models are value objects. Once built they are never patched; a cache
//! replaces them wholesale and consumers may keep them after the cache is
//! cleared.

use framewright_model::{Bounds3, Isometry3, Point3};
use serde::{Deserialize, Serialize};

use crate::element::{forest_bounds, Element, Walk};
use crate::error::BuildError;
use crate::issue::{ConstructionResult, Issue};
use crate::results::aggregate_results;

/// A dimension line shown alongside the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub label: String,
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl Measurement {
    pub fn new(label: impl Into<String>, start: Point3<f64>, end: Point3<f64>) -> Self {
        Self {
            label: label.into(),
            start,
            end,
        }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    pub fn transformed(&self, transform: &Isometry3<f64>) -> Self {
        Self {
            label: self.label.clone(),
            start: transform * self.start,
            end: transform * self.end,
        }
    }
}

/// A planar region highlighted in the viewer, e.g. a roof or floor outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightedArea {
    pub label: String,
    pub outline: Vec<Point3<f64>>,
}

impl HighlightedArea {
    pub fn transformed(&self, transform: &Isometry3<f64>) -> Self {
        Self {
            label: self.label.clone(),
            outline: self.outline.iter().map(|p| transform * p).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterializedModel {
    pub elements: Vec<Element>,
    pub measurements: Vec<Measurement>,
    pub areas: Vec<HighlightedArea>,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

impl MaterializedModel {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a model, folding the raw results into deduplicated issues.
    pub fn new(
        elements: Vec<Element>,
        measurements: Vec<Measurement>,
        areas: Vec<HighlightedArea>,
        results: impl IntoIterator<Item = ConstructionResult>,
    ) -> Self {
        let issues = aggregate_results(results);
        Self {
            elements,
            measurements,
            areas,
            errors: issues.errors,
            warnings: issues.warnings,
        }
    }

    /// The sentinel returned when a builder fails: no elements and a single
    /// error identified by the failure's stable code.
    pub fn unsupported(error: &BuildError) -> Self {
        Self {
            errors: vec![Issue::error(error.to_string()).with_id(error.code())],
            ..Self::default()
        }
    }

    /// `true` for models produced by [`MaterializedModel::unsupported`].
    pub fn is_unsupported(&self) -> bool {
        self.elements.is_empty()
            && self.warnings.is_empty()
            && matches!(self.errors.as_slice(), [issue] if issue.id.as_ref().is_some_and(|id| {
                matches!(id.as_str(), "invalid-assembly" | "entity-not-found" | "degenerate-geometry")
            }))
    }

    /// Combines child models into one. Each non-empty child becomes a group
    /// placed with its transform; measurements, areas and issue bounds are
    /// moved into the parent frame and all issues are re-aggregated, so
    /// issues sharing an identity across children merge.
    pub fn compose<'a>(children: impl IntoIterator<Item = (&'a MaterializedModel, Isometry3<f64>)>) -> Self {
        let mut elements = Vec::new();
        let mut measurements = Vec::new();
        let mut areas = Vec::new();
        let mut results = Vec::new();

        for (child, transform) in children {
            if !child.elements.is_empty() {
                elements.push(Element::group(transform, child.elements.clone()));
            }
            measurements.extend(child.measurements.iter().map(|m| m.transformed(&transform)));
            areas.extend(child.areas.iter().map(|a| a.transformed(&transform)));

            let moved = |issue: &Issue| {
                let mut issue = issue.clone();
                issue.bounds = issue.bounds.map(|b| b.transformed(&transform));
                issue
            };
            results.extend(child.errors.iter().map(moved).map(ConstructionResult::Error));
            results.extend(child.warnings.iter().map(moved).map(ConstructionResult::Warning));
        }

        Self::new(elements, measurements, areas, results)
    }

    /// Depth-first traversal over the model's leaves.
    pub fn leaves(&self, max_depth: usize) -> Walk<'_> {
        Walk::new(&self.elements, max_depth)
    }

    pub fn bounds(&self, max_depth: usize) -> Option<Bounds3> {
        forest_bounds(&self.elements, max_depth)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementId, ElementLeaf, Shape};
    use framewright_model::{EntityRef, MaterialId, Vector3, BuildingId};

    fn leaf_model(group_key: &str) -> MaterializedModel {
        let id = ElementId::next();
        let leaf = Element::Leaf(ElementLeaf {
            id,
            shape: Shape::Cuboid {
                size: Vector3::new(1.0, 1.0, 1.0),
            },
            material: MaterialId::from("m"),
            transform: None,
            part_info: None,
            tags: Vec::new(),
        });
        MaterializedModel::new(
            vec![leaf],
            vec![Measurement::new("len", Point3::origin(), Point3::new(1.0, 0.0, 0.0))],
            Vec::new(),
            [ConstructionResult::Warning(
                Issue::warning("shared").with_group_key(group_key).with_elements([id]),
            )],
        )
    }

    #[test]
    fn unsupported_sentinel_carries_code() {
        let model = MaterializedModel::unsupported(&BuildError::EntityNotFound(EntityRef::Building(
            BuildingId,
        )));
        assert!(model.is_unsupported());
        assert_eq!(model.errors[0].id.as_ref().unwrap().as_str(), "entity-not-found");
        assert!(!MaterializedModel::empty().is_unsupported());
    }

    #[test]
    fn compose_merges_shared_issues_and_moves_measurements() {
        let a = leaf_model("k");
        let b = leaf_model("k");
        let composed = MaterializedModel::compose([
            (&a, Isometry3::identity()),
            (&b, Isometry3::translation(0.0, 0.0, 100.0)),
        ]);

        assert_eq!(composed.elements.len(), 2);
        assert_eq!(composed.warnings.len(), 1);
        assert_eq!(composed.warnings[0].elements.len(), 2);
        assert_eq!(composed.measurements[1].start.z, 100.0);
        assert_eq!(composed.leaves(8).count(), 2);
    }

    #[test]
    fn compose_skips_empty_children() {
        let empty = MaterializedModel::empty();
        let composed = MaterializedModel::compose([(&empty, Isometry3::identity())]);
        assert!(composed.elements.is_empty());
        assert!(composed.bounds(8).is_none());
    }
}
