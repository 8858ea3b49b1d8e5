// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared pieces of the materialization contract: leaf construction,
//! canonical part ids, member layout and result collection.

use framewright_model::{
    geometry::{bounding_rect, signed_area},
    Bounds3, EntityRef, Isometry3, Layer, MaterialCatalog, MaterialId, Point2, Point3, Vector3,
};

use crate::element::{ElementId, ElementLeaf, PartId, PartInfo, Shape};
use crate::error::{BuildError, Result};
use crate::issue::{ConstructionResult, Issue};

/// Geometric tolerance in millimetres.
pub(crate) const EPSILON: f64 = 1e-6;

/// Canonical part identity: material plus the three dimensions rounded to
/// whole millimetres, largest first. Two pieces with the same signature are
/// interchangeable regardless of orientation.
pub fn part_id(material: &MaterialId, size: &Vector3<f64>) -> PartId {
    let mut dims = [size.x, size.y, size.z].map(|d| d.round() as i64);
    dims.sort_unstable_by(|a, b| b.cmp(a));
    PartId::new(format!("{}:{}x{}x{}", material, dims[0], dims[1], dims[2]))
}

pub(crate) fn part_info(material: &MaterialId, kind: &str, size: Vector3<f64>) -> PartInfo {
    PartInfo {
        part_id: part_id(material, &size),
        kind: kind.to_string(),
        size,
    }
}

/// Cuboid leaf with its minimum corner at `origin`, counted in the parts
/// list as one `kind` piece of the given size.
pub(crate) fn part_leaf(
    material: &MaterialId,
    kind: &str,
    origin: Vector3<f64>,
    size: Vector3<f64>,
) -> ElementLeaf {
    ElementLeaf {
        id: ElementId::next(),
        shape: Shape::Cuboid { size },
        material: material.clone(),
        transform: translation(origin),
        part_info: Some(part_info(material, kind, size)),
        tags: vec![kind.to_string()],
    }
}

/// Extruded outline starting at height `z`. The part is the rectangular
/// stock the outline is cut from.
pub(crate) fn extrusion_leaf(
    material: &MaterialId,
    kind: &str,
    outline: &[Point2<f64>],
    z: f64,
    thickness: f64,
) -> ElementLeaf {
    let stock = bounding_rect(outline)
        .map(|(min, max)| Vector3::new(max.x - min.x, max.y - min.y, thickness))
        .unwrap_or_else(|| Vector3::new(0.0, 0.0, thickness));
    ElementLeaf {
        id: ElementId::next(),
        shape: Shape::Extrusion {
            outline: outline.to_vec(),
            thickness,
        },
        material: material.clone(),
        transform: translation(Vector3::new(0.0, 0.0, z)),
        part_info: Some(part_info(material, kind, stock)),
        tags: vec![kind.to_string()],
    }
}

fn translation(offset: Vector3<f64>) -> Option<Isometry3<f64>> {
    if offset.norm_squared() == 0.0 {
        None
    } else {
        Some(Isometry3::translation(offset.x, offset.y, offset.z))
    }
}

/// Local bounds of a box.
pub(crate) fn box_bounds(origin: Vector3<f64>, size: Vector3<f64>) -> Bounds3 {
    Bounds3::from_origin_size(Point3::from(origin), size)
}

/// Start offsets of members of `width` laid out over `length`: one at the
/// start, then every `spacing`, and one flush with the end. Empty when not
/// even one member fits.
pub(crate) fn member_positions(length: f64, width: f64, spacing: f64) -> Vec<f64> {
    if length + EPSILON < width {
        return Vec::new();
    }
    let last = (length - width).max(0.0);
    let step = spacing.max(width);
    if step <= EPSILON {
        return vec![0.0];
    }
    let mut positions = Vec::new();
    let mut x = 0.0;
    while x < last - EPSILON {
        positions.push(x);
        x += step;
    }
    positions.push(last);
    positions
}

/// Builds one extrusion leaf per layer, stacked upwards from `z`. Returns
/// the leaves and the height reached.
pub(crate) fn layer_stack(
    layers: &[Layer],
    outline: &[Point2<f64>],
    mut z: f64,
) -> (Vec<ElementLeaf>, f64) {
    let mut leaves = Vec::with_capacity(layers.len());
    for layer in layers {
        leaves.push(extrusion_leaf(&layer.material, "layer", outline, z, layer.thickness));
        z += layer.thickness;
    }
    (leaves, z)
}

/// Rejects outlines with fewer than three points or no enclosed area.
pub(crate) fn validate_outline(entity: EntityRef, outline: &[Point2<f64>]) -> Result<()> {
    if outline.len() < 3 {
        return Err(BuildError::degenerate(
            entity,
            format!("outline needs at least 3 points, got {}", outline.len()),
        ));
    }
    if signed_area(outline).abs() <= EPSILON {
        return Err(BuildError::degenerate(entity, "outline encloses no area"));
    }
    Ok(())
}

pub(crate) fn require_positive(entity: EntityRef, what: &str, values: &[f64]) -> Result<()> {
    if values.iter().all(|v| v.is_finite() && *v > EPSILON) {
        Ok(())
    } else {
        Err(BuildError::degenerate(entity, format!("{} must be positive", what)))
    }
}

/// Per-element results collected while building one entity.
#[derive(Debug, Default)]
pub(crate) struct ResultCollector {
    results: Vec<ConstructionResult>,
}

impl ResultCollector {
    pub fn push(&mut self, issue: Issue) {
        self.results.push(ConstructionResult::from(issue));
    }

    /// Warns once per material id that is missing from the catalog; repeated
    /// uses merge into the same issue.
    pub fn check_material(
        &mut self,
        materials: &dyn MaterialCatalog,
        leaf: &ElementLeaf,
        bounds: Option<Bounds3>,
    ) {
        if materials.material(&leaf.material).is_some() {
            return;
        }
        let mut issue = Issue::warning(format!("Material '{}' is not in the catalog", leaf.material))
            .with_group_key(format!("unknown-material:{}", leaf.material))
            .with_elements([leaf.id]);
        issue.bounds = bounds;
        self.push(issue);
    }

    pub fn into_results(self) -> Vec<ConstructionResult> {
        self.results
    }
}
