// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor areas and the per-storey floor construction.

use framewright_model::{
    geometry::bounding_rect, EntityRef, FloorAssembly, FloorId, Point2, Point3, StoreyFloorId,
    Vector3,
};

use super::common::{
    layer_stack, member_positions, part_leaf, require_positive, validate_outline, ResultCollector,
};
use crate::element::{Element, ElementLeaf};
use crate::error::{BuildError, Result};
use crate::issue::Issue;
use crate::model::{HighlightedArea, MaterializedModel};
use crate::source::BuildContext;

pub fn build_floor(ctx: &BuildContext<'_>, id: FloorId) -> Result<MaterializedModel> {
    let entity = EntityRef::Floor(id);
    let floor = ctx.model.floor(id).ok_or(BuildError::EntityNotFound(entity))?;
    let assembly = ctx
        .assemblies
        .floor_assembly(&floor.assembly)
        .ok_or_else(|| BuildError::InvalidAssembly {
            entity,
            assembly: floor.assembly.clone(),
        })?;

    let mut results = ResultCollector::default();
    let leaves = slab(ctx, entity, assembly, &floor.outline, 0.0, &mut results)?;

    Ok(MaterializedModel::new(
        leaves.into_iter().map(Element::Leaf).collect(),
        Vec::new(),
        vec![area("floor", &floor.outline, 0.0)],
        results.into_results(),
    ))
}

/// The storey's floor assembly under every perimeter of the storey, hung
/// below the storey base so its top is flush with z = 0.
pub fn build_storey_floor(ctx: &BuildContext<'_>, id: StoreyFloorId) -> Result<MaterializedModel> {
    let entity = EntityRef::StoreyFloor(id);
    let storey = ctx
        .model
        .storey(id.0)
        .ok_or(BuildError::EntityNotFound(entity))?;
    let Some(assembly_id) = &storey.floor_assembly else {
        return Ok(MaterializedModel::empty());
    };
    let assembly = ctx
        .assemblies
        .floor_assembly(assembly_id)
        .ok_or_else(|| BuildError::InvalidAssembly {
            entity,
            assembly: assembly_id.clone(),
        })?;

    let base = -slab_thickness(assembly);
    let mut results = ResultCollector::default();
    let mut elements = Vec::new();
    let mut areas = Vec::new();
    for perimeter_id in ctx.model.perimeters_by_storey(id.0) {
        let Some(perimeter) = ctx.model.perimeter(perimeter_id) else {
            continue;
        };
        let leaves = slab(ctx, entity, assembly, &perimeter.corners, base, &mut results)?;
        elements.extend(leaves.into_iter().map(Element::Leaf));
        areas.push(area("storey floor", &perimeter.corners, 0.0));
    }

    Ok(MaterializedModel::new(elements, Vec::new(), areas, results.into_results()))
}

/// Total build-up height of a floor assembly.
pub(crate) fn slab_thickness(assembly: &FloorAssembly) -> f64 {
    let joists = assembly.joist.as_ref().map_or(0.0, |j| j.height);
    joists + assembly.layers.iter().map(|l| l.thickness).sum::<f64>()
}

/// Joists along x over the outline's bounding box, layers on top, starting
/// at height `base`.
fn slab(
    ctx: &BuildContext<'_>,
    entity: EntityRef,
    assembly: &FloorAssembly,
    outline: &[Point2<f64>],
    base: f64,
    results: &mut ResultCollector,
) -> Result<Vec<ElementLeaf>> {
    validate_outline(entity, outline)?;
    let Some((min, max)) = bounding_rect(outline) else {
        return Err(BuildError::degenerate(entity, "empty outline"));
    };

    let mut leaves = Vec::new();
    let mut top = base;
    if let Some(joist) = &assembly.joist {
        require_positive(entity, "joist dimensions", &[joist.width, joist.height])?;
        let positions = member_positions(max.y - min.y, joist.width, joist.spacing);
        if positions.is_empty() {
            results.push(
                Issue::warning(format!(
                    "No {:.0} mm joist fits into the {:.0} mm wide floor",
                    joist.width,
                    max.y - min.y
                ))
                .with_group_key("floor-without-joists"),
            );
        }
        for y in positions {
            leaves.push(part_leaf(
                &joist.material,
                "joist",
                Vector3::new(min.x, min.y + y, base),
                Vector3::new(max.x - min.x, joist.width, joist.height),
            ));
        }
        top += joist.height;
    }

    let (layers, _) = layer_stack(&assembly.layers, outline, top);
    leaves.extend(layers);
    for leaf in &leaves {
        results.check_material(ctx.materials, leaf, None);
    }
    Ok(leaves)
}

fn area(label: &str, outline: &[Point2<f64>], z: f64) -> HighlightedArea {
    HighlightedArea {
        label: label.to_string(),
        outline: outline.iter().map(|p| Point3::new(p.x, p.y, z)).collect(),
    }
}
