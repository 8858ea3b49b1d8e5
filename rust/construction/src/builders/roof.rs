// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roof construction. Roofs sit on top of their storey: rafters run along y
//! over the outline's bounding box and the layer stack is laid over them.

use framewright_model::{geometry::bounding_rect, EntityRef, Point3, RoofId, Vector3};

use super::common::{
    box_bounds, layer_stack, member_positions, part_info, part_leaf, require_positive,
    validate_outline, ResultCollector,
};
use crate::element::{Element, ElementLeaf};
use crate::error::{BuildError, Result};
use crate::issue::Issue;
use crate::model::{HighlightedArea, Measurement, MaterializedModel};
use crate::source::BuildContext;

/// Pitches at or above this are reported as unusually steep.
const STEEP_PITCH_DEGREES: f64 = 60.0;

pub fn build_roof(ctx: &BuildContext<'_>, id: RoofId) -> Result<MaterializedModel> {
    let entity = EntityRef::Roof(id);
    let roof = ctx.model.roof(id).ok_or(BuildError::EntityNotFound(entity))?;
    let storey = ctx
        .model
        .storey(roof.storey)
        .ok_or(BuildError::EntityNotFound(EntityRef::Storey(roof.storey)))?;
    let assembly = ctx
        .assemblies
        .roof_assembly(&roof.assembly)
        .ok_or_else(|| BuildError::InvalidAssembly {
            entity,
            assembly: roof.assembly.clone(),
        })?;

    validate_outline(entity, &roof.outline)?;
    if !(0.0..90.0).contains(&roof.pitch_degrees) {
        return Err(BuildError::degenerate(
            entity,
            format!("pitch of {} degrees is outside [0, 90)", roof.pitch_degrees),
        ));
    }
    let Some((min, max)) = bounding_rect(&roof.outline) else {
        return Err(BuildError::degenerate(entity, "empty outline"));
    };

    let base = storey.height;
    let slope = 1.0 / roof.pitch_degrees.to_radians().cos();
    let mut results = ResultCollector::default();
    let mut leaves: Vec<ElementLeaf> = Vec::new();

    if roof.pitch_degrees >= STEEP_PITCH_DEGREES {
        results.push(
            Issue::warning(format!("Roof pitch of {:.1} degrees is very steep", roof.pitch_degrees))
                .with_group_key("steep-roof")
                .with_bounds(box_bounds(
                    Vector3::new(min.x, min.y, base),
                    Vector3::new(max.x - min.x, max.y - min.y, 0.0),
                )),
        );
    }

    let mut top = base;
    if let Some(rafter) = &assembly.rafter {
        require_positive(entity, "rafter dimensions", &[rafter.width, rafter.height])?;
        let span = max.y - min.y;
        for x in member_positions(max.x - min.x, rafter.width, rafter.spacing) {
            let origin = Vector3::new(min.x + x, min.y, base);
            let mut leaf = part_leaf(
                &rafter.material,
                "rafter",
                origin,
                Vector3::new(rafter.width, span, rafter.height),
            );
            // The cut piece is the sloped length, not its plan projection
            leaf.part_info = Some(part_info(
                &rafter.material,
                "rafter",
                Vector3::new(rafter.width, span * slope, rafter.height),
            ));
            leaves.push(leaf);
        }
        top += rafter.height;
    }

    let (layers, _) = layer_stack(&assembly.layers, &roof.outline, top);
    leaves.extend(layers);

    for leaf in &leaves {
        results.check_material(ctx.materials, leaf, None);
    }

    let area = HighlightedArea {
        label: "roof".to_string(),
        outline: roof.outline.iter().map(|p| Point3::new(p.x, p.y, base)).collect(),
    };
    let measurements = vec![Measurement::new(
        "roof span",
        Point3::new(min.x, min.y, base),
        Point3::new(min.x, max.y, base),
    )];

    Ok(MaterializedModel::new(
        leaves.into_iter().map(Element::Leaf).collect(),
        measurements,
        vec![area],
        results.into_results(),
    ))
}
