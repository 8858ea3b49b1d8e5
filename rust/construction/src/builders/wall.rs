// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall construction: layer stack, posts, openings and headers.
//!
//! Everything is built in the wall's local frame (x along the wall from its
//! start corner, y across the thickness towards the left of the wall
//! direction, z up) and placed into the storey plane by one group.

use framewright_model::{
    geometry::segment_placement, Bounds3, EntityRef, Isometry3, Opening, Point3, Vector3, WallId,
};

use super::common::{
    box_bounds, member_positions, part_leaf, require_positive, ResultCollector, EPSILON,
};
use crate::element::{Element, ElementId, ElementLeaf};
use crate::error::{BuildError, Result};
use crate::issue::Issue;
use crate::model::{Measurement, MaterializedModel};
use crate::source::BuildContext;

pub fn build_wall(ctx: &BuildContext<'_>, id: WallId) -> Result<MaterializedModel> {
    let entity = EntityRef::Wall(id);
    let wall = ctx
        .model
        .wall(id)
        .ok_or(BuildError::EntityNotFound(entity))?;
    let assembly = ctx
        .assemblies
        .wall_assembly(&wall.assembly)
        .ok_or_else(|| BuildError::InvalidAssembly {
            entity,
            assembly: wall.assembly.clone(),
        })?;

    let length = wall.length();
    require_positive(entity, "wall length and height", &[length, wall.height, wall.thickness])?;

    let placement = segment_placement(&wall.start, &wall.end, 0.0);
    let mut results = ResultCollector::default();
    let mut children: Vec<ElementLeaf> = Vec::new();

    let mut push = |leaf: ElementLeaf, bounds: Bounds3, results: &mut ResultCollector| {
        results.check_material(ctx.materials, &leaf, Some(bounds.transformed(&placement)));
        let id = leaf.id;
        children.push(leaf);
        id
    };

    // Layers across the thickness
    let stack = assembly.layer_thickness();
    if stack > wall.thickness + EPSILON {
        results.push(
            Issue::warning(format!(
                "Layer stack of {:.0} mm is thicker than the {:.0} mm wall",
                stack, wall.thickness
            ))
            .with_group_key("layer-thickness-mismatch")
            .with_bounds(
                box_bounds(Vector3::zeros(), Vector3::new(length, stack, wall.height))
                    .transformed(&placement),
            ),
        );
    }
    let mut y = 0.0;
    for layer in &assembly.layers {
        let origin = Vector3::new(0.0, y, 0.0);
        let size = Vector3::new(length, layer.thickness, wall.height);
        push(part_leaf(&layer.material, "layer", origin, size), box_bounds(origin, size), &mut results);
        y += layer.thickness;
    }

    // Openings
    let mut opening_elements: Vec<(ElementId, &Opening)> = Vec::with_capacity(wall.openings.len());
    for opening in &wall.openings {
        let origin = Vector3::new(opening.offset, 0.0, opening.sill_height);
        let size = Vector3::new(opening.width, wall.thickness, opening.height);
        let bounds = box_bounds(origin, size);
        let leaf_id = push(part_leaf(&opening.material, "opening", origin, size), bounds, &mut results);
        opening_elements.push((leaf_id, opening));

        if !opening_fits(opening, length, wall.height) {
            results.push(
                Issue::error(format!(
                    "Opening at {:.0} mm does not fit into the {:.0} x {:.0} mm wall",
                    opening.offset, length, wall.height
                ))
                .with_group_key("opening-outside-wall")
                .with_elements([leaf_id])
                .with_bounds(bounds.transformed(&placement)),
            );
        }
    }
    check_overlaps(&opening_elements, wall.thickness, &placement, &mut results);

    // Posts and headers
    if let Some(post) = &assembly.post {
        require_positive(entity, "post dimensions", &[post.width, post.depth, post.spacing])?;
        let post_y = (wall.thickness - post.depth) / 2.0;
        if length + EPSILON < post.width {
            results.push(
                Issue::warning(format!(
                    "Wall of {:.0} mm is shorter than a {:.0} mm post",
                    length, post.width
                ))
                .with_group_key("wall-shorter-than-post")
                .with_bounds(
                    box_bounds(Vector3::zeros(), Vector3::new(length, wall.thickness, wall.height))
                        .transformed(&placement),
                ),
            );
        }
        for x in member_positions(length, post.width, post.spacing) {
            let collides = wall
                .openings
                .iter()
                .any(|o| x < o.offset + o.width - EPSILON && x + post.width > o.offset + EPSILON);
            if collides {
                continue;
            }
            let origin = Vector3::new(x, post_y, 0.0);
            let size = Vector3::new(post.width, post.depth, wall.height);
            push(part_leaf(&post.material, "post", origin, size), box_bounds(origin, size), &mut results);
        }

        for opening in &wall.openings {
            let top = opening.sill_height + opening.height;
            if opening.width <= EPSILON || top + post.width > wall.height + EPSILON {
                continue;
            }
            let origin = Vector3::new(opening.offset, post_y, top);
            let size = Vector3::new(opening.width, post.depth, post.width);
            push(part_leaf(&post.material, "header", origin, size), box_bounds(origin, size), &mut results);
        }
    }

    let measurements = vec![
        Measurement::new("wall length", Point3::origin(), Point3::new(length, 0.0, 0.0)),
        Measurement::new("wall height", Point3::origin(), Point3::new(0.0, 0.0, wall.height)),
    ]
    .into_iter()
    .map(|m| m.transformed(&placement))
    .collect();

    let children = children.into_iter().map(Element::Leaf).collect();
    Ok(MaterializedModel::new(
        vec![Element::group(placement, children)],
        measurements,
        Vec::new(),
        results.into_results(),
    ))
}

fn opening_fits(opening: &Opening, length: f64, height: f64) -> bool {
    opening.width > EPSILON
        && opening.height > EPSILON
        && opening.offset >= -EPSILON
        && opening.sill_height >= -EPSILON
        && opening.offset + opening.width <= length + EPSILON
        && opening.sill_height + opening.height <= height + EPSILON
}

fn check_overlaps(
    openings: &[(ElementId, &Opening)],
    thickness: f64,
    placement: &Isometry3<f64>,
    results: &mut ResultCollector,
) {
    for (i, (a_id, a)) in openings.iter().enumerate() {
        for (b_id, b) in &openings[i + 1..] {
            let along = a.offset < b.offset + b.width - EPSILON && b.offset < a.offset + a.width - EPSILON;
            let vertical = a.sill_height < b.sill_height + b.height - EPSILON
                && b.sill_height < a.sill_height + a.height - EPSILON;
            if !(along && vertical) {
                continue;
            }
            let bounds = box_bounds(
                Vector3::new(a.offset, 0.0, a.sill_height),
                Vector3::new(a.width, thickness, a.height),
            )
            .union(&box_bounds(
                Vector3::new(b.offset, 0.0, b.sill_height),
                Vector3::new(b.width, thickness, b.height),
            ));
            results.push(
                Issue::error("Openings overlap")
                    .with_group_key("opening-overlap")
                    .with_elements([*a_id, *b_id])
                    .with_bounds(bounds.transformed(placement)),
            );
        }
    }
}
