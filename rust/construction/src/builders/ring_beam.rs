// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use framewright_model::{geometry::segment_placement, EntityRef, RingBeamSetId, Vector3};

use super::common::{box_bounds, part_leaf, require_positive, ResultCollector, EPSILON};
use crate::element::Element;
use crate::error::{BuildError, Result};
use crate::issue::Issue;
use crate::model::MaterializedModel;
use crate::source::BuildContext;

/// One beam on top of every wall of the set's perimeter, centred on the
/// wall thickness.
pub fn build_ring_beam_set(ctx: &BuildContext<'_>, id: RingBeamSetId) -> Result<MaterializedModel> {
    let entity = EntityRef::RingBeamSet(id);
    let set = ctx
        .model
        .ring_beam_set(id)
        .ok_or(BuildError::EntityNotFound(entity))?;
    let perimeter = ctx
        .model
        .perimeter(set.perimeter)
        .ok_or(BuildError::EntityNotFound(EntityRef::Perimeter(set.perimeter)))?;
    let beam = ctx
        .assemblies
        .ring_beam_assembly(&set.assembly)
        .ok_or_else(|| BuildError::InvalidAssembly {
            entity,
            assembly: set.assembly.clone(),
        })?;
    require_positive(entity, "ring beam width and height", &[beam.width, beam.height])?;

    let mut results = ResultCollector::default();
    let mut elements = Vec::with_capacity(perimeter.walls.len());
    for &wall_id in &perimeter.walls {
        let wall = ctx
            .model
            .wall(wall_id)
            .ok_or(BuildError::EntityNotFound(EntityRef::Wall(wall_id)))?;
        let length = wall.length();
        if length <= EPSILON {
            continue;
        }

        let placement = segment_placement(&wall.start, &wall.end, wall.height);
        let origin = Vector3::new(0.0, (wall.thickness - beam.width) / 2.0, 0.0);
        let size = Vector3::new(length, beam.width, beam.height);
        let leaf = part_leaf(&beam.material, "ring-beam", origin, size);
        let bounds = box_bounds(origin, size).transformed(&placement);

        if beam.width > wall.thickness + EPSILON {
            results.push(
                Issue::warning(format!(
                    "Ring beam of {:.0} mm is wider than the {:.0} mm wall",
                    beam.width, wall.thickness
                ))
                .with_group_key("ring-beam-wider-than-wall")
                .with_elements([leaf.id])
                .with_bounds(bounds),
            );
        }
        results.check_material(ctx.materials, &leaf, Some(bounds));
        elements.push(Element::group(placement, vec![Element::Leaf(leaf)]));
    }

    Ok(MaterializedModel::new(elements, Vec::new(), Vec::new(), results.into_results()))
}
