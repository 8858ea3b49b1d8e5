// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! What each cached entity is derived from.
//!
//! Core entities fold the revisions of everything their builder reads into
//! one [`VersionToken`]. Composite entities are described by their direct
//! inputs (and the placement of each) plus the revision at which that input
//! list was last changed.

use framewright_model::{
    BuildingId, BuildingModel, EntityRef, Isometry3, Revision, StoreyFloorId, VersionToken,
};

use crate::source::BuildContext;

fn revision(model: &dyn BuildingModel, entity: EntityRef) -> Revision {
    // Entities that no longer exist are as old as the last structural change
    model
        .revision_of(entity)
        .unwrap_or_else(|| model.structure_revision())
}

/// Current dependency version of a core entity.
pub(crate) fn core_version(ctx: &BuildContext<'_>, entity: EntityRef) -> VersionToken {
    let model = ctx.model;
    let mut token = VersionToken::from(revision(model, entity));
    token.include(ctx.materials.revision());

    match entity {
        EntityRef::Wall(id) => {
            if let Some(wall) = model.wall(id) {
                token.include(ctx.assemblies.revision_of(&wall.assembly));
            }
        }
        EntityRef::Roof(id) => {
            if let Some(roof) = model.roof(id) {
                token.include(ctx.assemblies.revision_of(&roof.assembly));
            }
        }
        EntityRef::Floor(id) => {
            if let Some(floor) = model.floor(id) {
                token.include(ctx.assemblies.revision_of(&floor.assembly));
            }
        }
        EntityRef::RingBeamSet(id) => {
            if let Some(set) = model.ring_beam_set(id) {
                token.include(revision(model, EntityRef::Perimeter(set.perimeter)));
                if let Some(perimeter) = model.perimeter(set.perimeter) {
                    for &wall in &perimeter.walls {
                        token.include(revision(model, EntityRef::Wall(wall)));
                    }
                }
                token.include(ctx.assemblies.revision_of(&set.assembly));
            }
        }
        EntityRef::StoreyFloor(StoreyFloorId(storey)) => {
            for perimeter in model.perimeters_by_storey(storey) {
                token.include(revision(model, EntityRef::Perimeter(perimeter)));
            }
            if let Some(assembly) = model.storey(storey).and_then(|s| s.floor_assembly.as_ref()) {
                token.include(ctx.assemblies.revision_of(assembly));
            }
        }
        EntityRef::ColinearRun(_)
        | EntityRef::Perimeter(_)
        | EntityRef::Storey(_)
        | EntityRef::Building(_) => {}
    }
    token
}

/// Revision at which a composite's input list last changed.
pub(crate) fn structure_revision(model: &dyn BuildingModel, entity: EntityRef) -> Revision {
    match entity {
        EntityRef::Building(_) => model.structure_revision(),
        other => revision(model, other),
    }
}

/// Direct inputs of a composite and where each is placed in the composite's
/// frame. `None` if the entity is not in the model.
pub(crate) fn composite_inputs(
    model: &dyn BuildingModel,
    entity: EntityRef,
) -> Option<Vec<(EntityRef, Isometry3<f64>)>> {
    let identity = |e: EntityRef| (e, Isometry3::identity());
    let inputs = match entity {
        EntityRef::ColinearRun(id) => {
            let run = model.colinear_run(id)?;
            run.walls.iter().map(|&w| identity(w.into())).collect()
        }
        EntityRef::Perimeter(id) => {
            let perimeter = model.perimeter(id)?;
            perimeter
                .walls
                .iter()
                .map(|&w| identity(w.into()))
                .chain(perimeter.ring_beams.iter().map(|&r| identity(r.into())))
                .collect()
        }
        EntityRef::Storey(id) => {
            model.storey(id)?;
            let mut inputs: Vec<_> = model
                .perimeters_by_storey(id)
                .into_iter()
                .map(|p| identity(p.into()))
                .collect();
            inputs.push(identity(StoreyFloorId(id).into()));
            inputs.extend(model.floors_by_storey(id).into_iter().map(|f| identity(f.into())));
            inputs.extend(model.roofs_by_storey(id).into_iter().map(|r| identity(r.into())));
            inputs
        }
        EntityRef::Building(_) => model
            .storeys()
            .into_iter()
            .filter_map(|s| {
                let storey = model.storey(s)?;
                Some((EntityRef::Storey(s), Isometry3::translation(0.0, 0.0, storey.elevation)))
            })
            .collect(),
        EntityRef::Wall(_)
        | EntityRef::Roof(_)
        | EntityRef::Floor(_)
        | EntityRef::RingBeamSet(_)
        | EntityRef::StoreyFloor(_) => return None,
    };
    Some(inputs)
}

/// Composites that directly contain `entity` according to the current model.
pub(crate) fn direct_dependents(model: &dyn BuildingModel, entity: EntityRef) -> Vec<EntityRef> {
    match entity {
        EntityRef::Wall(id) => {
            let Some(perimeter_id) = model.wall(id).map(|w| w.perimeter) else {
                return Vec::new();
            };
            let mut dependents: Vec<EntityRef> = model
                .perimeter(perimeter_id)
                .map(|p| {
                    p.colinear_runs
                        .iter()
                        .copied()
                        .filter(|&run| model.colinear_run(run).is_some_and(|r| r.walls.contains(&id)))
                        .map(EntityRef::ColinearRun)
                        .collect()
                })
                .unwrap_or_default();
            dependents.push(EntityRef::Perimeter(perimeter_id));
            dependents
        }
        EntityRef::RingBeamSet(id) => model
            .ring_beam_set(id)
            .map(|set| vec![EntityRef::Perimeter(set.perimeter)])
            .unwrap_or_default(),
        EntityRef::Roof(id) => model
            .roof(id)
            .map(|roof| vec![EntityRef::Storey(roof.storey)])
            .unwrap_or_default(),
        EntityRef::Floor(id) => model
            .floor(id)
            .map(|floor| vec![EntityRef::Storey(floor.storey)])
            .unwrap_or_default(),
        EntityRef::StoreyFloor(StoreyFloorId(storey)) => vec![EntityRef::Storey(storey)],
        EntityRef::Perimeter(id) => model
            .perimeter(id)
            .map(|p| vec![EntityRef::Storey(p.storey)])
            .unwrap_or_default(),
        EntityRef::Storey(_) => vec![EntityRef::Building(BuildingId)],
        EntityRef::ColinearRun(_) | EntityRef::Building(_) => Vec::new(),
    }
}
