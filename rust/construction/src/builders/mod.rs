// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Construction builders for core entities.
//!
//! Each builder turns one entity into a [`MaterializedModel`] in storey
//! coordinates, or fails with a [`BuildError`]. Builders never cache and
//! never look at other cached models; composition happens in the cache.

pub mod common;
mod floor;
mod ring_beam;
mod roof;
mod wall;

pub use common::part_id;
pub use floor::{build_floor, build_storey_floor};
pub use ring_beam::build_ring_beam_set;
pub use roof::build_roof;
pub use wall::build_wall;

use framewright_model::EntityRef;

use crate::error::{BuildError, Result};
use crate::model::MaterializedModel;
use crate::source::BuildContext;

/// Runs the builder for a core entity. Composite kinds are not built here.
pub fn build_core(ctx: &BuildContext<'_>, entity: EntityRef) -> Result<MaterializedModel> {
    match entity {
        EntityRef::Wall(id) => build_wall(ctx, id),
        EntityRef::Roof(id) => build_roof(ctx, id),
        EntityRef::Floor(id) => build_floor(ctx, id),
        EntityRef::RingBeamSet(id) => build_ring_beam_set(ctx, id),
        EntityRef::StoreyFloor(id) => build_storey_floor(ctx, id),
        other => Err(BuildError::degenerate(
            other,
            format!("{} is not a core entity", other.kind()),
        )),
    }
}
