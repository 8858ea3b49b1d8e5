// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Framewright Model
//!
//! The authoritative building description consumed by the construction
//! pipeline: storeys, perimeters, walls, roofs, floors and ring beams, plus
//! the assembly configurations and the material catalog they reference.
//!
//! Entities live in slot maps with stable, generational keys. Every mutating
//! store operation stamps the touched entities with a [`Revision`] taken from
//! a shared [`RevisionClock`], which is what downstream caches compare to
//! decide whether a derived artifact is stale.

pub mod assembly;
pub mod building;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod material;
pub mod project;
pub mod revision;

pub use assembly::{
    AssemblyCatalog, AssemblyConfig, Assemblies, FloorAssembly, JoistConfig, Layer, PostConfig,
    RingBeamAssembly, RoofAssembly, WallAssembly,
};
pub use building::{
    Building, BuildingModel, ColinearRun, Floor, Opening, Perimeter, PerimeterSpec, RingBeamSet,
    Roof, Storey, Wall, WallUpdate,
};
pub use error::{Error, Result};
pub use geometry::{Bounds3, Isometry3, Point2, Point3, Vector2, Vector3};
pub use ids::{
    AssemblyId, BuildingId, ColinearRunId, EntityKind, EntityRef, FloorId, MaterialId,
    PerimeterId, RingBeamSetId, RoofId, StoreyFloorId, StoreyId, WallId,
};
pub use material::{Material, MaterialCatalog, MaterialKind, Materials};
pub use project::Project;
pub use revision::{Revision, RevisionClock, VersionToken};
