// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity identifiers.
//!
//! Building entities get a type-safe slot map key that stays valid while
//! other entities are added or removed (generational indices). Catalog
//! entries (assemblies, materials) are addressed by string ids because they
//! are authored by hand in configuration files.

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Key for a wall (one straight segment of a perimeter).
    pub struct WallId;

    /// Key for a roof.
    pub struct RoofId;

    /// Key for a floor area placed on a storey.
    pub struct FloorId;

    /// Key for the set of ring beams running on top of a perimeter.
    pub struct RingBeamSetId;

    /// Key for a storey.
    pub struct StoreyId;

    /// Key for a closed ring of walls.
    pub struct PerimeterId;

    /// Key for a run of consecutive colinear walls within a perimeter.
    pub struct ColinearRunId;
}

/// The floor construction of a storey. There is exactly one per storey, so
/// it borrows the storey's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreyFloorId(pub StoreyId);

/// Singleton id for the whole building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuildingId;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id! {
    /// Id of an assembly configuration (wall, floor, roof or ring-beam build-up).
    AssemblyId
}

string_id! {
    /// Id of a material in the material catalog.
    MaterialId
}

/// A reference to any entity whose construction can be derived and cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Wall(WallId),
    Roof(RoofId),
    Floor(FloorId),
    RingBeamSet(RingBeamSetId),
    StoreyFloor(StoreyFloorId),
    ColinearRun(ColinearRunId),
    Perimeter(PerimeterId),
    Storey(StoreyId),
    Building(BuildingId),
}

impl EntityRef {
    /// Returns the kind of entity this reference points to.
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Wall(_) => EntityKind::Wall,
            EntityRef::Roof(_) => EntityKind::Roof,
            EntityRef::Floor(_) => EntityKind::Floor,
            EntityRef::RingBeamSet(_) => EntityKind::RingBeamSet,
            EntityRef::StoreyFloor(_) => EntityKind::StoreyFloor,
            EntityRef::ColinearRun(_) => EntityKind::ColinearRun,
            EntityRef::Perimeter(_) => EntityKind::Perimeter,
            EntityRef::Storey(_) => EntityKind::Storey,
            EntityRef::Building(_) => EntityKind::Building,
        }
    }

    /// `true` for entities built directly from the model (leaves of the
    /// dependency graph), `false` for entities composed from other entries.
    pub fn is_core(&self) -> bool {
        self.kind().is_core()
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityRef::Wall(k) => write!(f, "wall {:?}", k),
            EntityRef::Roof(k) => write!(f, "roof {:?}", k),
            EntityRef::Floor(k) => write!(f, "floor {:?}", k),
            EntityRef::RingBeamSet(k) => write!(f, "ring beam set {:?}", k),
            EntityRef::StoreyFloor(k) => write!(f, "storey floor {:?}", k.0),
            EntityRef::ColinearRun(k) => write!(f, "colinear wall run {:?}", k),
            EntityRef::Perimeter(k) => write!(f, "perimeter {:?}", k),
            EntityRef::Storey(k) => write!(f, "storey {:?}", k),
            EntityRef::Building(_) => f.write_str("building"),
        }
    }
}

/// Discriminant for entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Wall,
    Roof,
    Floor,
    RingBeamSet,
    StoreyFloor,
    ColinearRun,
    Perimeter,
    Storey,
    Building,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Wall => "wall",
            EntityKind::Roof => "roof",
            EntityKind::Floor => "floor",
            EntityKind::RingBeamSet => "ring-beam-set",
            EntityKind::StoreyFloor => "storey-floor",
            EntityKind::ColinearRun => "colinear-wall-run",
            EntityKind::Perimeter => "perimeter",
            EntityKind::Storey => "storey",
            EntityKind::Building => "building",
        }
    }

    pub fn is_core(&self) -> bool {
        matches!(
            self,
            EntityKind::Wall
                | EntityKind::Roof
                | EntityKind::Floor
                | EntityKind::RingBeamSet
                | EntityKind::StoreyFloor
        )
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! entity_ref_from {
    ($($key:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$key> for EntityRef {
                fn from(k: $key) -> Self {
                    EntityRef::$variant(k)
                }
            }
        )*
    };
}

entity_ref_from! {
    WallId => Wall,
    RoofId => Roof,
    FloorId => Floor,
    RingBeamSetId => RingBeamSet,
    StoreyFloorId => StoreyFloor,
    ColinearRunId => ColinearRun,
    PerimeterId => Perimeter,
    StoreyId => Storey,
    BuildingId => Building,
}
