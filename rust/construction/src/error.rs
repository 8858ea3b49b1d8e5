// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for construction builders.
//!
//! Builder errors never cross the cache boundary: the cache turns them into
//! an unsupported model carrying one error issue whose id is [`BuildError::code`].

use framewright_model::{AssemblyId, EntityRef};

/// Result type alias for builder operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Reasons a builder cannot produce a model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// The referenced assembly does not exist or is of the wrong kind.
    #[error("{entity} references unknown assembly '{assembly}'")]
    InvalidAssembly {
        entity: EntityRef,
        assembly: AssemblyId,
    },

    /// The entity is not (or no longer) part of the building model.
    #[error("{0} not found in the building model")]
    EntityNotFound(EntityRef),

    /// The entity's geometry cannot be constructed.
    #[error("{entity} has degenerate geometry: {reason}")]
    DegenerateGeometry { entity: EntityRef, reason: String },
}

impl BuildError {
    /// Stable code used as the id of the issue reporting this error.
    pub fn code(&self) -> &'static str {
        match self {
            BuildError::InvalidAssembly { .. } => "invalid-assembly",
            BuildError::EntityNotFound(_) => "entity-not-found",
            BuildError::DegenerateGeometry { .. } => "degenerate-geometry",
        }
    }

    pub fn entity(&self) -> EntityRef {
        match self {
            BuildError::InvalidAssembly { entity, .. }
            | BuildError::DegenerateGeometry { entity, .. }
            | BuildError::EntityNotFound(entity) => *entity,
        }
    }

    pub(crate) fn degenerate(entity: impl Into<EntityRef>, reason: impl Into<String>) -> Self {
        BuildError::DegenerateGeometry {
            entity: entity.into(),
            reason: reason.into(),
        }
    }
}
