// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for building model mutations.

use crate::ids::{PerimeterId, RoofId, StoreyId, WallId};

/// Result type alias for building model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while editing the building model.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Storey key not found in the model.
    #[error("storey not found: {0:?}")]
    StoreyNotFound(StoreyId),

    /// Perimeter key not found in the model.
    #[error("perimeter not found: {0:?}")]
    PerimeterNotFound(PerimeterId),

    /// Wall key not found in the model.
    #[error("wall not found: {0:?}")]
    WallNotFound(WallId),

    /// Roof key not found in the model.
    #[error("roof not found: {0:?}")]
    RoofNotFound(RoofId),

    /// A perimeter needs at least three distinct corners.
    #[error("perimeter needs at least 3 distinct corners, got {0}")]
    DegeneratePerimeter(usize),

    /// A dimension that must be positive was zero or negative.
    #[error("{name} must be positive, got {value}")]
    NonPositiveDimension { name: &'static str, value: f64 },
}
