// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use framewright_model::{EntityRef, Revision, VersionToken};
use serde::Serialize;
use smallvec::SmallVec;

use crate::model::MaterializedModel;

/// One entry a composite was assembled from, with the version it had then.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Input {
    pub entity: EntityRef,
    pub version: VersionToken,
}

/// A cached model and what it was derived from.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub model: Arc<MaterializedModel>,
    /// Core entries: the dependency version at build time. Composites: the
    /// combination of the input versions and the structure revision.
    pub version: VersionToken,
    /// Structure revision a composite's input list was derived at.
    pub structure: Revision,
    /// Empty for core entries.
    pub inputs: SmallVec<[Input; 8]>,
}

impl CacheEntry {
    pub(crate) fn core(model: MaterializedModel, version: VersionToken) -> Self {
        Self {
            model: Arc::new(model),
            version,
            structure: Revision::ZERO,
            inputs: SmallVec::new(),
        }
    }

    pub(crate) fn composite(
        model: MaterializedModel,
        structure: Revision,
        inputs: SmallVec<[Input; 8]>,
    ) -> Self {
        let version = inputs
            .iter()
            .fold(VersionToken::from(structure), |token, input| token.combine(input.version));
        Self {
            model: Arc::new(model),
            version,
            structure,
            inputs,
        }
    }

    pub fn depends_on(&self, entity: EntityRef) -> bool {
        self.inputs.iter().any(|input| input.entity == entity)
    }
}

/// What a `get` returns: the model and whether it reflects the current
/// state of the building.
#[derive(Debug, Clone)]
pub struct CacheResult {
    pub model: Arc<MaterializedModel>,
    /// `true` when the model was derived from an older state. The model is
    /// still usable; call the matching `regenerate_*` to refresh it.
    pub is_outdated: bool,
}

impl CacheResult {
    pub(crate) fn fresh(model: Arc<MaterializedModel>) -> Self {
        Self {
            model,
            is_outdated: false,
        }
    }
}

/// Cache counters, reset with `GeometryCache::reset_stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Requests answered from a fresh entry.
    pub hits: u64,
    /// Requests for entries that did not exist.
    pub misses: u64,
    /// Requests answered from an outdated entry.
    pub stale_hits: u64,
    /// Builder runs and compositions.
    pub recomputations: u64,
    /// Entries removed by regeneration cascades.
    pub invalidations: u64,
}
