// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Two-layer cache of materialized models.
//!
//! The core layer holds one entry per wall, roof, floor, ring beam set and
//! storey floor, each produced by a builder. The composite layer holds
//! colinear wall runs, perimeters, storeys and the building, each composed
//! from the entries of its inputs.
//!
//! Entries are created lazily. A `get` never rebuilds an existing entry just
//! because the building changed: it hands back the last model together with
//! `is_outdated`, and the caller decides when to `regenerate_*`. The only
//! exception is a composite whose inputs were cleared from the cache, which
//! is recomposed on the spot.
//!
//! # Freshness
//!
//! A core entry is fresh when its recorded version equals the current
//! dependency version of its entity. A composite is fresh when its input
//! list has not changed structurally, every input entry still has the
//! version it had when the composite was assembled, and every input is
//! itself fresh.
//!
//! # Invalidation
//!
//! Regenerating an entry removes every composite that contains it, directly
//! or transitively; they are recomposed on their next `get`. Regenerating a
//! wall therefore drops its colinear run, perimeter, storey and the
//! building, but leaves other perimeters alone.

mod entry;
mod versions;

pub use entry::{CacheEntry, CacheResult, CacheStats, Input};

use std::collections::VecDeque;
use std::sync::Arc;

use framewright_model::{
    BuildingId, ColinearRunId, EntityRef, FloorId, PerimeterId, Point3, RingBeamSetId, RoofId,
    StoreyFloorId, StoreyId, VersionToken, WallId,
};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::builders;
use crate::config::ConstructionConfig;
use crate::error::BuildError;
use crate::model::{HighlightedArea, MaterializedModel};
use crate::source::{BuildContext, ConstructionSource};

/// Cache of materialized models for one construction source.
///
/// # Example
///
/// ```
/// use framewright_construction::GeometryCache;
/// use framewright_model::Project;
///
/// let mut cache = GeometryCache::new(Project::new());
/// let building = cache.get_building();
/// assert!(!building.is_outdated);
/// assert!(building.model.elements.is_empty());
/// ```
pub struct GeometryCache<S> {
    source: S,
    config: ConstructionConfig,
    core: FxHashMap<EntityRef, CacheEntry>,
    composites: FxHashMap<EntityRef, CacheEntry>,
    stats: CacheStats,
}

impl<S: ConstructionSource> GeometryCache<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, ConstructionConfig::default())
    }

    pub fn with_config(source: S, config: ConstructionConfig) -> Self {
        Self {
            source,
            config,
            core: FxHashMap::default(),
            composites: FxHashMap::default(),
            stats: CacheStats::default(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access for editing the building. Cached models are kept;
    /// affected entries report `is_outdated` until regenerated.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    pub fn config(&self) -> &ConstructionConfig {
        &self.config
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    /// Number of core and composite entries.
    pub fn len(&self) -> (usize, usize) {
        (self.core.len(), self.composites.len())
    }

    pub fn is_empty(&self) -> bool {
        self.core.is_empty() && self.composites.is_empty()
    }

    // --- Lookup ---

    /// Returns the cached model of `entity`, building or composing it if it
    /// is not cached yet.
    pub fn get(&mut self, entity: EntityRef) -> CacheResult {
        if entity.is_core() {
            self.get_core(entity)
        } else {
            self.get_composite(entity)
        }
    }

    pub fn get_wall(&mut self, id: WallId) -> CacheResult {
        self.get(id.into())
    }

    pub fn get_roof(&mut self, id: RoofId) -> CacheResult {
        self.get(id.into())
    }

    pub fn get_floor(&mut self, id: FloorId) -> CacheResult {
        self.get(id.into())
    }

    pub fn get_ring_beam_set(&mut self, id: RingBeamSetId) -> CacheResult {
        self.get(id.into())
    }

    pub fn get_storey_floor(&mut self, storey: StoreyId) -> CacheResult {
        self.get(StoreyFloorId(storey).into())
    }

    pub fn get_colinear_run(&mut self, id: ColinearRunId) -> CacheResult {
        self.get(id.into())
    }

    pub fn get_perimeter(&mut self, id: PerimeterId) -> CacheResult {
        self.get(id.into())
    }

    pub fn get_storey(&mut self, id: StoreyId) -> CacheResult {
        self.get(id.into())
    }

    /// The whole building, storeys placed at their elevations.
    pub fn get_building(&mut self) -> CacheResult {
        self.get(BuildingId.into())
    }

    /// `true` if an entry exists, fresh or not.
    pub fn is_cached(&self, entity: EntityRef) -> bool {
        self.entry(entity).is_some()
    }

    /// `true` if an entry exists but no longer reflects the building.
    pub fn is_outdated(&self, entity: EntityRef) -> bool {
        self.is_cached(entity) && !self.is_fresh(entity)
    }

    // --- Regeneration ---

    /// Rebuilds (or recomposes) `entity` unconditionally and removes every
    /// composite that contains it.
    pub fn regenerate(&mut self, entity: EntityRef) -> CacheResult {
        let result = if entity.is_core() {
            CacheResult::fresh(self.build(entity))
        } else {
            self.compose(entity)
        };
        self.invalidate_dependents(entity);
        result
    }

    pub fn regenerate_wall(&mut self, id: WallId) -> CacheResult {
        self.regenerate(id.into())
    }

    pub fn regenerate_roof(&mut self, id: RoofId) -> CacheResult {
        self.regenerate(id.into())
    }

    pub fn regenerate_floor(&mut self, id: FloorId) -> CacheResult {
        self.regenerate(id.into())
    }

    pub fn regenerate_ring_beam_set(&mut self, id: RingBeamSetId) -> CacheResult {
        self.regenerate(id.into())
    }

    pub fn regenerate_storey_floor(&mut self, storey: StoreyId) -> CacheResult {
        self.regenerate(StoreyFloorId(storey).into())
    }

    pub fn regenerate_colinear_run(&mut self, id: ColinearRunId) -> CacheResult {
        self.regenerate(id.into())
    }

    pub fn regenerate_perimeter(&mut self, id: PerimeterId) -> CacheResult {
        self.regenerate(id.into())
    }

    pub fn regenerate_storey(&mut self, id: StoreyId) -> CacheResult {
        self.regenerate(id.into())
    }

    pub fn regenerate_building(&mut self) -> CacheResult {
        self.regenerate(BuildingId.into())
    }

    // --- Clearing ---

    /// Drops every core entry. Composites stay, and are recomposed the next
    /// time they are requested.
    pub fn clear_core(&mut self) {
        debug!(entries = self.core.len(), "Clearing core cache");
        self.core.clear();
    }

    pub fn clear_composites(&mut self) {
        debug!(entries = self.composites.len(), "Clearing composite cache");
        self.composites.clear();
    }

    pub fn clear_all(&mut self) {
        self.clear_core();
        self.clear_composites();
    }

    // --- Internals ---

    fn entry(&self, entity: EntityRef) -> Option<&CacheEntry> {
        if entity.is_core() {
            self.core.get(&entity)
        } else {
            self.composites.get(&entity)
        }
    }

    fn get_core(&mut self, entity: EntityRef) -> CacheResult {
        let cached = self.core.get(&entity).map(|e| (Arc::clone(&e.model), e.version));
        let Some((model, version)) = cached else {
            self.stats.misses += 1;
            debug!(%entity, "Cache miss");
            return CacheResult::fresh(self.build(entity));
        };

        let current = versions::core_version(&BuildContext::new(&self.source, &self.config), entity);
        if version == current {
            self.stats.hits += 1;
            CacheResult::fresh(model)
        } else {
            self.stats.stale_hits += 1;
            debug!(%entity, cached = %version, current = %current, "Serving outdated entry");
            CacheResult {
                model,
                is_outdated: true,
            }
        }
    }

    fn get_composite(&mut self, entity: EntityRef) -> CacheResult {
        let cached = self.composites.get(&entity).map(|e| Arc::clone(&e.model));
        let Some(model) = cached else {
            self.stats.misses += 1;
            debug!(%entity, "Cache miss");
            return self.compose(entity);
        };

        if self.missing_input(entity) {
            self.stats.misses += 1;
            debug!(%entity, "Inputs were cleared, recomposing");
            return self.compose(entity);
        }

        if self.is_fresh(entity) {
            self.stats.hits += 1;
            CacheResult::fresh(model)
        } else {
            self.stats.stale_hits += 1;
            debug!(%entity, "Serving outdated entry");
            CacheResult {
                model,
                is_outdated: true,
            }
        }
    }

    /// Runs the builder for a core entity and stores the result.
    fn build(&mut self, entity: EntityRef) -> Arc<MaterializedModel> {
        let ctx = BuildContext::new(&self.source, &self.config);
        let version = versions::core_version(&ctx, entity);
        let model = builders::build_core(&ctx, entity).unwrap_or_else(|err| unsupported(entity, err));
        self.stats.recomputations += 1;

        let entry = CacheEntry::core(model, version);
        let model = Arc::clone(&entry.model);
        self.core.insert(entity, entry);
        model
    }

    /// Assembles a composite from the current entries of its inputs,
    /// creating missing ones on the way.
    fn compose(&mut self, entity: EntityRef) -> CacheResult {
        let model = self.source.model();
        let structure = versions::structure_revision(model, entity);
        let Some(parts) = versions::composite_inputs(model, entity) else {
            let sentinel = unsupported(entity, BuildError::EntityNotFound(entity));
            self.stats.recomputations += 1;
            let entry = CacheEntry::composite(sentinel, structure, SmallVec::new());
            let model = Arc::clone(&entry.model);
            self.composites.insert(entity, entry);
            return CacheResult::fresh(model);
        };
        let footprint = match entity {
            EntityRef::Perimeter(id) => model.perimeter(id).map(|p| HighlightedArea {
                label: "perimeter".to_string(),
                outline: p.corners.iter().map(|c| Point3::new(c.x, c.y, 0.0)).collect(),
            }),
            _ => None,
        };

        let mut inputs: SmallVec<[Input; 8]> = SmallVec::with_capacity(parts.len());
        let mut children = Vec::with_capacity(parts.len());
        let mut is_outdated = false;
        for (input, placement) in parts {
            let result = self.get(input);
            is_outdated |= result.is_outdated;
            let version = self
                .entry(input)
                .map_or(VersionToken::INITIAL, |e| e.version);
            inputs.push(Input {
                entity: input,
                version,
            });
            children.push((result.model, placement));
        }

        let mut composed =
            MaterializedModel::compose(children.iter().map(|(model, t)| (model.as_ref(), *t)));
        composed.areas.extend(footprint);
        self.stats.recomputations += 1;
        debug!(%entity, inputs = inputs.len(), is_outdated, "Composed");

        let entry = CacheEntry::composite(composed, structure, inputs);
        let model = Arc::clone(&entry.model);
        self.composites.insert(entity, entry);
        CacheResult { model, is_outdated }
    }

    fn is_fresh(&self, entity: EntityRef) -> bool {
        if entity.is_core() {
            let ctx = BuildContext::new(&self.source, &self.config);
            return self
                .core
                .get(&entity)
                .is_some_and(|e| e.version == versions::core_version(&ctx, entity));
        }
        let Some(entry) = self.composites.get(&entity) else {
            return false;
        };
        entry.structure == versions::structure_revision(self.source.model(), entity)
            && entry.inputs.iter().all(|input| {
                self.entry(input.entity)
                    .is_some_and(|e| e.version == input.version)
                    && self.is_fresh(input.entity)
            })
    }

    /// `true` if any entry below the composite is gone from the cache.
    fn missing_input(&self, entity: EntityRef) -> bool {
        let Some(entry) = self.composites.get(&entity) else {
            return true;
        };
        entry.inputs.iter().any(|input| {
            if input.entity.is_core() {
                !self.core.contains_key(&input.entity)
            } else {
                self.missing_input(input.entity)
            }
        })
    }

    /// Removes every composite containing `entity`, following both the
    /// current building structure and the inputs recorded in the entries.
    /// Walks breadth-first, nearest containers first.
    fn invalidate_dependents(&mut self, entity: EntityRef) {
        let mut pending = VecDeque::from([entity]);
        let mut visited: FxHashSet<EntityRef> = FxHashSet::default();
        let mut removed = 0u64;

        while let Some(current) = pending.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            let mut dependents = versions::direct_dependents(self.source.model(), current);
            dependents.extend(
                self.composites
                    .iter()
                    .filter(|(_, e)| e.depends_on(current))
                    .map(|(k, _)| *k),
            );
            for dependent in dependents {
                if self.composites.remove(&dependent).is_some() {
                    removed += 1;
                }
                pending.push_back(dependent);
            }
        }

        self.stats.invalidations += removed;
        debug!(%entity, removed, "Invalidated dependents");
    }
}

fn unsupported(entity: EntityRef, err: BuildError) -> MaterializedModel {
    warn!(%entity, code = err.code(), error = %err, "Construction unsupported");
    MaterializedModel::unsupported(&err)
}
