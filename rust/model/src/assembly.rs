// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Assembly configurations: the declarative layer stacks and member layouts
//! that turn a wall, floor, roof or ring beam outline into construction.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::ids::{AssemblyId, MaterialId};
use crate::revision::{Revision, RevisionClock};

/// One layer of a build-up, e.g. a board or an insulation mat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    pub material: MaterialId,
    pub thickness: f64,
}

/// Vertical posts of a frame wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostConfig {
    pub material: MaterialId,
    /// Size along the wall.
    pub width: f64,
    /// Size across the wall.
    pub depth: f64,
    /// Distance between post starts.
    pub spacing: f64,
}

/// Horizontal members of a floor (joists) or roof (rafters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoistConfig {
    pub material: MaterialId,
    pub width: f64,
    pub height: f64,
    pub spacing: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WallAssembly {
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub post: Option<PostConfig>,
}

impl WallAssembly {
    /// Total thickness of the layer stack.
    pub fn layer_thickness(&self) -> f64 {
        self.layers.iter().map(|l| l.thickness).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FloorAssembly {
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub joist: Option<JoistConfig>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoofAssembly {
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub rafter: Option<JoistConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingBeamAssembly {
    pub material: MaterialId,
    pub width: f64,
    pub height: f64,
}

/// Any assembly configuration, tagged by the kind of entity it applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AssemblyConfig {
    Wall(WallAssembly),
    Floor(FloorAssembly),
    Roof(RoofAssembly),
    RingBeam(RingBeamAssembly),
}

/// Read access to assembly configurations.
///
/// A missing id, or an id that refers to an assembly of the wrong kind, is
/// reported as `None`; callers treat that as an invalid assembly rather than
/// a crash.
pub trait AssemblyCatalog {
    fn wall_assembly(&self, id: &AssemblyId) -> Option<&WallAssembly>;
    fn floor_assembly(&self, id: &AssemblyId) -> Option<&FloorAssembly>;
    fn roof_assembly(&self, id: &AssemblyId) -> Option<&RoofAssembly>;
    fn ring_beam_assembly(&self, id: &AssemblyId) -> Option<&RingBeamAssembly>;

    /// Revision of the assembly's last change. Ids that are not in the
    /// catalog report the revision of the last insertion or removal, so a
    /// deleted assembly still changes the answer.
    fn revision_of(&self, id: &AssemblyId) -> Revision;
}

/// In-memory assembly catalog.
#[derive(Debug, Default)]
pub struct Assemblies {
    clock: RevisionClock,
    entries: FxHashMap<AssemblyId, (AssemblyConfig, Revision)>,
    structure: Revision,
}

impl Assemblies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog stamping its changes with a shared clock.
    pub fn with_clock(clock: RevisionClock) -> Self {
        Self {
            clock,
            ..Self::default()
        }
    }

    /// Inserts or replaces an assembly.
    pub fn insert(&mut self, id: impl Into<AssemblyId>, config: AssemblyConfig) {
        let revision = self.clock.tick();
        self.structure = revision;
        self.entries.insert(id.into(), (config, revision));
    }

    /// Removes an assembly, returning it if it existed.
    pub fn remove(&mut self, id: &AssemblyId) -> Option<AssemblyConfig> {
        let removed = self.entries.remove(id).map(|(config, _)| config);
        if removed.is_some() {
            self.structure = self.clock.tick();
        }
        removed
    }

    pub fn get(&self, id: &AssemblyId) -> Option<&AssemblyConfig> {
        self.entries.get(id).map(|(config, _)| config)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AssemblyCatalog for Assemblies {
    fn wall_assembly(&self, id: &AssemblyId) -> Option<&WallAssembly> {
        match self.get(id)? {
            AssemblyConfig::Wall(a) => Some(a),
            _ => None,
        }
    }

    fn floor_assembly(&self, id: &AssemblyId) -> Option<&FloorAssembly> {
        match self.get(id)? {
            AssemblyConfig::Floor(a) => Some(a),
            _ => None,
        }
    }

    fn roof_assembly(&self, id: &AssemblyId) -> Option<&RoofAssembly> {
        match self.get(id)? {
            AssemblyConfig::Roof(a) => Some(a),
            _ => None,
        }
    }

    fn ring_beam_assembly(&self, id: &AssemblyId) -> Option<&RingBeamAssembly> {
        match self.get(id)? {
            AssemblyConfig::RingBeam(a) => Some(a),
            _ => None,
        }
    }

    fn revision_of(&self, id: &AssemblyId) -> Revision {
        self.entries
            .get(id)
            .map(|(_, revision)| *revision)
            .unwrap_or(self.structure)
    }
}
