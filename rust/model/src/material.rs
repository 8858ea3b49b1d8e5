// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material catalog.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::ids::MaterialId;
use crate::revision::{Revision, RevisionClock};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MaterialKind {
    /// Linear stock with a fixed cross-section, sold in standard lengths.
    Dimensional {
        cross_section: (f64, f64),
        #[serde(default)]
        lengths: Vec<f64>,
    },
    /// Boards and panels.
    Sheet { thickness: f64 },
    /// Bulk material measured by volume (insulation, concrete).
    Volume,
    /// Fixed units such as windows and doors.
    Generic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    pub kind: MaterialKind,
}

impl Material {
    pub fn new(id: impl Into<MaterialId>, name: impl Into<String>, kind: MaterialKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }

    pub fn is_dimensional(&self) -> bool {
        matches!(self.kind, MaterialKind::Dimensional { .. })
    }

    pub fn cross_section(&self) -> Option<(f64, f64)> {
        match self.kind {
            MaterialKind::Dimensional { cross_section, .. } => Some(cross_section),
            _ => None,
        }
    }

    /// Longest standard stock length, if the material declares any.
    pub fn max_length(&self) -> Option<f64> {
        match &self.kind {
            MaterialKind::Dimensional { lengths, .. } => lengths.iter().copied().reduce(f64::max),
            _ => None,
        }
    }
}

/// Read access to material definitions.
pub trait MaterialCatalog {
    fn material(&self, id: &MaterialId) -> Option<&Material>;

    /// Revision of the catalog's last change.
    fn revision(&self) -> Revision;
}

/// In-memory material catalog.
#[derive(Debug, Default)]
pub struct Materials {
    clock: RevisionClock,
    entries: FxHashMap<MaterialId, Material>,
    revision: Revision,
}

impl Materials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: RevisionClock) -> Self {
        Self {
            clock,
            ..Self::default()
        }
    }

    /// Inserts or replaces a material.
    pub fn insert(&mut self, material: Material) {
        self.revision = self.clock.tick();
        self.entries.insert(material.id.clone(), material);
    }

    pub fn remove(&mut self, id: &MaterialId) -> Option<Material> {
        let removed = self.entries.remove(id);
        if removed.is_some() {
            self.revision = self.clock.tick();
        }
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MaterialCatalog for Materials {
    fn material(&self, id: &MaterialId) -> Option<&Material> {
        self.entries.get(id)
    }

    fn revision(&self) -> Revision {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensional_accessors() {
        let m = Material::new(
            "kvh",
            "Spruce KVH 60/360",
            MaterialKind::Dimensional {
                cross_section: (60.0, 360.0),
                lengths: vec![5000.0, 13000.0, 8000.0],
            },
        );
        assert!(m.is_dimensional());
        assert_eq!(m.cross_section(), Some((60.0, 360.0)));
        assert_eq!(m.max_length(), Some(13000.0));

        let window = Material::new("window", "Window", MaterialKind::Generic);
        assert!(!window.is_dimensional());
        assert_eq!(window.max_length(), None);
    }

    #[test]
    fn insert_bumps_revision() {
        let mut catalog = Materials::new();
        let before = catalog.revision();
        catalog.insert(Material::new("straw", "Straw bale", MaterialKind::Volume));
        assert!(catalog.revision() > before);
        assert!(catalog.material(&MaterialId::from("straw")).is_some());
    }
}
