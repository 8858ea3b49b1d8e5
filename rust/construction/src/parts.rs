// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parts list (bill of materials) generation.
//!
//! A materialized model is reduced to per-material part groups: every leaf
//! carrying [`PartInfo`](crate::element::PartInfo) counts as one piece of
//! its part, groups are pure containers and never multiply quantities.
//! Labels (`A`, `B`, ..., `Z`, `AA`, ...) are assigned per material in the
//! order parts are first encountered and restart with every call.

use framewright_model::{Material, MaterialCatalog, MaterialId, Vector3};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::ConstructionConfig;
use crate::element::{ElementId, PartId};
use crate::model::MaterializedModel;

/// Manufacturability problem of a dimensional part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartIssue {
    /// The part's cross-section differs from the material's stock.
    CrossSectionMismatch,
    /// The part is longer than the longest available stock length.
    LengthExceedsAvailable,
}

impl std::fmt::Display for PartIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartIssue::CrossSectionMismatch => f.write_str("cross-section mismatch"),
            PartIssue::LengthExceedsAvailable => f.write_str("length exceeds available stock"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartItem {
    pub part_id: PartId,
    pub label: String,
    pub kind: String,
    pub quantity: usize,
    pub size: Vector3<f64>,
    pub total_volume: f64,
    /// Longest dimension of the first piece, for dimensional materials only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_length: Option<f64>,
    /// First problem found among the part's pieces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<PartIssue>,
    pub elements: Vec<ElementId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialParts {
    pub material: MaterialId,
    pub total_quantity: usize,
    pub total_volume: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_length: Option<f64>,
    pub parts: Vec<PartItem>,
}

impl MaterialParts {
    pub fn part(&self, id: &PartId) -> Option<&PartItem> {
        self.parts.iter().find(|p| &p.part_id == id)
    }
}

/// Parts of a model grouped by material, in first-seen material order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartsReport {
    pub materials: Vec<MaterialParts>,
}

impl PartsReport {
    pub fn material(&self, id: &MaterialId) -> Option<&MaterialParts> {
        self.materials.iter().find(|m| &m.material == id)
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Number of pieces across all materials.
    pub fn total_quantity(&self) -> usize {
        self.materials.iter().map(|m| m.total_quantity).sum()
    }
}

/// Generates the parts list with the default configuration.
pub fn generate_parts_list(
    model: &MaterializedModel,
    materials: &dyn MaterialCatalog,
) -> PartsReport {
    generate_parts_list_with(model, materials, &ConstructionConfig::default())
}

pub fn generate_parts_list_with(
    model: &MaterializedModel,
    materials: &dyn MaterialCatalog,
    config: &ConstructionConfig,
) -> PartsReport {
    let mut report = PartsReport::default();
    let mut material_index: FxHashMap<MaterialId, usize> = FxHashMap::default();
    // (material slot, part id) -> part slot within that material
    let mut part_index: FxHashMap<(usize, PartId), usize> = FxHashMap::default();

    let mut walk = model.leaves(config.max_tree_depth);
    for visit in walk.by_ref() {
        let leaf = visit.leaf;
        let Some(info) = &leaf.part_info else {
            continue;
        };
        let material = materials.material(&leaf.material);

        let m = *material_index.entry(leaf.material.clone()).or_insert_with(|| {
            report.materials.push(MaterialParts {
                material: leaf.material.clone(),
                total_quantity: 0,
                total_volume: 0.0,
                total_length: None,
                parts: Vec::new(),
            });
            report.materials.len() - 1
        });
        let entry = &mut report.materials[m];

        let dimensional = material.filter(|mat| mat.is_dimensional());
        let length = dimensional.map(|_| longest(&info.size));
        let p = *part_index
            .entry((m, info.part_id.clone()))
            .or_insert_with(|| {
                entry.parts.push(PartItem {
                    part_id: info.part_id.clone(),
                    label: label(entry.parts.len()),
                    kind: info.kind.clone(),
                    quantity: 0,
                    size: info.size,
                    total_volume: 0.0,
                    length,
                    total_length: length.map(|_| 0.0),
                    issue: None,
                    elements: Vec::new(),
                });
                entry.parts.len() - 1
            });

        // Leaves sharing a part id may still differ in size
        let part = &mut entry.parts[p];
        let volume = info.volume();
        part.quantity += 1;
        part.total_volume += volume;
        part.elements.push(leaf.id);
        if let Some(length) = length {
            *part.total_length.get_or_insert(0.0) += length;
            *entry.total_length.get_or_insert(0.0) += length;
        }
        if part.issue.is_none() {
            part.issue = material.and_then(|mat| check_part(mat, &info.size, config));
        }
        entry.total_quantity += 1;
        entry.total_volume += volume;
    }

    if walk.truncated() > 0 {
        tracing::warn!(
            skipped_groups = walk.truncated(),
            "Parts list is incomplete, element tree exceeds depth bound"
        );
    }
    report
}

fn longest(size: &Vector3<f64>) -> f64 {
    size.x.max(size.y).max(size.z)
}

/// Cross-section is checked first; a part reports at most one issue.
fn check_part(material: &Material, size: &Vector3<f64>, config: &ConstructionConfig) -> Option<PartIssue> {
    let (a, b) = material.cross_section()?;
    let mut dims = [size.x, size.y, size.z];
    dims.sort_by(|x, y| y.total_cmp(x));
    let (mut sa, mut sb) = (a, b);
    if sa < sb {
        std::mem::swap(&mut sa, &mut sb);
    }
    let tolerance = config.cross_section_tolerance;
    if (dims[1] - sa).abs() > tolerance || (dims[2] - sb).abs() > tolerance {
        return Some(PartIssue::CrossSectionMismatch);
    }
    match material.max_length() {
        Some(max) if dims[0] > max + tolerance => Some(PartIssue::LengthExceedsAvailable),
        _ => None,
    }
}

/// Spreadsheet-style label for a zero-based index: 0 -> A, 25 -> Z, 26 -> AA.
fn label(index: usize) -> String {
    let mut n = index + 1;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
