// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Report rendering.

use std::fmt::Write;

use framewright_construction::{CacheStats, Issue, MaterializedModel, PartsReport};
use serde::Serialize;

/// Everything printed for one materialized target.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub target: String,
    pub is_outdated: bool,
    pub errors: &'a [Issue],
    pub warnings: &'a [Issue],
    pub parts: &'a PartsReport,
    pub cache: CacheStats,
}

impl<'a> Report<'a> {
    pub fn new(
        target: String,
        model: &'a MaterializedModel,
        is_outdated: bool,
        parts: &'a PartsReport,
        cache: CacheStats,
    ) -> Self {
        Self {
            target,
            is_outdated,
            errors: &model.errors,
            warnings: &model.warnings,
            parts,
            cache,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_text(&self) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        self.write_text(&mut out)?;
        Ok(out)
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "{}", self.target)?;
        if self.is_outdated {
            writeln!(out, "  (outdated)")?;
        }

        for (label, issues) in [("error", self.errors), ("warning", self.warnings)] {
            for issue in issues {
                write!(out, "  {}: {}", label, issue.description)?;
                if !issue.elements.is_empty() {
                    write!(out, " ({} elements)", issue.elements.len())?;
                }
                writeln!(out)?;
            }
        }

        for material in &self.parts.materials {
            writeln!(out)?;
            write!(
                out,
                "{}: {} pieces, {:.3} m3",
                material.material,
                material.total_quantity,
                material.total_volume / 1e9
            )?;
            if let Some(length) = material.total_length {
                write!(out, ", {:.2} m", length / 1000.0)?;
            }
            writeln!(out)?;

            for part in &material.parts {
                let mut dims = [part.size.x, part.size.y, part.size.z];
                dims.sort_by(|a, b| b.total_cmp(a));
                write!(
                    out,
                    "  {:>3}  {:<10} {:>6.0} x {:>5.0} x {:>5.0}  x{}",
                    part.label, part.kind, dims[0], dims[1], dims[2], part.quantity
                )?;
                if let Some(issue) = part.issue {
                    write!(out, "  [{}]", issue)?;
                }
                writeln!(out)?;
            }
        }
        Ok(())
    }
}
