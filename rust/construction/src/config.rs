// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipeline configuration, loadable from environment variables.

use serde::{Deserialize, Serialize};

/// Tuning knobs of the construction pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstructionConfig {
    /// Allowed deviation (mm) between a part's cross-section and its
    /// material's declared cross-section.
    pub cross_section_tolerance: f64,
    /// Deepest group nesting traversed when reducing element trees.
    pub max_tree_depth: usize,
}

impl ConstructionConfig {
    pub const DEFAULT_CROSS_SECTION_TOLERANCE: f64 = 1.0;
    pub const DEFAULT_MAX_TREE_DEPTH: usize = 64;

    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self {
            cross_section_tolerance: std::env::var("FRAMEWRIGHT_CROSS_SECTION_TOLERANCE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(Self::DEFAULT_CROSS_SECTION_TOLERANCE),
            max_tree_depth: std::env::var("FRAMEWRIGHT_MAX_TREE_DEPTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(Self::DEFAULT_MAX_TREE_DEPTH),
        }
    }
}

impl Default for ConstructionConfig {
    fn default() -> Self {
        Self {
            cross_section_tolerance: Self::DEFAULT_CROSS_SECTION_TOLERANCE,
            max_tree_depth: Self::DEFAULT_MAX_TREE_DEPTH,
        }
    }
}
