// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Diagnostics attached to materialized models.

use framewright_model::Bounds3;
use serde::{Deserialize, Serialize};

use crate::element::ElementId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Stable identifier of an issue, e.g. `invalid-assembly`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(String);

impl IssueId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IssueId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for IssueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A diagnostic with optional merge identity.
///
/// Two issues are the same for deduplication when they share an `id`, or,
/// lacking ids, a `group_key`. Issues with neither are never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<IssueId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_key: Option<String>,
    pub description: String,
    pub severity: Severity,
    #[serde(default)]
    pub elements: Vec<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds3>,
}

impl Issue {
    pub fn new(severity: Severity, description: impl Into<String>) -> Self {
        Self {
            id: None,
            group_key: None,
            description: description.into(),
            severity,
            elements: Vec::new(),
            bounds: None,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self::new(Severity::Error, description)
    }

    pub fn warning(description: impl Into<String>) -> Self {
        Self::new(Severity::Warning, description)
    }

    pub fn with_id(mut self, id: impl Into<IssueId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_group_key(mut self, key: impl Into<String>) -> Self {
        self.group_key = Some(key.into());
        self
    }

    pub fn with_elements(mut self, elements: impl IntoIterator<Item = ElementId>) -> Self {
        self.elements.extend(elements);
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds3) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

/// An issue tagged with the stream it belongs to. Aggregation never merges
/// across the error/warning boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstructionResult {
    Error(Issue),
    Warning(Issue),
}

impl ConstructionResult {
    pub fn severity(&self) -> Severity {
        match self {
            ConstructionResult::Error(_) => Severity::Error,
            ConstructionResult::Warning(_) => Severity::Warning,
        }
    }

    pub fn issue(&self) -> &Issue {
        match self {
            ConstructionResult::Error(issue) | ConstructionResult::Warning(issue) => issue,
        }
    }

    pub fn into_issue(self) -> Issue {
        match self {
            ConstructionResult::Error(issue) | ConstructionResult::Warning(issue) => issue,
        }
    }
}

impl From<Issue> for ConstructionResult {
    /// Tags the issue by its own severity.
    fn from(issue: Issue) -> Self {
        match issue.severity {
            Severity::Error => ConstructionResult::Error(issue),
            Severity::Warning => ConstructionResult::Warning(issue),
        }
    }
}
