// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Folding tagged construction results into deduplicated issue lists.
//!
//! Errors and warnings are grouped independently. Within a stream, issues
//! are identified by `id`, else by `group_key`, else they are unique. The
//! first occurrence of an identity fixes the description; later occurrences
//! only contribute their elements (appended, deduplicated, first-seen order
//! kept) and bounds (axis-aligned union). Output order is the order in which
//! identities were first seen.

use framewright_model::Bounds3;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::element::ElementId;
use crate::issue::{ConstructionResult, Issue, IssueId, Severity};

/// Deduplicated errors and warnings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedIssues {
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

impl AggregatedIssues {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Re-tags the issues as results, errors first.
    pub fn into_results(self) -> impl Iterator<Item = ConstructionResult> {
        self.errors
            .into_iter()
            .map(ConstructionResult::Error)
            .chain(self.warnings.into_iter().map(ConstructionResult::Warning))
    }
}

/// Aggregates a flat list of tagged results into deduplicated error and
/// warning lists.
pub fn aggregate_results(results: impl IntoIterator<Item = ConstructionResult>) -> AggregatedIssues {
    let mut errors = IssueGroups::new(Severity::Error);
    let mut warnings = IssueGroups::new(Severity::Warning);

    for result in results {
        match result {
            ConstructionResult::Error(issue) => errors.push(issue),
            ConstructionResult::Warning(issue) => warnings.push(issue),
        }
    }

    AggregatedIssues {
        errors: errors.finish(),
        warnings: warnings.finish(),
    }
}

/// Merge identity of an issue. Ids and group keys live in separate
/// namespaces so an id never collides with an equal group key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    Id(IssueId),
    Key(String),
}

impl GroupKey {
    fn of(issue: &Issue) -> Option<GroupKey> {
        match (&issue.id, &issue.group_key) {
            (Some(id), _) => Some(GroupKey::Id(id.clone())),
            (None, Some(key)) => Some(GroupKey::Key(key.clone())),
            (None, None) => None,
        }
    }
}

/// One severity stream being folded.
struct IssueGroups {
    severity: Severity,
    issues: Vec<Issue>,
    index: FxHashMap<GroupKey, usize>,
    // Elements already recorded per output issue
    seen: Vec<FxHashSet<ElementId>>,
}

impl IssueGroups {
    fn new(severity: Severity) -> Self {
        Self {
            severity,
            issues: Vec::new(),
            index: FxHashMap::default(),
            seen: Vec::new(),
        }
    }

    fn push(&mut self, mut issue: Issue) {
        let existing = GroupKey::of(&issue).and_then(|key| match self.index.get(&key) {
            Some(&slot) => Some(slot),
            None => {
                self.index.insert(key, self.issues.len());
                None
            }
        });

        match existing {
            Some(slot) => self.merge_into(slot, issue),
            None => {
                issue.severity = self.severity;
                let mut seen = FxHashSet::default();
                issue.elements.retain(|e| seen.insert(*e));
                self.issues.push(issue);
                self.seen.push(seen);
            }
        }
    }

    fn merge_into(&mut self, slot: usize, issue: Issue) {
        let target = &mut self.issues[slot];
        let seen = &mut self.seen[slot];
        for element in issue.elements {
            if seen.insert(element) {
                target.elements.push(element);
            }
        }
        target.bounds = Bounds3::merge(target.bounds, issue.bounds);
    }

    fn finish(self) -> Vec<Issue> {
        self.issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framewright_model::Point3;

    fn ids(n: usize) -> Vec<ElementId> {
        (0..n).map(|_| ElementId::next()).collect()
    }

    #[test]
    fn duplicate_ids_keep_first_description() {
        let results = vec![
            ConstructionResult::Error(Issue::error("first").with_id("ci_duplicate")),
            ConstructionResult::Error(Issue::error("second").with_id("ci_duplicate")),
        ];
        let aggregated = aggregate_results(results);
        assert_eq!(aggregated.errors.len(), 1);
        assert_eq!(aggregated.errors[0].description, "first");
        assert!(aggregated.warnings.is_empty());
    }

    #[test]
    fn errors_and_warnings_never_merge() {
        let results = vec![
            ConstructionResult::Error(Issue::error("e").with_group_key("shared")),
            ConstructionResult::Warning(Issue::warning("w").with_group_key("shared")),
        ];
        let aggregated = aggregate_results(results);
        assert_eq!(aggregated.errors.len(), 1);
        assert_eq!(aggregated.warnings.len(), 1);
        assert_eq!(aggregated.warnings[0].severity, Severity::Warning);
    }

    #[test]
    fn ungrouped_issues_stay_separate() {
        let results = vec![
            ConstructionResult::Warning(Issue::warning("same text")),
            ConstructionResult::Warning(Issue::warning("same text")),
        ];
        assert_eq!(aggregate_results(results).warnings.len(), 2);
    }

    #[test]
    fn elements_are_appended_and_deduplicated_in_order() {
        let e = ids(4);
        let results = vec![
            ConstructionResult::Error(
                Issue::error("gap").with_group_key("gap").with_elements([e[0], e[1], e[0]]),
            ),
            ConstructionResult::Error(Issue::error("other")),
            ConstructionResult::Error(
                Issue::error("gap again").with_group_key("gap").with_elements([e[2], e[1], e[3]]),
            ),
        ];
        let aggregated = aggregate_results(results);
        assert_eq!(aggregated.errors.len(), 2);
        assert_eq!(aggregated.errors[0].description, "gap");
        assert_eq!(aggregated.errors[0].elements, vec![e[0], e[1], e[2], e[3]]);
        assert_eq!(aggregated.errors[1].description, "other");
    }

    #[test]
    fn bounds_merge_to_union() {
        let a = Bounds3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let b = Bounds3::new(Point3::new(1.0, 1.0, 1.0), Point3::new(2.0, 2.0, 2.0));
        for (first, second) in [(a, b), (b, a)] {
            let results = vec![
                ConstructionResult::Warning(Issue::warning("x").with_group_key("k").with_bounds(first)),
                ConstructionResult::Warning(Issue::warning("x").with_group_key("k").with_bounds(second)),
            ];
            let merged = aggregate_results(results).warnings[0].bounds.unwrap();
            assert_eq!(merged.min, Point3::new(0.0, 0.0, 0.0));
            assert_eq!(merged.max, Point3::new(2.0, 2.0, 2.0));
        }
    }

    #[test]
    fn missing_bounds_keep_other_side() {
        let a = Bounds3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let results = vec![
            ConstructionResult::Warning(Issue::warning("x").with_group_key("k")),
            ConstructionResult::Warning(Issue::warning("x").with_group_key("k").with_bounds(a)),
        ];
        assert_eq!(aggregate_results(results).warnings[0].bounds, Some(a));
    }

    #[test]
    fn id_takes_precedence_over_group_key() {
        let results = vec![
            ConstructionResult::Error(Issue::error("a").with_id("x").with_group_key("k1")),
            ConstructionResult::Error(Issue::error("b").with_id("x").with_group_key("k2")),
            ConstructionResult::Error(Issue::error("c").with_group_key("x")),
        ];
        let aggregated = aggregate_results(results);
        assert_eq!(aggregated.errors.len(), 2);
        assert_eq!(aggregated.errors[1].description, "c");
    }

    #[test]
    fn reaggregation_is_stable_in_either_order() {
        let e = ids(3);
        let left = vec![
            Issue::error("l").with_group_key("k").with_elements([e[0], e[1]]),
        ];
        let right = vec![Issue::error("r").with_group_key("k").with_elements([e[1], e[2]])];

        let once = aggregate_results(
            left.iter().chain(&right).cloned().map(ConstructionResult::from),
        );
        let twice = aggregate_results(
            once.clone()
                .into_results()
                .chain(right.iter().cloned().map(ConstructionResult::from)),
        );
        assert_eq!(once, twice);
        assert_eq!(once.errors[0].elements, vec![e[0], e[1], e[2]]);
    }
}
