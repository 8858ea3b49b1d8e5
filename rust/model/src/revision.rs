// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Content revisions.
//!
//! Staleness is decided by content version, never by wall-clock time. All
//! stores of one project share a single [`RevisionClock`]; every mutation
//! takes the next tick and stamps the entities it touched. A derived
//! artifact records the highest revision among its inputs as its
//! [`VersionToken`]. Because ticks strictly increase across all stores, any
//! later change to any input produces a token that differs from every token
//! computed before it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A tick of the shared revision clock.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Revision(pub u64);

impl Revision {
    pub const ZERO: Revision = Revision(0);

    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Monotonic revision counter shared between the stores of one project.
///
/// Cloning the clock shares the counter.
#[derive(Debug, Clone, Default)]
pub struct RevisionClock {
    counter: Arc<AtomicU64>,
}

impl RevisionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock and returns the new revision.
    pub fn tick(&self) -> Revision {
        Revision(self.counter.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Returns the latest revision handed out.
    pub fn current(&self) -> Revision {
        Revision(self.counter.load(Ordering::Relaxed))
    }
}

/// What a derived artifact was computed from: the highest revision of all
/// of its inputs.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct VersionToken(u64);

impl VersionToken {
    pub const INITIAL: VersionToken = VersionToken(0);

    /// Folds a revision into the token.
    pub fn include(&mut self, revision: Revision) {
        self.0 = self.0.max(revision.0);
    }

    /// Returns the token covering both `self` and `other`.
    pub fn combine(self, other: VersionToken) -> VersionToken {
        VersionToken(self.0.max(other.0))
    }

    pub fn from_revisions(revisions: impl IntoIterator<Item = Revision>) -> Self {
        let mut token = Self::INITIAL;
        for revision in revisions {
            token.include(revision);
        }
        token
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<Revision> for VersionToken {
    fn from(revision: Revision) -> Self {
        VersionToken(revision.0)
    }
}

impl std::fmt::Display for VersionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_shared_between_clones() {
        let clock = RevisionClock::new();
        let other = clock.clone();
        assert_eq!(clock.tick(), Revision(1));
        assert_eq!(other.tick(), Revision(2));
        assert_eq!(clock.current(), Revision(2));
    }

    #[test]
    fn token_takes_the_highest_revision() {
        let token = VersionToken::from_revisions([Revision(3), Revision(9), Revision(4)]);
        assert_eq!(token.get(), 9);
        assert_eq!(token.combine(VersionToken::from(Revision(2))), token);
        assert_eq!(VersionToken::from_revisions([]), VersionToken::INITIAL);
    }
}
