// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A building together with the catalogs it references.

use crate::assembly::Assemblies;
use crate::building::Building;
use crate::material::Materials;
use crate::revision::RevisionClock;

/// The three stores the construction pipeline reads from, sharing one
/// revision clock so their revisions are comparable.
#[derive(Debug)]
pub struct Project {
    pub building: Building,
    pub assemblies: Assemblies,
    pub materials: Materials,
    clock: RevisionClock,
}

impl Project {
    pub fn new() -> Self {
        let clock = RevisionClock::new();
        Self {
            building: Building::with_clock(clock.clone()),
            assemblies: Assemblies::with_clock(clock.clone()),
            materials: Materials::with_clock(clock.clone()),
            clock,
        }
    }

    pub fn clock(&self) -> &RevisionClock {
        &self.clock
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}
