// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Access to the stores the pipeline derives construction from.

use framewright_model::{AssemblyCatalog, BuildingModel, MaterialCatalog, Project};

use crate::config::ConstructionConfig;

/// The building model, assembly configurations and material catalog a
/// [`GeometryCache`](crate::cache::GeometryCache) reads from.
pub trait ConstructionSource {
    fn model(&self) -> &dyn BuildingModel;
    fn assemblies(&self) -> &dyn AssemblyCatalog;
    fn materials(&self) -> &dyn MaterialCatalog;
}

impl ConstructionSource for Project {
    fn model(&self) -> &dyn BuildingModel {
        &self.building
    }

    fn assemblies(&self) -> &dyn AssemblyCatalog {
        &self.assemblies
    }

    fn materials(&self) -> &dyn MaterialCatalog {
        &self.materials
    }
}

/// Everything a builder reads, borrowed for the duration of one build.
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
    pub model: &'a dyn BuildingModel,
    pub assemblies: &'a dyn AssemblyCatalog,
    pub materials: &'a dyn MaterialCatalog,
    pub config: &'a ConstructionConfig,
}

impl<'a> BuildContext<'a> {
    pub fn new<S: ConstructionSource + ?Sized>(source: &'a S, config: &'a ConstructionConfig) -> Self {
        Self {
            model: source.model(),
            assemblies: source.assemblies(),
            materials: source.materials(),
            config,
        }
    }
}
