// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Framewright Construction
//!
//! Derives concrete construction from a building description: builders turn
//! walls, roofs, floors and ring beams into element trees, the
//! [`GeometryCache`] keeps those models and composes them into runs,
//! perimeters, storeys and the whole building, and
//! [`generate_parts_list`] reduces any model to a bill of materials.
//!
//! ## Quick Start
//!
//! ```rust
//! use framewright_construction::{generate_parts_list, GeometryCache};
//! use framewright_model::{
//!     AssemblyConfig, Layer, PerimeterSpec, Point2, Project, WallAssembly,
//! };
//!
//! let mut project = Project::new();
//! project.assemblies.insert(
//!     "clay-wall",
//!     AssemblyConfig::Wall(WallAssembly {
//!         layers: vec![Layer {
//!             name: "plaster".into(),
//!             material: "clay".into(),
//!             thickness: 20.0,
//!         }],
//!         post: None,
//!     }),
//! );
//! let storey = project.building.add_storey("Ground floor", 0.0, 2500.0);
//! project
//!     .building
//!     .add_perimeter(
//!         storey,
//!         PerimeterSpec {
//!             corners: vec![
//!                 Point2::new(0.0, 0.0),
//!                 Point2::new(4000.0, 0.0),
//!                 Point2::new(4000.0, 3000.0),
//!                 Point2::new(0.0, 3000.0),
//!             ],
//!             wall_thickness: 300.0,
//!             wall_height: None,
//!             wall_assembly: "clay-wall".into(),
//!         },
//!     )
//!     .unwrap();
//!
//! let mut cache = GeometryCache::new(project);
//! let building = cache.get_building();
//! let parts = generate_parts_list(&building.model, &cache.source().materials);
//! assert_eq!(parts.total_quantity(), 4);
//! ```

pub mod builders;
pub mod cache;
pub mod config;
pub mod element;
pub mod error;
pub mod issue;
pub mod model;
pub mod parts;
pub mod results;
pub mod source;

pub use cache::{CacheResult, CacheStats, GeometryCache};
pub use config::ConstructionConfig;
pub use element::{Element, ElementGroup, ElementId, ElementLeaf, PartId, PartInfo, Shape, Walk};
pub use error::{BuildError, Result};
pub use issue::{ConstructionResult, Issue, IssueId, Severity};
pub use model::{HighlightedArea, MaterializedModel, Measurement};
pub use parts::{
    generate_parts_list, generate_parts_list_with, MaterialParts, PartIssue, PartItem, PartsReport,
};
pub use results::{aggregate_results, AggregatedIssues};
pub use source::{BuildContext, ConstructionSource};
