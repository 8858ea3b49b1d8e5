// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON project files.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use framewright_model::{
    AssemblyConfig, AssemblyId, BuildingModel, Material, Opening, PerimeterSpec, Point2, Project,
    StoreyId,
};
use serde::Deserialize;

/// On-disk description of a project: catalogs plus storeys listed
/// bottom-up with their perimeters, roofs and floors.
#[derive(Debug, Deserialize)]
pub struct ProjectFile {
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub assemblies: BTreeMap<String, AssemblyConfig>,
    #[serde(default)]
    pub storeys: Vec<StoreyFile>,
}

#[derive(Debug, Deserialize)]
pub struct StoreyFile {
    pub name: String,
    pub elevation: f64,
    pub height: f64,
    #[serde(default)]
    pub floor_assembly: Option<AssemblyId>,
    #[serde(default)]
    pub perimeters: Vec<PerimeterFile>,
    #[serde(default)]
    pub roofs: Vec<RoofFile>,
    #[serde(default)]
    pub floors: Vec<FloorFile>,
}

#[derive(Debug, Deserialize)]
pub struct PerimeterFile {
    #[serde(flatten)]
    pub spec: PerimeterSpec,
    #[serde(default)]
    pub ring_beam_assembly: Option<AssemblyId>,
    #[serde(default)]
    pub openings: Vec<OpeningFile>,
}

/// An opening on the perimeter's `wall`-th wall.
#[derive(Debug, Deserialize)]
pub struct OpeningFile {
    pub wall: usize,
    #[serde(flatten)]
    pub opening: Opening,
}

#[derive(Debug, Deserialize)]
pub struct RoofFile {
    pub outline: Vec<Point2<f64>>,
    pub pitch_degrees: f64,
    pub assembly: AssemblyId,
}

#[derive(Debug, Deserialize)]
pub struct FloorFile {
    pub outline: Vec<Point2<f64>>,
    pub assembly: AssemblyId,
}

impl ProjectFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read project file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse project file {}", path.display()))
    }

    /// Populates a fresh project. Storeys are returned in file order.
    pub fn into_project(self) -> Result<(Project, Vec<StoreyId>)> {
        let mut project = Project::new();
        for material in self.materials {
            project.materials.insert(material);
        }
        for (id, config) in self.assemblies {
            project.assemblies.insert(id, config);
        }

        let mut storeys = Vec::with_capacity(self.storeys.len());
        for storey in self.storeys {
            let building = &mut project.building;
            let id = building.add_storey(storey.name.clone(), storey.elevation, storey.height);
            if storey.floor_assembly.is_some() {
                building.set_storey_floor_assembly(id, storey.floor_assembly)?;
            }

            for (index, perimeter) in storey.perimeters.into_iter().enumerate() {
                let perimeter_id = building
                    .add_perimeter(id, perimeter.spec)
                    .with_context(|| format!("Perimeter {} of storey '{}'", index, storey.name))?;
                let walls = building
                    .perimeter(perimeter_id)
                    .map(|p| p.walls.clone())
                    .unwrap_or_default();
                for opening in perimeter.openings {
                    let wall = *walls.get(opening.wall).with_context(|| {
                        format!(
                            "Opening references wall {} but perimeter {} of storey '{}' has {} walls",
                            opening.wall,
                            index,
                            storey.name,
                            walls.len()
                        )
                    })?;
                    building.add_opening(wall, opening.opening)?;
                }
                if let Some(assembly) = perimeter.ring_beam_assembly {
                    building.add_ring_beam_set(perimeter_id, assembly)?;
                }
            }
            for roof in storey.roofs {
                building.add_roof(id, roof.outline, roof.pitch_degrees, roof.assembly)?;
            }
            for floor in storey.floors {
                building.add_floor(id, floor.outline, floor.assembly)?;
            }
            storeys.push(id);
        }
        Ok((project, storeys))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_HOUSE: &str = include_str!("../fixtures/small-house.json");

    #[test]
    fn loads_fixture() {
        let file: ProjectFile = serde_json::from_str(SMALL_HOUSE).unwrap();
        let (project, storeys) = file.into_project().unwrap();

        assert_eq!(storeys.len(), 2);
        assert_eq!(project.building.storeys(), storeys);
        assert_eq!(project.building.wall_count(), 8);
        let ground = project.building.perimeters_by_storey(storeys[0]);
        assert_eq!(ground.len(), 1);
        let perimeter = project.building.perimeter(ground[0]).unwrap();
        assert_eq!(perimeter.ring_beams.len(), 1);
        let first_wall = project.building.wall(perimeter.walls[0]).unwrap();
        assert_eq!(first_wall.openings.len(), 2);
        assert_eq!(project.building.roofs_by_storey(storeys[1]).len(), 1);
    }

    #[test]
    fn rejects_opening_on_missing_wall() {
        let json = r#"{
            "storeys": [{
                "name": "EG", "elevation": 0, "height": 2500,
                "perimeters": [{
                    "corners": [[0, 0], [1000, 0], [1000, 1000]],
                    "wall_thickness": 200,
                    "wall_assembly": "w",
                    "openings": [{"wall": 7, "offset": 0, "width": 100, "sill_height": 0, "height": 100, "material": "door"}]
                }]
            }]
        }"#;
        let file: ProjectFile = serde_json::from_str(json).unwrap();
        let err = file.into_project().unwrap_err();
        assert!(err.to_string().contains("wall 7"));
    }
}
