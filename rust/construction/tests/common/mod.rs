// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared test project: one storey with two rectangular perimeters, a ring
//! beam set on the first and a roof.

#![allow(dead_code)]

use framewright_model::{
    AssemblyConfig, FloorAssembly, JoistConfig, Layer, Material, MaterialKind, PerimeterId,
    BuildingModel, PerimeterSpec, Point2, PostConfig, Project, RingBeamAssembly, RingBeamSetId,
    RoofAssembly, RoofId, StoreyId, WallAssembly, WallId,
};

pub struct House {
    pub project: Project,
    pub storey: StoreyId,
    /// 8000 x 6000, 360 mm walls, carries the ring beams.
    pub main: PerimeterId,
    /// 4000 x 3000 annex, 200 mm walls.
    pub annex: PerimeterId,
    pub ring_beams: RingBeamSetId,
    pub roof: RoofId,
}

pub fn walls(model: &dyn BuildingModel, perimeter: PerimeterId) -> Vec<WallId> {
    model.perimeter(perimeter).unwrap().walls.clone()
}

pub fn rectangle(x: f64, y: f64, width: f64, depth: f64) -> Vec<Point2<f64>> {
    vec![
        Point2::new(x, y),
        Point2::new(x + width, y),
        Point2::new(x + width, y + depth),
        Point2::new(x, y + depth),
    ]
}

pub fn catalogs(project: &mut Project) {
    project.materials.insert(Material::new(
        "kvh",
        "Structural timber 60/360",
        MaterialKind::Dimensional {
            cross_section: (360.0, 60.0),
            lengths: vec![5000.0, 13000.0],
        },
    ));
    project.materials.insert(Material::new(
        "glulam",
        "Glulam 300/120",
        MaterialKind::Dimensional {
            cross_section: (300.0, 120.0),
            lengths: vec![12000.0],
        },
    ));
    project.materials.insert(Material::new(
        "rafter-timber",
        "Structural timber 80/200",
        MaterialKind::Dimensional {
            cross_section: (200.0, 80.0),
            lengths: vec![6000.0],
        },
    ));
    project
        .materials
        .insert(Material::new("osb", "OSB", MaterialKind::Sheet { thickness: 15.0 }));
    project
        .materials
        .insert(Material::new("window", "Window", MaterialKind::Generic));

    project.assemblies.insert(
        "frame-wall",
        AssemblyConfig::Wall(WallAssembly {
            layers: vec![Layer {
                name: "sheathing".into(),
                material: "osb".into(),
                thickness: 15.0,
            }],
            post: Some(PostConfig {
                material: "kvh".into(),
                width: 60.0,
                depth: 360.0,
                spacing: 625.0,
            }),
        }),
    );
    project.assemblies.insert(
        "ring-beam",
        AssemblyConfig::RingBeam(RingBeamAssembly {
            material: "glulam".into(),
            width: 300.0,
            height: 120.0,
        }),
    );
    project.assemblies.insert(
        "slab",
        AssemblyConfig::Floor(FloorAssembly {
            layers: vec![Layer {
                name: "decking".into(),
                material: "osb".into(),
                thickness: 22.0,
            }],
            joist: Some(JoistConfig {
                material: "kvh".into(),
                width: 60.0,
                height: 360.0,
                spacing: 625.0,
            }),
        }),
    );
    project.assemblies.insert(
        "rafter-roof",
        AssemblyConfig::Roof(RoofAssembly {
            layers: vec![Layer {
                name: "sarking".into(),
                material: "osb".into(),
                thickness: 22.0,
            }],
            rafter: Some(JoistConfig {
                material: "rafter-timber".into(),
                width: 80.0,
                height: 200.0,
                spacing: 800.0,
            }),
        }),
    );
}

pub fn house() -> House {
    let mut project = Project::new();
    catalogs(&mut project);

    let building = &mut project.building;
    let storey = building.add_storey("Ground floor", 0.0, 2800.0);
    let main = building
        .add_perimeter(
            storey,
            PerimeterSpec {
                corners: rectangle(0.0, 0.0, 8000.0, 6000.0),
                wall_thickness: 360.0,
                wall_height: None,
                wall_assembly: "frame-wall".into(),
            },
        )
        .unwrap();
    let annex = building
        .add_perimeter(
            storey,
            PerimeterSpec {
                corners: rectangle(10000.0, 0.0, 4000.0, 3000.0),
                wall_thickness: 200.0,
                wall_height: None,
                wall_assembly: "frame-wall".into(),
            },
        )
        .unwrap();
    let ring_beams = building.add_ring_beam_set(main, "ring-beam".into()).unwrap();
    let roof = building
        .add_roof(storey, rectangle(0.0, 0.0, 8000.0, 6000.0), 30.0, "rafter-roof".into())
        .unwrap();

    House {
        project,
        storey,
        main,
        annex,
        ring_beams,
        roof,
    }
}
