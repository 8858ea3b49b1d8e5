// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core builders against the shared test house.

mod common;

use approx::assert_relative_eq;
use common::{house, rectangle, walls};
use framewright_construction::builders::{
    build_core, build_ring_beam_set, build_roof, build_storey_floor, build_wall,
};
use framewright_construction::{BuildContext, ConstructionConfig, Issue, MaterializedModel};
use framewright_model::{
    AssemblyConfig, BuildingModel, EntityRef, Layer, Opening, Point2, PostConfig, StoreyFloorId,
    WallAssembly, WallUpdate,
};

fn kinds(model: &MaterializedModel, kind: &str) -> usize {
    model
        .leaves(64)
        .filter(|visit| visit.leaf.part_info.as_ref().is_some_and(|p| p.kind == kind))
        .count()
}

fn issue<'a>(issues: &'a [Issue], group_key: &str) -> &'a Issue {
    issues
        .iter()
        .find(|i| i.group_key.as_deref() == Some(group_key))
        .unwrap_or_else(|| panic!("no issue with group key {group_key}: {issues:?}"))
}

fn opening(offset: f64, width: f64, sill_height: f64, height: f64) -> Opening {
    Opening {
        offset,
        width,
        sill_height,
        height,
        material: "window".into(),
    }
}

#[test]
fn wall_posts_fill_the_length() {
    let house = house();
    let config = ConstructionConfig::default();
    let ctx = BuildContext::new(&house.project, &config);
    let wall = walls(&house.project.building, house.main)[0];
    assert_eq!(house.project.building.wall(wall).unwrap().length(), 8000.0);

    let model = build_wall(&ctx, wall).unwrap();

    // 0, 625, ..., 7500 and one flush with the end at 7940
    assert_eq!(kinds(&model, "post"), 14);
    assert_eq!(kinds(&model, "layer"), 1);
    assert!(model.errors.is_empty());
    assert!(model.warnings.is_empty());

    let post = model
        .leaves(64)
        .find(|v| v.leaf.part_info.as_ref().is_some_and(|p| p.kind == "post"))
        .unwrap();
    assert_eq!(post.leaf.part_info.as_ref().unwrap().part_id.as_str(), "kvh:2800x360x60");

    let length = model.measurements.iter().find(|m| m.label == "wall length").unwrap();
    assert_relative_eq!(length.length(), 8000.0, epsilon = 1e-9);
}

#[test]
fn posts_skip_openings_and_headers_span_them() {
    let mut house = house();
    let wall = walls(&house.project.building, house.main)[0];
    house
        .project
        .building
        .add_opening(wall, opening(1000.0, 1200.0, 900.0, 1300.0))
        .unwrap();
    let config = ConstructionConfig::default();
    let ctx = BuildContext::new(&house.project, &config);

    let model = build_wall(&ctx, wall).unwrap();

    // Posts at 1250 and 1875 fall into the opening
    assert_eq!(kinds(&model, "post"), 12);
    assert_eq!(kinds(&model, "header"), 1);
    assert_eq!(kinds(&model, "opening"), 1);
    assert!(model.errors.is_empty());
}

#[test]
fn opening_outside_wall_is_an_error() {
    let mut house = house();
    let wall = walls(&house.project.building, house.main)[0];
    house
        .project
        .building
        .add_opening(wall, opening(7500.0, 1000.0, 900.0, 1300.0))
        .unwrap();
    let config = ConstructionConfig::default();
    let ctx = BuildContext::new(&house.project, &config);

    let model = build_wall(&ctx, wall).unwrap();

    let error = issue(&model.errors, "opening-outside-wall");
    assert_eq!(error.elements.len(), 1);
    let opening_leaf = model
        .leaves(64)
        .find(|v| v.leaf.tags.iter().any(|t| t == "opening"))
        .unwrap();
    assert_eq!(error.elements[0], opening_leaf.leaf.id);
    assert!(error.bounds.is_some());
}

#[test]
fn overlapping_openings_are_an_error() {
    let mut house = house();
    let wall = walls(&house.project.building, house.main)[0];
    for offset in [1000.0, 1800.0] {
        house
            .project
            .building
            .add_opening(wall, opening(offset, 1200.0, 900.0, 1300.0))
            .unwrap();
    }
    let config = ConstructionConfig::default();
    let ctx = BuildContext::new(&house.project, &config);

    let model = build_wall(&ctx, wall).unwrap();

    let error = issue(&model.errors, "opening-overlap");
    assert_eq!(error.elements.len(), 2);
    assert!(model
        .errors
        .iter()
        .all(|e| e.group_key.as_deref() != Some("opening-outside-wall")));
}

#[test]
fn layers_thicker_than_wall_warn() {
    let mut house = house();
    let wall = walls(&house.project.building, house.main)[1];
    house
        .project
        .building
        .update_wall(
            wall,
            WallUpdate {
                thickness: Some(10.0),
                ..WallUpdate::default()
            },
        )
        .unwrap();
    let config = ConstructionConfig::default();
    let ctx = BuildContext::new(&house.project, &config);

    let model = build_wall(&ctx, wall).unwrap();

    issue(&model.warnings, "layer-thickness-mismatch");
    assert!(model.errors.is_empty());
}

#[test]
fn unknown_material_warnings_merge_per_material() {
    let mut house = house();
    house.project.assemblies.insert(
        "clay-wall",
        AssemblyConfig::Wall(WallAssembly {
            layers: ["base coat", "finish coat"]
                .into_iter()
                .map(|name| Layer {
                    name: name.into(),
                    material: "clay".into(),
                    thickness: 20.0,
                })
                .collect(),
            post: None,
        }),
    );
    let wall = walls(&house.project.building, house.main)[0];
    house
        .project
        .building
        .set_wall_assembly(wall, "clay-wall".into())
        .unwrap();
    let config = ConstructionConfig::default();
    let ctx = BuildContext::new(&house.project, &config);

    let model = build_wall(&ctx, wall).unwrap();

    assert_eq!(model.warnings.len(), 1);
    let warning = issue(&model.warnings, "unknown-material:clay");
    assert_eq!(warning.elements.len(), 2);
}

#[test]
fn zero_sized_posts_are_degenerate() {
    let mut house = house();
    house.project.assemblies.insert(
        "flat-posts",
        AssemblyConfig::Wall(WallAssembly {
            layers: Vec::new(),
            post: Some(PostConfig {
                material: "kvh".into(),
                width: 0.0,
                depth: 0.0,
                spacing: 625.0,
            }),
        }),
    );
    let wall = walls(&house.project.building, house.main)[0];
    house
        .project
        .building
        .set_wall_assembly(wall, "flat-posts".into())
        .unwrap();
    let config = ConstructionConfig::default();
    let ctx = BuildContext::new(&house.project, &config);

    let err = build_wall(&ctx, wall).unwrap_err();
    assert_eq!(err.code(), "degenerate-geometry");
    assert_eq!(err.entity(), EntityRef::Wall(wall));
}

#[test]
fn ring_beam_wider_than_walls_merges_into_one_warning() {
    let mut house = house();
    let set = house
        .project
        .building
        .add_ring_beam_set(house.annex, "ring-beam".into())
        .unwrap();
    let config = ConstructionConfig::default();
    let ctx = BuildContext::new(&house.project, &config);

    let model = build_ring_beam_set(&ctx, set).unwrap();

    assert_eq!(kinds(&model, "ring-beam"), 4);
    assert_eq!(model.warnings.len(), 1);
    let warning = issue(&model.warnings, "ring-beam-wider-than-wall");
    assert_eq!(warning.elements.len(), 4);
}

#[test]
fn ring_beams_sit_on_top_of_the_walls() {
    let house = house();
    let config = ConstructionConfig::default();
    let ctx = BuildContext::new(&house.project, &config);

    let model = build_ring_beam_set(&ctx, house.ring_beams).unwrap();

    assert!(model.warnings.is_empty());
    let bounds = model.bounds(64).unwrap();
    assert_relative_eq!(bounds.min.z, 2800.0, epsilon = 1e-6);
    assert_relative_eq!(bounds.max.z, 2920.0, epsilon = 1e-6);
}

#[test]
fn rafters_are_cut_to_the_sloped_length() {
    let house = house();
    let config = ConstructionConfig::default();
    let ctx = BuildContext::new(&house.project, &config);

    let model = build_roof(&ctx, house.roof).unwrap();

    assert_eq!(kinds(&model, "rafter"), 11);
    let rafter = model
        .leaves(64)
        .find_map(|v| v.leaf.part_info.as_ref().filter(|p| p.kind == "rafter"))
        .unwrap();
    assert_relative_eq!(rafter.size.y, 6000.0 / 30f64.to_radians().cos(), epsilon = 1e-6);

    let bounds = model.bounds(64).unwrap();
    assert_relative_eq!(bounds.min.z, 2800.0, epsilon = 1e-6);
    assert_eq!(model.areas[0].label, "roof");
    assert!(model.warnings.is_empty());
}

#[test]
fn steep_roof_warns_and_vertical_roof_fails() {
    let mut house = house();
    house.project.building.update_roof_pitch(house.roof, 65.0).unwrap();
    {
        let config = ConstructionConfig::default();
        let ctx = BuildContext::new(&house.project, &config);
        let model = build_roof(&ctx, house.roof).unwrap();
        issue(&model.warnings, "steep-roof");
    }

    house.project.building.update_roof_pitch(house.roof, 90.0).unwrap();
    let config = ConstructionConfig::default();
    let ctx = BuildContext::new(&house.project, &config);
    let err = build_roof(&ctx, house.roof).unwrap_err();
    assert_eq!(err.code(), "degenerate-geometry");
    assert_eq!(err.entity(), EntityRef::Roof(house.roof));
}

#[test]
fn roof_with_flat_outline_is_degenerate() {
    let mut house = house();
    let outline = vec![
        Point2::new(0.0, 0.0),
        Point2::new(4000.0, 0.0),
        Point2::new(8000.0, 0.0),
    ];
    let roof = house
        .project
        .building
        .add_roof(house.storey, outline, 30.0, "rafter-roof".into())
        .unwrap();
    let config = ConstructionConfig::default();
    let ctx = BuildContext::new(&house.project, &config);

    let err = build_roof(&ctx, roof).unwrap_err();
    assert_eq!(err.code(), "degenerate-geometry");
}

#[test]
fn storey_floor_without_assembly_is_empty() {
    let mut house = house();
    let config = ConstructionConfig::default();
    {
        let ctx = BuildContext::new(&house.project, &config);
        let model = build_storey_floor(&ctx, StoreyFloorId(house.storey)).unwrap();
        assert_eq!(model, MaterializedModel::empty());
    }

    house
        .project
        .building
        .set_storey_floor_assembly(house.storey, Some("no-such-slab".into()))
        .unwrap();
    let ctx = BuildContext::new(&house.project, &config);
    let err = build_storey_floor(&ctx, StoreyFloorId(house.storey)).unwrap_err();
    assert_eq!(err.code(), "invalid-assembly");
}

#[test]
fn narrow_floor_warns_about_missing_joists() {
    let mut house = house();
    let floor = house
        .project
        .building
        .add_floor(house.storey, rectangle(0.0, 0.0, 2000.0, 40.0), "slab".into())
        .unwrap();
    let config = ConstructionConfig::default();
    let ctx = BuildContext::new(&house.project, &config);

    let model = build_core(&ctx, floor.into()).unwrap();

    assert_eq!(kinds(&model, "joist"), 0);
    assert_eq!(kinds(&model, "layer"), 1);
    issue(&model.warnings, "floor-without-joists");
}

#[test]
fn composite_entities_are_not_built_directly() {
    let house = house();
    let config = ConstructionConfig::default();
    let ctx = BuildContext::new(&house.project, &config);

    let err = build_core(&ctx, house.main.into()).unwrap_err();
    assert_eq!(err.code(), "degenerate-geometry");
}

#[test]
fn removed_wall_is_not_found() {
    let mut house = house();
    let wall = walls(&house.project.building, house.annex)[0];
    house.project.building.remove_perimeter(house.annex).unwrap();
    let config = ConstructionConfig::default();
    let ctx = BuildContext::new(&house.project, &config);

    let err = build_wall(&ctx, wall).unwrap_err();
    assert_eq!(err.code(), "entity-not-found");
}
