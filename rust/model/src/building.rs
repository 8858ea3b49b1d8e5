// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building entities and the in-memory building store.
//!
//! The [`Building`] owns every storey, perimeter, wall, roof, floor and ring
//! beam set in slot maps with stable, generational keys. Perimeters own their
//! walls: walls are created between consecutive corners of the closed
//! outline and grouped into colinear runs when consecutive walls continue in
//! the same direction.
//!
//! Each mutation takes a tick from the shared [`RevisionClock`] and stamps
//! every entity whose derived construction it can change. The construction
//! cache reads these stamps through [`BuildingModel::revision_of`].

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::error::{Error, Result};
use crate::geometry::{same_direction, Point2, Vector2};
use crate::ids::*;
use crate::revision::{Revision, RevisionClock};

/// Sine tolerance under which two consecutive walls count as colinear.
const COLINEAR_TOLERANCE: f64 = 1e-6;

/// Corners closer than this are merged.
const CORNER_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storey {
    pub name: String,
    /// Elevation of the storey base above the building origin.
    pub elevation: f64,
    /// Floor-to-floor height.
    pub height: f64,
    /// Build-up of the floor construction under this storey.
    pub floor_assembly: Option<AssemblyId>,
}

/// A closed ring of walls on one storey.
#[derive(Debug, Clone, PartialEq)]
pub struct Perimeter {
    pub storey: StoreyId,
    /// Outline corners in the storey plane. Wall `i` runs from corner `i` to
    /// corner `i + 1` (wrapping).
    pub corners: Vec<Point2<f64>>,
    pub walls: Vec<WallId>,
    pub colinear_runs: Vec<ColinearRunId>,
    pub ring_beams: Vec<RingBeamSetId>,
}

/// An opening (window or door) positioned along a wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    /// Distance from the wall start to the opening's left edge.
    pub offset: f64,
    pub width: f64,
    /// Height of the opening's bottom edge above the wall base.
    pub sill_height: f64,
    pub height: f64,
    /// Material of the unit filling the opening.
    pub material: MaterialId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    pub perimeter: PerimeterId,
    pub start: Point2<f64>,
    pub end: Point2<f64>,
    pub thickness: f64,
    pub height: f64,
    pub assembly: AssemblyId,
    pub openings: Vec<Opening>,
}

impl Wall {
    pub fn direction(&self) -> Vector2<f64> {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.direction().norm()
    }
}

/// Consecutive walls of one perimeter that continue in the same direction.
#[derive(Debug, Clone, PartialEq)]
pub struct ColinearRun {
    pub perimeter: PerimeterId,
    pub walls: Vec<WallId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Roof {
    pub storey: StoreyId,
    /// Projected outline in the storey plane.
    pub outline: Vec<Point2<f64>>,
    pub pitch_degrees: f64,
    pub assembly: AssemblyId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Floor {
    pub storey: StoreyId,
    pub outline: Vec<Point2<f64>>,
    pub assembly: AssemblyId,
}

/// Ring beams on top of every wall of a perimeter.
#[derive(Debug, Clone, PartialEq)]
pub struct RingBeamSet {
    pub perimeter: PerimeterId,
    pub assembly: AssemblyId,
}

/// Parameters for creating a perimeter and its walls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerimeterSpec {
    pub corners: Vec<Point2<f64>>,
    pub wall_thickness: f64,
    /// Defaults to the storey height.
    #[serde(default)]
    pub wall_height: Option<f64>,
    pub wall_assembly: AssemblyId,
}

/// Partial update of a wall's dimensions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WallUpdate {
    pub thickness: Option<f64>,
    pub height: Option<f64>,
}

/// Read access to the building model.
pub trait BuildingModel {
    fn wall(&self, id: WallId) -> Option<&Wall>;
    fn roof(&self, id: RoofId) -> Option<&Roof>;
    fn floor(&self, id: FloorId) -> Option<&Floor>;
    fn ring_beam_set(&self, id: RingBeamSetId) -> Option<&RingBeamSet>;
    fn storey(&self, id: StoreyId) -> Option<&Storey>;
    fn perimeter(&self, id: PerimeterId) -> Option<&Perimeter>;
    fn colinear_run(&self, id: ColinearRunId) -> Option<&ColinearRun>;

    /// All storeys ordered bottom-up by elevation.
    fn storeys(&self) -> Vec<StoreyId>;
    fn perimeters_by_storey(&self, storey: StoreyId) -> Vec<PerimeterId>;
    fn roofs_by_storey(&self, storey: StoreyId) -> Vec<RoofId>;
    fn floors_by_storey(&self, storey: StoreyId) -> Vec<FloorId>;
    fn storey_above(&self, storey: StoreyId) -> Option<StoreyId>;
    fn storey_below(&self, storey: StoreyId) -> Option<StoreyId>;

    /// Revision of the entity's last change, or `None` if it does not exist.
    fn revision_of(&self, entity: EntityRef) -> Option<Revision>;

    /// Revision of the last insertion or removal of any entity.
    fn structure_revision(&self) -> Revision;
}

/// In-memory building store.
///
/// # Example
///
/// ```
/// use framewright_model::{AssemblyId, Building, BuildingModel, PerimeterSpec, Point2};
///
/// let mut building = Building::new();
/// let storey = building.add_storey("Ground floor", 0.0, 2800.0);
/// let perimeter = building
///     .add_perimeter(
///         storey,
///         PerimeterSpec {
///             corners: vec![
///                 Point2::new(0.0, 0.0),
///                 Point2::new(8000.0, 0.0),
///                 Point2::new(8000.0, 6000.0),
///                 Point2::new(0.0, 6000.0),
///             ],
///             wall_thickness: 360.0,
///             wall_height: None,
///             wall_assembly: AssemblyId::from("frame"),
///         },
///     )
///     .unwrap();
///
/// assert_eq!(building.perimeter(perimeter).unwrap().walls.len(), 4);
/// ```
#[derive(Debug, Default)]
pub struct Building {
    clock: RevisionClock,
    structure: Revision,

    pub(crate) storeys: SlotMap<StoreyId, Storey>,
    pub(crate) perimeters: SlotMap<PerimeterId, Perimeter>,
    pub(crate) walls: SlotMap<WallId, Wall>,
    pub(crate) colinear_runs: SlotMap<ColinearRunId, ColinearRun>,
    pub(crate) roofs: SlotMap<RoofId, Roof>,
    pub(crate) floors: SlotMap<FloorId, Floor>,
    pub(crate) ring_beam_sets: SlotMap<RingBeamSetId, RingBeamSet>,

    // Storeys sorted by elevation
    storey_order: Vec<StoreyId>,
    revisions: FxHashMap<EntityRef, Revision>,
}

impl Building {
    /// Creates an empty building with its own revision clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty building stamping its changes with a shared clock.
    pub fn with_clock(clock: RevisionClock) -> Self {
        Self {
            clock,
            ..Self::default()
        }
    }

    fn stamp(&mut self, entities: impl IntoIterator<Item = EntityRef>, revision: Revision) {
        for entity in entities {
            self.revisions.insert(entity, revision);
        }
    }

    // --- Storey operations ---

    /// Adds a storey without a floor assembly.
    pub fn add_storey(&mut self, name: impl Into<String>, elevation: f64, height: f64) -> StoreyId {
        let revision = self.clock.tick();
        let id = self.storeys.insert(Storey {
            name: name.into(),
            elevation,
            height,
            floor_assembly: None,
        });
        self.storey_order.push(id);
        let storeys = &self.storeys;
        self.storey_order
            .sort_by(|a, b| storeys[*a].elevation.total_cmp(&storeys[*b].elevation));
        self.structure = revision;
        self.stamp(
            [EntityRef::Storey(id), EntityRef::StoreyFloor(StoreyFloorId(id))],
            revision,
        );
        id
    }

    /// Changes the elevation and height of a storey.
    pub fn update_storey(&mut self, id: StoreyId, elevation: f64, height: f64) -> Result<()> {
        let storey = self.storeys.get_mut(id).ok_or(Error::StoreyNotFound(id))?;
        storey.elevation = elevation;
        storey.height = height;
        let storeys = &self.storeys;
        self.storey_order
            .sort_by(|a, b| storeys[*a].elevation.total_cmp(&storeys[*b].elevation));
        let revision = self.clock.tick();
        // Order of storeys is building structure
        self.structure = revision;
        // Roofs sit on top of the storey height
        let roofs: Vec<_> = self
            .roofs
            .iter()
            .filter(|(_, roof)| roof.storey == id)
            .map(|(roof_id, _)| EntityRef::Roof(roof_id))
            .collect();
        self.stamp(roofs, revision);
        self.stamp([EntityRef::Storey(id)], revision);
        Ok(())
    }

    pub fn set_storey_floor_assembly(
        &mut self,
        id: StoreyId,
        assembly: Option<AssemblyId>,
    ) -> Result<()> {
        let storey = self.storeys.get_mut(id).ok_or(Error::StoreyNotFound(id))?;
        storey.floor_assembly = assembly;
        let revision = self.clock.tick();
        self.stamp([EntityRef::StoreyFloor(StoreyFloorId(id))], revision);
        Ok(())
    }

    // --- Perimeter operations ---

    /// Creates a perimeter with one wall per outline edge and groups the
    /// walls into colinear runs.
    pub fn add_perimeter(&mut self, storey: StoreyId, spec: PerimeterSpec) -> Result<PerimeterId> {
        let storey_height = self
            .storeys
            .get(storey)
            .ok_or(Error::StoreyNotFound(storey))?
            .height;
        let corners = normalize_corners(&spec.corners);
        if corners.len() < 3 {
            return Err(Error::DegeneratePerimeter(corners.len()));
        }
        let height = spec.wall_height.unwrap_or(storey_height);
        positive("wall thickness", spec.wall_thickness)?;
        positive("wall height", height)?;

        let revision = self.clock.tick();
        let perimeter = self.perimeters.insert(Perimeter {
            storey,
            corners: corners.clone(),
            walls: Vec::with_capacity(corners.len()),
            colinear_runs: Vec::new(),
            ring_beams: Vec::new(),
        });

        let n = corners.len();
        let walls: Vec<WallId> = (0..n)
            .map(|i| {
                self.walls.insert(Wall {
                    perimeter,
                    start: corners[i],
                    end: corners[(i + 1) % n],
                    thickness: spec.wall_thickness,
                    height,
                    assembly: spec.wall_assembly.clone(),
                    openings: Vec::new(),
                })
            })
            .collect();

        let runs: Vec<ColinearRunId> = group_colinear(&self.walls, &walls)
            .into_iter()
            .map(|run_walls| {
                self.colinear_runs.insert(ColinearRun {
                    perimeter,
                    walls: run_walls,
                })
            })
            .collect();

        self.stamp(walls.iter().map(|&w| EntityRef::Wall(w)), revision);
        self.stamp(runs.iter().map(|&r| EntityRef::ColinearRun(r)), revision);
        self.stamp(
            [
                EntityRef::Perimeter(perimeter),
                EntityRef::Storey(storey),
                EntityRef::StoreyFloor(StoreyFloorId(storey)),
            ],
            revision,
        );
        self.structure = revision;

        let data = &mut self.perimeters[perimeter];
        data.walls = walls;
        data.colinear_runs = runs;
        Ok(perimeter)
    }

    /// Removes a perimeter together with its walls, runs and ring beams.
    pub fn remove_perimeter(&mut self, id: PerimeterId) -> Result<Perimeter> {
        let perimeter = self.perimeters.remove(id).ok_or(Error::PerimeterNotFound(id))?;
        for &wall in &perimeter.walls {
            self.walls.remove(wall);
            self.revisions.remove(&EntityRef::Wall(wall));
        }
        for &run in &perimeter.colinear_runs {
            self.colinear_runs.remove(run);
            self.revisions.remove(&EntityRef::ColinearRun(run));
        }
        for &set in &perimeter.ring_beams {
            self.ring_beam_sets.remove(set);
            self.revisions.remove(&EntityRef::RingBeamSet(set));
        }
        self.revisions.remove(&EntityRef::Perimeter(id));

        let revision = self.clock.tick();
        self.structure = revision;
        if self.storeys.contains_key(perimeter.storey) {
            // The storey floor is laid under every perimeter of the storey
            self.stamp(
                [
                    EntityRef::Storey(perimeter.storey),
                    EntityRef::StoreyFloor(StoreyFloorId(perimeter.storey)),
                ],
                revision,
            );
        }
        Ok(perimeter)
    }

    // --- Wall operations ---

    pub fn update_wall(&mut self, id: WallId, update: WallUpdate) -> Result<()> {
        if let Some(thickness) = update.thickness {
            positive("wall thickness", thickness)?;
        }
        if let Some(height) = update.height {
            positive("wall height", height)?;
        }
        let wall = self.walls.get_mut(id).ok_or(Error::WallNotFound(id))?;
        if let Some(thickness) = update.thickness {
            wall.thickness = thickness;
        }
        if let Some(height) = update.height {
            wall.height = height;
        }
        let revision = self.clock.tick();
        self.stamp([EntityRef::Wall(id)], revision);
        Ok(())
    }

    pub fn set_wall_assembly(&mut self, id: WallId, assembly: AssemblyId) -> Result<()> {
        let wall = self.walls.get_mut(id).ok_or(Error::WallNotFound(id))?;
        wall.assembly = assembly;
        let revision = self.clock.tick();
        self.stamp([EntityRef::Wall(id)], revision);
        Ok(())
    }

    /// Adds an opening to a wall. Placement is validated when the wall is
    /// constructed, not here.
    pub fn add_opening(&mut self, id: WallId, opening: Opening) -> Result<()> {
        let wall = self.walls.get_mut(id).ok_or(Error::WallNotFound(id))?;
        wall.openings.push(opening);
        let revision = self.clock.tick();
        self.stamp([EntityRef::Wall(id)], revision);
        Ok(())
    }

    // --- Roof and floor operations ---

    pub fn add_roof(
        &mut self,
        storey: StoreyId,
        outline: Vec<Point2<f64>>,
        pitch_degrees: f64,
        assembly: AssemblyId,
    ) -> Result<RoofId> {
        if !self.storeys.contains_key(storey) {
            return Err(Error::StoreyNotFound(storey));
        }
        let revision = self.clock.tick();
        let id = self.roofs.insert(Roof {
            storey,
            outline,
            pitch_degrees,
            assembly,
        });
        self.structure = revision;
        self.stamp([EntityRef::Roof(id), EntityRef::Storey(storey)], revision);
        Ok(id)
    }

    pub fn update_roof_pitch(&mut self, id: RoofId, pitch_degrees: f64) -> Result<()> {
        let roof = self.roofs.get_mut(id).ok_or(Error::RoofNotFound(id))?;
        roof.pitch_degrees = pitch_degrees;
        let revision = self.clock.tick();
        self.stamp([EntityRef::Roof(id)], revision);
        Ok(())
    }

    pub fn remove_roof(&mut self, id: RoofId) -> Result<Roof> {
        let roof = self.roofs.remove(id).ok_or(Error::RoofNotFound(id))?;
        self.revisions.remove(&EntityRef::Roof(id));
        let revision = self.clock.tick();
        self.structure = revision;
        if self.storeys.contains_key(roof.storey) {
            self.stamp([EntityRef::Storey(roof.storey)], revision);
        }
        Ok(roof)
    }

    pub fn add_floor(
        &mut self,
        storey: StoreyId,
        outline: Vec<Point2<f64>>,
        assembly: AssemblyId,
    ) -> Result<FloorId> {
        if !self.storeys.contains_key(storey) {
            return Err(Error::StoreyNotFound(storey));
        }
        let revision = self.clock.tick();
        let id = self.floors.insert(Floor {
            storey,
            outline,
            assembly,
        });
        self.structure = revision;
        self.stamp([EntityRef::Floor(id), EntityRef::Storey(storey)], revision);
        Ok(id)
    }

    // --- Ring beam operations ---

    pub fn add_ring_beam_set(
        &mut self,
        perimeter: PerimeterId,
        assembly: AssemblyId,
    ) -> Result<RingBeamSetId> {
        if !self.perimeters.contains_key(perimeter) {
            return Err(Error::PerimeterNotFound(perimeter));
        }
        let revision = self.clock.tick();
        let id = self.ring_beam_sets.insert(RingBeamSet {
            perimeter,
            assembly,
        });
        self.perimeters[perimeter].ring_beams.push(id);
        self.structure = revision;
        self.stamp(
            [EntityRef::RingBeamSet(id), EntityRef::Perimeter(perimeter)],
            revision,
        );
        Ok(id)
    }

    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    pub fn storey_count(&self) -> usize {
        self.storeys.len()
    }
}

impl BuildingModel for Building {
    fn wall(&self, id: WallId) -> Option<&Wall> {
        self.walls.get(id)
    }

    fn roof(&self, id: RoofId) -> Option<&Roof> {
        self.roofs.get(id)
    }

    fn floor(&self, id: FloorId) -> Option<&Floor> {
        self.floors.get(id)
    }

    fn ring_beam_set(&self, id: RingBeamSetId) -> Option<&RingBeamSet> {
        self.ring_beam_sets.get(id)
    }

    fn storey(&self, id: StoreyId) -> Option<&Storey> {
        self.storeys.get(id)
    }

    fn perimeter(&self, id: PerimeterId) -> Option<&Perimeter> {
        self.perimeters.get(id)
    }

    fn colinear_run(&self, id: ColinearRunId) -> Option<&ColinearRun> {
        self.colinear_runs.get(id)
    }

    fn storeys(&self) -> Vec<StoreyId> {
        self.storey_order.clone()
    }

    fn perimeters_by_storey(&self, storey: StoreyId) -> Vec<PerimeterId> {
        self.perimeters
            .iter()
            .filter(|(_, p)| p.storey == storey)
            .map(|(id, _)| id)
            .collect()
    }

    fn roofs_by_storey(&self, storey: StoreyId) -> Vec<RoofId> {
        self.roofs
            .iter()
            .filter(|(_, r)| r.storey == storey)
            .map(|(id, _)| id)
            .collect()
    }

    fn floors_by_storey(&self, storey: StoreyId) -> Vec<FloorId> {
        self.floors
            .iter()
            .filter(|(_, f)| f.storey == storey)
            .map(|(id, _)| id)
            .collect()
    }

    fn storey_above(&self, storey: StoreyId) -> Option<StoreyId> {
        let pos = self.storey_order.iter().position(|&s| s == storey)?;
        self.storey_order.get(pos + 1).copied()
    }

    fn storey_below(&self, storey: StoreyId) -> Option<StoreyId> {
        let pos = self.storey_order.iter().position(|&s| s == storey)?;
        pos.checked_sub(1).map(|p| self.storey_order[p])
    }

    fn revision_of(&self, entity: EntityRef) -> Option<Revision> {
        match entity {
            EntityRef::Building(_) => Some(self.structure),
            other => self.revisions.get(&other).copied(),
        }
    }

    fn structure_revision(&self) -> Revision {
        self.structure
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::NonPositiveDimension { name, value })
    }
}

/// Drops repeated corners, including a closing corner equal to the first.
fn normalize_corners(corners: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut out: Vec<Point2<f64>> = Vec::with_capacity(corners.len());
    for &c in corners {
        if out.last().map_or(true, |last| (c - last).norm() > CORNER_EPSILON) {
            out.push(c);
        }
    }
    while out.len() > 1 && (out[0] - out[out.len() - 1]).norm() <= CORNER_EPSILON {
        out.pop();
    }
    out
}

/// Splits the closed ring of walls into runs of consecutive colinear walls.
/// A run that crosses the ring's seam (last wall continuing into the first)
/// is joined into one.
fn group_colinear(arena: &SlotMap<WallId, Wall>, walls: &[WallId]) -> Vec<Vec<WallId>> {
    let mut runs: Vec<Vec<WallId>> = Vec::new();
    for (i, &wall) in walls.iter().enumerate() {
        let continues = i > 0
            && same_direction(
                &arena[walls[i - 1]].direction(),
                &arena[wall].direction(),
                COLINEAR_TOLERANCE,
            );
        match runs.last_mut() {
            Some(run) if continues => run.push(wall),
            _ => runs.push(vec![wall]),
        }
    }

    if runs.len() > 1 {
        let (first, last) = (walls[0], walls[walls.len() - 1]);
        if same_direction(
            &arena[last].direction(),
            &arena[first].direction(),
            COLINEAR_TOLERANCE,
        ) {
            if let Some(mut tail) = runs.pop() {
                tail.extend(runs[0].drain(..));
                runs[0] = tail;
            }
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(corners: Vec<Point2<f64>>) -> PerimeterSpec {
        PerimeterSpec {
            corners,
            wall_thickness: 300.0,
            wall_height: None,
            wall_assembly: AssemblyId::from("frame"),
        }
    }

    fn rectangle_with_split_side() -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(4000.0, 0.0),
            Point2::new(10000.0, 0.0),
            Point2::new(10000.0, 6000.0),
            Point2::new(0.0, 6000.0),
        ]
    }

    #[test]
    fn perimeter_creates_walls_and_runs() {
        let mut building = Building::new();
        let storey = building.add_storey("EG", 0.0, 2700.0);
        let p = building
            .add_perimeter(storey, spec(rectangle_with_split_side()))
            .unwrap();

        let perimeter = building.perimeter(p).unwrap();
        assert_eq!(perimeter.walls.len(), 5);
        assert_eq!(perimeter.colinear_runs.len(), 4);

        let first_run = building.colinear_run(perimeter.colinear_runs[0]).unwrap();
        assert_eq!(first_run.walls, perimeter.walls[0..2].to_vec());

        let wall = building.wall(perimeter.walls[1]).unwrap();
        assert_eq!(wall.length(), 6000.0);
        assert_eq!(wall.height, 2700.0);
    }

    #[test]
    fn run_across_the_seam_is_joined() {
        let mut building = Building::new();
        let storey = building.add_storey("EG", 0.0, 2700.0);
        // Starts in the middle of the bottom side
        let corners = vec![
            Point2::new(5000.0, 0.0),
            Point2::new(10000.0, 0.0),
            Point2::new(10000.0, 6000.0),
            Point2::new(0.0, 6000.0),
            Point2::new(0.0, 0.0),
        ];
        let p = building.add_perimeter(storey, spec(corners)).unwrap();
        let perimeter = building.perimeter(p).unwrap();
        assert_eq!(perimeter.colinear_runs.len(), 4);

        let seam_run = building.colinear_run(perimeter.colinear_runs[0]).unwrap();
        assert_eq!(seam_run.walls, vec![perimeter.walls[4], perimeter.walls[0]]);
    }

    #[test]
    fn degenerate_perimeter_is_rejected() {
        let mut building = Building::new();
        let storey = building.add_storey("EG", 0.0, 2700.0);
        let corners = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1000.0, 0.0),
            Point2::new(1000.0, 0.0),
            Point2::new(0.0, 0.0),
        ];
        assert!(matches!(
            building.add_perimeter(storey, spec(corners)),
            Err(Error::DegeneratePerimeter(2))
        ));
    }

    #[test]
    fn mutations_stamp_revisions() {
        let mut building = Building::new();
        let storey = building.add_storey("EG", 0.0, 2700.0);
        let p = building
            .add_perimeter(storey, spec(rectangle_with_split_side()))
            .unwrap();
        let walls = building.perimeter(p).unwrap().walls.clone();

        let before_w0 = building.revision_of(walls[0].into()).unwrap();
        let before_w1 = building.revision_of(walls[1].into()).unwrap();
        building
            .update_wall(
                walls[0],
                WallUpdate {
                    height: Some(2500.0),
                    ..WallUpdate::default()
                },
            )
            .unwrap();

        assert!(building.revision_of(walls[0].into()).unwrap() > before_w0);
        assert_eq!(building.revision_of(walls[1].into()).unwrap(), before_w1);
    }

    #[test]
    fn storey_height_change_stamps_its_roofs() {
        let mut building = Building::new();
        let storey = building.add_storey("EG", 0.0, 2700.0);
        let roof = building
            .add_roof(storey, rectangle_with_split_side(), 30.0, "roof".into())
            .unwrap();
        let before = building.revision_of(roof.into()).unwrap();

        building.update_storey(storey, 0.0, 3000.0).unwrap();
        assert!(building.revision_of(roof.into()).unwrap() > before);
    }

    #[test]
    fn storey_floor_follows_its_assembly_and_perimeters_only() {
        let mut building = Building::new();
        let storey = building.add_storey("EG", 0.0, 2700.0);
        let floor = EntityRef::StoreyFloor(StoreyFloorId(storey));
        let initial = building.revision_of(floor).unwrap();

        building
            .add_roof(storey, rectangle_with_split_side(), 30.0, "roof".into())
            .unwrap();
        building
            .add_floor(storey, rectangle_with_split_side(), "slab".into())
            .unwrap();
        building.update_storey(storey, 0.0, 3000.0).unwrap();
        assert_eq!(building.revision_of(floor).unwrap(), initial);

        building
            .set_storey_floor_assembly(storey, Some("slab".into()))
            .unwrap();
        let assigned = building.revision_of(floor).unwrap();
        assert!(assigned > initial);

        let p = building
            .add_perimeter(storey, spec(rectangle_with_split_side()))
            .unwrap();
        let added = building.revision_of(floor).unwrap();
        assert!(added > assigned);

        building.remove_perimeter(p).unwrap();
        assert!(building.revision_of(floor).unwrap() > added);
    }

    #[test]
    fn removing_perimeter_drops_walls() {
        let mut building = Building::new();
        let storey = building.add_storey("EG", 0.0, 2700.0);
        let p = building
            .add_perimeter(storey, spec(rectangle_with_split_side()))
            .unwrap();
        let wall = building.perimeter(p).unwrap().walls[0];
        let structure = building.structure_revision();

        building.remove_perimeter(p).unwrap();
        assert!(building.wall(wall).is_none());
        assert!(building.revision_of(wall.into()).is_none());
        assert!(building.perimeters_by_storey(storey).is_empty());
        assert!(building.structure_revision() > structure);
        assert_eq!(building.wall_count(), 0);
    }

    #[test]
    fn storeys_are_ordered_by_elevation() {
        let mut building = Building::new();
        let upper = building.add_storey("OG", 2800.0, 2600.0);
        let ground = building.add_storey("EG", 0.0, 2800.0);
        assert_eq!(building.storeys(), vec![ground, upper]);
        assert_eq!(building.storey_above(ground), Some(upper));
        assert_eq!(building.storey_below(ground), None);
        assert_eq!(building.storey_below(upper), Some(ground));
    }
}
