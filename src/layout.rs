//! Procedural city layout on an N×N grid.
//!
//! Generation runs in two phases. First a handful of full rows and columns are
//! picked as interior roads, never adjacent to one another and never near the
//! border. Then every cell is classified (corner, edge T-junction, crossing,
//! straight road or building) and given an asset and a quarter-turn rotation.
//! The outer ring of the grid is always road.
//!
//! All randomness comes from the injected RNG, so a seed fully determines the
//! layout.

use std::collections::{BTreeMap, BTreeSet};

use cgmath::Rotation3;
use rand::{Rng, SeedableRng};

use crate::{
    data_structures::{
        catalog::{self, AssetCatalog, AssetHandle},
        instance::Instance,
    },
    error::LayoutError,
};

/// Smallest grid on which corners, edges and interior roads are all distinct.
pub const RECOMMENDED_MIN_WORLD_LENGTH: usize = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Cells per side.
    pub world_length: usize,
    /// Chance that a candidate interior road line is accepted.
    pub road_probability: f64,
    /// World-space size of one cell.
    pub unit_length: f64,
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            world_length: 5,
            road_probability: 0.7,
            unit_length: 2.0,
            seed: 0,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.world_length < 1 {
            return Err(LayoutError::InvalidConfig {
                reason: "world_length must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.road_probability) {
            return Err(LayoutError::InvalidConfig {
                reason: format!(
                    "road_probability must be within [0, 1], got {}",
                    self.road_probability
                ),
            });
        }
        if !self.unit_length.is_finite() || self.unit_length <= 0.0 {
            return Err(LayoutError::InvalidConfig {
                reason: format!("unit_length must be positive, got {}", self.unit_length),
            });
        }
        Ok(())
    }
}

/// A full grid row or column reserved for road.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoadLine {
    Row(usize),
    Col(usize),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoadLineSet {
    lines: BTreeSet<RoadLine>,
}

impl RoadLineSet {
    pub fn contains(&self, line: RoadLine) -> bool {
        self.lines.contains(&line)
    }

    pub fn has_row(&self, row: usize) -> bool {
        self.contains(RoadLine::Row(row))
    }

    pub fn has_col(&self, col: usize) -> bool {
        self.contains(RoadLine::Col(col))
    }

    pub fn iter(&self) -> impl Iterator<Item = RoadLine> + '_ {
        self.lines.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn insert(&mut self, line: RoadLine) {
        self.lines.insert(line);
    }
}

/// Road pieces, in the order they are registered under the `roads` catalog role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoadKind {
    TJunction,
    Crossing,
    Corner,
    Straight,
}

impl RoadKind {
    pub const ALL: [RoadKind; 4] = [
        RoadKind::TJunction,
        RoadKind::Crossing,
        RoadKind::Corner,
        RoadKind::Straight,
    ];

    pub fn index(self) -> usize {
        match self {
            RoadKind::TJunction => 0,
            RoadKind::Crossing => 1,
            RoadKind::Corner => 2,
            RoadKind::Straight => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetVariant {
    Road(RoadKind),
    /// Index into the `buildings` catalog role.
    Building(usize),
}

impl AssetVariant {
    pub fn handle(self) -> AssetHandle {
        match self {
            AssetVariant::Road(kind) => AssetHandle {
                role: catalog::ROADS.to_string(),
                index: kind.index(),
            },
            AssetVariant::Building(index) => AssetHandle {
                role: catalog::BUILDINGS.to_string(),
                index,
            },
        }
    }

    pub fn is_road(self) -> bool {
        matches!(self, AssetVariant::Road(_))
    }
}

/// Rotation about the vertical axis in multiples of 90°.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct QuarterTurns(u8);

impl QuarterTurns {
    pub const DEG_0: QuarterTurns = QuarterTurns(0);
    pub const DEG_90: QuarterTurns = QuarterTurns(1);
    pub const DEG_180: QuarterTurns = QuarterTurns(2);
    pub const DEG_270: QuarterTurns = QuarterTurns(3);

    pub fn new(turns: u8) -> Self {
        Self(turns % 4)
    }

    pub fn turns(self) -> u8 {
        self.0
    }

    pub fn degrees(self) -> u32 {
        self.0 as u32 * 90
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CellPlacement {
    pub row: usize,
    pub col: usize,
    pub asset_variant: AssetVariant,
    pub asset: AssetHandle,
    pub rotation: QuarterTurns,
    pub translation: [f64; 3],
}

impl CellPlacement {
    /// World transform: rotate about +Y, then translate into the cell.
    pub fn to_instance(&self) -> Instance {
        let [x, y, z] = self.translation;
        Instance {
            position: cgmath::Vector3::new(x as f32, y as f32, z as f32),
            rotation: cgmath::Quaternion::from_angle_y(cgmath::Deg(
                self.rotation.degrees() as f32
            )),
            ..Default::default()
        }
    }
}

/// A generated city: the chosen road lines and one placement per cell, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldLayout {
    pub world_length: usize,
    pub unit_length: f64,
    pub road_lines: RoadLineSet,
    pub placements: Vec<CellPlacement>,
}

impl WorldLayout {
    pub fn placement(&self, row: usize, col: usize) -> Option<&CellPlacement> {
        if row >= self.world_length || col >= self.world_length {
            return None;
        }
        self.placements.get(row * self.world_length + col)
    }

    /// World-space point the camera should orbit.
    pub fn center(&self) -> [f64; 3] {
        let half = self.world_length as f64 * self.unit_length / 2.0;
        [half, 0.0, half]
    }

    /// Instances grouped per asset, so each asset can be drawn in one instanced call.
    pub fn instances_by_asset(&self) -> BTreeMap<AssetHandle, Vec<Instance>> {
        let mut groups: BTreeMap<AssetHandle, Vec<Instance>> = BTreeMap::new();
        for placement in &self.placements {
            groups
                .entry(placement.asset.clone())
                .or_default()
                .push(placement.to_instance());
        }
        groups
    }

    pub fn into_placements(self) -> Vec<CellPlacement> {
        self.placements
    }
}

/// Generates a layout using an RNG seeded from `config.seed`.
pub fn generate(config: &LayoutConfig, catalog: &AssetCatalog) -> Result<WorldLayout, LayoutError> {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(config.seed);
    generate_with_rng(config, catalog, &mut rng)
}

/// Generates a layout drawing every random decision from `rng`.
pub fn generate_with_rng<R: Rng>(
    config: &LayoutConfig,
    catalog: &AssetCatalog,
    rng: &mut R,
) -> Result<WorldLayout, LayoutError> {
    config.validate()?;
    require_role(catalog, catalog::ROADS, RoadKind::ALL.len())?;
    require_role(catalog, catalog::BUILDINGS, 1)?;
    let n = config.world_length;
    if n < RECOMMENDED_MIN_WORLD_LENGTH {
        log::warn!(
            "world_length {} is below {}, corner and edge roads will overlap",
            n,
            RECOMMENDED_MIN_WORLD_LENGTH
        );
    }

    let road_lines = select_road_lines(n, config.road_probability, rng);
    let grid = Grid {
        n,
        roads: &road_lines,
    };
    let building_count = catalog.role_len(catalog::BUILDINGS);

    let mut placements = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let (asset_variant, rotation) = grid.classify(i, j, building_count, &mut *rng);
            placements.push(CellPlacement {
                row: i,
                col: j,
                asset_variant,
                asset: asset_variant.handle(),
                rotation,
                translation: [
                    i as f64 * config.unit_length,
                    0.0,
                    j as f64 * config.unit_length,
                ],
            });
        }
    }

    log::info!(
        "generated {}x{} layout with {} interior road lines",
        n,
        n,
        road_lines.len()
    );
    Ok(WorldLayout {
        world_length: n,
        unit_length: config.unit_length,
        road_lines,
        placements,
    })
}

fn require_role(catalog: &AssetCatalog, role: &str, needed: usize) -> Result<(), LayoutError> {
    let found = catalog.role_len(role);
    if found < needed {
        return Err(LayoutError::MissingAsset {
            role: role.to_string(),
            needed,
            found,
        });
    }
    Ok(())
}

/**
 * Picks interior road lines. Each attempt draws an axis and a position in
 * `[2, n-2]` and keeps the line with probability `p` when neither neighbour on
 * the same axis is taken. Every attempt counts against both the `2n` target
 * and the `10n` attempt cap, rejected or not, so fewer lines than the target
 * is a normal outcome.
 */
fn select_road_lines<R: Rng>(n: usize, p: f64, rng: &mut R) -> RoadLineSet {
    let mut lines = RoadLineSet::default();
    if n < 4 {
        return lines;
    }
    let road_count = n * 2;
    let max_attempts = n * 10;
    let mut attempts = 0;
    let mut roads = 0;

    while roads < road_count && attempts < max_attempts {
        attempts += 1;
        roads += 1;
        let along_rows = rng.random_bool(0.5);
        let pos = rng.random_range(2..=n - 2);
        if !rng.random_bool(p) {
            continue;
        }
        let line = |x| {
            if along_rows {
                RoadLine::Row(x)
            } else {
                RoadLine::Col(x)
            }
        };
        let near_edge = pos <= 1 || pos >= n - 2;
        if !near_edge && !lines.contains(line(pos - 1)) && !lines.contains(line(pos + 1)) {
            lines.insert(line(pos));
        }
    }

    log::debug!(
        "selected road lines {:?} after {} attempts",
        lines.iter().collect::<Vec<_>>(),
        attempts
    );
    lines
}

struct Grid<'a> {
    n: usize,
    roads: &'a RoadLineSet,
}

impl Grid<'_> {
    fn is_edge(&self, x: usize) -> bool {
        x == 0 || x == self.n - 1
    }

    fn is_corner(&self, i: usize, j: usize) -> bool {
        self.is_edge(i) && self.is_edge(j)
    }

    fn is_road(&self, i: usize, j: usize) -> bool {
        self.roads.has_row(i) || self.roads.has_col(j) || self.is_edge(i) || self.is_edge(j)
    }

    fn is_edge_intersection(&self, i: usize, j: usize) -> bool {
        (self.is_edge(i) && self.roads.has_col(j)) || (self.is_edge(j) && self.roads.has_row(i))
    }

    fn is_crossing(&self, i: usize, j: usize) -> bool {
        self.roads.has_row(i) && self.roads.has_col(j)
    }

    /// First matching rule wins: corner, edge T-junction, crossing, edge road,
    /// interior road, building.
    fn classify<R: Rng>(
        &self,
        i: usize,
        j: usize,
        building_count: usize,
        rng: &mut R,
    ) -> (AssetVariant, QuarterTurns) {
        if self.is_corner(i, j) {
            (AssetVariant::Road(RoadKind::Corner), self.corner_rotation(i, j))
        } else if self.is_edge_intersection(i, j) {
            (
                AssetVariant::Road(RoadKind::TJunction),
                self.t_junction_rotation(i, j),
            )
        } else if self.is_crossing(i, j) {
            let rotation = if rng.random_bool(0.5) {
                QuarterTurns::DEG_90
            } else {
                QuarterTurns::DEG_0
            };
            (AssetVariant::Road(RoadKind::Crossing), rotation)
        } else if self.is_edge(i) || self.is_edge(j) {
            (
                AssetVariant::Road(RoadKind::Straight),
                straight_rotation(self.is_edge(j)),
            )
        } else if self.roads.has_row(i) || self.roads.has_col(j) {
            (
                AssetVariant::Road(RoadKind::Straight),
                straight_rotation(self.roads.has_col(j)),
            )
        } else {
            let index = rng.random_range(0..building_count);
            (AssetVariant::Building(index), self.building_facing(i, j))
        }
    }

    fn corner_rotation(&self, i: usize, j: usize) -> QuarterTurns {
        let last = self.n - 1;
        match (i, j) {
            (0, 0) => QuarterTurns::DEG_0,
            (i, 0) if i == last => QuarterTurns::DEG_270,
            (i, j) if i == last && j == last => QuarterTurns::DEG_180,
            _ => QuarterTurns::DEG_90,
        }
    }

    /// The stem of the T points away from the edge it sits on.
    fn t_junction_rotation(&self, i: usize, j: usize) -> QuarterTurns {
        if self.is_edge(i) && self.roads.has_col(j) {
            if i == 0 {
                QuarterTurns::DEG_0
            } else {
                QuarterTurns::DEG_180
            }
        } else if j == 0 {
            QuarterTurns::DEG_270
        } else {
            QuarterTurns::DEG_90
        }
    }

    /// Buildings face the first road found going north, east, west, then south.
    fn building_facing(&self, i: usize, j: usize) -> QuarterTurns {
        let last = self.n - 1;
        if i > 0 && self.is_road(i - 1, j) {
            QuarterTurns::DEG_270
        } else if j < last && self.is_road(i, j + 1) {
            QuarterTurns::DEG_0
        } else if j > 0 && self.is_road(i, j - 1) {
            QuarterTurns::DEG_180
        } else if i < last && self.is_road(i + 1, j) {
            QuarterTurns::DEG_90
        } else {
            QuarterTurns::DEG_0
        }
    }
}

fn straight_rotation(along_col: bool) -> QuarterTurns {
    if along_col {
        QuarterTurns::DEG_90
    } else {
        QuarterTurns::DEG_0
    }
}

#[cfg(test)]
mod tests {
    use rand::RngCore;

    use super::*;

    fn seeded(seed: u64) -> rand_pcg::Pcg64 {
        rand_pcg::Pcg64::seed_from_u64(seed)
    }

    #[test]
    fn should_never_select_adjacent_or_border_lines() {
        for n in [4, 5, 8, 13, 40] {
            for seed in 0..50 {
                let lines = select_road_lines(n, 1.0, &mut seeded(seed));
                for line in lines.iter() {
                    let (pos, neighbour) = match line {
                        RoadLine::Row(p) => (p, RoadLine::Row(p + 1)),
                        RoadLine::Col(p) => (p, RoadLine::Col(p + 1)),
                    };
                    assert!(pos >= 2 && pos < n - 2, "{line:?} too close to border of {n}");
                    assert!(!lines.contains(neighbour), "{line:?} has an adjacent line");
                }
            }
        }
    }

    #[test]
    fn should_select_nothing_without_probability() {
        for seed in 0..20 {
            assert!(select_road_lines(20, 0.0, &mut seeded(seed)).is_empty());
        }
    }

    #[test]
    fn should_spend_one_target_slot_per_attempt() {
        for (n, p) in [(4, 1.0), (5, 1.0), (6, 0.3), (9, 0.0), (17, 0.7)] {
            let mut rng = seeded(n as u64);
            select_road_lines(n, p, &mut rng);

            // Replays 2n attempts of axis, position and acceptance draws.
            let mut replay = seeded(n as u64);
            for _ in 0..n * 2 {
                replay.random_bool(0.5);
                replay.random_range(2..=n - 2);
                replay.random_bool(p);
            }
            assert_eq!(rng.next_u64(), replay.next_u64(), "n = {n}, p = {p}");
        }
    }

    #[test]
    fn should_select_nothing_on_tiny_grids() {
        for n in 1..4 {
            assert!(select_road_lines(n, 1.0, &mut seeded(7)).is_empty());
        }
    }

    #[test]
    fn should_point_t_junction_stems_inward() {
        let mut roads = RoadLineSet::default();
        roads.insert(RoadLine::Row(3));
        roads.insert(RoadLine::Col(2));
        let grid = Grid { n: 7, roads: &roads };
        assert_eq!(grid.t_junction_rotation(0, 2), QuarterTurns::DEG_0);
        assert_eq!(grid.t_junction_rotation(6, 2), QuarterTurns::DEG_180);
        assert_eq!(grid.t_junction_rotation(3, 0), QuarterTurns::DEG_270);
        assert_eq!(grid.t_junction_rotation(3, 6), QuarterTurns::DEG_90);
    }

    #[test]
    fn should_face_buildings_towards_first_road() {
        let mut roads = RoadLineSet::default();
        roads.insert(RoadLine::Col(4));
        let grid = Grid { n: 9, roads: &roads };
        // north neighbour (0, 1) is the border
        assert_eq!(grid.building_facing(1, 1), QuarterTurns::DEG_270);
        // east neighbour is column 4
        assert_eq!(grid.building_facing(3, 3), QuarterTurns::DEG_0);
        // west neighbour is column 4
        assert_eq!(grid.building_facing(3, 5), QuarterTurns::DEG_180);
        // only the south neighbour (8, 6) is road
        assert_eq!(grid.building_facing(7, 6), QuarterTurns::DEG_90);
        assert_eq!(grid.building_facing(4, 6), QuarterTurns::DEG_0);
    }
}
