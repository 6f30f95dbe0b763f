use std::fs;
use std::path::Path;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::coords::{GridKey, LatLng, to_grid_key};
use crate::types::{Infrastructure, RoadClass};

mod bounds;
mod roads;

pub use bounds::{AreaSize, GameBounds};
pub use roads::{INFRASTRUCTURE_PROXIMITY, RoadIndex};

/// Spacing, in cells, between parallel streets of the synthetic lattice.
const LATTICE_SPACING: i32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    pub name: String,
    pub cell: GridKey,
}

/// Motorway junctions and railway stations used by motorway/railway cards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfrastructureSites {
    #[serde(default)]
    pub junctions: Vec<GridKey>,
    #[serde(default)]
    pub stations: Vec<GridKey>,
}

impl InfrastructureSites {
    pub fn sites(&self, kind: Infrastructure) -> &[GridKey] {
        match kind {
            Infrastructure::Motorway => &self.junctions,
            Infrastructure::Railway => &self.stations,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("failed to read map: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse map: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{what} {cell} lies outside the play area")]
    OutOfBounds { what: &'static str, cell: GridKey },
}

/// Everything the engine knows about the board: the play area, the derived
/// road membership, infrastructure sites, the shared start cell and the
/// objective locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMap {
    pub bounds: GameBounds,
    pub roads: RoadIndex,
    #[serde(default)]
    pub sites: InfrastructureSites,
    pub start: GridKey,
    #[serde(default)]
    pub objectives: Vec<Objective>,
}

impl GameMap {
    pub fn new(
        bounds: GameBounds,
        roads: RoadIndex,
        sites: InfrastructureSites,
        start: GridKey,
        objectives: Vec<Objective>,
    ) -> Result<Self, MapError> {
        let map = Self {
            bounds,
            roads,
            sites,
            start,
            objectives,
        };
        map.validate()?;
        Ok(map)
    }

    pub fn from_json_str(json: &str) -> Result<Self, MapError> {
        let map: GameMap = serde_json::from_str(json)?;
        map.validate()?;
        Ok(map)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MapError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    fn validate(&self) -> Result<(), MapError> {
        if !self.bounds.contains(self.start) {
            return Err(MapError::OutOfBounds {
                what: "start",
                cell: self.start,
            });
        }
        if let Some(objective) = self
            .objectives
            .iter()
            .find(|o| !self.bounds.contains(o.cell))
        {
            return Err(MapError::OutOfBounds {
                what: "objective",
                cell: objective.cell,
            });
        }
        Ok(())
    }

    /// Swaps in a freshly fetched road index.
    pub fn replace_roads(&mut self, roads: RoadIndex) {
        self.roads = roads;
    }

    pub fn objective_at(&self, cell: GridKey) -> Option<usize> {
        self.objectives.iter().position(|o| o.cell == cell)
    }

    /// A seeded street lattice centred on `center`: streets every
    /// [`LATTICE_SPACING`] cells (every other one an A-road), a motorway
    /// running north-south with junctions where streets cross it, and a
    /// railway running east-west with stations at street crossings.
    pub fn lattice(
        center: LatLng,
        area: AreaSize,
        num_objectives: usize,
        rng: &mut impl rand::Rng,
    ) -> Self {
        Self::lattice_around(to_grid_key(center), area, num_objectives, rng)
    }

    pub fn lattice_around(
        center: GridKey,
        area: AreaSize,
        num_objectives: usize,
        rng: &mut impl rand::Rng,
    ) -> Self {
        let bounds = GameBounds::around(center, area);
        let half = area.half_extent_cells();
        let (w, h) = (bounds.width(), bounds.height());
        let sw = bounds.south_west;
        let mut roads = RoadIndex::new(bounds);
        let mut sites = InfrastructureSites::default();

        let street_class = |line: i32| {
            if line % (2 * LATTICE_SPACING) == 0 {
                RoadClass::A
            } else {
                RoadClass::B
            }
        };
        for de in (0..w).step_by(LATTICE_SPACING as usize) {
            for dn in 0..h {
                roads.insert_road(sw.offset(de, dn), street_class(de));
            }
        }
        for dn in (0..h).step_by(LATTICE_SPACING as usize) {
            for de in 0..w {
                roads.insert_road(sw.offset(de, dn), street_class(dn));
            }
        }

        let motorway_col = (3 * w / 4) / LATTICE_SPACING * LATTICE_SPACING + LATTICE_SPACING / 2;
        for dn in 0..h {
            let cell = sw.offset(motorway_col, dn);
            roads.insert_infrastructure(cell, Infrastructure::Motorway);
            if dn % LATTICE_SPACING == 0 {
                sites.junctions.push(cell);
            }
        }

        let railway_row = (h / 3) / LATTICE_SPACING * LATTICE_SPACING + LATTICE_SPACING / 2;
        for de in 0..w {
            let cell = sw.offset(de, railway_row);
            roads.insert_infrastructure(cell, Infrastructure::Railway);
            if de % (2 * LATTICE_SPACING) == 0 {
                sites.stations.push(cell);
            }
        }

        let snap = |d: i32| (d + LATTICE_SPACING / 2) / LATTICE_SPACING * LATTICE_SPACING;
        let start = sw.offset(snap(half), snap(half));

        let mut candidates: Vec<GridKey> = bounds
            .cells()
            .filter(|c| roads.is_road(*c) && !bounds.is_boundary(*c))
            .filter(|c| c.cell_distance(start) >= (2 * LATTICE_SPACING) as u32)
            .collect();
        candidates.sort();
        let objectives = candidates
            .choose_multiple(rng, num_objectives)
            .enumerate()
            .map(|(idx, cell)| Objective {
                name: format!("Objective {}", idx + 1),
                cell: *cell,
            })
            .collect();

        Self {
            bounds,
            roads,
            sites,
            start,
            objectives,
        }
    }
}
