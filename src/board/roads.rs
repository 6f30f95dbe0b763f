use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::board::GameBounds;
use crate::coords::GridKey;
use crate::types::{Infrastructure, RoadClass};

/// Chebyshev radius, in cells, within which a motorway or railway triggers a
/// card draw.
pub const INFRASTRUCTURE_PROXIMITY: u32 = 1;

/// Cells known to carry a road, as derived by the external map-data fetch for
/// one bounding box. Read-only to the engine; replaced wholesale when the
/// area of interest leaves `bounds`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoadIndex {
    pub bounds: Option<GameBounds>,
    #[serde(default)]
    a_roads: HashSet<GridKey>,
    #[serde(default)]
    b_roads: HashSet<GridKey>,
    #[serde(default)]
    roads: HashSet<GridKey>,
    #[serde(default)]
    motorways: HashSet<GridKey>,
    #[serde(default)]
    railways: HashSet<GridKey>,
}

impl RoadIndex {
    pub fn new(bounds: GameBounds) -> Self {
        Self {
            bounds: Some(bounds),
            ..Self::default()
        }
    }

    /// Records a road cell. A- and B-road cells are also members of the
    /// `Any` class.
    pub fn insert_road(&mut self, cell: GridKey, class: RoadClass) {
        match class {
            RoadClass::A => {
                self.a_roads.insert(cell);
            }
            RoadClass::B => {
                self.b_roads.insert(cell);
            }
            RoadClass::Any => {}
        }
        self.roads.insert(cell);
    }

    pub fn insert_infrastructure(&mut self, cell: GridKey, kind: Infrastructure) {
        match kind {
            Infrastructure::Motorway => self.motorways.insert(cell),
            Infrastructure::Railway => self.railways.insert(cell),
        };
    }

    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }

    pub fn len(&self) -> usize {
        self.roads.len()
    }

    pub fn is_road(&self, cell: GridKey) -> bool {
        self.roads.contains(&cell)
    }

    pub fn has_road(&self, cell: GridKey, class: RoadClass) -> bool {
        match class {
            RoadClass::A => self.a_roads.contains(&cell),
            RoadClass::B => self.b_roads.contains(&cell),
            RoadClass::Any => self.roads.contains(&cell),
        }
    }

    pub fn carries(&self, cell: GridKey, kind: Infrastructure) -> bool {
        match kind {
            Infrastructure::Motorway => self.motorways.contains(&cell),
            Infrastructure::Railway => self.railways.contains(&cell),
        }
    }

    /// True when a motorway or railway lies within
    /// [`INFRASTRUCTURE_PROXIMITY`] of `cell`.
    pub fn near_infrastructure(&self, cell: GridKey) -> bool {
        if self.motorways.is_empty() && self.railways.is_empty() {
            return false;
        }
        let r = INFRASTRUCTURE_PROXIMITY as i32;
        (-r..=r).any(|de| {
            (-r..=r).any(|dn| {
                let nearby = cell.offset(de, dn);
                self.motorways.contains(&nearby) || self.railways.contains(&nearby)
            })
        })
    }

    /// Whether this index was built for an area enclosing `area`.
    pub fn covers(&self, area: &GameBounds) -> bool {
        self.bounds.is_some_and(|b| b.contains_bounds(area))
    }

    pub fn road_cells(&self) -> impl Iterator<Item = GridKey> + '_ {
        self.roads.iter().copied()
    }
}
