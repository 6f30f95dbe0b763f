use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::coords::{GridKey, LatLng, to_grid_key};
use crate::types::Rotation;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AreaSize {
    Small,
    Medium,
    Large,
}

impl AreaSize {
    /// Cells between the center cell and the boundary ring.
    pub const fn half_extent_cells(self) -> i32 {
        match self {
            AreaSize::Small => 10,
            AreaSize::Medium => 20,
            AreaSize::Large => 40,
        }
    }
}

impl Default for AreaSize {
    fn default() -> Self {
        AreaSize::Medium
    }
}

/// Rectangular play area, inclusive of both corner cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameBounds {
    pub south_west: GridKey,
    pub north_east: GridKey,
}

impl GameBounds {
    pub fn new(a: GridKey, b: GridKey) -> Self {
        Self {
            south_west: GridKey::new(
                a.easting().min(b.easting()),
                a.northing().min(b.northing()),
            ),
            north_east: GridKey::new(
                a.easting().max(b.easting()),
                a.northing().max(b.northing()),
            ),
        }
    }

    pub fn around(center: GridKey, area: AreaSize) -> Self {
        let half = area.half_extent_cells();
        Self::new(center.offset(-half, -half), center.offset(half, half))
    }

    pub fn from_center(center: LatLng, area: AreaSize) -> Self {
        Self::around(to_grid_key(center), area)
    }

    pub fn width(&self) -> i32 {
        self.north_east.cell().0 - self.south_west.cell().0 + 1
    }

    pub fn height(&self) -> i32 {
        self.north_east.cell().1 - self.south_west.cell().1 + 1
    }

    pub fn contains(&self, cell: GridKey) -> bool {
        (self.south_west.easting()..=self.north_east.easting()).contains(&cell.easting())
            && (self.south_west.northing()..=self.north_east.northing()).contains(&cell.northing())
    }

    pub fn contains_bounds(&self, other: &GameBounds) -> bool {
        self.contains(other.south_west) && self.contains(other.north_east)
    }

    pub fn is_boundary(&self, cell: GridKey) -> bool {
        self.contains(cell)
            && (cell.easting() == self.south_west.easting()
                || cell.easting() == self.north_east.easting()
                || cell.northing() == self.south_west.northing()
                || cell.northing() == self.north_east.northing())
    }

    pub fn cells(&self) -> impl Iterator<Item = GridKey> + '_ {
        let sw = self.south_west;
        (0..self.height()).flat_map(move |dn| (0..self.width()).map(move |de| sw.offset(de, dn)))
    }

    /// The boundary ring, starting at the north-west corner. Clockwise walks
    /// the north row eastward, the east column southward, the south row
    /// westward and the west column northward.
    pub fn ring(&self, rotation: Rotation) -> Vec<GridKey> {
        let (w, h) = (self.width(), self.height());
        let nw = GridKey::new(self.south_west.easting(), self.north_east.northing());
        let mut ring = Vec::with_capacity((2 * (w + h)) as usize);
        for de in 0..w {
            ring.push(nw.offset(de, 0));
        }
        for dn in 1..h {
            ring.push(nw.offset(w - 1, -dn));
        }
        if h > 1 {
            for de in (0..w - 1).rev() {
                ring.push(nw.offset(de, -(h - 1)));
            }
        }
        if w > 1 {
            for dn in (1..h - 1).rev() {
                ring.push(nw.offset(0, -dn));
            }
        }
        if rotation == Rotation::Anticlockwise {
            ring.reverse();
        }
        ring
    }
}
