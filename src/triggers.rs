use serde::{Deserialize, Serialize};

use crate::board::{GameBounds, RoadIndex};
use crate::coords::GridKey;
use crate::types::DeckType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    Edge,
    Motorway,
}

impl TriggerKind {
    pub const fn deck(self) -> DeckType {
        match self {
            TriggerKind::Edge => DeckType::Boundary,
            TriggerKind::Motorway => DeckType::Motorway,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub kind: TriggerKind,
    pub cell: GridKey,
    /// Steps taken from the start of the path when the trigger cell was
    /// entered.
    pub steps_used: u32,
}

/// Scans `path` in traversal order and reports the first cell that lies on
/// the board boundary or near a motorway or railway. The start cell (step 0)
/// is skipped; a boundary hit wins over a motorway hit on the same cell.
pub fn find_trigger(path: &[GridKey], bounds: &GameBounds, roads: &RoadIndex) -> Option<Trigger> {
    path.iter()
        .enumerate()
        .skip(1)
        .find_map(|(step, &cell)| {
            let kind = if bounds.is_boundary(cell) {
                TriggerKind::Edge
            } else if roads.near_infrastructure(cell) {
                TriggerKind::Motorway
            } else {
                return None;
            };
            Some(Trigger {
                kind,
                cell,
                steps_used: step as u32,
            })
        })
}
