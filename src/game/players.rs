use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::GameMap;
use crate::coords::GridKey;
use crate::types::IconType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: Uuid,
    pub name: String,
    pub icon: IconType,
    pub is_bot: bool,
    pub position: GridKey,
    /// Objective indices in the order they were reached.
    pub visited: Vec<usize>,
    pub has_returned_to_start: bool,
    pub missed_turns: u8,
}

impl PlayerState {
    pub fn new(name: impl Into<String>, icon: IconType, is_bot: bool, start: GridKey) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            icon,
            is_bot,
            position: start,
            visited: Vec::new(),
            has_returned_to_start: false,
            missed_turns: 0,
        }
    }

    pub fn has_visited(&self, objective: usize) -> bool {
        self.visited.contains(&objective)
    }

    /// Records a visit; false if the objective was already visited.
    pub fn visit(&mut self, objective: usize) -> bool {
        if self.has_visited(objective) {
            return false;
        }
        self.visited.push(objective);
        true
    }

    pub fn visited_all(&self, map: &GameMap) -> bool {
        (0..map.objectives.len()).all(|idx| self.has_visited(idx))
    }

    /// Cells of the objectives still to visit.
    pub fn outstanding_objectives(&self, map: &GameMap) -> Vec<GridKey> {
        map.objectives
            .iter()
            .enumerate()
            .filter(|(idx, _)| !self.has_visited(*idx))
            .map(|(_, objective)| objective.cell)
            .collect()
    }
}
