use crate::coords::GridKey;
use crate::game::GameState;
use crate::players::BasePlayer;
use crate::search::{MoveOptions, nearest_to};

/// Heads for the nearest unvisited objective, then home to the start cell.
/// Declines to move only when there are no legal destinations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectivePlayer;

impl BasePlayer for ObjectivePlayer {
    fn decide(&self, state: &GameState, options: &MoveOptions) -> Option<GridKey> {
        let me = state.current();
        let outstanding = me.outstanding_objectives(&state.map);
        nearest_to(&options.cells, &outstanding)
            .or_else(|| nearest_to(&options.cells, &[state.map.start]))
    }
}
