use crate::coords::GridKey;
use crate::game::GameState;
use crate::search::MoveOptions;

/// Destination-choice policy for automated players. Every other turn step is
/// driven by the engine, identically for bots and humans.
pub trait BasePlayer {
    fn decide(&self, state: &GameState, options: &MoveOptions) -> Option<GridKey>;
}
