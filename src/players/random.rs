use crate::coords::GridKey;
use crate::game::GameState;
use crate::players::BasePlayer;
use crate::search::MoveOptions;
use rand::seq::IteratorRandom;

#[derive(Debug, Clone, Copy)]
pub struct RandomPlayer;

impl BasePlayer for RandomPlayer {
    fn decide(&self, _state: &GameState, options: &MoveOptions) -> Option<GridKey> {
        let mut rng = rand::thread_rng();
        options.cells.iter().copied().choose(&mut rng)
    }
}
