use rand::{SeedableRng, rngs::StdRng};
use uuid::Uuid;

use crate::board::GameMap;
use crate::game::action::{ActionPayload, GameAction};
use crate::game::{GameConfig, GameError, GameState, StepOutcome, TurnPhase};
use crate::players::BasePlayer;
use crate::types::ActionType;

/// Upper bound on actions within one player's turn; a turn is at most roll,
/// move and end, repeated per extra throw.
const MAX_TICKS_PER_TURN: usize = 32;

#[derive(Debug, Clone)]
pub struct Game {
    pub id: Uuid,
    pub state: GameState,
}

impl Game {
    /// A game on a seeded synthetic lattice around the configured center.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let map = GameMap::lattice(config.center, config.area, config.num_objectives, &mut rng);
        Self::with_map(config, map)
    }

    pub fn with_map(config: GameConfig, map: GameMap) -> Result<Self, GameError> {
        Ok(Self {
            id: Uuid::new_v4(),
            state: GameState::new(config, map)?,
        })
    }

    pub fn play<P: BasePlayer>(&mut self, players: &[P]) -> Option<usize> {
        while !self.state.is_finished() && self.state.turn < self.state.config.turn_limit {
            if self.play_tick(players).is_none() {
                break;
            }
        }
        self.state.winner()
    }

    pub fn play_tick<P: BasePlayer>(&mut self, players: &[P]) -> Option<GameAction> {
        let player = players.get(self.state.current_player)?;
        self.play_tick_with(player)
    }

    /// Decides and executes the active player's next action through the same
    /// [`GameState::step`] entry point human actions use.
    pub fn play_tick_with<P: BasePlayer>(&mut self, player: &P) -> Option<GameAction> {
        let action = self.next_action(player)?;
        self.execute(action.clone()).ok()?;
        Some(action)
    }

    /// Plays ticks until the turn passes to another player or the game ends.
    pub fn play_turn_with<P: BasePlayer>(&mut self, player: &P) -> Vec<GameAction> {
        let owner = self.state.current_player;
        let mut taken = Vec::new();
        for _ in 0..MAX_TICKS_PER_TURN {
            if self.state.is_finished() || self.state.current_player != owner {
                break;
            }
            match self.play_tick_with(player) {
                Some(action) => taken.push(action),
                None => break,
            }
        }
        taken
    }

    fn next_action<P: BasePlayer>(&self, player: &P) -> Option<GameAction> {
        if self.state.is_finished() {
            return None;
        }
        let idx = self.state.current_player;
        match self.state.phase {
            TurnPhase::RollDice => Some(GameAction::new(idx, ActionType::Roll)),
            TurnPhase::DiceRolled => {
                let options = self.state.legal_destinations();
                if options.is_empty() {
                    return Some(GameAction::new(idx, ActionType::EndTurn));
                }
                let cell = player
                    .decide(&self.state, &options)
                    .filter(|cell| options.contains(*cell))
                    .or_else(|| options.cells.first().copied())?;
                Some(
                    GameAction::new(idx, ActionType::ChooseDestination)
                        .with_payload(ActionPayload::Cell(cell)),
                )
            }
            TurnPhase::MovePlayer => None,
            TurnPhase::EndTurn => Some(
                GameAction::new(idx, ActionType::EndTurn)
                    .with_payload(ActionPayload::Cell(self.state.current().position)),
            ),
        }
    }

    pub fn execute(&mut self, action: GameAction) -> Result<StepOutcome, GameError> {
        self.state.step(action)
    }
}
