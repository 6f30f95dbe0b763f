pub mod action;
pub mod game;
pub mod players;
pub mod schedule;
pub mod session;
pub mod state;

pub use action::{ActionPayload, GameAction};
pub use game::Game;
pub use players::PlayerState;
pub use schedule::{ScheduledTurn, TurnScheduler};
pub use session::{MoveOutcome, RollOutcome, SessionSnapshot, SessionStore};
pub use state::{
    ConfigError, GameConfig, GameError, GameEvent, GameState, GameStatus, MAX_PLAYERS,
    ObstructionToken, PlayerConfig, StepOutcome, TurnPhase,
};
