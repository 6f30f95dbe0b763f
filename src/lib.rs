#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod board;
pub mod cards;
pub mod cli;
pub mod coords;
pub mod game;
pub mod players;
pub mod search;
pub mod triggers;
pub mod types;

pub use board::{AreaSize, GameBounds, GameMap, RoadIndex};
pub use coords::{GridKey, LatLng, to_grid_key};
pub use game::{Game, GameConfig, GameError, GameEvent, GameState, SessionStore, TurnScheduler};
pub use types::{DeckType, TokenColor};
