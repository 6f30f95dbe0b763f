use serde::{Deserialize, Serialize};

use crate::cards::ChanceEffect;
use crate::coords::GridKey;
use crate::types::{ActionType, TokenColor};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct GameAction {
    pub player_index: usize,
    pub action_type: ActionType,
    pub payload: ActionPayload,
}

impl GameAction {
    pub fn new(player_index: usize, action_type: ActionType) -> Self {
        Self {
            player_index,
            action_type,
            payload: ActionPayload::None,
        }
    }

    pub fn with_payload(mut self, payload: ActionPayload) -> Self {
        self.payload = payload;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ActionPayload {
    #[default]
    None,
    Dice(u8, u8),
    Cell(GridKey),
    Effect(ChanceEffect),
    Obstruction { cell: GridKey, color: TokenColor },
    Color(TokenColor),
}
