//! Session-scoped engine state and the turn API exposed to session
//! orchestration and UI code. Each call names a session and an acting
//! player; anything not from the session's current player is rejected
//! without touching state.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::board::GameMap;
use crate::cards::{ChanceEffect, DeckState, Decks, DrawnCard};
use crate::coords::GridKey;
use crate::game::action::{ActionPayload, GameAction};
use crate::game::schedule::TurnScheduler;
use crate::game::{
    Game, GameConfig, GameError, GameEvent, GameState, GameStatus, ObstructionToken, PlayerState,
    StepOutcome, TurnPhase,
};
use crate::players::BasePlayer;
use crate::types::{ActionType, DeckType, TokenColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollOutcome {
    Rolled { dice1: u8, dice2: u8 },
    Skipped { missed_turns_left: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub final_position: GridKey,
    pub triggered_card: Option<DrawnCard>,
    pub visited_objectives: Vec<usize>,
}

/// Everything needed to rebuild a session's working state against its map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub turn: u32,
    pub current_player: usize,
    pub phase: TurnPhase,
    pub status: GameStatus,
    pub players: Vec<PlayerState>,
    pub decks: Decks,
    pub obstructions: Vec<ObstructionToken>,
    pub last_roll: Option<(u8, u8)>,
    pub budget: u32,
    pub extra_throws: u8,
}

impl GameState {
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            turn: self.turn,
            current_player: self.current_player,
            phase: self.phase,
            status: self.status,
            players: self.players.clone(),
            decks: self.decks.clone(),
            obstructions: self.obstructions.clone(),
            last_roll: self.last_roll,
            budget: self.budget,
            extra_throws: self.extra_throws,
        }
    }

    pub fn from_snapshot(
        config: GameConfig,
        map: GameMap,
        snapshot: SessionSnapshot,
    ) -> Result<Self, GameError> {
        if snapshot.players.is_empty() || snapshot.current_player >= snapshot.players.len() {
            return Err(GameError::InvalidPlayer(snapshot.current_player));
        }
        if snapshot.phase == TurnPhase::MovePlayer {
            return Err(GameError::InvalidConfig("snapshot taken mid-move"));
        }
        let restore = |deck: DeckType| {
            let state = snapshot.decks.deck(deck);
            DeckState::from_parts(deck, state.order().to_vec(), state.cursor())
        };
        let decks = Decks::from_parts(
            restore(DeckType::Boundary)?,
            restore(DeckType::Motorway)?,
            restore(DeckType::Chance)?,
            snapshot.decks.pending().clone(),
        )?;

        let seed = config.seed ^ (u64::from(snapshot.turn) << 32) ^ snapshot.budget as u64;
        let mut state = GameState::new(config, map)?;
        state.reseed(seed);
        state.players = snapshot.players;
        state.decks = decks;
        state.obstructions = snapshot.obstructions;
        state.phase = snapshot.phase;
        state.status = snapshot.status;
        state.current_player = snapshot.current_player;
        state.turn = snapshot.turn;
        state.last_roll = snapshot.last_roll;
        state.budget = snapshot.budget;
        state.extra_throws = snapshot.extra_throws;
        Ok(state)
    }
}

/// Arena of live games keyed by session id. No state is shared between
/// sessions.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<Uuid, Game>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, game: Game) -> Uuid {
        let id = game.id;
        self.sessions.insert(id, game);
        id
    }

    pub fn create(&mut self, config: GameConfig, map: GameMap) -> Result<Uuid, GameError> {
        Ok(self.insert(Game::with_map(config, map)?))
    }

    pub fn remove(&mut self, session_id: Uuid) -> Option<Game> {
        self.sessions.remove(&session_id)
    }

    pub fn get(&self, session_id: Uuid) -> Result<&Game, GameError> {
        self.sessions
            .get(&session_id)
            .ok_or(GameError::UnknownSession(session_id))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn act(
        &mut self,
        session_id: Uuid,
        player_id: Uuid,
        action_type: ActionType,
        payload: ActionPayload,
    ) -> Result<(usize, StepOutcome), GameError> {
        let game = self
            .sessions
            .get_mut(&session_id)
            .ok_or(GameError::UnknownSession(session_id))?;
        let player_index = game.state.player_index(player_id)?;
        let action = GameAction::new(player_index, action_type).with_payload(payload);
        let outcome = game.execute(action)?;
        Ok((player_index, outcome))
    }

    pub fn roll_dice(&mut self, session_id: Uuid, player_id: Uuid) -> Result<RollOutcome, GameError> {
        self.roll_dice_with(session_id, player_id, None)
    }

    /// Rolls with optional fixed dice values.
    pub fn roll_dice_with(
        &mut self,
        session_id: Uuid,
        player_id: Uuid,
        dice: Option<(u8, u8)>,
    ) -> Result<RollOutcome, GameError> {
        let payload = dice.map_or(ActionPayload::None, |(a, b)| ActionPayload::Dice(a, b));
        let (_, outcome) = self.act(session_id, player_id, ActionType::Roll, payload)?;
        for event in &outcome.events {
            match event {
                GameEvent::DiceRolled { dice, .. } => {
                    return Ok(RollOutcome::Rolled {
                        dice1: dice.0,
                        dice2: dice.1,
                    });
                }
                GameEvent::TurnSkipped {
                    missed_turns_left, ..
                } => {
                    return Ok(RollOutcome::Skipped {
                        missed_turns_left: *missed_turns_left,
                    });
                }
                _ => {}
            }
        }
        Err(GameError::InvalidPayload("roll produced no dice"))
    }

    pub fn choose_destination(
        &mut self,
        session_id: Uuid,
        player_id: Uuid,
        cell: GridKey,
    ) -> Result<MoveOutcome, GameError> {
        let (player_index, outcome) = self.act(
            session_id,
            player_id,
            ActionType::ChooseDestination,
            ActionPayload::Cell(cell),
        )?;
        let player = &self.get(session_id)?.state.players[player_index];
        let triggered_card = outcome.events.iter().find_map(|event| match event {
            GameEvent::CardDrawn { card, .. } if card.deck != DeckType::Chance => {
                Some(card.clone())
            }
            _ => None,
        });
        Ok(MoveOutcome {
            final_position: player.position,
            triggered_card,
            visited_objectives: player.visited.clone(),
        })
    }

    pub fn apply_chance_effect(
        &mut self,
        session_id: Uuid,
        player_id: Uuid,
        effect: ChanceEffect,
    ) -> Result<StepOutcome, GameError> {
        self.act(
            session_id,
            player_id,
            ActionType::ApplyChanceEffect,
            ActionPayload::Effect(effect),
        )
        .map(|(_, outcome)| outcome)
    }

    pub fn place_obstruction(
        &mut self,
        session_id: Uuid,
        player_id: Uuid,
        cell: GridKey,
        color: TokenColor,
    ) -> Result<StepOutcome, GameError> {
        self.act(
            session_id,
            player_id,
            ActionType::PlaceObstruction,
            ActionPayload::Obstruction { cell, color },
        )
        .map(|(_, outcome)| outcome)
    }

    pub fn remove_obstruction(
        &mut self,
        session_id: Uuid,
        player_id: Uuid,
        color: TokenColor,
    ) -> Result<StepOutcome, GameError> {
        self.act(
            session_id,
            player_id,
            ActionType::RemoveObstruction,
            ActionPayload::Color(color),
        )
        .map(|(_, outcome)| outcome)
    }

    /// Ends the turn and returns the index of the player to act next.
    pub fn end_turn(
        &mut self,
        session_id: Uuid,
        player_id: Uuid,
        final_position: Option<GridKey>,
    ) -> Result<usize, GameError> {
        let payload = final_position.map_or(ActionPayload::None, ActionPayload::Cell);
        self.act(session_id, player_id, ActionType::EndTurn, payload)?;
        Ok(self.get(session_id)?.state.current_player)
    }

    /// Schedules the current player's turn when that player is a bot.
    pub fn schedule_bot_turn(
        &self,
        scheduler: &mut TurnScheduler,
        session_id: Uuid,
        now: Instant,
        delay: Duration,
    ) -> Option<u64> {
        let state = &self.sessions.get(&session_id)?.state;
        if state.is_finished() || !state.current().is_bot {
            return None;
        }
        Some(scheduler.schedule(session_id, state.current_player, now + delay))
    }

    /// Runs every bot turn that has come due, then schedules follow-up bot
    /// turns. Tasks whose session ended or whose player no longer holds the
    /// turn are dropped. Returns the ids of sessions that advanced.
    pub fn run_due_bot_turns<P: BasePlayer>(
        &mut self,
        scheduler: &mut TurnScheduler,
        now: Instant,
        delay: Duration,
        player: &P,
    ) -> Vec<Uuid> {
        let mut advanced = Vec::new();
        let mut due: VecDeque<_> = scheduler.take_due(now).into();
        while let Some(task) = due.pop_front() {
            let Some(game) = self.sessions.get_mut(&task.session_id) else {
                continue;
            };
            if game.state.is_finished() || game.state.current_player != task.player_index {
                debug!(session = %task.session_id, "stale bot turn dropped");
                continue;
            }
            let actions = game.play_turn_with(player);
            info!(session = %task.session_id, player = task.player_index, actions = actions.len(), "bot turn played");
            advanced.push(task.session_id);
            self.schedule_bot_turn(scheduler, task.session_id, now, delay);
        }
        advanced
    }
}
