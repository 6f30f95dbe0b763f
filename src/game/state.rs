use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::board::{AreaSize, GameMap};
use crate::cards::{
    ChanceEffect, DeckError, Decks, DrawnCard, GameCard, resolve_boundary_card,
    resolve_motorway_card,
};
use crate::coords::{GridKey, LatLng};
use crate::search::{MoveOptions, exact_destinations, nearest_to, plan_path};
use crate::triggers::{Trigger, find_trigger};
use crate::types::{ActionType, DeckType, IconType, TokenColor};

use super::action::{ActionPayload, GameAction};
use super::players::PlayerState;

pub const MAX_PLAYERS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
    pub icon: IconType,
    #[serde(default)]
    pub is_bot: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub players: Vec<PlayerConfig>,
    pub center: LatLng,
    #[serde(default)]
    pub area: AreaSize,
    pub num_objectives: usize,
    pub seed: u64,
    pub turn_limit: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: (0..2)
                .map(|idx| PlayerConfig {
                    name: format!("Player {}", idx + 1),
                    icon: IconType::ORDERED[idx],
                    is_bot: true,
                })
                .collect(),
            center: LatLng::new(52.4862, -1.8904),
            area: AreaSize::Small,
            num_objectives: 3,
            seed: 42,
            turn_limit: 500,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

impl GameConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnPhase {
    RollDice,
    DiceRolled,
    /// Held only while a chosen destination is being resolved.
    MovePlayer,
    EndTurn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Completed { winner: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstructionToken {
    pub cell: GridKey,
    pub color: TokenColor,
    pub placed_by: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEvent {
    DiceRolled {
        player: usize,
        dice: (u8, u8),
        total: u8,
    },
    TurnSkipped {
        player: usize,
        missed_turns_left: u8,
    },
    CardDrawn {
        player: usize,
        card: DrawnCard,
    },
    CardUnresolved {
        player: usize,
        deck: DeckType,
    },
    Relocated {
        player: usize,
        from: GridKey,
        to: GridKey,
    },
    Moved {
        player: usize,
        path: Vec<GridKey>,
    },
    ObjectiveVisited {
        player: usize,
        objective: usize,
    },
    TurnsMissed {
        player: usize,
        turns: u8,
    },
    ExtraThrowGranted {
        player: usize,
    },
    ObstructionPlaced {
        token: ObstructionToken,
    },
    ObstructionRemoved {
        color: TokenColor,
        count: usize,
    },
    TurnAdvanced {
        next_player: usize,
    },
    GameWon {
        winner: usize,
    },
}

#[derive(Debug, Clone, Default)]
pub struct StepOutcome {
    pub events: Vec<GameEvent>,
    pub done: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("game already completed")]
    GameFinished,
    #[error("invalid player index {0}")]
    InvalidPlayer(usize),
    #[error("no player with id {0} in this session")]
    UnknownPlayerId(Uuid),
    #[error("no session with id {0}")]
    UnknownSession(Uuid),
    #[error("action by player {actual} but expected {expected}")]
    ActionOutOfTurn { expected: usize, actual: usize },
    #[error("action {action} invalid in phase {phase}")]
    InvalidPhase {
        phase: TurnPhase,
        action: ActionType,
    },
    #[error("missing or invalid payload: {0}")]
    InvalidPayload(&'static str),
    #[error("cell {0} is not reachable in exactly the rolled number of steps")]
    IllegalDestination(GridKey),
    #[error("cell {0} lies outside the play area")]
    OutOfBounds(GridKey),
    #[error("reported position {reported} does not match {actual}")]
    PositionMismatch { reported: GridKey, actual: GridKey },
    #[error("cell {0} is already obstructed")]
    CellObstructed(GridKey),
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(#[from] DeckError),
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub map: GameMap,
    pub players: Vec<PlayerState>,
    pub decks: Decks,
    pub obstructions: Vec<ObstructionToken>,
    pub phase: TurnPhase,
    pub status: GameStatus,
    pub current_player: usize,
    pub turn: u32,
    pub last_roll: Option<(u8, u8)>,
    /// Moves available this turn: the dice total once rolled.
    pub budget: u32,
    pub extra_throws: u8,
    pub last_path: Vec<GridKey>,
    pub actions: Vec<GameAction>,
    rng: StdRng,
}

impl GameState {
    pub fn new(config: GameConfig, map: GameMap) -> Result<Self, GameError> {
        if config.players.is_empty() || config.players.len() > MAX_PLAYERS {
            return Err(GameError::InvalidConfig("between 1 and 6 players required"));
        }
        let mut rng = StdRng::seed_from_u64(config.seed);
        let decks = Decks::shuffled(&mut rng);
        let players = config
            .players
            .iter()
            .map(|p| PlayerState::new(p.name.clone(), p.icon, p.is_bot, map.start))
            .collect();

        Ok(Self {
            config,
            map,
            players,
            decks,
            obstructions: Vec::new(),
            phase: TurnPhase::RollDice,
            status: GameStatus::InProgress,
            current_player: 0,
            turn: 0,
            last_roll: None,
            budget: 0,
            extra_throws: 0,
            last_path: Vec::new(),
            actions: Vec::new(),
            rng,
        })
    }

    pub(crate) fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn player_index(&self, id: Uuid) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| p.id == id)
            .ok_or(GameError::UnknownPlayerId(id))
    }

    pub fn current(&self) -> &PlayerState {
        &self.players[self.current_player]
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, GameStatus::Completed { .. })
    }

    pub fn winner(&self) -> Option<usize> {
        match self.status {
            GameStatus::Completed { winner } => Some(winner),
            GameStatus::InProgress => None,
        }
    }

    pub fn obstructed_cells(&self) -> HashSet<GridKey> {
        self.obstructions.iter().map(|o| o.cell).collect()
    }

    /// Legal destinations for the active player's rolled budget; empty before
    /// a roll.
    pub fn legal_destinations(&self) -> MoveOptions {
        if self.phase != TurnPhase::DiceRolled {
            return MoveOptions::default();
        }
        self.options_from(self.current().position, self.budget)
    }

    fn options_from(&self, start: GridKey, budget: u32) -> MoveOptions {
        exact_destinations(
            &self.map.roads,
            &self.map.bounds,
            start,
            budget,
            &self.obstructed_cells(),
        )
    }

    /// Applies one action. Rejected actions leave the state untouched.
    pub fn step(&mut self, mut action: GameAction) -> Result<StepOutcome, GameError> {
        if self.is_finished() {
            return Err(GameError::GameFinished);
        }
        if action.player_index >= self.players.len() {
            return Err(GameError::InvalidPlayer(action.player_index));
        }
        if action.player_index != self.current_player {
            return Err(GameError::ActionOutOfTurn {
                expected: self.current_player,
                actual: action.player_index,
            });
        }

        let mut outcome = StepOutcome::default();
        match action.action_type {
            ActionType::Roll => self.handle_roll(&mut action, &mut outcome)?,
            ActionType::ChooseDestination => self.handle_destination(&action, &mut outcome)?,
            ActionType::ApplyChanceEffect => {
                let effect = match action.payload {
                    ActionPayload::Effect(effect) => effect,
                    _ => return Err(GameError::InvalidPayload("expected chance effect")),
                };
                self.apply_chance_effect(action.player_index, effect, &mut outcome);
            }
            ActionType::PlaceObstruction => {
                let (cell, color) = match action.payload {
                    ActionPayload::Obstruction { cell, color } => (cell, color),
                    _ => return Err(GameError::InvalidPayload("expected obstruction")),
                };
                if !self.map.bounds.contains(cell) {
                    return Err(GameError::OutOfBounds(cell));
                }
                if !self.place_obstruction(action.player_index, cell, color, &mut outcome) {
                    return Err(GameError::CellObstructed(cell));
                }
            }
            ActionType::RemoveObstruction => {
                let color = match action.payload {
                    ActionPayload::Color(color) => color,
                    _ => return Err(GameError::InvalidPayload("expected token color")),
                };
                self.remove_obstructions(color, &mut outcome);
            }
            ActionType::EndTurn => self.handle_end_turn(&action, &mut outcome)?,
        }
        self.actions.push(action);
        outcome.done = self.is_finished();
        Ok(outcome)
    }

    fn handle_roll(
        &mut self,
        action: &mut GameAction,
        outcome: &mut StepOutcome,
    ) -> Result<(), GameError> {
        if self.phase != TurnPhase::RollDice {
            return Err(GameError::InvalidPhase {
                phase: self.phase,
                action: ActionType::Roll,
            });
        }
        let player_idx = action.player_index;
        if let ActionPayload::Dice(a, b) = action.payload {
            if !(1..=6).contains(&a) || !(1..=6).contains(&b) {
                return Err(GameError::InvalidPayload("dice must be 1-6"));
            }
        }

        if self.players[player_idx].missed_turns > 0 {
            let player = &mut self.players[player_idx];
            player.missed_turns -= 1;
            info!(player = player_idx, left = player.missed_turns, "turn skipped");
            outcome.events.push(GameEvent::TurnSkipped {
                player: player_idx,
                missed_turns_left: player.missed_turns,
            });
            action.payload = ActionPayload::None;
            self.phase = TurnPhase::EndTurn;
            return Ok(());
        }

        let (d1, d2) = match action.payload {
            ActionPayload::Dice(a, b) => (a, b),
            _ => (self.roll_die(), self.roll_die()),
        };
        action.payload = ActionPayload::Dice(d1, d2);
        let total = d1 + d2;
        self.last_roll = Some((d1, d2));
        self.budget = u32::from(total);
        self.phase = TurnPhase::DiceRolled;
        info!(player = player_idx, d1, d2, total, "dice rolled");
        outcome.events.push(GameEvent::DiceRolled {
            player: player_idx,
            dice: (d1, d2),
            total,
        });

        if d1 == d2 {
            self.decks.queue_draw(DeckType::Chance);
        }
        self.process_draws(player_idx, None, outcome);
        Ok(())
    }

    fn handle_destination(
        &mut self,
        action: &GameAction,
        outcome: &mut StepOutcome,
    ) -> Result<(), GameError> {
        if self.phase != TurnPhase::DiceRolled {
            return Err(GameError::InvalidPhase {
                phase: self.phase,
                action: ActionType::ChooseDestination,
            });
        }
        let destination = match action.payload {
            ActionPayload::Cell(cell) => cell,
            _ => return Err(GameError::InvalidPayload("expected destination cell")),
        };
        let player_idx = action.player_index;
        let start = self.players[player_idx].position;
        let excluded = self.obstructed_cells();
        let options = self.options_from(start, self.budget);
        if !options.contains(destination) {
            return Err(GameError::IllegalDestination(destination));
        }
        let path = plan_path(
            &self.map.roads,
            &self.map.bounds,
            &options,
            start,
            destination,
            self.budget,
            &excluded,
        )
        .ok_or(GameError::IllegalDestination(destination))?;

        self.phase = TurnPhase::MovePlayer;
        let mut travelled = vec![start];
        let trigger = find_trigger(&path, &self.map.bounds, &self.map.roads);
        let relocation = trigger.and_then(|trigger| {
            debug!(?trigger, "move triggered a card");
            self.decks.queue_draw(trigger.kind.deck());
            self.process_draws(player_idx, Some(trigger), outcome)
                .map(|cell| (trigger, cell))
        });

        match relocation {
            Some((trigger, resolved)) => {
                travelled.extend_from_slice(&path[1..=trigger.steps_used as usize]);
                outcome.events.push(GameEvent::Relocated {
                    player: player_idx,
                    from: trigger.cell,
                    to: resolved,
                });
                travelled.push(resolved);
                let remaining = self.budget.saturating_sub(trigger.steps_used);
                if remaining > 0 {
                    travelled.extend(self.continue_from(player_idx, resolved, remaining));
                }
            }
            None => travelled.extend_from_slice(&path[1..]),
        }

        let final_position = travelled.last().copied().unwrap_or(start);
        self.players[player_idx].position = final_position;
        info!(player = player_idx, %start, %final_position, "player moved");
        outcome.events.push(GameEvent::Moved {
            player: player_idx,
            path: travelled.clone(),
        });
        self.record_visits(player_idx, &travelled[1..], outcome);
        self.last_path = travelled;
        self.phase = TurnPhase::EndTurn;
        self.check_victory(player_idx, outcome);
        Ok(())
    }

    /// After a relocation, spends the remaining moves from the resolved cell
    /// on an exact-match destination: nearest to an outstanding objective,
    /// otherwise random. Cards do not trigger again.
    fn continue_from(&mut self, player_idx: usize, from: GridKey, remaining: u32) -> Vec<GridKey> {
        let options = self.options_from(from, remaining);
        let targets = self.players[player_idx].outstanding_objectives(&self.map);
        let choice = nearest_to(&options.cells, &targets)
            .or_else(|| options.cells.iter().copied().choose(&mut self.rng));
        let Some(destination) = choice else {
            debug!(%from, remaining, "no continuation after relocation");
            return Vec::new();
        };
        plan_path(
            &self.map.roads,
            &self.map.bounds,
            &options,
            from,
            destination,
            remaining,
            &self.obstructed_cells(),
        )
        .map(|path| path[1..].to_vec())
        .unwrap_or_default()
    }

    /// Drains the pending-draw queue. Movement cards resolve against
    /// `trigger`; the first successful resolution is returned as the
    /// relocation target.
    fn process_draws(
        &mut self,
        player_idx: usize,
        trigger: Option<Trigger>,
        outcome: &mut StepOutcome,
    ) -> Option<GridKey> {
        let mut relocation = None;
        while let Some(drawn) = self.decks.process_next_draw(&mut self.rng) {
            info!(player = player_idx, deck = %drawn.deck, card = drawn.id, "card drawn");
            outcome.events.push(GameEvent::CardDrawn {
                player: player_idx,
                card: drawn.clone(),
            });
            let resolved = match (&drawn.card, trigger) {
                (GameCard::Chance(card), _) => {
                    self.apply_chance_effect(player_idx, card.effect, outcome);
                    continue;
                }
                (GameCard::Boundary(card), Some(trigger)) => resolve_boundary_card(
                    card,
                    trigger.cell,
                    &self.map.bounds,
                    &self.map.roads,
                    &self.obstructed_cells(),
                ),
                (GameCard::Motorway(card), Some(trigger)) => resolve_motorway_card(
                    card,
                    trigger.cell,
                    &self.map.sites,
                    &self.obstructed_cells(),
                ),
                (_, None) => None,
            };
            match resolved {
                Some(cell) if relocation.is_none() => relocation = Some(cell),
                Some(_) => {}
                None => {
                    warn!(player = player_idx, deck = %drawn.deck, "card could not be resolved, no relocation");
                    outcome.events.push(GameEvent::CardUnresolved {
                        player: player_idx,
                        deck: drawn.deck,
                    });
                }
            }
        }
        relocation
    }

    /// Applies a chance-card effect to `player_idx` immediately.
    pub(crate) fn apply_chance_effect(
        &mut self,
        player_idx: usize,
        effect: ChanceEffect,
        outcome: &mut StepOutcome,
    ) {
        match effect {
            ChanceEffect::MissTurn { turns } => {
                self.players[player_idx].missed_turns = turns;
                outcome.events.push(GameEvent::TurnsMissed {
                    player: player_idx,
                    turns,
                });
            }
            ChanceEffect::ReturnToStart => {
                let from = self.players[player_idx].position;
                let to = self.map.start;
                self.players[player_idx].position = to;
                outcome.events.push(GameEvent::Relocated {
                    player: player_idx,
                    from,
                    to,
                });
            }
            ChanceEffect::ExtraThrow => {
                self.extra_throws = self.extra_throws.saturating_add(1);
                outcome
                    .events
                    .push(GameEvent::ExtraThrowGranted { player: player_idx });
            }
            ChanceEffect::PlaceObstruction { color } => {
                let cell = self.players[player_idx].position;
                if !self.place_obstruction(player_idx, cell, color, outcome) {
                    debug!(%cell, "cell already obstructed, token not placed");
                }
            }
            ChanceEffect::RemoveObstruction { color } => {
                self.remove_obstructions(color, outcome);
            }
        }
    }

    fn place_obstruction(
        &mut self,
        player_idx: usize,
        cell: GridKey,
        color: TokenColor,
        outcome: &mut StepOutcome,
    ) -> bool {
        if self.obstructions.iter().any(|o| o.cell == cell) {
            return false;
        }
        let token = ObstructionToken {
            cell,
            color,
            placed_by: self.players[player_idx].id,
        };
        self.obstructions.push(token);
        info!(%cell, %color, "obstruction placed");
        outcome.events.push(GameEvent::ObstructionPlaced { token });
        true
    }

    fn remove_obstructions(&mut self, color: TokenColor, outcome: &mut StepOutcome) {
        let before = self.obstructions.len();
        self.obstructions = self
            .obstructions
            .iter()
            .copied()
            .filter(|o| o.color != color)
            .collect();
        let count = before - self.obstructions.len();
        outcome
            .events
            .push(GameEvent::ObstructionRemoved { color, count });
    }

    fn record_visits(&mut self, player_idx: usize, cells: &[GridKey], outcome: &mut StepOutcome) {
        for cell in cells {
            if let Some(objective) = self.map.objective_at(*cell) {
                if self.players[player_idx].visit(objective) {
                    info!(player = player_idx, objective, "objective visited");
                    outcome.events.push(GameEvent::ObjectiveVisited {
                        player: player_idx,
                        objective,
                    });
                }
            }
        }
    }

    fn check_victory(&mut self, player_idx: usize, outcome: &mut StepOutcome) {
        let player = &self.players[player_idx];
        if player.visited_all(&self.map) && player.position == self.map.start {
            self.players[player_idx].has_returned_to_start = true;
            self.status = GameStatus::Completed { winner: player_idx };
            info!(winner = player_idx, turn = self.turn, "game won");
            outcome.events.push(GameEvent::GameWon { winner: player_idx });
        }
    }

    fn handle_end_turn(
        &mut self,
        action: &GameAction,
        outcome: &mut StepOutcome,
    ) -> Result<(), GameError> {
        let stuck = self.phase == TurnPhase::DiceRolled && self.legal_destinations().is_empty();
        if self.phase != TurnPhase::EndTurn && !stuck {
            return Err(GameError::InvalidPhase {
                phase: self.phase,
                action: ActionType::EndTurn,
            });
        }
        let actual = self.players[action.player_index].position;
        if let ActionPayload::Cell(reported) = action.payload {
            if reported != actual {
                return Err(GameError::PositionMismatch { reported, actual });
            }
        }

        self.last_roll = None;
        self.budget = 0;
        self.last_path.clear();
        self.phase = TurnPhase::RollDice;

        if self.extra_throws > 0 {
            self.extra_throws -= 1;
            debug!(player = self.current_player, "extra throw, same player rolls again");
            return Ok(());
        }
        self.current_player = (self.current_player + 1) % self.players.len();
        self.turn += 1;
        outcome.events.push(GameEvent::TurnAdvanced {
            next_player: self.current_player,
        });
        Ok(())
    }

    fn roll_die(&mut self) -> u8 {
        self.rng.gen_range(1..=6)
    }
}
