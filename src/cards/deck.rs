use std::collections::VecDeque;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cards::{GameCard, catalog};
use crate::types::DeckType;

/// Index of a card within its deck's catalog.
pub type CardId = u16;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeckError {
    #[error("{deck} deck cursor {cursor} exceeds {len} cards")]
    CursorOutOfRange {
        deck: DeckType,
        cursor: usize,
        len: usize,
    },
    #[error("{deck} deck order is not a permutation of its catalog")]
    ContentsMismatch { deck: DeckType },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawnCard {
    pub deck: DeckType,
    pub id: CardId,
    pub card: GameCard,
}

/// Shuffle order and draw cursor of one deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckState {
    deck: DeckType,
    order: Vec<CardId>,
    cursor: usize,
}

impl DeckState {
    pub fn shuffled(deck: DeckType, rng: &mut impl rand::Rng) -> Self {
        let mut order: Vec<CardId> = (0..catalog(deck).len() as CardId).collect();
        order.shuffle(rng);
        Self {
            deck,
            order,
            cursor: 0,
        }
    }

    /// Restores a serialized deck, checking that `order` is a permutation of
    /// the catalog and the cursor is within it.
    pub fn from_parts(deck: DeckType, order: Vec<CardId>, cursor: usize) -> Result<Self, DeckError> {
        let mut sorted = order.clone();
        sorted.sort_unstable();
        let expected: Vec<CardId> = (0..catalog(deck).len() as CardId).collect();
        if sorted != expected {
            return Err(DeckError::ContentsMismatch { deck });
        }
        if cursor > order.len() {
            return Err(DeckError::CursorOutOfRange {
                deck,
                cursor,
                len: order.len(),
            });
        }
        Ok(Self {
            deck,
            order,
            cursor,
        })
    }

    pub fn deck(&self) -> DeckType {
        self.deck
    }

    pub fn order(&self) -> &[CardId] {
        &self.order
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.order.len() - self.cursor
    }

    /// Draws the card under the cursor. An exhausted deck is reshuffled in
    /// full, its first card returned and the cursor left at 1.
    pub fn draw(&mut self, rng: &mut impl rand::Rng) -> DrawnCard {
        if self.cursor >= self.order.len() {
            self.order.shuffle(rng);
            self.cursor = 0;
            debug!(deck = %self.deck, "deck exhausted, reshuffled");
        }
        let id = self.order[self.cursor];
        self.cursor += 1;
        DrawnCard {
            deck: self.deck,
            id,
            card: catalog(self.deck)[usize::from(id)].clone(),
        }
    }
}

/// The three decks plus the FIFO queue of draws awaiting resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decks {
    boundary: DeckState,
    motorway: DeckState,
    chance: DeckState,
    pending: VecDeque<DeckType>,
}

impl Decks {
    pub fn shuffled(rng: &mut impl rand::Rng) -> Self {
        Self {
            boundary: DeckState::shuffled(DeckType::Boundary, rng),
            motorway: DeckState::shuffled(DeckType::Motorway, rng),
            chance: DeckState::shuffled(DeckType::Chance, rng),
            pending: VecDeque::new(),
        }
    }

    pub fn from_parts(
        boundary: DeckState,
        motorway: DeckState,
        chance: DeckState,
        pending: VecDeque<DeckType>,
    ) -> Result<Self, DeckError> {
        for (expected, state) in DeckType::ALL.iter().zip([&boundary, &motorway, &chance]) {
            if state.deck != *expected {
                return Err(DeckError::ContentsMismatch { deck: *expected });
            }
        }
        Ok(Self {
            boundary,
            motorway,
            chance,
            pending,
        })
    }

    pub fn deck(&self, deck: DeckType) -> &DeckState {
        match deck {
            DeckType::Boundary => &self.boundary,
            DeckType::Motorway => &self.motorway,
            DeckType::Chance => &self.chance,
        }
    }

    fn deck_mut(&mut self, deck: DeckType) -> &mut DeckState {
        match deck {
            DeckType::Boundary => &mut self.boundary,
            DeckType::Motorway => &mut self.motorway,
            DeckType::Chance => &mut self.chance,
        }
    }

    pub fn draw(&mut self, deck: DeckType, rng: &mut impl rand::Rng) -> DrawnCard {
        self.deck_mut(deck).draw(rng)
    }

    pub fn queue_draw(&mut self, deck: DeckType) {
        self.pending.push_back(deck);
    }

    /// Pops the oldest queued draw and performs it.
    pub fn process_next_draw(&mut self, rng: &mut impl rand::Rng) -> Option<DrawnCard> {
        let deck = self.pending.pop_front()?;
        Some(self.draw(deck, rng))
    }

    pub fn pending(&self) -> &VecDeque<DeckType> {
        &self.pending
    }
}
