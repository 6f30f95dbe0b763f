#![allow(dead_code)]

use roadrace::board::{GameBounds, GameMap, InfrastructureSites, Objective, RoadIndex};
use roadrace::cards::{CardId, ChanceEffect, DeckState, Decks, GameCard, catalog};
use roadrace::coords::GridKey;
use roadrace::game::{Game, GameConfig, PlayerConfig, SessionStore};
use roadrace::types::{DeckType, IconType, RoadClass};
use uuid::Uuid;

pub const CENTER: GridKey = GridKey::new(1_000, 1_000);

/// 21 x 21 cells with one east-west and one north-south street crossing at
/// the center.
pub fn cross_map(objectives: &[GridKey]) -> GameMap {
    let bounds = GameBounds::new(GridKey::new(0, 0), GridKey::new(2_000, 2_000));
    let mut roads = RoadIndex::new(bounds);
    for d in 0..=20 {
        roads.insert_road(GridKey::new(d * 100, 1_000), RoadClass::B);
        roads.insert_road(GridKey::new(1_000, d * 100), RoadClass::B);
    }
    GameMap::new(
        bounds,
        roads,
        InfrastructureSites::default(),
        CENTER,
        named(objectives),
    )
    .unwrap()
}

/// 11 x 11 cells: a B-road along row 5 from the west edge to the east edge,
/// continuing north up the east edge.
pub fn hook_map() -> GameMap {
    let bounds = GameBounds::new(GridKey::new(0, 0), GridKey::new(1_000, 1_000));
    let mut roads = RoadIndex::new(bounds);
    for d in 0..=10 {
        roads.insert_road(GridKey::new(d * 100, 500), RoadClass::B);
    }
    for d in 6..=10 {
        roads.insert_road(GridKey::new(1_000, d * 100), RoadClass::B);
    }
    GameMap::new(
        bounds,
        roads,
        InfrastructureSites::default(),
        GridKey::new(500, 500),
        Vec::new(),
    )
    .unwrap()
}

pub fn named(cells: &[GridKey]) -> Vec<Objective> {
    cells
        .iter()
        .enumerate()
        .map(|(idx, cell)| Objective {
            name: format!("Objective {}", idx + 1),
            cell: *cell,
        })
        .collect()
}

pub fn config(bots: &[bool]) -> GameConfig {
    GameConfig {
        players: bots
            .iter()
            .enumerate()
            .map(|(idx, is_bot)| PlayerConfig {
                name: format!("Driver {}", idx + 1),
                icon: IconType::ORDERED[idx],
                is_bot: *is_bot,
            })
            .collect(),
        seed: 7,
        ..GameConfig::default()
    }
}

pub fn human_game(map: GameMap, players: usize) -> Game {
    Game::with_map(config(&vec![false; players]), map).unwrap()
}

/// Inserts `game` into a fresh store and returns the store, session id and
/// player ids in seat order.
pub fn session(game: Game) -> (SessionStore, Uuid, Vec<Uuid>) {
    let ids = game.state.players.iter().map(|p| p.id).collect();
    let mut store = SessionStore::new();
    let session_id = store.insert(game);
    (store, session_id, ids)
}

pub fn card_id(deck: DeckType, card: &GameCard) -> CardId {
    catalog(deck).iter().position(|c| c == card).unwrap() as CardId
}

pub fn chance_id(effect: ChanceEffect) -> CardId {
    catalog(DeckType::Chance)
        .iter()
        .position(|c| matches!(c, GameCard::Chance(chance) if chance.effect == effect))
        .unwrap() as CardId
}

/// A deck whose next draw is `first`.
pub fn deck_starting_with(deck: DeckType, first: CardId) -> DeckState {
    let mut order: Vec<CardId> = (0..catalog(deck).len() as CardId)
        .filter(|id| *id != first)
        .collect();
    order.insert(0, first);
    DeckState::from_parts(deck, order, 0).unwrap()
}

/// Stacks the named decks so their next draws are the given cards.
pub fn stack_decks(game: &mut Game, top: &[(DeckType, CardId)]) {
    let pick = |deck: DeckType| {
        top.iter()
            .find(|(d, _)| *d == deck)
            .map(|(_, id)| deck_starting_with(deck, *id))
            .unwrap_or_else(|| game.state.decks.deck(deck).clone())
    };
    let decks = Decks::from_parts(
        pick(DeckType::Boundary),
        pick(DeckType::Motorway),
        pick(DeckType::Chance),
        game.state.decks.pending().clone(),
    )
    .unwrap();
    game.state.decks = decks;
}
