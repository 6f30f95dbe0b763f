//! The three card decks: boundary cards, motorway/railway cards and chance
//! cards. Card contents are fixed; only deck order and cursors change.

use itertools::iproduct;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::types::{Compass, DeckType, Infrastructure, Ordinal, RoadClass, Rotation, TokenColor};

pub mod deck;
pub mod resolve;

pub use deck::{CardId, DeckError, DeckState, Decks, DrawnCard};
pub use resolve::{
    MIN_SITE_DISTANCE, SITE_BEARING_TOLERANCE, resolve_boundary_card, resolve_motorway_card,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundaryCard {
    pub road_class: RoadClass,
    pub ordinal: Ordinal,
    pub rotation: Rotation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MotorwayCard {
    pub direction: Compass,
    pub ordinal: Ordinal,
    pub infrastructure: Infrastructure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChanceEffect {
    MissTurn { turns: u8 },
    ReturnToStart,
    ExtraThrow,
    PlaceObstruction { color: TokenColor },
    RemoveObstruction { color: TokenColor },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChanceCard {
    pub body: String,
    pub effect: ChanceEffect,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameCard {
    Boundary(BoundaryCard),
    Motorway(MotorwayCard),
    Chance(ChanceCard),
}

static BOUNDARY_CARDS: Lazy<Vec<GameCard>> = Lazy::new(|| {
    iproduct!(RoadClass::iter(), Ordinal::iter(), Rotation::iter())
        .map(|(road_class, ordinal, rotation)| {
            GameCard::Boundary(BoundaryCard {
                road_class,
                ordinal,
                rotation,
            })
        })
        .collect()
});

static MOTORWAY_CARDS: Lazy<Vec<GameCard>> = Lazy::new(|| {
    iproduct!(Compass::iter(), Ordinal::iter(), Infrastructure::iter())
        .map(|(direction, ordinal, infrastructure)| {
            GameCard::Motorway(MotorwayCard {
                direction,
                ordinal,
                infrastructure,
            })
        })
        .collect()
});

static CHANCE_CARDS: Lazy<Vec<GameCard>> = Lazy::new(|| {
    use ChanceEffect::*;
    use TokenColor::*;
    const DISTRIBUTION: &[(&str, ChanceEffect)] = &[
        ("A puncture on the ring road. Miss a turn.", MissTurn { turns: 1 }),
        ("Stuck behind a tractor. Miss a turn.", MissTurn { turns: 1 }),
        ("Traffic jam at the roundabout. Miss a turn.", MissTurn { turns: 1 }),
        ("Your engine overheats. Miss two turns.", MissTurn { turns: 2 }),
        ("You left your wallet at home. Return to the start.", ReturnToStart),
        ("Wrong turn at the junction. Return to the start.", ReturnToStart),
        ("Green lights all the way. Take another throw.", ExtraThrow),
        ("Empty roads this morning. Take another throw.", ExtraThrow),
        ("A shortcut through the car park. Take another throw.", ExtraThrow),
        ("Roadworks ahead. Place a red cone.", PlaceObstruction { color: Red }),
        ("Burst water main. Place a blue cone.", PlaceObstruction { color: Blue }),
        ("Police incident. Place a yellow cone.", PlaceObstruction { color: Yellow }),
        ("Fallen tree. Place a green cone.", PlaceObstruction { color: Green }),
        ("The road crew packs up. Remove the red cones.", RemoveObstruction { color: Red }),
        ("Repairs finished. Remove the blue cones.", RemoveObstruction { color: Blue }),
        ("Incident cleared. Remove the yellow cones.", RemoveObstruction { color: Yellow }),
        ("Tree cleared. Remove the green cones.", RemoveObstruction { color: Green }),
    ];
    DISTRIBUTION
        .iter()
        .map(|(body, effect)| {
            GameCard::Chance(ChanceCard {
                body: (*body).to_string(),
                effect: *effect,
            })
        })
        .collect()
});

/// Every card of `deck`, indexed by [`CardId`].
pub fn catalog(deck: DeckType) -> &'static [GameCard] {
    match deck {
        DeckType::Boundary => &BOUNDARY_CARDS,
        DeckType::Motorway => &MOTORWAY_CARDS,
        DeckType::Chance => &CHANCE_CARDS,
    }
}

pub fn card(deck: DeckType, id: CardId) -> Option<&'static GameCard> {
    catalog(deck).get(usize::from(id))
}
