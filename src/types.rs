use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RoadClass {
    A,
    B,
    Any,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Ordinal {
    First,
    Second,
    Third,
}

impl Ordinal {
    /// One-based rank used when counting qualifying candidates.
    pub const fn rank(self) -> usize {
        match self {
            Ordinal::First => 1,
            Ordinal::Second => 2,
            Ordinal::Third => 3,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Rotation {
    Clockwise,
    Anticlockwise,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Compass {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Compass {
    /// Bearing in degrees, clockwise from grid north.
    pub const fn bearing(self) -> f64 {
        match self {
            Compass::North => 0.0,
            Compass::NorthEast => 45.0,
            Compass::East => 90.0,
            Compass::SouthEast => 135.0,
            Compass::South => 180.0,
            Compass::SouthWest => 225.0,
            Compass::West => 270.0,
            Compass::NorthWest => 315.0,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Infrastructure {
    Motorway,
    Railway,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DeckType {
    Boundary,
    Motorway,
    Chance,
}

impl DeckType {
    pub const ALL: [DeckType; 3] = [DeckType::Boundary, DeckType::Motorway, DeckType::Chance];
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenColor {
    Red,
    Blue,
    Yellow,
    Green,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum IconType {
    Car,
    Van,
    Bus,
    Tractor,
    Motorbike,
    Bicycle,
}

impl IconType {
    pub const ORDERED: [IconType; 6] = [
        IconType::Car,
        IconType::Van,
        IconType::Bus,
        IconType::Tractor,
        IconType::Motorbike,
        IconType::Bicycle,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Roll,
    ChooseDestination,
    ApplyChanceEffect,
    PlaceObstruction,
    RemoveObstruction,
    EndTurn,
}
