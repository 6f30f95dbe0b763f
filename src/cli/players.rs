use crate::coords::GridKey;
use crate::game::GameState;
use crate::players::{BasePlayer, ObjectivePlayer, RandomPlayer};
use crate::search::MoveOptions;

pub struct CliPlayer {
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const CLI_PLAYERS: &[CliPlayer] = &[
    CliPlayer {
        code: "O",
        name: "ObjectivePlayer",
        description: "Heads for the nearest unvisited objective, then back to the start.",
    },
    CliPlayer {
        code: "R",
        name: "RandomPlayer",
        description: "Chooses a legal destination at random.",
    },
];

#[derive(Debug, Clone, Copy)]
pub enum PlayerInstance {
    Objective(ObjectivePlayer),
    Random(RandomPlayer),
}

impl PlayerInstance {
    pub fn name(&self) -> &'static str {
        match self {
            PlayerInstance::Objective(_) => "Objective",
            PlayerInstance::Random(_) => "Random",
        }
    }
}

impl BasePlayer for PlayerInstance {
    fn decide(&self, state: &GameState, options: &MoveOptions) -> Option<GridKey> {
        match self {
            PlayerInstance::Objective(p) => p.decide(state, options),
            PlayerInstance::Random(p) => p.decide(state, options),
        }
    }
}

pub fn create_player(code: &str) -> Option<PlayerInstance> {
    match code.to_ascii_uppercase().as_str() {
        "O" => Some(PlayerInstance::Objective(ObjectivePlayer)),
        "R" => Some(PlayerInstance::Random(RandomPlayer)),
        _ => None,
    }
}

pub fn player_help() -> String {
    let mut lines = vec!["Player codes:".to_string()];
    for player in CLI_PLAYERS {
        lines.push(format!(
            "  {:<3} {:<18} {}",
            player.code, player.name, player.description
        ));
    }
    lines.join("\n")
}
