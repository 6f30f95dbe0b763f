use std::collections::HashMap;
use std::time::Duration;

use crate::game::Game;

#[derive(Debug, Default, Clone)]
pub struct GameStats {
    /// Wins keyed by seat index.
    pub wins: HashMap<usize, u32>,
    /// Objectives reached per game, keyed by seat index.
    pub objectives_by_player: HashMap<usize, Vec<usize>>,
    pub games: u32,
    pub unfinished: u32,
    pub total_ticks: u64,
    pub total_turns: u64,
    pub total_duration: Duration,
}

impl GameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_game(&mut self, game: &Game, duration: Duration) {
        self.games += 1;
        self.total_duration += duration;
        self.total_turns += u64::from(game.state.turn);
        self.total_ticks += game.state.actions.len() as u64;

        match game.state.winner() {
            Some(winner) => *self.wins.entry(winner).or_insert(0) += 1,
            None => self.unfinished += 1,
        }

        for (idx, player) in game.state.players.iter().enumerate() {
            self.objectives_by_player
                .entry(idx)
                .or_default()
                .push(player.visited.len());
        }
    }

    pub fn merge(&mut self, other: GameStats) {
        for (seat, wins) in other.wins {
            *self.wins.entry(seat).or_insert(0) += wins;
        }
        for (seat, visited) in other.objectives_by_player {
            self.objectives_by_player
                .entry(seat)
                .or_default()
                .extend(visited);
        }
        self.games += other.games;
        self.unfinished += other.unfinished;
        self.total_ticks += other.total_ticks;
        self.total_turns += other.total_turns;
        self.total_duration += other.total_duration;
    }

    pub fn win_rate(&self, seat: usize) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        f64::from(self.wins.get(&seat).copied().unwrap_or(0)) / f64::from(self.games)
    }

    pub fn avg_objectives(&self, seat: usize) -> f64 {
        match self.objectives_by_player.get(&seat) {
            Some(counts) if !counts.is_empty() => {
                counts.iter().sum::<usize>() as f64 / counts.len() as f64
            }
            _ => 0.0,
        }
    }

    pub fn get_avg_ticks(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_ticks as f64 / f64::from(self.games)
    }

    pub fn get_avg_turns(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_turns as f64 / f64::from(self.games)
    }

    pub fn get_avg_duration(&self) -> Duration {
        if self.games == 0 {
            return Duration::ZERO;
        }
        self.total_duration / self.games
    }
}

#[derive(Debug, Default)]
pub struct StatisticsAccumulator {
    pub stats: GameStats,
}

impl StatisticsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn after(&mut self, game: &Game, duration: Duration) {
        self.stats.record_game(game, duration);
    }
}
