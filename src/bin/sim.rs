use std::str::FromStr;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use clap::Parser;
use roadrace::board::{AreaSize, GameMap};
use roadrace::cli::{PlayerInstance, StatisticsAccumulator, create_player, player_help};
use roadrace::game::{Game, GameConfig, GameError, MAX_PLAYERS, PlayerConfig};
use roadrace::types::IconType;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser, Clone)]
#[command(name = "roadrace-sim")]
#[command(about = "Road race simulator - play bot games on a map and report results")]
struct Args {
    /// Number of games to play
    #[arg(short = 'n', long, default_value_t = 5)]
    num: u32,

    /// Comma-separated player codes (e.g. O,O or O,R,R)
    #[arg(long, default_value = "O,O")]
    players: String,

    /// Random seed for reproducibility; game i uses seed + i
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Play area: SMALL, MEDIUM or LARGE
    #[arg(long, default_value = "SMALL")]
    area: String,

    /// Number of objectives on generated maps
    #[arg(long, default_value_t = 3)]
    objectives: usize,

    /// Turns before an unfinished game is abandoned
    #[arg(long, default_value_t = 500)]
    turn_limit: u32,

    /// JSON game config; overrides seed, area, objectives and turn limit
    #[arg(long)]
    config: Option<String>,

    /// JSON map file to play on instead of a generated lattice
    #[arg(long)]
    map: Option<String>,

    /// Show player codes and exit
    #[arg(long)]
    help_players: bool,

    /// Silence console output
    #[arg(long)]
    quiet: bool,

    /// Number of worker threads for parallel execution
    #[arg(long, default_value_t = 1)]
    workers: usize,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if args.help_players {
        println!("{}", player_help());
        return;
    }

    let codes: Vec<&str> = args.players.split(',').map(str::trim).collect();
    if codes.is_empty() || codes.len() > MAX_PLAYERS {
        eprintln!("Error: Must specify 1-{} players", MAX_PLAYERS);
        std::process::exit(1);
    }
    let mut players = Vec::with_capacity(codes.len());
    for code in &codes {
        match create_player(code) {
            Some(player) => players.push(player),
            None => {
                eprintln!("Error: Unknown player code '{}'", code);
                eprintln!("Use --help-players to see available codes");
                std::process::exit(1);
            }
        }
    }

    let base = match base_config(&args, &players) {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "could not build game config");
            std::process::exit(1);
        }
    };
    let map = match args.map.as_deref().map(GameMap::from_json_file).transpose() {
        Ok(map) => map,
        Err(err) => {
            error!(%err, "could not load map");
            std::process::exit(1);
        }
    };
    info!(games = args.num, players = %args.players, seed = base.seed, "starting simulation");

    let mut stats = StatisticsAccumulator::new();
    if args.workers > 1 {
        run_parallel_simulations(&args, &players, &base, map, &mut stats);
    } else {
        run_sequential_simulations(&args, &players, &base, map.as_ref(), &mut stats);
    }

    if !args.quiet {
        print_summary(&stats, &players);
    }
}

fn base_config(args: &Args, players: &[PlayerInstance]) -> Result<GameConfig, String> {
    let mut config = match &args.config {
        Some(path) => GameConfig::from_json_file(path).map_err(|e| e.to_string())?,
        None => {
            let area = AreaSize::from_str(&args.area.to_uppercase())
                .map_err(|_| format!("invalid area '{}', use SMALL, MEDIUM or LARGE", args.area))?;
            GameConfig {
                area,
                num_objectives: args.objectives,
                seed: args.seed,
                turn_limit: args.turn_limit,
                ..GameConfig::default()
            }
        }
    };
    config.players = players
        .iter()
        .enumerate()
        .map(|(idx, player)| PlayerConfig {
            name: format!("{} {}", player.name(), idx + 1),
            icon: IconType::ORDERED[idx],
            is_bot: true,
        })
        .collect();
    Ok(config)
}

fn play_one(
    base: &GameConfig,
    map: Option<&GameMap>,
    players: &[PlayerInstance],
    game_idx: usize,
) -> Result<(Game, std::time::Duration), GameError> {
    let config = GameConfig {
        seed: base.seed + game_idx as u64,
        ..base.clone()
    };
    let start = Instant::now();
    let mut game = match map {
        Some(map) => Game::with_map(config, map.clone())?,
        None => Game::new(config)?,
    };
    game.play(players);
    Ok((game, start.elapsed()))
}

fn run_sequential_simulations(
    args: &Args,
    players: &[PlayerInstance],
    base: &GameConfig,
    map: Option<&GameMap>,
    stats: &mut StatisticsAccumulator,
) {
    for game_idx in 0..args.num as usize {
        let (game, duration) = match play_one(base, map, players, game_idx) {
            Ok(played) => played,
            Err(err) => {
                warn!(game = game_idx + 1, %err, "game could not be set up");
                continue;
            }
        };
        stats.after(&game, duration);

        if !args.quiet {
            let last_n = 10;
            if game_idx < last_n || game_idx >= (args.num as usize).saturating_sub(last_n) {
                let winner = game
                    .state
                    .winner()
                    .map(|idx| game.state.players[idx].name.clone())
                    .unwrap_or_else(|| "None".to_string());
                println!(
                    "Game {:>4}: Winner={:>12}, Turns={:>4}, Duration={:?}",
                    game_idx + 1,
                    winner,
                    game.state.turn,
                    duration
                );
            }
        }
    }
}

fn run_parallel_simulations(
    args: &Args,
    players: &[PlayerInstance],
    base: &GameConfig,
    map: Option<GameMap>,
    stats: &mut StatisticsAccumulator,
) {
    let players = Arc::new(players.to_vec());
    let base = Arc::new(base.clone());
    let map = Arc::new(map);
    let workers = args.workers;
    let games_per_worker = args.num as usize / workers;
    let remainder = args.num as usize % workers;

    let handles: Vec<_> = (0..workers)
        .map(|worker_id| {
            let players = Arc::clone(&players);
            let base = Arc::clone(&base);
            let map = Arc::clone(&map);
            let num_games = games_per_worker + usize::from(worker_id < remainder);
            let start_idx = worker_id * games_per_worker + worker_id.min(remainder);

            thread::spawn(move || {
                let mut local = StatisticsAccumulator::new();
                for game_idx in start_idx..start_idx + num_games {
                    match play_one(&base, (*map).as_ref(), &players, game_idx) {
                        Ok((game, duration)) => local.after(&game, duration),
                        Err(err) => warn!(game = game_idx + 1, %err, "game could not be set up"),
                    }
                }
                local
            })
        })
        .collect();

    for handle in handles {
        match handle.join() {
            Ok(worker) => stats.stats.merge(worker.stats),
            Err(_) => error!("simulation worker panicked"),
        }
    }
}

fn print_summary(stats: &StatisticsAccumulator, players: &[PlayerInstance]) {
    println!("\n{}", "=".repeat(80));
    println!("SIMULATION SUMMARY");
    println!("{}", "=".repeat(80));

    println!("\nPlayer Summary:");
    println!(
        "{:<15} {:<10} {:<12} {:<12}",
        "Player", "Wins", "Win Rate", "Avg Objectives"
    );
    println!("{}", "-".repeat(55));

    for (idx, player) in players.iter().enumerate() {
        let wins = stats.stats.wins.get(&idx).copied().unwrap_or(0);
        println!(
            "{:<15} {:<10} {:<11.1}% {:<12.2}",
            format!("{} ({})", player.name(), idx + 1),
            wins,
            stats.stats.win_rate(idx) * 100.0,
            stats.stats.avg_objectives(idx)
        );
    }

    println!("\nGame Summary:");
    println!("  Total Games: {}", stats.stats.games);
    println!("  Unfinished: {}", stats.stats.unfinished);
    println!("  Avg Turns: {:.2}", stats.stats.get_avg_turns());
    println!("  Avg Ticks: {:.2}", stats.stats.get_avg_ticks());
    println!("  Avg Duration: {:.2?}", stats.stats.get_avg_duration());
}
