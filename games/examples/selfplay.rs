//! Plays MCTS against itself on Nim and reports who won.
//!
//! `RUST_LOG=debug cargo run --example selfplay -- --heaps 3 4 5 --games 8`

use std::{error::Error, path::PathBuf};

use clap::Parser;
use enum_map::EnumMap;
use game_types::Player;
use games::{History, NimGame, NimState, TicTacToe, XorRollout};
use mcts::{Game, GameState, Manager, RolloutPolicy, SearchConfig, UniformRollout};
use rayon::prelude::*;
use tracing::{debug, info};

type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Parser, Debug)]
#[command(about = "Self-play with Monte Carlo tree search")]
struct Args {
    /// Initial heap sizes
    #[arg(long, num_args = 1.., default_values_t = [1, 2])]
    heaps: Vec<u32>,

    /// Number of independent games, played in parallel
    #[arg(long, short = 'g', default_value_t = 4)]
    games: u64,

    /// Search configuration in RON, e.g. `(iterations: 2000, mode: Recompute)`
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Iterations per move, overrides the configuration file
    #[arg(long, short = 'n')]
    iterations: Option<u32>,

    /// Base seed; game `i` uses `seed + i`
    #[arg(long)]
    seed: Option<u64>,

    /// Use uniform rollouts instead of the nim-sum heuristic
    #[arg(long)]
    uniform: bool,

    /// Play one game of tic-tac-toe instead of Nim
    #[arg(long)]
    tictactoe: bool,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn play_nim<R: RolloutPolicy<NimState> + Clone>(
    game: &NimGame,
    config: &SearchConfig,
    rollout: &R,
) -> Result<History, BoxError> {
    let mut history = History::new(game);
    let mut state = game.start();
    while !state.is_terminal() {
        let mut manager = Manager::new(state.clone(), config.clone(), rollout.clone());
        manager.search()?;
        let next = manager.best_state();
        let mv = state
            .move_to(&next)
            .ok_or("search returned a position that is not one move away")?;
        debug!(%mv, "move");
        history.push(mv);
        state = next;
    }
    Ok(history)
}

fn play_tictactoe(seed: u64, config: &SearchConfig) -> Result<Option<Player>, BoxError> {
    let mut state = TicTacToe::new(seed).start();
    while !state.is_terminal() {
        let mut manager = Manager::new(state.clone(), config.clone(), UniformRollout);
        manager.search()?;
        state = manager.best_state();
        info!("\n{}", state.position());
    }
    Ok(state.winner())
}

fn main() -> Result<(), BoxError> {
    init_tracing();
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => SearchConfig::from_ron(&std::fs::read_to_string(path)?)?,
        None => SearchConfig::default(),
    };
    if let Some(iterations) = args.iterations {
        config = config.with_iterations(iterations);
    }
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, ?config, "starting");

    if args.tictactoe {
        match play_tictactoe(seed, &config)? {
            Some(winner) => println!("Player {winner} wins"),
            None => println!("Draw"),
        }
        return Ok(());
    }

    let histories = (0..args.games)
        .into_par_iter()
        .map(|i| -> Result<History, BoxError> {
            let game = NimGame::new(args.heaps.clone())?.with_seed(seed.wrapping_add(i));
            if args.uniform {
                play_nim(&game, &config, &UniformRollout)
            } else {
                play_nim(&game, &config, &XorRollout)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut wins: EnumMap<Player, u32> = EnumMap::default();
    for history in &histories {
        let last = history.replay()?;
        if let Some(winner) = last.winner() {
            wins[winner] += 1;
        }
        debug!(record = %history.to_ron()?, "game");
    }
    for (player, count) in wins {
        println!("Player {player}: {count} wins");
    }
    Ok(())
}
