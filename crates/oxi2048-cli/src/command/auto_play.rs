use std::path::PathBuf;

use log::info;
use oxi2048_ai::{
    AiPlayer, BoardEvaluator, DEFAULT_RECENT_MOVE_MEMORY, DEFAULT_SEARCH_DEPTH, ExpectimaxSearch,
    HeuristicWeights,
};
use oxi2048_engine::{GameSession, SpawnSeed};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Number of games to play
    #[clap(long, default_value_t = 1)]
    games: usize,
    /// Board width
    #[clap(long, default_value_t = 4)]
    width: usize,
    /// Board height
    #[clap(long, default_value_t = 4)]
    height: usize,
    /// Depth budget of the expectimax search
    #[clap(long, default_value_t = DEFAULT_SEARCH_DEPTH)]
    depth: u32,
    /// How many of the last chosen directions are avoided
    #[clap(long, default_value_t = DEFAULT_RECENT_MOVE_MEMORY)]
    recent_move_memory: usize,
    /// Stop a game after this many turns
    #[clap(long, default_value_t = 10_000)]
    turn_limit: usize,
    /// RNG seed for reproducible runs
    #[clap(long)]
    seed: Option<u64>,
    /// Heuristic weights file (JSON); built-in defaults when omitted
    #[clap(long)]
    weights: Option<PathBuf>,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let weights = match &arg.weights {
        Some(path) => util::read_weights_file(path)?,
        None => HeuristicWeights::default(),
    };
    let search = ExpectimaxSearch::new(BoardEvaluator::new(weights), arg.depth);

    let mut rng = match arg.seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::from_os_rng(),
    };

    let mut total_score: u64 = 0;
    let mut best_score: u32 = 0;
    let mut best_tile: u32 = 0;
    for game in 0..arg.games {
        let spawn_seed: SpawnSeed = rng.random();
        let mut session = GameSession::new(arg.width, arg.height, spawn_seed)?;
        let mut player = AiPlayer::with_memory(search, arg.recent_move_memory);

        let mut turns = 0;
        while session.session_state().is_playing() && turns < arg.turn_limit {
            if player.play_turn(&mut session, &mut rng).is_none() {
                // Every direction outside the recent-move memory is a
                // no-op; forget the history and try once more before
                // declaring the game stuck.
                player.clear_recent_moves();
                if player.play_turn(&mut session, &mut rng).is_none() {
                    break;
                }
            }
            turns += 1;
        }

        let stats = session.stats();
        info!(
            "game {game}: score {}, highest tile {}, {} moves",
            stats.score(),
            stats.highest_tile(),
            stats.moves(),
        );
        total_score += u64::from(stats.score());
        best_score = best_score.max(stats.score());
        best_tile = best_tile.max(stats.highest_tile());
    }

    if arg.games > 1 {
        info!(
            "{} games: mean score {}, best score {}, best tile {}",
            arg.games,
            total_score / arg.games as u64,
            best_score,
            best_tile,
        );
    }
    Ok(())
}
