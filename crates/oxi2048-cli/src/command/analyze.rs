use std::path::PathBuf;

use oxi2048_ai::{
    BoardEvaluator, DEFAULT_SEARCH_DEPTH, ExpectimaxSearch, HeuristicTerms, HeuristicWeights,
};
use oxi2048_engine::Direction;
use serde::Serialize;

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AnalyzeArg {
    /// Board file: a JSON array of rows of tile values (0 = empty)
    board: PathBuf,
    /// Depth budget of the expectimax search
    #[clap(long, default_value_t = DEFAULT_SEARCH_DEPTH)]
    depth: u32,
    /// Heuristic weights file (JSON); built-in defaults when omitted
    #[clap(long)]
    weights: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct DirectionScore {
    direction: Direction,
    score: Option<f32>,
}

#[derive(Debug, Serialize)]
struct Report {
    evaluation: f32,
    terms: HeuristicTerms,
    directions: Vec<DirectionScore>,
    best_direction: Option<Direction>,
    game_over: bool,
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let grid = util::read_board_file(&arg.board)?;
    let weights = match &arg.weights {
        Some(path) => util::read_weights_file(path)?,
        None => HeuristicWeights::default(),
    };

    let evaluator = BoardEvaluator::new(weights);
    let search = ExpectimaxSearch::new(evaluator, arg.depth);

    let directions = Direction::ALL
        .iter()
        .map(|&direction| DirectionScore {
            direction,
            score: search.score_direction(&grid, direction),
        })
        .collect();
    let report = Report {
        evaluation: evaluator.evaluate(&grid),
        terms: HeuristicTerms::of(&grid),
        directions,
        best_direction: search
            .best_direction(&grid, |_| true)
            .map(|(direction, _)| direction),
        game_over: grid.is_game_over(),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
