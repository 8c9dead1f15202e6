use oxi2048_engine::{Cell, TileGrid};
use serde::{Deserialize, Serialize};

/// Coefficients of the positional evaluation.
///
/// The defaults are the tuned constants the engine plays with; they can be
/// overridden from a JSON file for experimentation, where omitted fields
/// keep their default value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    pub empty_cells: f32,
    pub smoothness: f32,
    pub monotonicity: f32,
    pub max_tile_log: f32,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            empty_cells: 200.0,
            smoothness: 0.5,
            monotonicity: 1.0,
            max_tile_log: 10.0,
        }
    }
}

/// Raw (unweighted) values of the four evaluation terms.
///
/// - `empty_cells`: number of empty cells; open boards keep options alive.
/// - `smoothness`: negated sum of value gaps between adjacent non-empty
///   tiles; large gradients block merges.
/// - `monotonicity`: negated sum of value increases along every row
///   (left to right) and column (top to bottom); rewards boards that fall
///   off from one corner.
/// - `max_tile_log`: natural log of the highest tile, floored to `ln 1 = 0`
///   on an empty board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeuristicTerms {
    pub empty_cells: f32,
    pub smoothness: f32,
    pub monotonicity: f32,
    pub max_tile_log: f32,
}

impl HeuristicTerms {
    #[must_use]
    pub fn of(grid: &TileGrid) -> Self {
        Self {
            empty_cells: grid.count_empty() as f32,
            smoothness: smoothness(grid),
            monotonicity: monotonicity(grid),
            max_tile_log: (grid.max_tile().max(1) as f32).ln(),
        }
    }
}

/// Scores a static board position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoardEvaluator {
    weights: HeuristicWeights,
}

impl BoardEvaluator {
    #[must_use]
    pub const fn new(weights: HeuristicWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub const fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }

    /// Weighted sum of the four terms; higher is better.
    #[must_use]
    pub fn evaluate(&self, grid: &TileGrid) -> f32 {
        let terms = HeuristicTerms::of(grid);
        let weights = &self.weights;
        weights.empty_cells * terms.empty_cells
            + weights.smoothness * terms.smoothness
            + weights.monotonicity * terms.monotonicity
            + weights.max_tile_log * terms.max_tile_log
    }
}

fn smoothness(grid: &TileGrid) -> f32 {
    let mut penalty = 0.0;
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let value = grid.tile(Cell { x, y });
            if value == 0 {
                continue;
            }
            if x + 1 < grid.width() {
                let right = grid.tile(Cell { x: x + 1, y });
                if right != 0 {
                    penalty += value.abs_diff(right) as f32;
                }
            }
            if y + 1 < grid.height() {
                let down = grid.tile(Cell { x, y: y + 1 });
                if down != 0 {
                    penalty += value.abs_diff(down) as f32;
                }
            }
        }
    }
    -penalty
}

fn monotonicity(grid: &TileGrid) -> f32 {
    let mut penalty = 0.0;
    for y in 0..grid.height() {
        for x in 0..grid.width() - 1 {
            let current = grid.tile(Cell { x, y });
            let next = grid.tile(Cell { x: x + 1, y });
            penalty += next.saturating_sub(current) as f32;
        }
    }
    for x in 0..grid.width() {
        for y in 0..grid.height() - 1 {
            let current = grid.tile(Cell { x, y });
            let next = grid.tile(Cell { x, y: y + 1 });
            penalty += next.saturating_sub(current) as f32;
        }
    }
    -penalty
}
