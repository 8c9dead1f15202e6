use oxi2048_engine::{Direction, TileGrid};

use crate::heuristic::BoardEvaluator;

/// Default depth budget of the recursion.
pub const DEFAULT_SEARCH_DEPTH: u32 = 4;

/// Spawn model of the chance layer: a 2 with probability 0.9, a 4 with 0.1.
const TWO_TILE_PROBABILITY: f32 = 0.9;
const FOUR_TILE_PROBABILITY: f32 = 0.1;

#[derive(Debug, Clone, Copy)]
enum Node {
    Max,
    Chance,
}

/// Bounded-depth expectimax over board clones.
///
/// The tree alternates two layers: a max layer where the agent picks the
/// best of the four directions, and a chance layer where the environment
/// spawns a tile into one of the empty cells. Chance nodes take the full
/// expectation, uniform over cells combined with the 90/10 value split,
/// not a sample. The recursion bottoms out at depth zero or on a terminal
/// board, where the position is valued by the [`BoardEvaluator`].
///
/// Every branch works on its own clone of the grid, so sibling branches
/// can never observe each other's moves. The search holds no state across
/// calls and runs eagerly to completion.
#[derive(Debug, Clone, Copy)]
pub struct ExpectimaxSearch {
    evaluator: BoardEvaluator,
    depth: u32,
}

impl ExpectimaxSearch {
    #[must_use]
    pub const fn new(evaluator: BoardEvaluator, depth: u32) -> Self {
        Self { evaluator, depth }
    }

    #[must_use]
    pub const fn evaluator(&self) -> &BoardEvaluator {
        &self.evaluator
    }

    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Scores one candidate direction from the given position.
    ///
    /// The direction is applied to a clone; since the agent has then used
    /// its turn, the remaining budget starts in the chance layer. Returns
    /// `None` when the move does not change the board.
    #[must_use]
    pub fn score_direction(&self, grid: &TileGrid, direction: Direction) -> Option<f32> {
        let mut sim = grid.clone();
        if !sim.shift(direction) {
            return None;
        }
        Some(self.expectimax(&sim, self.depth.saturating_sub(1), Node::Chance))
    }

    /// Picks the best direction among those accepted by `allowed`.
    ///
    /// Directions are tried in the canonical order; only a strictly higher
    /// score displaces the current best, so ties keep the first direction
    /// encountered. `None` means no allowed direction changes the board.
    #[must_use]
    pub fn best_direction(
        &self,
        grid: &TileGrid,
        mut allowed: impl FnMut(Direction) -> bool,
    ) -> Option<(Direction, f32)> {
        let mut best: Option<(Direction, f32)> = None;
        for direction in Direction::ALL {
            if !allowed(direction) {
                continue;
            }
            let Some(score) = self.score_direction(grid, direction) else {
                continue;
            };
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((direction, score));
            }
        }
        best
    }

    fn expectimax(&self, grid: &TileGrid, depth: u32, node: Node) -> f32 {
        if depth == 0 || grid.is_game_over() {
            return self.evaluator.evaluate(grid);
        }
        match node {
            Node::Max => self.max_value(grid, depth),
            Node::Chance => self.chance_value(grid, depth),
        }
    }

    /// The agent's turn: best score over the directions that change the
    /// board, or the static value when none does.
    fn max_value(&self, grid: &TileGrid, depth: u32) -> f32 {
        let mut best: Option<f32> = None;
        for direction in Direction::ALL {
            let mut sim = grid.clone();
            if sim.shift(direction) {
                let score = self.expectimax(&sim, depth - 1, Node::Chance);
                best = Some(best.map_or(score, |current| current.max(score)));
            }
        }
        best.unwrap_or_else(|| self.evaluator.evaluate(grid))
    }

    /// The environment's turn: expectation over every empty cell receiving
    /// a 2 or a 4.
    fn chance_value(&self, grid: &TileGrid, depth: u32) -> f32 {
        let empty_cells = grid.empty_cells();
        if empty_cells.is_empty() {
            return self.evaluator.evaluate(grid);
        }

        let mut total = 0.0;
        for &cell in &empty_cells {
            let mut with_two = grid.clone();
            with_two.place_tile(cell, 2);
            total += TWO_TILE_PROBABILITY * self.expectimax(&with_two, depth - 1, Node::Max);

            let mut with_four = grid.clone();
            with_four.place_tile(cell, 4);
            total += FOUR_TILE_PROBABILITY * self.expectimax(&with_four, depth - 1, Node::Max);
        }
        total / empty_cells.len() as f32
    }
}
