//! Decision making for the sliding-tile game.
//!
//! Three pieces, used bottom-up:
//!
//! 1. [`BoardEvaluator`] scores a static board position as a weighted sum
//!    of four positional terms.
//! 2. [`ExpectimaxSearch`] ranks candidate directions by recursing through
//!    alternating move and spawn layers of the game tree, valuing leaves
//!    with the evaluator.
//! 3. [`AiPlayer`] turns the ranking into actual play: it avoids recently
//!    used directions and recovers when an applied move turns out to be a
//!    no-op on the real board.

pub use self::{expectimax::*, heuristic::*, player::*};

mod expectimax;
mod heuristic;
mod player;
