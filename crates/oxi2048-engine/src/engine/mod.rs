//! Live game state built on the core board model.
//!
//! - [`GameBoard`] - the real board: grid plus seeded tile spawning
//! - [`GameSession`] - multi-turn session with statistics and terminal state
//! - [`GameStats`] - score, move count, spawn count, highest tile
//! - [`TileSpawner`] / [`SpawnSeed`] - 90/10 tile generation

pub use self::{game_board::*, game_session::*, game_stats::*, tile_spawner::*};

mod game_board;
mod game_session;
mod game_stats;
mod tile_spawner;
