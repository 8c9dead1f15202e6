use crate::{
    BoardShapeError,
    core::{Cell, Direction, ShiftOutcome, TileGrid},
};

use super::tile_spawner::{SpawnSeed, TileSpawner};

/// The live board: a grid plus the spawner that feeds it new tiles.
#[derive(Debug, Clone)]
pub struct GameBoard {
    grid: TileGrid,
    spawner: TileSpawner,
}

impl GameBoard {
    /// Creates a fresh board of the given size with the two opening tiles.
    pub fn new(width: usize, height: usize, seed: SpawnSeed) -> Result<Self, BoardShapeError> {
        let mut board = Self::from_grid(TileGrid::new(width, height)?, seed);
        board.spawn_random_tile();
        board.spawn_random_tile();
        Ok(board)
    }

    /// Wraps an existing grid, e.g. a mid-game position.
    #[must_use]
    pub fn from_grid(grid: TileGrid, seed: SpawnSeed) -> Self {
        Self {
            grid,
            spawner: TileSpawner::with_seed(seed),
        }
    }

    #[must_use]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Deep copy of the current grid, for handing to a search.
    #[must_use]
    pub fn snapshot(&self) -> TileGrid {
        self.grid.clone()
    }

    /// Applies a real move without spawning.
    pub fn apply_move(&mut self, direction: Direction) -> ShiftOutcome {
        self.grid.shift_scored(direction)
    }

    /// Spawns one random tile into an empty cell, if any.
    pub fn spawn_random_tile(&mut self) -> Option<(Cell, u32)> {
        let empty_cells = self.grid.empty_cells();
        let (cell, value) = self.spawner.next_spawn(&empty_cells)?;
        self.grid.place_tile(cell, value);
        Some((cell, value))
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.grid.is_game_over()
    }
}
