use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::BoardShapeError;

use super::direction::Direction;

/// Coordinate of a single cell, `(0, 0)` at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

/// Result of applying a move to a [`TileGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftOutcome {
    moved: bool,
    merge_score: u32,
}

impl ShiftOutcome {
    /// Whether any cell changed during the move.
    #[must_use]
    pub const fn moved(self) -> bool {
        self.moved
    }

    /// Sum of the values of all tiles formed by merges during the move.
    #[must_use]
    pub const fn merge_score(self) -> u32 {
        self.merge_score
    }
}

/// The sliding-tile board.
///
/// Stores a `width`×`height` grid of tile values in row-major order, where
/// `0` denotes an empty cell and every non-zero value is a power of two.
/// The type owns the complete move physics and is deliberately free of I/O
/// and randomness: spawning a tile takes an explicit cell and value, so a
/// search can branch over hypothetical spawns while the live game feeds in
/// randomly drawn ones.
///
/// # Move physics
///
/// [`Self::shift`] slides every tile as far as possible toward one edge.
/// Cells are scanned starting nearest the target edge (the cell already
/// resting on the edge cannot move and is skipped), and each tile walks one
/// step at a time: onto an empty neighbor it slides, onto an equal neighbor
/// it merges (the destination doubles, the walk ends), onto a different
/// value or the board edge it stops. A walking tile therefore merges at
/// most once per move.
///
/// Cloning deep-copies the cells; a clone never shares state with its
/// source, which is what makes speculative search branches safe.
///
/// # Serialization
///
/// Serializes as an array of rows, e.g. `[[2, 0], [0, 4]]`. Deserialization
/// rejects ragged rows and zero-sized boards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    cells: Vec<u32>,
}

impl TileGrid {
    /// Creates an empty grid.
    pub fn new(width: usize, height: usize) -> Result<Self, BoardShapeError> {
        if width == 0 || height == 0 {
            return Err(BoardShapeError::ZeroDimension { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![0; width * height],
        })
    }

    /// Builds a snapshot from a live board's occupied tiles.
    ///
    /// Fails fast when a tile lies outside the given dimensions; a snapshot
    /// is never constructed from inconsistent input.
    pub fn from_tiles(
        width: usize,
        height: usize,
        tiles: impl IntoIterator<Item = (Cell, u32)>,
    ) -> Result<Self, BoardShapeError> {
        let mut grid = Self::new(width, height)?;
        for (cell, value) in tiles {
            if cell.x >= width || cell.y >= height {
                return Err(BoardShapeError::TileOutOfBounds {
                    x: cell.x,
                    y: cell.y,
                    width,
                    height,
                });
            }
            grid.set(cell, value);
        }
        Ok(grid)
    }

    /// Builds a grid from explicit rows. Rows must all have the same length.
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self, BoardShapeError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let mut grid = Self::new(width, height)?;
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(BoardShapeError::RaggedRows {
                    expected: width,
                    found: row.len(),
                });
            }
            for (x, &value) in row.iter().enumerate() {
                grid.set(Cell { x, y }, value);
            }
        }
        Ok(grid)
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns the value at `cell`, `0` for an empty cell.
    #[must_use]
    pub fn tile(&self, cell: Cell) -> u32 {
        self.cells[self.index(cell)]
    }

    /// Writes `value` (2 or 4 by the spawning contract) into a cell.
    ///
    /// No occupancy check is performed; the caller must pass a currently
    /// empty cell. Panics if `cell` is out of bounds.
    pub fn place_tile(&mut self, cell: Cell, value: u32) {
        self.set(cell, value);
    }

    /// Slides and merges all tiles toward `direction`.
    ///
    /// Returns whether any cell changed. Merges performed before the walk
    /// of a later tile stalls are kept; a move is never undone.
    pub fn shift(&mut self, direction: Direction) -> bool {
        self.shift_scored(direction).moved()
    }

    /// Like [`Self::shift`], additionally reporting the merge score of the
    /// move for the live game's bookkeeping.
    pub fn shift_scored(&mut self, direction: Direction) -> ShiftOutcome {
        let (dx, dy) = direction.offset();
        let columns = scan_order(dx, self.width);
        let rows = scan_order(dy, self.height);

        let mut outcome = ShiftOutcome {
            moved: false,
            merge_score: 0,
        };
        for &x in &columns {
            for &y in &rows {
                if self.tile(Cell { x, y }) != 0 {
                    self.slide_and_merge(Cell { x, y }, direction, &mut outcome);
                }
            }
        }
        outcome
    }

    /// Non-mutating probe: would [`Self::shift`] change the board?
    #[must_use]
    pub fn can_shift(&self, direction: Direction) -> bool {
        self.clone().shift(direction)
    }

    #[must_use]
    pub fn can_shift_any(&self) -> bool {
        Direction::ALL.iter().any(|&direction| self.can_shift(direction))
    }

    /// All empty cells in row-major order (top row first, left to right).
    ///
    /// The order is stable, which keeps the expectation taken over spawn
    /// positions deterministic within a search.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<Cell> {
        let mut cells = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.tile(Cell { x, y }) == 0 {
                    cells.push(Cell { x, y });
                }
            }
        }
        cells
    }

    #[must_use]
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&value| value == 0).count()
    }

    #[must_use]
    pub fn max_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// True iff no cell is empty and no direction changes the board.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.count_empty() == 0 && !self.can_shift_any()
    }

    /// Iterates over the rows of the grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.cells.chunks(self.width)
    }

    fn index(&self, cell: Cell) -> usize {
        debug_assert!(cell.x < self.width && cell.y < self.height);
        cell.y * self.width + cell.x
    }

    fn set(&mut self, cell: Cell, value: u32) {
        let index = self.index(cell);
        self.cells[index] = value;
    }

    fn neighbor(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        let (dx, dy) = direction.offset();
        let x = cell.x.checked_add_signed(dx)?;
        let y = cell.y.checked_add_signed(dy)?;
        (x < self.width && y < self.height).then_some(Cell { x, y })
    }

    /// Walks one tile toward `direction` until it hits the edge, a different
    /// value, or merges once.
    fn slide_and_merge(&mut self, start: Cell, direction: Direction, outcome: &mut ShiftOutcome) {
        let mut current = start;
        while let Some(next) = self.neighbor(current, direction) {
            let value = self.tile(current);
            let target = self.tile(next);
            if target == 0 {
                self.set(next, value);
                self.set(current, 0);
                current = next;
                outcome.moved = true;
            } else if target == value {
                self.set(next, value * 2);
                self.set(current, 0);
                outcome.merge_score += value * 2;
                outcome.moved = true;
                break;
            } else {
                break;
            }
        }
    }
}

/// Scan order along one axis: cells nearest the target edge first, skipping
/// the cell already resting on it; natural order on the perpendicular axis.
fn scan_order(step: isize, len: usize) -> Vec<usize> {
    match step.cmp(&0) {
        Ordering::Greater => (0..len.saturating_sub(1)).rev().collect(),
        Ordering::Less => (1..len).collect(),
        Ordering::Equal => (0..len).collect(),
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for (i, &value) in row.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                if value == 0 {
                    write!(f, "{:>5}", ".")?;
                } else {
                    write!(f, "{value:>5}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Serialize for TileGrid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.rows())
    }
}

impl<'de> Deserialize<'de> for TileGrid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<Vec<u32>>::deserialize(deserializer)?;
        Self::from_rows(&rows).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[u32]]) -> TileGrid {
        TileGrid::from_rows(rows).unwrap()
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert!(matches!(
            TileGrid::new(0, 4),
            Err(BoardShapeError::ZeroDimension { .. })
        ));
        assert!(matches!(
            TileGrid::new(4, 0),
            Err(BoardShapeError::ZeroDimension { .. })
        ));
    }

    #[test]
    fn test_from_tiles_rejects_out_of_bounds() {
        let result = TileGrid::from_tiles(4, 4, [(Cell { x: 4, y: 0 }, 2)]);
        assert!(matches!(
            result,
            Err(BoardShapeError::TileOutOfBounds { x: 4, y: 0, .. })
        ));
    }

    #[test]
    fn test_from_tiles_places_values() {
        let grid = TileGrid::from_tiles(4, 4, [(Cell { x: 1, y: 2 }, 8)]).unwrap();
        assert_eq!(grid.tile(Cell { x: 1, y: 2 }), 8);
        assert_eq!(grid.count_empty(), 15);
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let result = TileGrid::from_rows(&[vec![2, 0], vec![0]]);
        assert!(matches!(
            result,
            Err(BoardShapeError::RaggedRows {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_shift_left_merges_pair() {
        let mut board = grid(&[
            &[2, 2, 0, 0],
            &[0, 0, 0, 0],
            &[0, 0, 0, 0],
            &[0, 0, 0, 0],
        ]);
        let outcome = board.shift_scored(Direction::Left);
        assert!(outcome.moved());
        assert_eq!(outcome.merge_score(), 4);
        assert_eq!(
            board,
            grid(&[
                &[4, 0, 0, 0],
                &[0, 0, 0, 0],
                &[0, 0, 0, 0],
                &[0, 0, 0, 0],
            ])
        );
    }

    #[test]
    fn test_shift_right_slides_to_edge() {
        let mut board = grid(&[&[2, 2, 0, 0]]);
        assert!(board.shift(Direction::Right));
        assert_eq!(board, grid(&[&[0, 0, 0, 4]]));
    }

    #[test]
    fn test_shift_down_merges_column() {
        let mut board = grid(&[&[2], &[0], &[2], &[4]]);
        let outcome = board.shift_scored(Direction::Down);
        assert!(outcome.moved());
        assert_eq!(outcome.merge_score(), 4);
        assert_eq!(board, grid(&[&[0], &[0], &[4], &[4]]));
    }

    #[test]
    fn test_shift_up_stacks_toward_top() {
        let mut board = grid(&[&[0], &[2], &[0], &[2]]);
        assert!(board.shift(Direction::Up));
        assert_eq!(board, grid(&[&[4], &[0], &[0], &[0]]));
    }

    #[test]
    fn test_each_walking_tile_merges_at_most_once() {
        let mut board = grid(&[&[2, 2, 2, 2]]);
        let outcome = board.shift_scored(Direction::Left);
        assert_eq!(board, grid(&[&[4, 4, 0, 0]]));
        assert_eq!(outcome.merge_score(), 8);

        let mut board = grid(&[&[8, 8, 4, 4]]);
        let outcome = board.shift_scored(Direction::Left);
        assert_eq!(board, grid(&[&[16, 8, 0, 0]]));
        assert_eq!(outcome.merge_score(), 16 + 8);
    }

    #[test]
    fn test_merged_destination_can_absorb_next_walker() {
        // The walk of the trailing 4 ends in a merge with the freshly
        // merged 4; this chain is part of the move semantics.
        let mut board = grid(&[&[2, 2, 4, 0]]);
        let outcome = board.shift_scored(Direction::Left);
        assert_eq!(board, grid(&[&[8, 0, 0, 0]]));
        assert_eq!(outcome.merge_score(), 4 + 8);
    }

    #[test]
    fn test_blocked_tile_stops_the_walk() {
        let mut board = grid(&[&[4, 2, 0, 0]]);
        assert!(!board.shift(Direction::Left));
        assert_eq!(board, grid(&[&[4, 2, 0, 0]]));
    }

    #[test]
    fn test_shift_without_effect_returns_false() {
        let mut board = grid(&[&[2, 0, 0, 0]]);
        let before = board.clone();
        assert!(!board.shift(Direction::Left));
        assert_eq!(board, before);
    }

    #[test]
    fn test_shift_is_deterministic() {
        let start = grid(&[
            &[2, 2, 4, 4],
            &[0, 2, 0, 2],
            &[8, 0, 8, 0],
            &[2, 4, 2, 4],
        ]);
        let mut first = start.clone();
        let mut second = start.clone();
        assert_eq!(
            first.shift_scored(Direction::Left),
            second.shift_scored(Direction::Left)
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = grid(&[&[2, 2, 0, 0]]);
        let mut copy = original.clone();
        assert!(copy.shift(Direction::Left));
        assert_eq!(original, grid(&[&[2, 2, 0, 0]]));
        assert_ne!(original, copy);
    }

    #[test]
    fn test_can_shift_does_not_mutate() {
        let board = grid(&[&[2, 2, 0, 0]]);
        assert!(board.can_shift(Direction::Left));
        assert_eq!(board, grid(&[&[2, 2, 0, 0]]));
    }

    #[test]
    fn test_empty_cells_row_major_order() {
        let board = TileGrid::new(4, 4).unwrap();
        let cells = board.empty_cells();
        assert_eq!(cells.len(), 16);
        assert_eq!(cells[0], Cell { x: 0, y: 0 });
        assert_eq!(cells[1], Cell { x: 1, y: 0 });
        assert_eq!(cells[15], Cell { x: 3, y: 3 });
    }

    #[test]
    fn test_max_tile_of_empty_board_is_zero() {
        let board = TileGrid::new(4, 4).unwrap();
        assert_eq!(board.max_tile(), 0);
    }

    #[test]
    fn test_game_over_on_checkerboard() {
        let board = grid(&[&[2, 4], &[4, 2]]);
        assert!(board.is_game_over());
        for direction in Direction::ALL {
            assert!(!board.can_shift(direction));
        }
    }

    #[test]
    fn test_not_game_over_with_merge_available() {
        let board = grid(&[&[2, 2], &[4, 8]]);
        assert_eq!(board.count_empty(), 0);
        assert!(!board.is_game_over());
    }

    #[test]
    fn test_conservation_of_tiles() {
        // One move with two merges: tile count drops by the merge count,
        // then one spawn brings it back up by one.
        let mut board = grid(&[&[2, 2, 4, 4]]);
        let before = 4 - board.count_empty();
        board.shift(Direction::Left);
        let after = 4 - board.count_empty();
        assert_eq!(after, before - 2);
        board.place_tile(Cell { x: 3, y: 0 }, 2);
        assert_eq!(4 - board.count_empty(), before - 2 + 1);
    }

    #[test]
    fn test_serde_round_trip() {
        let board = grid(&[&[2, 0], &[0, 4]]);
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, "[[2,0],[0,4]]");
        let parsed: TileGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, board);
    }

    #[test]
    fn test_serde_rejects_ragged_rows() {
        let result: Result<TileGrid, _> = serde_json::from_str("[[2,0],[4]]");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_pads_cells() {
        let board = grid(&[&[2, 0]]);
        let rendered = board.to_string();
        assert!(rendered.contains('2'));
        assert!(rendered.contains('.'));
    }
}
