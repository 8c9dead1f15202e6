use crate::{
    BoardShapeError,
    core::{Direction, TileGrid},
};

use super::{GameBoard, GameStats, SpawnSeed};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    GameOver,
}

/// A multi-turn game: the live board plus statistics and terminal state.
///
/// One turn is [`Self::apply_move`]: slide the board, and when it changed,
/// record the result, spawn one tile, and check for the end of the game.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: GameBoard,
    stats: GameStats,
    session_state: SessionState,
}

impl GameSession {
    pub fn new(width: usize, height: usize, seed: SpawnSeed) -> Result<Self, BoardShapeError> {
        let board = GameBoard::new(width, height, seed)?;
        Ok(Self::from_board(board))
    }

    #[must_use]
    pub fn from_board(board: GameBoard) -> Self {
        let session_state = if board.is_game_over() {
            SessionState::GameOver
        } else {
            SessionState::Playing
        };
        Self {
            board,
            stats: GameStats::new(),
            session_state,
        }
    }

    #[must_use]
    pub fn board(&self) -> &GameBoard {
        &self.board
    }

    #[must_use]
    pub fn grid(&self) -> &TileGrid {
        self.board.grid()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn session_state(&self) -> &SessionState {
        &self.session_state
    }

    /// Plays one real move. Returns whether the board changed.
    ///
    /// A move that changes nothing is rejected without a spawn, and a
    /// finished session ignores moves entirely.
    pub fn apply_move(&mut self, direction: Direction) -> bool {
        if self.session_state.is_game_over() {
            return false;
        }

        let outcome = self.board.apply_move(direction);
        if !outcome.moved() {
            return false;
        }

        self.stats
            .complete_move(outcome.merge_score(), self.board.grid().max_tile());
        // A changed board always has at least one empty cell to fill.
        if self.board.spawn_random_tile().is_some() {
            self.stats.record_spawn();
        }
        if self.board.is_game_over() {
            self.session_state = SessionState::GameOver;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Cell;

    fn seed() -> SpawnSeed {
        SpawnSeed::from(42_u128)
    }

    fn session_from_rows(rows: &[&[u32]]) -> GameSession {
        let grid = TileGrid::from_rows(rows).unwrap();
        GameSession::from_board(GameBoard::from_grid(grid, seed()))
    }

    #[test]
    fn test_new_session_is_playing() {
        let session = GameSession::new(4, 4, seed()).unwrap();
        assert!(session.session_state().is_playing());
        assert_eq!(session.stats().moves(), 0);
    }

    #[test]
    fn test_move_records_stats_and_spawns() {
        let mut session = session_from_rows(&[
            &[2, 2, 0, 0],
            &[0, 0, 0, 0],
            &[0, 0, 0, 0],
            &[0, 0, 0, 0],
        ]);
        assert!(session.apply_move(Direction::Left));

        let stats = session.stats();
        assert_eq!(stats.moves(), 1);
        assert_eq!(stats.score(), 4);
        assert_eq!(stats.highest_tile(), 4);
        assert_eq!(stats.spawned_tiles(), 1);
        // One merged tile plus one spawned tile.
        assert_eq!(session.grid().count_empty(), 14);
    }

    #[test]
    fn test_rejected_move_spawns_nothing() {
        let mut session = session_from_rows(&[
            &[2, 0, 0, 0],
            &[0, 0, 0, 0],
            &[0, 0, 0, 0],
            &[0, 0, 0, 0],
        ]);
        assert!(!session.apply_move(Direction::Left));
        assert_eq!(session.stats().moves(), 0);
        assert_eq!(session.stats().spawned_tiles(), 0);
        assert_eq!(session.grid().count_empty(), 15);
    }

    #[test]
    fn test_session_ends_when_board_locks() {
        // Sliding the 8 left frees (1, 0), whose neighbors are 8 and 32;
        // neither a spawned 2 nor a spawned 4 can ever merge there, so the
        // board locks no matter what the spawner draws.
        let mut session = session_from_rows(&[&[0, 8], &[16, 32]]);
        assert!(session.apply_move(Direction::Left));
        assert_eq!(session.grid().count_empty(), 0);
        assert!(session.session_state().is_game_over());
    }

    #[test]
    fn test_finished_session_ignores_moves() {
        let mut session = session_from_rows(&[&[2, 4], &[4, 2]]);
        assert!(session.session_state().is_game_over());
        assert!(!session.apply_move(Direction::Left));
        assert_eq!(session.grid().tile(Cell { x: 0, y: 0 }), 2);
    }
}
