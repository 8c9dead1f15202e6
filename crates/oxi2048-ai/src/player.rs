use std::collections::VecDeque;

use arrayvec::ArrayVec;
use log::debug;
use oxi2048_engine::{Direction, GameSession, TileGrid};
use rand::{Rng, seq::IndexedRandom as _};

use crate::expectimax::ExpectimaxSearch;

/// How many of the last chosen directions are avoided by default.
pub const DEFAULT_RECENT_MOVE_MEMORY: usize = 2;

/// Bounded FIFO of the last chosen directions.
///
/// Used to bias selection away from immediately undoing the previous move;
/// once the queue is full, recording a direction evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct RecentMoves {
    queue: VecDeque<Direction>,
    capacity: usize,
}

impl RecentMoves {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, direction: Direction) {
        if self.capacity == 0 {
            return;
        }
        if self.queue.len() >= self.capacity {
            self.queue.pop_front();
        }
        self.queue.push_back(direction);
    }

    #[must_use]
    pub fn contains(&self, direction: Direction) -> bool {
        self.queue.contains(&direction)
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// The seam between the player and whatever owns the real board.
///
/// `apply_move` reports whether the board actually changed; the player
/// relies on that feedback to detect a move that degenerated into a no-op.
pub trait BoardDriver {
    /// Deep copy of the current real board.
    fn snapshot(&self) -> TileGrid;

    /// Applies a real move and reports whether the board changed.
    fn apply_move(&mut self, direction: Direction) -> bool;
}

impl BoardDriver for GameSession {
    fn snapshot(&self) -> TileGrid {
        self.board().snapshot()
    }

    fn apply_move(&mut self, direction: Direction) -> bool {
        GameSession::apply_move(self, direction)
    }
}

/// Move selection with recency avoidance and a stuck-board fallback.
///
/// Each turn the player snapshots the real board, ranks the directions not
/// in its recent-move memory with the expectimax search, and applies the
/// winner. When the applied move turns out not to change the board (state
/// drift, or a prediction that degenerated into a no-op), the player walks
/// the remaining viable directions in order and, as a last resort, forces
/// a random one rather than stalling.
#[derive(Debug, Clone)]
pub struct AiPlayer {
    search: ExpectimaxSearch,
    recent: RecentMoves,
}

impl AiPlayer {
    #[must_use]
    pub fn new(search: ExpectimaxSearch) -> Self {
        Self::with_memory(search, DEFAULT_RECENT_MOVE_MEMORY)
    }

    #[must_use]
    pub fn with_memory(search: ExpectimaxSearch, recent_move_memory: usize) -> Self {
        Self {
            search,
            recent: RecentMoves::new(recent_move_memory),
        }
    }

    #[must_use]
    pub fn recent_moves(&self) -> &RecentMoves {
        &self.recent
    }

    /// Forgets the move history, e.g. when the driver starts a new game.
    pub fn clear_recent_moves(&mut self) {
        self.recent.clear();
    }

    /// Ranks the directions outside the recent-move memory and returns the
    /// best one, or `None` when no qualifying direction changes the board.
    #[must_use]
    pub fn choose_direction(&self, snapshot: &TileGrid) -> Option<Direction> {
        self.search
            .best_direction(snapshot, |direction| !self.recent.contains(direction))
            .map(|(direction, _)| direction)
    }

    /// Reacts to the driver's report about an applied move.
    ///
    /// A changed board needs no reaction. An unchanged one triggers the
    /// fallback: the replacement direction that ended up applied is
    /// returned, and has already been recorded in the recent-move memory.
    pub fn notify_move_outcome<R: Rng + ?Sized>(
        &mut self,
        driver: &mut impl BoardDriver,
        rng: &mut R,
        tried: Direction,
        changed: bool,
    ) -> Option<Direction> {
        if changed {
            return None;
        }
        debug!("move {tried} left the board unchanged, recovering");
        Some(self.recover_from_stall(driver, rng, tried))
    }

    /// Plays one full turn against the driver.
    ///
    /// Returns the direction that was ultimately applied, or `None` when no
    /// direction outside the recent-move memory changes the board (the
    /// driver may then clear the memory and retry, or end the game).
    pub fn play_turn<R: Rng + ?Sized>(
        &mut self,
        driver: &mut impl BoardDriver,
        rng: &mut R,
    ) -> Option<Direction> {
        let snapshot = driver.snapshot();
        let chosen = self.choose_direction(&snapshot)?;
        let changed = driver.apply_move(chosen);
        self.recent.record(chosen);

        match self.notify_move_outcome(driver, rng, chosen, changed) {
            Some(replacement) => Some(replacement),
            None => Some(chosen),
        }
    }

    /// The stuck-board fallback: try the remaining viable directions in
    /// order, then force a random one.
    fn recover_from_stall<R: Rng + ?Sized>(
        &mut self,
        driver: &mut impl BoardDriver,
        rng: &mut R,
        failed: Direction,
    ) -> Direction {
        let snapshot = driver.snapshot();
        let mut alternatives = ArrayVec::<Direction, 4>::new();
        for direction in Direction::ALL {
            if direction == failed || self.recent.contains(direction) {
                continue;
            }
            if snapshot.can_shift(direction) {
                alternatives.push(direction);
            }
        }

        for &direction in &alternatives {
            if driver.apply_move(direction) {
                self.recent.record(direction);
                return direction;
            }
        }

        // Accepted worst case: this may still be a no-op, but the player
        // must not stall.
        let last_resort = alternatives
            .choose(rng)
            .or_else(|| Direction::ALL.choose(rng))
            .copied()
            .expect("Direction::ALL is never empty");
        debug!("no alternative changed the board, forcing {last_resort}");
        self.recent.record(last_resort);
        driver.apply_move(last_resort);
        last_resort
    }
}
