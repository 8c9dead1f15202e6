use std::fmt::Write as _;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::IndexedRandom as _,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::Cell;

/// Probability that a spawned tile is a 4; otherwise it is a 2.
const FOUR_TILE_PROBABILITY: f64 = 0.1;

/// Seed for deterministic tile spawning.
///
/// A 128-bit seed that serializes as a 32-character hex string. Two boards
/// spawned from the same seed receive the same tile sequence, which makes
/// games reproducible for debugging and testing.
#[derive(Debug, Clone, Copy)]
pub struct SpawnSeed([u8; 16]);

impl From<u128> for SpawnSeed {
    fn from(value: u128) -> Self {
        Self(value.to_be_bytes())
    }
}

impl Serialize for SpawnSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").unwrap();
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for SpawnSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex_str} ({e})")))?;
        Ok(Self(num.to_be_bytes()))
    }
}

/// Allows generating random `SpawnSeed` values with `rng.random()`.
impl Distribution<SpawnSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SpawnSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        SpawnSeed(seed)
    }
}

/// Draws the tiles the environment adds to the board after each move.
///
/// A spawn picks a uniformly random empty cell and places a 2 with
/// probability 0.9, a 4 with probability 0.1. All randomness of the game
/// lives here; the board model itself is deterministic.
#[derive(Debug, Clone)]
pub struct TileSpawner {
    rng: Pcg32,
}

impl Default for TileSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl TileSpawner {
    /// Creates a spawner with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for reproducible games.
    #[must_use]
    pub fn with_seed(seed: SpawnSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// Draws the next spawn from the given empty cells.
    ///
    /// Returns `None` when no empty cell is available.
    pub fn next_spawn(&mut self, empty_cells: &[Cell]) -> Option<(Cell, u32)> {
        let &cell = empty_cells.choose(&mut self.rng)?;
        let value = if self.rng.random_bool(FOUR_TILE_PROBABILITY) {
            4
        } else {
            2
        };
        Some((cell, value))
    }
}
