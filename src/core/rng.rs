//! Deterministic random number generation.
//!
//! The only source of randomness in the engine is deck shuffling, and
//! it must replay identically: the same seed and the same player
//! decisions produce the same game. `GameRng` wraps ChaCha8 with an
//! explicit seed and serializes as `(seed, word_pos)` so a suspended
//! game restores to the exact stream position.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Serializable RNG state.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GameRngState {
    seed: u64,
    word_pos: u128,
}

/// Seeded deterministic RNG.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "GameRngState", into = "GameRngState")]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Get the seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }
}

impl From<GameRng> for GameRngState {
    fn from(rng: GameRng) -> Self {
        Self {
            seed: rng.seed,
            word_pos: rng.inner.get_word_pos(),
        }
    }
}

impl From<GameRngState> for GameRng {
    fn from(state: GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shuffle_deterministic() {
        let mut a = GameRng::new(7);
        let mut b = GameRng::new(7);

        let mut left: Vec<u32> = (0..20).collect();
        let mut right: Vec<u32> = (0..20).collect();
        a.shuffle(&mut left);
        b.shuffle(&mut right);

        assert_eq!(left, right);
    }

    #[test]
    fn test_state_round_trip() {
        let mut rng = GameRng::new(99);
        let mut warmup: Vec<u32> = (0..32).collect();
        rng.shuffle(&mut warmup);

        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: GameRng = serde_json::from_str(&json).unwrap();

        let mut next: Vec<u32> = (0..32).collect();
        let mut restored_next = next.clone();
        rng.shuffle(&mut next);
        restored.shuffle(&mut restored_next);
        assert_eq!(next, restored_next);
    }
}
