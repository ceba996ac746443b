//! Per-round ability usage limits.
//!
//! Limits count uses within the current round and reset when the
//! source card leaves play. The effective maximum can be raised by
//! `IncreaseLimitOnAbilities` modifiers, which callers pass in as a
//! pre-computed adjustment.

use serde::{Deserialize, Serialize};

/// A per-round usage limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityLimit {
    max: u32,
    used: u32,
}

impl AbilityLimit {
    /// A limit of `max` uses per round.
    #[must_use]
    pub fn per_round(max: u32) -> Self {
        Self { max, used: 0 }
    }

    /// Declared maximum, before modifiers.
    #[must_use]
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Uses spent this round.
    #[must_use]
    pub fn used(&self) -> u32 {
        self.used
    }

    /// Has the limit been reached, given the current modifier bonus?
    #[must_use]
    pub fn is_at_max(&self, bonus: i64) -> bool {
        i64::from(self.used) >= i64::from(self.max) + bonus
    }

    /// Spend one use.
    pub fn increment(&mut self) {
        self.used += 1;
    }

    /// Reset for a new round (or because the source left play).
    pub fn reset(&mut self) {
        self.used = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_counting() {
        let mut limit = AbilityLimit::per_round(2);

        assert!(!limit.is_at_max(0));
        limit.increment();
        assert!(!limit.is_at_max(0));
        limit.increment();
        assert!(limit.is_at_max(0));
        assert_eq!(limit.used(), 2);
    }

    #[test]
    fn test_limit_bonus() {
        let mut limit = AbilityLimit::per_round(1);
        limit.increment();

        assert!(limit.is_at_max(0));
        assert!(!limit.is_at_max(1));
    }

    #[test]
    fn test_limit_reset() {
        let mut limit = AbilityLimit::per_round(1);
        limit.increment();
        limit.reset();

        assert_eq!(limit.used(), 0);
        assert!(!limit.is_at_max(0));
    }
}
