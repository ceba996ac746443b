//! DSL primitives: the atomic game actions abilities resolve to.
//!
//! Card data composes these; the engine gives them meaning when an
//! ability resolves. They are intentionally small and declarative so
//! individual cards stay pure configuration.

use serde::{Deserialize, Serialize};

use crate::core::Location;
use crate::effects::{Duration, EffectSpec};

use super::condition::Condition;

/// An atomic game action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameAction {
    /// Ready the target (clear its bowed state).
    Ready,

    /// Bow the target.
    Bow,

    /// Move the target into the current conflict.
    MoveToConflict,

    /// Remove the target from the current conflict.
    SendHome,

    /// Add tokens to the target.
    AddToken { kind: String, count: u32 },

    /// Remove tokens from the target, flooring at zero.
    RemoveToken { kind: String, count: u32 },

    /// Move the target to a zone.
    MoveCard { to: Location },

    /// Attach a lasting modifier to the target.
    ApplyLastingEffect { spec: EffectSpec, duration: Duration },

    /// The resolving ability's controller gains honor.
    GainHonor { amount: i64 },

    /// The resolving ability's controller draws from their conflict deck.
    DrawCards { count: usize },

    /// Do nothing. Useful for abilities whose only purpose is timing.
    Noop,
}

/// What an action or triggered ability resolves against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TargetSpec {
    /// The source card itself (or the event's card, for triggers).
    None,

    /// The controller picks a card; resolution suspends for the choice.
    ChooseCard {
        location: Location,
        condition: Condition,
    },
}

impl TargetSpec {
    /// Does this spec require a player decision before resolving?
    #[must_use]
    pub fn needs_choice(&self) -> bool {
        matches!(self, TargetSpec::ChooseCard { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_choice() {
        assert!(!TargetSpec::None.needs_choice());
        assert!(TargetSpec::ChooseCard {
            location: Location::PlayArea,
            condition: Condition::Always,
        }
        .needs_choice());
    }

    #[test]
    fn test_serialization() {
        let action = GameAction::AddToken {
            kind: "fate".into(),
            count: 2,
        };
        let json = serde_json::to_string(&action).unwrap();
        let back: GameAction = serde_json::from_str(&json).unwrap();
        assert_eq!(action, back);
    }
}
