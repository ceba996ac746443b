//! Modifier definitions.
//!
//! A modifier is a named value contributed to a target by some source
//! card. Cards never store derived state; they query the engine, which
//! aggregates whatever modifiers are currently active.

use serde::{Deserialize, Serialize};

use crate::core::{CardUid, PlayerId};

/// The derived quantities and flags the engine knows how to aggregate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectName {
    AddTrait,
    AddFaction,
    Blank,
    ModifyMilitarySkill,
    ModifyPoliticalSkill,
    ModifyGlory,
    ModifyProvinceStrength,
    IncreaseLimitOnAbilities,
    DoesNotReady,
    CanBeSeenWhenFacedown,
    HideWhenFaceUp,
    AbilityRestriction,
}

/// The payload a modifier contributes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectValue {
    /// Numeric contribution, aggregated by `sum`.
    Int(i64),
    /// Textual contribution (an added trait or faction).
    Text(String),
    /// Pure presence flag, observed by `any`.
    Flag,
}

impl EffectValue {
    /// Numeric payload, if this is an `Int`.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            EffectValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Text payload, if this is a `Text`.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            EffectValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A named modifier payload, before it is applied to a target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectSpec {
    pub name: EffectName,
    pub value: EffectValue,
}

impl EffectSpec {
    /// Numeric modifier.
    pub fn int(name: EffectName, value: i64) -> Self {
        Self {
            name,
            value: EffectValue::Int(value),
        }
    }

    /// Text modifier (added trait, added faction).
    pub fn text(name: EffectName, value: impl Into<String>) -> Self {
        Self {
            name,
            value: EffectValue::Text(value.into()),
        }
    }

    /// Presence flag.
    pub fn flag(name: EffectName) -> Self {
        Self {
            name,
            value: EffectValue::Flag,
        }
    }
}

/// How long a modifier lives.
///
/// Everything except `Persistent` is a *lasting* effect: it has a
/// finite horizon and is force-removed when its source leaves play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Duration {
    /// Active while the source stays in scope and unblanked.
    Persistent,
    UntilEndOfConflict,
    UntilEndOfPhase,
    UntilEndOfRound,
}

impl Duration {
    /// Lasting effects have a finite, non-zone-bound horizon.
    #[must_use]
    pub fn is_lasting(self) -> bool {
        !matches!(self, Duration::Persistent)
    }
}

/// What a modifier is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectTarget {
    Card(CardUid),
    Player(PlayerId),
    Game,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_value_accessors() {
        assert_eq!(EffectValue::Int(3).as_int(), Some(3));
        assert_eq!(EffectValue::Flag.as_int(), None);
        assert_eq!(EffectValue::Text("cavalry".into()).as_text(), Some("cavalry"));
        assert_eq!(EffectValue::Int(1).as_text(), None);
    }

    #[test]
    fn test_spec_constructors() {
        let spec = EffectSpec::int(EffectName::ModifyGlory, 2);
        assert_eq!(spec.name, EffectName::ModifyGlory);
        assert_eq!(spec.value, EffectValue::Int(2));

        let spec = EffectSpec::flag(EffectName::Blank);
        assert_eq!(spec.value, EffectValue::Flag);
    }

    #[test]
    fn test_duration_lasting() {
        assert!(!Duration::Persistent.is_lasting());
        assert!(Duration::UntilEndOfPhase.is_lasting());
        assert!(Duration::UntilEndOfRound.is_lasting());
        assert!(Duration::UntilEndOfConflict.is_lasting());
    }

    #[test]
    fn test_serialization() {
        let spec = EffectSpec::text(EffectName::AddTrait, "bushi");
        let json = serde_json::to_string(&spec).unwrap();
        let back: EffectSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, back);
    }
}
