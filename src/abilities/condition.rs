//! Ability conditions.
//!
//! Conditions gate whether an ability resolves. They are evaluated at
//! the moment of potential triggering, never cached from registration
//! time: a registered ability whose condition has since become false
//! fires in a skipped, non-triggering state.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::{Conflict, ConflictType, PlayerId};
use crate::effects::EffectEngine;
use crate::events::GameEvent;

/// A declarative predicate over the ability's context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    /// Always satisfied (no gate).
    Always,

    /// Never satisfied (disabled ability).
    Never,

    /// The source card is participating in the current conflict.
    SourceInConflict,

    /// The source card has the given trait (printed or added).
    SourceHasTrait(String),

    /// The source card carries at least one token of the given kind.
    SourceHasToken(String),

    /// A conflict of the given type (or any type) is underway.
    DuringConflict(Option<ConflictType>),

    /// The source is controlled by the given player.
    ControllerIs(PlayerId),

    /// All sub-conditions hold.
    All(Vec<Condition>),

    /// At least one sub-condition holds.
    AnyOf(Vec<Condition>),

    /// The sub-condition does not hold.
    Not(Box<Condition>),

    /// Game-specific predicate, resolved by a caller-supplied hook.
    /// Without a hook it evaluates false.
    Custom(String),
}

impl Condition {
    /// AND two conditions.
    pub fn and(self, other: Condition) -> Self {
        match self {
            Condition::All(mut conditions) => {
                conditions.push(other);
                Condition::All(conditions)
            }
            _ => Condition::All(vec![self, other]),
        }
    }

    /// OR two conditions.
    pub fn or(self, other: Condition) -> Self {
        match self {
            Condition::AnyOf(mut conditions) => {
                conditions.push(other);
                Condition::AnyOf(conditions)
            }
            _ => Condition::AnyOf(vec![self, other]),
        }
    }

    /// Negate this condition.
    pub fn negate(self) -> Self {
        Condition::Not(Box::new(self))
    }
}

/// Everything a condition may inspect.
pub struct ConditionContext<'a> {
    /// The card that declared the ability.
    pub source: &'a Card,
    /// Live modifier set.
    pub effects: &'a EffectEngine,
    /// Current conflict, if one is underway.
    pub conflict: Option<&'a Conflict>,
    /// The event being responded to, for triggered abilities.
    pub event: Option<&'a GameEvent>,
    /// Hook for `Condition::Custom` predicates.
    pub eval_custom: Option<&'a dyn Fn(&str, &Card, Option<&GameEvent>) -> bool>,
}

impl<'a> ConditionContext<'a> {
    /// Context with no conflict, event, or custom hook.
    pub fn new(source: &'a Card, effects: &'a EffectEngine) -> Self {
        Self {
            source,
            effects,
            conflict: None,
            event: None,
            eval_custom: None,
        }
    }

    /// Attach the current conflict.
    #[must_use]
    pub fn with_conflict(mut self, conflict: Option<&'a Conflict>) -> Self {
        self.conflict = conflict;
        self
    }

    /// Attach the triggering event.
    #[must_use]
    pub fn with_event(mut self, event: &'a GameEvent) -> Self {
        self.event = Some(event);
        self
    }
}

/// Check whether a condition is satisfied in the given context.
pub fn evaluate(condition: &Condition, ctx: &ConditionContext) -> bool {
    match condition {
        Condition::Always => true,
        Condition::Never => false,

        Condition::SourceInConflict => ctx.source.in_conflict,

        Condition::SourceHasTrait(t) => ctx.source.has_trait(t, ctx.effects),

        Condition::SourceHasToken(kind) => ctx.source.has_token(kind),

        Condition::DuringConflict(None) => ctx.conflict.is_some(),
        Condition::DuringConflict(Some(ct)) => {
            ctx.conflict.map_or(false, |c| c.conflict_type == *ct)
        }

        Condition::ControllerIs(player) => ctx.source.controller == *player,

        Condition::All(conditions) => conditions.iter().all(|c| evaluate(c, ctx)),
        Condition::AnyOf(conditions) => conditions.iter().any(|c| evaluate(c, ctx)),
        Condition::Not(inner) => !evaluate(inner, ctx),

        Condition::Custom(key) => ctx
            .eval_custom
            .map_or(false, |eval| eval(key, ctx.source, ctx.event)),
    }
}
