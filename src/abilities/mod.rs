//! Ability machinery: limits, conditions, the setup DSL, and the
//! per-card registry of declared abilities.

mod condition;
mod dsl;
mod game_action;
mod limit;
mod registry;

pub use condition::{evaluate, Condition, ConditionContext};
pub use dsl::{AbilitySetup, ActionProps, PersistentEffectProps, TriggeredAbilityProps};
pub use game_action::{GameAction, TargetSpec};
pub use limit::AbilityLimit;
pub use registry::{
    AbilityKind, AbilityRegistry, CardAction, EffectTargetSpec, PersistentEffect, PlayAction,
    TriggeredAbility,
};
