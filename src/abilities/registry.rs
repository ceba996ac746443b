//! Ability registry: the declared abilities attached to one card.
//!
//! The registry is built once at card construction from the setup DSL
//! and its sequences are append-only for the card's lifetime. Only
//! three things mutate afterwards: per-round usage limits, the live
//! event-bus subscription handles of triggered abilities, and the
//! active-effect handles of persistent effects.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{EffectScope, EffectRef, Location, SubscriptionId};
use crate::effects::EffectSpec;
use crate::events::EventName;

use super::condition::Condition;
use super::game_action::{GameAction, TargetSpec};
use super::limit::AbilityLimit;

/// How a triggered ability relates to its event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityKind {
    Action,
    Reaction,
    ForcedReaction,
    Interrupt,
    ForcedInterrupt,
    WouldInterrupt,
}

impl AbilityKind {
    /// Forced abilities resolve without their controller's consent and
    /// ahead of optional abilities in the same bucket.
    #[must_use]
    pub fn is_forced(self) -> bool {
        matches!(self, AbilityKind::ForcedReaction | AbilityKind::ForcedInterrupt)
    }

    /// Interrupts (of any flavor) resolve before the event's primary
    /// effect; reactions resolve after.
    #[must_use]
    pub fn is_interrupt(self) -> bool {
        matches!(
            self,
            AbilityKind::Interrupt | AbilityKind::ForcedInterrupt | AbilityKind::WouldInterrupt
        )
    }
}

/// A declared action ability ("click to use").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardAction {
    pub title: String,
    pub condition: Condition,
    pub limit: Option<AbilityLimit>,
    pub target: TargetSpec,
    pub action: GameAction,
}

/// A declared triggered ability (reaction or interrupt).
///
/// `locations` is the zone set in which the ability listens;
/// `subscriptions` holds the live bus handles while registered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggeredAbility {
    pub title: String,
    pub kind: AbilityKind,
    pub events: SmallVec<[EventName; 2]>,
    pub locations: SmallVec<[Location; 5]>,
    pub condition: Condition,
    pub limit: Option<AbilityLimit>,
    pub target: TargetSpec,
    pub action: GameAction,
    pub subscriptions: SmallVec<[SubscriptionId; 2]>,
}

impl TriggeredAbility {
    /// Does the ability listen while its card is in `location`?
    #[must_use]
    pub fn listens_in(&self, location: Location) -> bool {
        self.locations.contains(&location)
    }

    /// Is the ability currently subscribed on the bus?
    #[must_use]
    pub fn is_registered(&self) -> bool {
        !self.subscriptions.is_empty()
    }
}

/// What a persistent effect's modifier attaches to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectTargetSpec {
    /// The source card itself.
    SelfCard,
    /// The source's controller.
    Controller,
    /// The game as a whole.
    Game,
}

/// A declared persistent effect.
///
/// `active_ref` is the engine handle while applied. The effect is
/// applied at most once per period during which its scope holds, and
/// removed exactly once when it stops holding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistentEffect {
    pub scope: EffectScope,
    pub condition: Condition,
    pub target: EffectTargetSpec,
    pub spec: EffectSpec,
    pub active_ref: Option<EffectRef>,
}

/// A special play action available outside the play area.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayAction {
    pub title: String,
    pub location: Location,
    pub action: GameAction,
}

/// All abilities declared by one card.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AbilityRegistry {
    pub actions: Vec<CardAction>,
    pub reactions: Vec<TriggeredAbility>,
    pub persistent_effects: Vec<PersistentEffect>,
    pub play_actions: Vec<PlayAction>,
}

impl AbilityRegistry {
    /// Reset every per-round usage limit. Called when the card leaves
    /// play and at round boundaries.
    pub fn reset_limits(&mut self) {
        for action in &mut self.actions {
            if let Some(limit) = &mut action.limit {
                limit.reset();
            }
        }
        for reaction in &mut self.reactions {
            if let Some(limit) = &mut reaction.limit {
                limit.reset();
            }
        }
    }

    /// Play actions usable from the given location.
    pub fn play_actions_in(&self, location: Location) -> impl Iterator<Item = &PlayAction> {
        self.play_actions.iter().filter(move |p| p.location == location)
    }
}
