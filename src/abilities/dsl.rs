//! The ability setup DSL.
//!
//! Each card supplies a setup routine invoked once at construction.
//! The routine declares abilities through this builder; `build`
//! validates the declarations and produces the immutable
//! `AbilityRegistry`. Validation failures are configuration errors in
//! the card data and prevent the game from starting.

use smallvec::{smallvec, SmallVec};

use crate::cards::CardType;
use crate::core::{EffectScope, Location};
use crate::effects::EffectSpec;
use crate::error::SetupError;
use crate::events::EventName;

use super::condition::Condition;
use super::game_action::{GameAction, TargetSpec};
use super::limit::AbilityLimit;
use super::registry::{
    AbilityKind, AbilityRegistry, CardAction, EffectTargetSpec, PersistentEffect, PlayAction,
    TriggeredAbility,
};

/// Properties for an action ability.
#[derive(Clone, Debug)]
pub struct ActionProps {
    pub title: String,
    pub condition: Condition,
    pub limit: Option<AbilityLimit>,
    pub target: TargetSpec,
    pub action: GameAction,
}

impl ActionProps {
    /// An unconditional, unlimited action.
    pub fn new(title: impl Into<String>, action: GameAction) -> Self {
        Self {
            title: title.into(),
            condition: Condition::Always,
            limit: None,
            target: TargetSpec::None,
            action,
        }
    }

    /// Gate the action on a condition.
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    /// Limit uses per round.
    #[must_use]
    pub fn with_limit(mut self, max: u32) -> Self {
        self.limit = Some(AbilityLimit::per_round(max));
        self
    }

    /// Require a chosen target.
    #[must_use]
    pub fn with_target(mut self, target: TargetSpec) -> Self {
        self.target = target;
        self
    }
}

/// Properties for a triggered ability.
#[derive(Clone, Debug)]
pub struct TriggeredAbilityProps {
    pub title: String,
    pub when: Vec<EventName>,
    pub location: Option<Vec<Location>>,
    pub condition: Condition,
    pub limit: Option<AbilityLimit>,
    pub target: TargetSpec,
    pub action: GameAction,
}

impl TriggeredAbilityProps {
    /// Trigger on one event, in the type-default zone set.
    pub fn new(title: impl Into<String>, when: EventName, action: GameAction) -> Self {
        Self {
            title: title.into(),
            when: vec![when],
            location: None,
            condition: Condition::Always,
            limit: None,
            target: TargetSpec::None,
            action,
        }
    }

    /// Also trigger on another event.
    #[must_use]
    pub fn also_when(mut self, event: EventName) -> Self {
        if !self.when.contains(&event) {
            self.when.push(event);
        }
        self
    }

    /// Listen in an explicit zone set instead of the type default.
    #[must_use]
    pub fn in_locations(mut self, locations: impl IntoIterator<Item = Location>) -> Self {
        self.location = Some(locations.into_iter().collect());
        self
    }

    /// Gate the trigger on a condition (re-checked at trigger time).
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    /// Limit uses per round.
    #[must_use]
    pub fn with_limit(mut self, max: u32) -> Self {
        self.limit = Some(AbilityLimit::per_round(max));
        self
    }

    /// Require a chosen target.
    #[must_use]
    pub fn with_target(mut self, target: TargetSpec) -> Self {
        self.target = target;
        self
    }
}

/// Properties for a persistent effect.
#[derive(Clone, Debug)]
pub struct PersistentEffectProps {
    /// Anchor location. `None` uses the card-type default; anything
    /// outside the supported set fails setup.
    pub location: Option<Location>,
    /// Active in any zone, applied once at setup and never toggled.
    pub any_zone: bool,
    pub condition: Condition,
    pub target: EffectTargetSpec,
    pub effect: EffectSpec,
}

impl PersistentEffectProps {
    /// A persistent effect on the source card, scoped by type default.
    pub fn new(effect: EffectSpec) -> Self {
        Self {
            location: None,
            any_zone: false,
            condition: Condition::Always,
            target: EffectTargetSpec::SelfCard,
            effect,
        }
    }

    /// Anchor to an explicit location (validated at build time).
    #[must_use]
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Active everywhere, applied once when the card enters the game.
    #[must_use]
    pub fn anywhere(mut self) -> Self {
        self.any_zone = true;
        self
    }

    /// Gate on a condition, re-evaluated as game state changes.
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    /// Attach the modifier to something other than the source card.
    #[must_use]
    pub fn targeting(mut self, target: EffectTargetSpec) -> Self {
        self.target = target;
        self
    }
}

/// Ability builder handed to each card's setup routine.
///
/// Declarations accumulate; the first validation error is remembered
/// and surfaced by `build`, so the card fails setup as a whole.
pub struct AbilitySetup {
    card_type: CardType,
    registry: AbilityRegistry,
    error: Option<SetupError>,
}

impl AbilitySetup {
    /// Builder for a card of the given type.
    #[must_use]
    pub fn new(card_type: CardType) -> Self {
        Self {
            card_type,
            registry: AbilityRegistry::default(),
            error: None,
        }
    }

    /// Declare an action ability.
    pub fn action(&mut self, props: ActionProps) -> &mut Self {
        if let Err(err) = self.check_limit(&props.title, props.limit) {
            self.record(err);
            return self;
        }
        self.registry.actions.push(CardAction {
            title: props.title,
            condition: props.condition,
            limit: props.limit,
            target: props.target,
            action: props.action,
        });
        self
    }

    /// Declare a reaction.
    pub fn reaction(&mut self, props: TriggeredAbilityProps) -> &mut Self {
        self.triggered_ability(AbilityKind::Reaction, props)
    }

    /// Declare a forced reaction.
    pub fn forced_reaction(&mut self, props: TriggeredAbilityProps) -> &mut Self {
        self.triggered_ability(AbilityKind::ForcedReaction, props)
    }

    /// Declare an interrupt.
    pub fn interrupt(&mut self, props: TriggeredAbilityProps) -> &mut Self {
        self.triggered_ability(AbilityKind::Interrupt, props)
    }

    /// Declare a forced interrupt.
    pub fn forced_interrupt(&mut self, props: TriggeredAbilityProps) -> &mut Self {
        self.triggered_ability(AbilityKind::ForcedInterrupt, props)
    }

    /// Declare a would-interrupt (replacement-timing interrupt).
    pub fn would_interrupt(&mut self, props: TriggeredAbilityProps) -> &mut Self {
        self.triggered_ability(AbilityKind::WouldInterrupt, props)
    }

    /// Declare a triggered ability of an explicit kind.
    pub fn triggered_ability(
        &mut self,
        kind: AbilityKind,
        props: TriggeredAbilityProps,
    ) -> &mut Self {
        if let Err(err) = self.check_limit(&props.title, props.limit) {
            self.record(err);
            return self;
        }
        let locations: SmallVec<[Location; 5]> = match props.location {
            Some(locations) => locations.into_iter().collect(),
            None => self.default_trigger_locations(),
        };
        self.registry.reactions.push(TriggeredAbility {
            title: props.title,
            kind,
            events: props.when.into_iter().collect(),
            locations,
            condition: props.condition,
            limit: props.limit,
            target: props.target,
            action: props.action,
            subscriptions: SmallVec::new(),
        });
        self
    }

    /// Declare a persistent effect.
    ///
    /// The anchor location is validated here, at setup time: an
    /// unsupported location fails the whole card.
    pub fn persistent_effect(&mut self, props: PersistentEffectProps) -> &mut Self {
        let scope = if props.any_zone {
            Ok(EffectScope::Any)
        } else {
            match props.location {
                Some(location) => EffectScope::for_location(location),
                None => Ok(self.default_effect_scope()),
            }
        };

        match scope {
            Ok(scope) => {
                self.registry.persistent_effects.push(PersistentEffect {
                    scope,
                    condition: props.condition,
                    target: props.target,
                    spec: props.effect,
                    active_ref: None,
                });
            }
            Err(err) => self.record(err),
        }
        self
    }

    /// Declare a special play action available outside the play area.
    pub fn play_action(
        &mut self,
        title: impl Into<String>,
        location: Location,
        action: GameAction,
    ) -> &mut Self {
        self.registry.play_actions.push(PlayAction {
            title: title.into(),
            location,
            action,
        });
        self
    }

    /// Finish setup, surfacing the first validation error.
    pub fn build(self) -> Result<AbilityRegistry, SetupError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.registry),
        }
    }

    fn record(&mut self, err: SetupError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn check_limit(&self, title: &str, limit: Option<AbilityLimit>) -> Result<(), SetupError> {
        match limit {
            Some(l) if l.max() == 0 => Err(SetupError::ZeroUseLimit(title.to_string())),
            _ => Ok(()),
        }
    }

    /// Province-side cards listen from their provinces; events listen
    /// from hand; everything else listens from the play area.
    fn default_trigger_locations(&self) -> SmallVec<[Location; 5]> {
        if self.card_type.is_province_bound() {
            Location::PROVINCES.iter().copied().collect()
        } else if self.card_type == CardType::Event {
            smallvec![Location::Hand]
        } else {
            smallvec![Location::PlayArea]
        }
    }

    fn default_effect_scope(&self) -> EffectScope {
        if self.card_type.is_province_bound() {
            EffectScope::Provinces
        } else {
            EffectScope::PlayArea
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectName;

    #[test]
    fn test_build_collects_declarations() {
        let mut setup = AbilitySetup::new(CardType::Character);
        setup
            .action(ActionProps::new("Honored strike", GameAction::GainHonor { amount: 1 }))
            .reaction(TriggeredAbilityProps::new(
                "After a conflict",
                EventName::OnConflictDeclared,
                GameAction::Noop,
            ))
            .persistent_effect(PersistentEffectProps::new(EffectSpec::int(
                EffectName::ModifyGlory,
                1,
            )));

        let registry = setup.build().unwrap();
        assert_eq!(registry.actions.len(), 1);
        assert_eq!(registry.reactions.len(), 1);
        assert_eq!(registry.persistent_effects.len(), 1);
        assert_eq!(registry.persistent_effects[0].scope, EffectScope::PlayArea);
    }

    #[test]
    fn test_default_scope_by_type() {
        let mut setup = AbilitySetup::new(CardType::Holding);
        setup.persistent_effect(PersistentEffectProps::new(EffectSpec::int(
            EffectName::ModifyProvinceStrength,
            2,
        )));
        let registry = setup.build().unwrap();
        assert_eq!(registry.persistent_effects[0].scope, EffectScope::Provinces);
    }

    #[test]
    fn test_unsupported_effect_location_fails_setup() {
        let mut setup = AbilitySetup::new(CardType::Character);
        setup.persistent_effect(
            PersistentEffectProps::new(EffectSpec::flag(EffectName::Blank)).at(Location::Hand),
        );

        assert!(matches!(
            setup.build(),
            Err(SetupError::UnsupportedEffectLocation(Location::Hand))
        ));
    }

    #[test]
    fn test_zero_limit_fails_setup() {
        let mut setup = AbilitySetup::new(CardType::Character);
        setup.action(ActionProps::new("Broken", GameAction::Noop).with_limit(0));

        assert!(matches!(setup.build(), Err(SetupError::ZeroUseLimit(_))));
    }

    #[test]
    fn test_default_trigger_locations() {
        let mut setup = AbilitySetup::new(CardType::Event);
        setup.reaction(TriggeredAbilityProps::new(
            "From hand",
            EventName::OnCardPlayed,
            GameAction::Noop,
        ));
        let registry = setup.build().unwrap();
        assert_eq!(registry.reactions[0].locations.as_slice(), &[Location::Hand]);

        let mut setup = AbilitySetup::new(CardType::Province);
        setup.reaction(TriggeredAbilityProps::new(
            "From provinces",
            EventName::OnConflictDeclared,
            GameAction::Noop,
        ));
        let registry = setup.build().unwrap();
        assert_eq!(registry.reactions[0].locations.len(), 5);
    }
}
