//! The effect engine: applies, removes, and aggregates modifiers.
//!
//! The engine is the single place derived values live. Queries read
//! the live set directly; there is no cache to go stale across an
//! apply/remove boundary.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::{CardUid, EffectRef};

use super::effect::{Duration, EffectName, EffectSpec, EffectTarget, EffectValue};

/// One applied modifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub handle: EffectRef,
    pub source: CardUid,
    pub target: EffectTarget,
    pub spec: EffectSpec,
    pub duration: Duration,
}

/// Registry of currently active modifiers.
///
/// Application order is preserved; `values` reports payloads in the
/// order their modifiers were applied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectEngine {
    active: Vec<ActiveEffect>,
    next_handle: u32,
}

impl EffectEngine {
    /// Create an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a modifier. It is visible to every subsequent query
    /// until removed through the returned handle.
    pub fn apply(
        &mut self,
        source: CardUid,
        target: EffectTarget,
        spec: EffectSpec,
        duration: Duration,
    ) -> EffectRef {
        let handle = EffectRef::new(self.next_handle);
        self.next_handle += 1;

        debug!("effect {:?} applied by {} as {}", spec.name, source, handle);

        self.active.push(ActiveEffect {
            handle,
            source,
            target,
            spec,
            duration,
        });

        handle
    }

    /// Deregister a modifier. Removing an already-removed handle is a
    /// no-op, not an error.
    pub fn remove(&mut self, handle: EffectRef) -> bool {
        let before = self.active.len();
        self.active.retain(|e| e.handle != handle);
        let removed = self.active.len() != before;
        if removed {
            debug!("effect {} removed", handle);
        }
        removed
    }

    /// Drop every lasting (finite-duration) modifier contributed by a
    /// source. Called when that source leaves play.
    pub fn remove_lasting(&mut self, source: CardUid) {
        self.active
            .retain(|e| !(e.source == source && e.duration.is_lasting()));
    }

    /// Drop every modifier with the given lasting duration. Called at
    /// conflict/phase/round boundaries.
    pub fn expire(&mut self, duration: Duration) {
        self.active.retain(|e| e.duration != duration);
    }

    /// Numeric aggregation across all active matching modifiers.
    #[must_use]
    pub fn sum(&self, target: EffectTarget, name: EffectName) -> i64 {
        self.matching(target, name)
            .filter_map(|v| v.as_int())
            .sum()
    }

    /// Is at least one matching modifier active?
    #[must_use]
    pub fn any(&self, target: EffectTarget, name: EffectName) -> bool {
        self.matching(target, name).next().is_some()
    }

    /// Payloads of all active matching modifiers, in application order.
    #[must_use]
    pub fn values(&self, target: EffectTarget, name: EffectName) -> Vec<&EffectValue> {
        self.matching(target, name).collect()
    }

    /// Text payloads of all active matching modifiers.
    #[must_use]
    pub fn texts(&self, target: EffectTarget, name: EffectName) -> Vec<&str> {
        self.matching(target, name)
            .filter_map(|v| v.as_text())
            .collect()
    }

    /// Is the handle still active?
    #[must_use]
    pub fn is_active(&self, handle: EffectRef) -> bool {
        self.active.iter().any(|e| e.handle == handle)
    }

    /// Number of active modifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Is the engine empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    fn matching(
        &self,
        target: EffectTarget,
        name: EffectName,
    ) -> impl Iterator<Item = &EffectValue> {
        self.active
            .iter()
            .filter(move |e| e.target == target && e.spec.name == name)
            .map(|e| &e.spec.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(n: u32) -> EffectTarget {
        EffectTarget::Card(CardUid::new(n))
    }

    #[test]
    fn test_apply_and_query() {
        let mut engine = EffectEngine::new();

        engine.apply(
            CardUid::new(1),
            card(10),
            EffectSpec::int(EffectName::ModifyMilitarySkill, 2),
            Duration::Persistent,
        );
        engine.apply(
            CardUid::new(2),
            card(10),
            EffectSpec::int(EffectName::ModifyMilitarySkill, 3),
            Duration::Persistent,
        );

        assert_eq!(engine.sum(card(10), EffectName::ModifyMilitarySkill), 5);
        assert!(engine.any(card(10), EffectName::ModifyMilitarySkill));
        assert!(!engine.any(card(10), EffectName::Blank));
        assert_eq!(engine.sum(card(99), EffectName::ModifyMilitarySkill), 0);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut engine = EffectEngine::new();

        let handle = engine.apply(
            CardUid::new(1),
            card(10),
            EffectSpec::flag(EffectName::Blank),
            Duration::Persistent,
        );

        assert!(engine.remove(handle));
        assert!(!engine.remove(handle));
        assert!(!engine.any(card(10), EffectName::Blank));
    }

    #[test]
    fn test_removal_clears_contribution() {
        let mut engine = EffectEngine::new();

        let handle = engine.apply(
            CardUid::new(1),
            card(10),
            EffectSpec::int(EffectName::ModifyGlory, 2),
            Duration::Persistent,
        );

        assert_eq!(engine.sum(card(10), EffectName::ModifyGlory), 2);
        engine.remove(handle);
        assert_eq!(engine.sum(card(10), EffectName::ModifyGlory), 0);
        assert!(engine.values(card(10), EffectName::ModifyGlory).is_empty());
    }

    #[test]
    fn test_values_preserve_application_order() {
        let mut engine = EffectEngine::new();

        engine.apply(
            CardUid::new(1),
            card(10),
            EffectSpec::text(EffectName::AddTrait, "bushi"),
            Duration::Persistent,
        );
        engine.apply(
            CardUid::new(2),
            card(10),
            EffectSpec::text(EffectName::AddTrait, "cavalry"),
            Duration::Persistent,
        );

        assert_eq!(engine.texts(card(10), EffectName::AddTrait), vec!["bushi", "cavalry"]);
    }

    #[test]
    fn test_remove_lasting_keeps_persistent() {
        let mut engine = EffectEngine::new();
        let source = CardUid::new(1);

        let persistent = engine.apply(
            source,
            card(10),
            EffectSpec::int(EffectName::ModifyGlory, 1),
            Duration::Persistent,
        );
        let lasting = engine.apply(
            source,
            card(10),
            EffectSpec::int(EffectName::ModifyGlory, 5),
            Duration::UntilEndOfPhase,
        );

        engine.remove_lasting(source);

        assert!(engine.is_active(persistent));
        assert!(!engine.is_active(lasting));
        assert_eq!(engine.sum(card(10), EffectName::ModifyGlory), 1);
    }

    #[test]
    fn test_expire_by_duration() {
        let mut engine = EffectEngine::new();

        engine.apply(
            CardUid::new(1),
            card(10),
            EffectSpec::int(EffectName::ModifyGlory, 1),
            Duration::UntilEndOfPhase,
        );
        engine.apply(
            CardUid::new(1),
            card(10),
            EffectSpec::int(EffectName::ModifyGlory, 2),
            Duration::UntilEndOfRound,
        );

        engine.expire(Duration::UntilEndOfPhase);

        assert_eq!(engine.sum(card(10), EffectName::ModifyGlory), 2);
    }

    #[test]
    fn test_serialization() {
        let mut engine = EffectEngine::new();
        engine.apply(
            CardUid::new(1),
            card(10),
            EffectSpec::flag(EffectName::DoesNotReady),
            Duration::Persistent,
        );

        let json = serde_json::to_string(&engine).unwrap();
        let back: EffectEngine = serde_json::from_str(&json).unwrap();
        assert_eq!(engine, back);
    }
}
