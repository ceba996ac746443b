//! Event bus: dynamic subscriptions from triggered abilities.
//!
//! Subscriptions are created and destroyed as cards change zones. The
//! bus only stores bookkeeping and never invokes anything itself;
//! the step queue turns listener lists into ordered resolution steps.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{CardUid, SubscriptionId};

use super::event::EventName;

/// A subscribed triggered ability, addressed by card and index into
/// that card's reaction list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listener {
    pub card: CardUid,
    pub ability: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct Subscription {
    id: SubscriptionId,
    listener: Listener,
}

/// Subscription registry keyed by event name.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventBus {
    by_event: FxHashMap<EventName, Vec<Subscription>>,
    next_id: u32,
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a listener to an event, returning its handle.
    pub fn subscribe(&mut self, event: EventName, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_id);
        self.next_id += 1;
        self.by_event
            .entry(event)
            .or_default()
            .push(Subscription { id, listener });
        id
    }

    /// Remove a subscription. Returns false if the handle was already
    /// gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for subs in self.by_event.values_mut() {
            let before = subs.len();
            subs.retain(|s| s.id != id);
            if subs.len() != before {
                return true;
            }
        }
        false
    }

    /// Listeners for an event, in subscription order.
    #[must_use]
    pub fn listeners(&self, event: EventName) -> Vec<Listener> {
        self.by_event
            .get(&event)
            .map(|subs| subs.iter().map(|s| s.listener).collect())
            .unwrap_or_default()
    }

    /// Is this ability subscribed to this event?
    #[must_use]
    pub fn is_subscribed(&self, card: CardUid, ability: usize, event: EventName) -> bool {
        self.by_event.get(&event).is_some_and(|subs| {
            subs.iter()
                .any(|s| s.listener.card == card && s.listener.ability == ability)
        })
    }

    /// Total live subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.by_event.values().map(Vec::len).sum()
    }
}
