//! Game events.
//!
//! Events are published when things happen; triggered abilities
//! subscribe to them by name while their card occupies a listening
//! zone.

use serde::{Deserialize, Serialize};

use crate::core::{CardUid, ConflictType, Location, PlayerId};

/// The closed set of events the engine publishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventName {
    OnCardMoved,
    OnCardRevealed,
    OnCardLeavesPlay,
    OnCharacterEntersPlay,
    OnPhaseStarted,
    OnPhaseEnded,
    OnConflictDeclared,
    OnCardPlayed,
    OnFateCollected,
    OnRoundEnded,
}

/// A published event with its context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// What happened.
    pub name: EventName,

    /// The card the event is about, if any.
    pub card: Option<CardUid>,

    /// The player the event is about, if any.
    pub player: Option<PlayerId>,

    /// Where the card came from, for movement events.
    pub origin: Option<Location>,

    /// Where the card went, for movement events.
    pub destination: Option<Location>,

    /// Numeric payload (fate collected, honor gained, ...).
    pub value: Option<i64>,
}

impl GameEvent {
    /// An event with no context.
    pub fn new(name: EventName) -> Self {
        Self {
            name,
            card: None,
            player: None,
            origin: None,
            destination: None,
            value: None,
        }
    }

    /// Attach a card.
    #[must_use]
    pub fn with_card(mut self, card: CardUid) -> Self {
        self.card = Some(card);
        self
    }

    /// Attach a player.
    #[must_use]
    pub fn with_player(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }

    /// Attach a numeric payload.
    #[must_use]
    pub fn with_value(mut self, value: i64) -> Self {
        self.value = Some(value);
        self
    }

    /// "Card moved" with its old and new zone.
    pub fn card_moved(card: CardUid, origin: Location, destination: Location) -> Self {
        Self {
            name: EventName::OnCardMoved,
            card: Some(card),
            player: None,
            origin: Some(origin),
            destination: Some(destination),
            value: None,
        }
    }
}

/// The state mutation an announced event stands for.
///
/// The mutation is deferred into the event's own resolution step, so
/// interrupts in the window resolve against the state from before the
/// event happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventEffect {
    /// The announcement carries no mutation; the fact is already done.
    None,
    DeclareConflict {
        conflict_type: ConflictType,
        attacker: PlayerId,
        defender: PlayerId,
    },
    MoveCard {
        card: CardUid,
        to: Location,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_moved_builder() {
        let event = GameEvent::card_moved(CardUid::new(5), Location::Hand, Location::PlayArea);
        assert_eq!(event.name, EventName::OnCardMoved);
        assert_eq!(event.card, Some(CardUid::new(5)));
        assert_eq!(event.origin, Some(Location::Hand));
        assert_eq!(event.destination, Some(Location::PlayArea));
    }

    #[test]
    fn test_builder_chain() {
        let event = GameEvent::new(EventName::OnFateCollected)
            .with_player(PlayerId::new(1))
            .with_value(7);
        assert_eq!(event.player, Some(PlayerId::new(1)));
        assert_eq!(event.value, Some(7));
    }
}
