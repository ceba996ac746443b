//! Trigger window ordering.
//!
//! When an event is published, eligible triggered abilities are
//! partitioned into ordered buckets around the event's primary effect:
//! would-interrupts, forced interrupts, and interrupts resolve before
//! it; forced reactions and reactions after. Within a bucket, forced
//! abilities precede optional ones, and abilities of different
//! controllers are ordered by first-player rotation (the configurable
//! tie-break policy), then by declaration order.

use serde::{Deserialize, Serialize};

use crate::abilities::AbilityKind;
use crate::core::{CardUid, PlayerId};

/// Tie-break policy for simultaneously eligible triggers of different
/// controllers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerOrderPolicy {
    /// Order controllers by rotation from the first player.
    #[default]
    FirstPlayerRotation,
    /// Ignore controllers; keep pure declaration order.
    DeclarationOrder,
}

/// One eligible triggered ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerCandidate {
    pub card: CardUid,
    pub ability: usize,
    pub kind: AbilityKind,
    pub controller: PlayerId,
    /// Which of the simultaneously announced events this trigger
    /// answers, as an index into the announcement set.
    pub event_index: usize,
}

/// Candidates split around the primary effect, each side fully ordered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderedWindow {
    /// Resolve strictly before the event's primary effect.
    pub before: Vec<TriggerCandidate>,
    /// Resolve strictly after the event's primary effect.
    pub after: Vec<TriggerCandidate>,
}

/// Rank within the interrupt or reaction side: lower resolves first.
fn kind_rank(kind: AbilityKind) -> usize {
    match kind {
        AbilityKind::WouldInterrupt => 0,
        AbilityKind::ForcedInterrupt => 1,
        AbilityKind::Interrupt => 2,
        AbilityKind::ForcedReaction => 0,
        AbilityKind::Reaction => 1,
        // Plain actions never enter a trigger window.
        AbilityKind::Action => usize::MAX,
    }
}

/// Order a window's candidates.
///
/// The declaration index is the candidate's position in the input,
/// which callers build in subscription order, so the sort is stable
/// with respect to registration.
#[must_use]
pub fn order_window(
    candidates: Vec<TriggerCandidate>,
    first_player: PlayerId,
    player_count: usize,
    policy: TriggerOrderPolicy,
) -> OrderedWindow {
    let mut before: Vec<(usize, TriggerCandidate)> = Vec::new();
    let mut after: Vec<(usize, TriggerCandidate)> = Vec::new();

    for (index, candidate) in candidates.into_iter().enumerate() {
        if candidate.kind == AbilityKind::Action {
            continue;
        }
        if candidate.kind.is_interrupt() {
            before.push((index, candidate));
        } else {
            after.push((index, candidate));
        }
    }

    let sort_key = |index: usize, c: &TriggerCandidate| {
        let rotation = match policy {
            TriggerOrderPolicy::FirstPlayerRotation => {
                c.controller.rotation_from(first_player, player_count)
            }
            TriggerOrderPolicy::DeclarationOrder => 0,
        };
        (kind_rank(c.kind), rotation, index)
    };

    before.sort_by_key(|(index, c)| sort_key(*index, c));
    after.sort_by_key(|(index, c)| sort_key(*index, c));

    OrderedWindow {
        before: before.into_iter().map(|(_, c)| c).collect(),
        after: after.into_iter().map(|(_, c)| c).collect(),
    }
}
