//! Core types: identifiers, locations, players, conflicts, RNG.

mod conflict;
mod ids;
mod location;
mod player;
mod rng;

pub use conflict::{Conflict, ConflictType};
pub use ids::{CardUid, EffectRef, SubscriptionId};
pub use location::{EffectScope, Location};
pub use player::{Player, PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
