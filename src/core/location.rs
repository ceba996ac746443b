//! Card locations and persistent-effect scopes.
//!
//! `Location` is the closed set of places a card can occupy. The engine
//! interprets a handful of groupings: the play area, the five province
//! slots, the two decks, and the zones where cards are always face up.
//!
//! `EffectScope` is the much smaller set of locations a persistent
//! effect may be scoped to. Anything else is a configuration error in
//! the card data and is rejected at setup time.

use serde::{Deserialize, Serialize};

use crate::error::SetupError;

/// A place a card can occupy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Location {
    Hand,
    PlayArea,
    ProvinceOne,
    ProvinceTwo,
    ProvinceThree,
    ProvinceFour,
    StrongholdProvince,
    DynastyDeck,
    ConflictDeck,
    DynastyDiscard,
    ConflictDiscard,
    BeingPlayed,
    RemovedFromGame,
}

impl Location {
    /// The five province slots, in board order.
    pub const PROVINCES: [Location; 5] = [
        Location::ProvinceOne,
        Location::ProvinceTwo,
        Location::ProvinceThree,
        Location::ProvinceFour,
        Location::StrongholdProvince,
    ];

    /// Is this one of the five province slots?
    #[must_use]
    pub fn is_province(self) -> bool {
        matches!(
            self,
            Location::ProvinceOne
                | Location::ProvinceTwo
                | Location::ProvinceThree
                | Location::ProvinceFour
                | Location::StrongholdProvince
        )
    }

    /// Is this a draw deck?
    #[must_use]
    pub fn is_deck(self) -> bool {
        matches!(self, Location::DynastyDeck | Location::ConflictDeck)
    }

    /// Cards in these zones are always face up; moving a card here
    /// clears its facedown flag.
    #[must_use]
    pub fn is_face_up(self) -> bool {
        matches!(
            self,
            Location::PlayArea | Location::ConflictDiscard | Location::DynastyDiscard | Location::Hand
        )
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Location::Hand => "hand",
            Location::PlayArea => "play area",
            Location::ProvinceOne => "province 1",
            Location::ProvinceTwo => "province 2",
            Location::ProvinceThree => "province 3",
            Location::ProvinceFour => "province 4",
            Location::StrongholdProvince => "stronghold province",
            Location::DynastyDeck => "dynasty deck",
            Location::ConflictDeck => "conflict deck",
            Location::DynastyDiscard => "dynasty discard pile",
            Location::ConflictDiscard => "conflict discard pile",
            Location::BeingPlayed => "being played",
            Location::RemovedFromGame => "removed from game",
        };
        write!(f, "{}", name)
    }
}

/// Where a persistent effect is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectScope {
    /// Active from setup onward, regardless of the source's zone.
    Any,
    /// Active while the source is in the play area.
    PlayArea,
    /// Active while the source occupies any province slot.
    Provinces,
}

impl EffectScope {
    /// Resolve a declared location into a scope.
    ///
    /// Only the play area and province slots are supported anchors for
    /// persistent effects; anything else is a card-data bug and fails
    /// the card's setup.
    pub fn for_location(location: Location) -> Result<Self, SetupError> {
        match location {
            Location::PlayArea => Ok(EffectScope::PlayArea),
            loc if loc.is_province() => Ok(EffectScope::Provinces),
            other => Err(SetupError::UnsupportedEffectLocation(other)),
        }
    }

    /// Does this scope cover the given location?
    #[must_use]
    pub fn covers(self, location: Location) -> bool {
        match self {
            EffectScope::Any => true,
            EffectScope::PlayArea => location == Location::PlayArea,
            EffectScope::Provinces => location.is_province(),
        }
    }
}
