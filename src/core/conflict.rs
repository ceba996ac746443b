//! The current conflict, if one is underway.
//!
//! A conflict is a contested window between an attacking and a
//! defending player. Cards query it for attack/defense/participation
//! status; everything else about conflict resolution happens through
//! the ordinary step machinery.

use serde::{Deserialize, Serialize};

use super::ids::CardUid;
use super::player::PlayerId;

/// Military or political.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictType {
    Military,
    Political,
}

impl std::fmt::Display for ConflictType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictType::Military => write!(f, "military"),
            ConflictType::Political => write!(f, "political"),
        }
    }
}

/// A conflict in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub conflict_type: ConflictType,
    pub attacking_player: PlayerId,
    pub defending_player: PlayerId,
    pub attackers: Vec<CardUid>,
    pub defenders: Vec<CardUid>,
}

impl Conflict {
    /// Declare a new conflict with no participants yet.
    pub fn new(conflict_type: ConflictType, attacker: PlayerId, defender: PlayerId) -> Self {
        Self {
            conflict_type,
            attacking_player: attacker,
            defending_player: defender,
            attackers: Vec::new(),
            defenders: Vec::new(),
        }
    }

    /// Is the card attacking in this conflict?
    #[must_use]
    pub fn is_attacking(&self, card: CardUid) -> bool {
        self.attackers.contains(&card)
    }

    /// Is the card defending in this conflict?
    #[must_use]
    pub fn is_defending(&self, card: CardUid) -> bool {
        self.defenders.contains(&card)
    }

    /// Is the card participating on either side?
    #[must_use]
    pub fn is_participating(&self, card: CardUid) -> bool {
        self.is_attacking(card) || self.is_defending(card)
    }

    /// Add a participant on the side matching its controller.
    pub fn add_participant(&mut self, card: CardUid, controller: PlayerId) {
        if self.is_participating(card) {
            return;
        }
        if controller == self.attacking_player {
            self.attackers.push(card);
        } else {
            self.defenders.push(card);
        }
    }

    /// Remove a participant from whichever side it is on.
    pub fn remove_participant(&mut self, card: CardUid) {
        self.attackers.retain(|&c| c != card);
        self.defenders.retain(|&c| c != card);
    }
}
