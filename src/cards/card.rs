//! Runtime card state.
//!
//! A `Card` pairs printed [`CardData`] with everything that changes
//! during a game: zone, facing, tokens, conflict participation and the
//! card's ability registry. Skill, trait and faction queries take the
//! effect engine so active modifiers are always folded in.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::abilities::{AbilityRegistry, AbilitySetup};
use crate::core::{CardUid, Conflict, Location, PlayerId};
use crate::effects::{EffectEngine, EffectName, EffectTarget};
use crate::error::SetupError;
use crate::interface::MenuItem;

use super::data::{CardData, CardType};

/// One card in a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub uid: CardUid,
    pub data: CardData,
    pub owner: PlayerId,
    pub controller: PlayerId,
    pub zone: Location,
    pub facedown: bool,
    pub bowed: bool,
    pub in_conflict: bool,
    pub show_popup: bool,
    pub popup_menu_text: Option<String>,
    /// Named counters on the card. An entry is removed when its count
    /// reaches zero, so `tokens.contains_key` means "at least one".
    pub tokens: FxHashMap<String, u32>,
    /// Extra menu entries the card contributes in manual mode.
    pub menu: Vec<MenuItem>,
    pub abilities: AbilityRegistry,
}

impl Card {
    /// Construct a card, running its ability setup closure.
    ///
    /// Setup errors (unsupported effect locations, zero limits) are
    /// collected by the builder and surface here, so a bad card
    /// declaration fails at construction rather than mid-game.
    pub fn new(
        uid: CardUid,
        owner: PlayerId,
        data: CardData,
        setup: impl FnOnce(&mut AbilitySetup),
    ) -> Result<Self, SetupError> {
        let mut builder = AbilitySetup::new(data.card_type);
        setup(&mut builder);
        let abilities = builder.build()?;

        let zone = Self::starting_zone(data.card_type);
        Ok(Self {
            uid,
            data,
            owner,
            controller: owner,
            zone,
            facedown: !zone.is_face_up(),
            bowed: false,
            in_conflict: false,
            show_popup: false,
            popup_menu_text: None,
            tokens: FxHashMap::default(),
            menu: Vec::new(),
            abilities,
        })
    }

    fn starting_zone(card_type: CardType) -> Location {
        match card_type {
            CardType::Character | CardType::Holding => Location::DynastyDeck,
            CardType::Event | CardType::Attachment => Location::ConflictDeck,
            CardType::Province => Location::ProvinceOne,
            CardType::Stronghold => Location::StrongholdProvince,
            CardType::Role => Location::PlayArea,
        }
    }

    pub fn card_type(&self) -> CardType {
        self.data.card_type
    }

    // ----- tokens -----

    pub fn add_token(&mut self, kind: &str, count: u32) {
        if count == 0 {
            return;
        }
        *self.tokens.entry(kind.to_string()).or_insert(0) += count;
    }

    /// Remove up to `count` tokens, deleting the entry when it hits
    /// zero.
    pub fn remove_token(&mut self, kind: &str, count: u32) {
        if let Some(current) = self.tokens.get_mut(kind) {
            *current = current.saturating_sub(count);
            if *current == 0 {
                self.tokens.remove(kind);
            }
        }
    }

    pub fn has_token(&self, kind: &str) -> bool {
        self.tokens.contains_key(kind)
    }

    pub fn token_count(&self, kind: &str) -> u32 {
        self.tokens.get(kind).copied().unwrap_or(0)
    }

    // ----- leaving play -----

    /// Reset transient state when the card leaves the play area:
    /// tokens are discarded, per-round limits reset, control reverts
    /// to the owner.
    pub fn leaves_play(&mut self) {
        self.tokens.clear();
        self.abilities.reset_limits();
        self.controller = self.owner;
        self.in_conflict = false;
        self.bowed = false;
    }

    // ----- modified queries -----

    fn as_target(&self) -> EffectTarget {
        EffectTarget::Card(self.uid)
    }

    /// Printed traits plus any granted by active effects, deduplicated.
    pub fn traits(&self, effects: &EffectEngine) -> Vec<String> {
        let mut out = self.data.traits.clone();
        for granted in effects.texts(self.as_target(), EffectName::AddTrait) {
            if !out.iter().any(|t| t == granted) {
                out.push(granted.to_string());
            }
        }
        out
    }

    pub fn has_trait(&self, name: &str, effects: &EffectEngine) -> bool {
        self.data.has_printed_trait(name)
            || effects
                .texts(self.as_target(), EffectName::AddTrait)
                .iter()
                .any(|t| *t == name)
    }

    /// Faction membership, counting granted factions. A card is only
    /// neutral if it is printed neutral and nothing has granted it a
    /// faction.
    pub fn is_faction(&self, faction: &str, effects: &EffectEngine) -> bool {
        let granted = effects.texts(self.as_target(), EffectName::AddFaction);
        if faction == "neutral" {
            return self.data.faction == "neutral" && granted.is_empty();
        }
        self.data.faction == faction || granted.iter().any(|f| *f == faction)
    }

    pub fn is_blank(&self, effects: &EffectEngine) -> bool {
        effects.any(self.as_target(), EffectName::Blank)
    }

    pub fn military_skill(&self, effects: &EffectEngine) -> Option<i64> {
        self.data
            .military_skill
            .map(|base| base + effects.sum(self.as_target(), EffectName::ModifyMilitarySkill))
    }

    pub fn political_skill(&self, effects: &EffectEngine) -> Option<i64> {
        self.data
            .political_skill
            .map(|base| base + effects.sum(self.as_target(), EffectName::ModifyPoliticalSkill))
    }

    pub fn glory(&self, effects: &EffectEngine) -> i64 {
        self.data.glory + effects.sum(self.as_target(), EffectName::ModifyGlory)
    }

    pub fn province_strength(&self, effects: &EffectEngine) -> i64 {
        self.data.strength + effects.sum(self.as_target(), EffectName::ModifyProvinceStrength)
    }

    /// An ability's effective use limit: printed maximum plus any
    /// limit-increasing effects on this card.
    pub fn modified_limit_max(&self, printed_max: u32, effects: &EffectEngine) -> i64 {
        printed_max as i64 + effects.sum(self.as_target(), EffectName::IncreaseLimitOnAbilities)
    }

    pub fn readies_during_ready_phase(&self, effects: &EffectEngine) -> bool {
        !effects.any(self.as_target(), EffectName::DoesNotReady)
    }

    /// Whether the card stays hidden from opponents while facedown.
    pub fn hide_when_facedown(&self, effects: &EffectEngine) -> bool {
        !effects.any(self.as_target(), EffectName::CanBeSeenWhenFacedown)
    }

    /// Facedown or blanked cards cannot trigger abilities, nor can a
    /// card carrying an ability restriction.
    pub fn can_trigger_abilities(&self, effects: &EffectEngine) -> bool {
        !self.facedown
            && !self.is_blank(effects)
            && !effects.any(self.as_target(), EffectName::AbilityRestriction)
    }

    // ----- conflict participation -----

    pub fn is_attacking(&self, conflict: Option<&Conflict>) -> bool {
        conflict.map_or(false, |c| c.is_attacking(self.uid))
    }

    pub fn is_defending(&self, conflict: Option<&Conflict>) -> bool {
        conflict.map_or(false, |c| c.is_defending(self.uid))
    }

    pub fn is_participating(&self, conflict: Option<&Conflict>) -> bool {
        conflict.map_or(false, |c| c.is_participating(self.uid))
    }
}
