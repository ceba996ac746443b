//! Per-observer card projections.
//!
//! What a player sees of a card depends on who they are: a facedown
//! card is always a near-empty silhouette to the opponent; effects can
//! widen the controller's view of their own facedown cards. Projections
//! are plain serializable values for a client to render.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cards::CardType;
use crate::core::{CardUid, Location, PlayerId};
use crate::effects::{EffectName, EffectTarget};
use crate::game::GameState;

use super::menu::{card_menu, MenuItem};

/// What one observer sees of one card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "visibility", rename_all = "snake_case")]
pub enum CardSummary {
    /// The restricted silhouette: position without identity.
    Hidden {
        uid: CardUid,
        controller: PlayerId,
        location: Location,
        facedown: bool,
        in_conflict: bool,
        selected: bool,
    },
    /// The full card.
    Visible {
        uid: CardUid,
        id: String,
        name: String,
        card_type: CardType,
        controller: PlayerId,
        location: Location,
        facedown: bool,
        bowed: bool,
        in_conflict: bool,
        unique: bool,
        military_skill: Option<i64>,
        political_skill: Option<i64>,
        glory: i64,
        tokens: BTreeMap<String, u32>,
        menu: Vec<MenuItem>,
        popup_menu_text: Option<String>,
        show_popup: bool,
        selected: bool,
    },
}

/// A compact identity line for control strips and logs. Facedown
/// cards keep their identity out of it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShortSummary {
    pub uid: CardUid,
    pub id: Option<String>,
    pub name: Option<String>,
    pub card_type: CardType,
    pub facedown: bool,
}

/// Project a card for an observer.
pub fn card_summary(state: &GameState, uid: CardUid, observer: PlayerId) -> Option<CardSummary> {
    let card = state.card(uid)?;
    let effects = &state.effects;

    let hidden = if observer == card.controller {
        card.facedown && card.hide_when_facedown(effects)
    } else {
        card.facedown || effects.any(EffectTarget::Card(uid), EffectName::HideWhenFaceUp)
    };

    let selected = state.is_selected(observer, uid);
    if hidden {
        return Some(CardSummary::Hidden {
            uid,
            controller: card.controller,
            location: card.zone,
            facedown: card.facedown,
            in_conflict: card.in_conflict,
            selected,
        });
    }

    Some(CardSummary::Visible {
        uid,
        id: card.data.id.clone(),
        name: card.data.name.clone(),
        card_type: card.card_type(),
        controller: card.controller,
        location: card.zone,
        facedown: card.facedown,
        bowed: card.bowed,
        in_conflict: card.in_conflict,
        unique: card.data.unique,
        military_skill: card.military_skill(effects),
        political_skill: card.political_skill(effects),
        glory: card.glory(effects),
        tokens: card.tokens.iter().map(|(k, &v)| (k.clone(), v)).collect(),
        menu: card_menu(state, uid).unwrap_or_default(),
        popup_menu_text: card.popup_menu_text.clone(),
        show_popup: card.show_popup,
        selected,
    })
}

/// Project a card's identity line.
pub fn short_summary(state: &GameState, uid: CardUid) -> Option<ShortSummary> {
    let card = state.card(uid)?;
    let visible = !card.facedown;
    Some(ShortSummary {
        uid,
        id: visible.then(|| card.data.id.clone()),
        name: visible.then(|| card.data.name.clone()),
        card_type: card.card_type(),
        facedown: card.facedown,
    })
}
