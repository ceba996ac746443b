//! Manual-mode card menus.
//!
//! Menus exist only in manual mode, and only for cards sitting in the
//! play area or a province slot. A facedown card offers nothing but
//! "Reveal"; a face-up card offers selection plus whatever entries the
//! card itself contributes.

use serde::{Deserialize, Serialize};

use crate::core::{CardUid, Location};
use crate::game::GameState;

/// What clicking a menu entry does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuCommand {
    /// Turn the card face up.
    Reveal,
    /// Toggle the card in the clicking player's selection.
    Click,
    /// A card-specific entry, addressed by index.
    Custom(u32),
}

/// One menu entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub command: MenuCommand,
    pub text: String,
}

impl MenuItem {
    pub fn reveal() -> Self {
        Self {
            command: MenuCommand::Reveal,
            text: "Reveal".to_string(),
        }
    }

    pub fn click() -> Self {
        Self {
            command: MenuCommand::Click,
            text: "Select Card".to_string(),
        }
    }

    pub fn custom(index: u32, text: impl Into<String>) -> Self {
        Self {
            command: MenuCommand::Custom(index),
            text: text.into(),
        }
    }
}

/// The menu a card currently offers, or `None` when it offers none.
pub fn card_menu(state: &GameState, uid: CardUid) -> Option<Vec<MenuItem>> {
    if !state.manual_mode {
        return None;
    }
    let card = state.card(uid)?;
    if card.zone != Location::PlayArea && !card.zone.is_province() {
        return None;
    }

    if card.facedown {
        return Some(vec![MenuItem::reveal()]);
    }

    let mut menu = vec![MenuItem::click()];
    menu.extend(card.menu.iter().cloned());
    let base = card.menu.len() as u32;
    for (index, play) in card.abilities.play_actions_in(card.zone).enumerate() {
        menu.push(MenuItem::custom(base + index as u32, play.title.clone()));
    }
    Some(menu)
}
