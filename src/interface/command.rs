//! Manual-mode card commands.
//!
//! A command is accepted only if the card's current menu offers it;
//! anything else is rejected without touching the state.

use crate::core::{CardUid, PlayerId};
use crate::game::GameState;

use super::menu::{card_menu, MenuCommand};

/// Apply a clicked menu command. Returns whether it was accepted.
pub fn accept_card_command(
    state: &mut GameState,
    player: PlayerId,
    uid: CardUid,
    command: MenuCommand,
) -> bool {
    let offered = match card_menu(state, uid) {
        Some(menu) => menu.iter().any(|item| item.command == command),
        None => false,
    };
    if !offered {
        return false;
    }

    match command {
        MenuCommand::Reveal => {
            state.reveal_card(uid);
            true
        }
        MenuCommand::Click => {
            state.toggle_selection(player, uid);
            true
        }
        // card-specific entries are surfaced to the caller by menu
        // index; accepting them here is enough for manual play
        MenuCommand::Custom(_) => true,
    }
}
