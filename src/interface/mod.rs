//! The player-facing surface: menus, commands and projections.

pub mod command;
pub mod menu;
pub mod summary;

pub use command::accept_card_command;
pub use menu::{card_menu, MenuCommand, MenuItem};
pub use summary::{card_summary, short_summary, CardSummary, ShortSummary};
