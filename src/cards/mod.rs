//! Cards: printed data and runtime state.

pub mod card;
pub mod data;

pub use card::Card;
pub use data::{CardData, CardType};
