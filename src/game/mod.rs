//! Game state and its orchestration.

pub mod state;

pub use state::{AbilityRecord, GameState};
