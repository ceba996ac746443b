//! # rust-lcg
//!
//! A turn-based card game rules engine for LCG-style games.
//!
//! ## Design Principles
//!
//! 1. **Data-Driven Cards**: Cards are pure configuration. A card
//!    declares conditions, targets and atomic game actions through a
//!    setup DSL; the engine gives them meaning at resolution time.
//!
//! 2. **One Door Into State**: All zone transitions go through
//!    `GameState::move_card`, which re-derives everything a zone
//!    change touches: facing, event subscriptions, lasting effects and
//!    persistent-effect reconciliation.
//!
//! 3. **Suspendable Resolution**: Steps are plain data. A game waiting
//!    on a player decision serializes as-is and resumes exactly where
//!    it stopped.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: Event and resolution logs use
//!   `im` vectors for O(1) structural sharing on clone.
//!
//! - **Deterministic Replay**: A seeded, serializable RNG plus ordered
//!   card storage make identical inputs produce identical games.
//!
//! ## Modules
//!
//! - `core`: Ids, locations, players, conflicts, RNG
//! - `effects`: Active modifiers and their queries
//! - `abilities`: The card setup DSL, conditions, limits
//! - `events`: Event bus and trigger-window ordering
//! - `cards`: Printed data and runtime card state
//! - `game`: The central game state
//! - `phases`: Steps, the queue and the round driver
//! - `interface`: Menus, commands and per-observer projections

pub mod abilities;
pub mod cards;
pub mod core;
pub mod effects;
pub mod error;
pub mod events;
pub mod game;
pub mod interface;
pub mod phases;

// Re-export commonly used types
pub use crate::core::{
    CardUid, Conflict, ConflictType, EffectRef, EffectScope, GameRng, GameRngState, Location,
    Player, PlayerId, PlayerMap, SubscriptionId,
};

pub use crate::effects::{
    Duration, EffectEngine, EffectName, EffectSpec, EffectTarget, EffectValue,
};

pub use crate::abilities::{
    AbilityKind, AbilityLimit, AbilitySetup, ActionProps, Condition, GameAction,
    PersistentEffectProps, TargetSpec, TriggeredAbilityProps,
};

pub use crate::events::{EventBus, EventEffect, EventName, GameEvent, TriggerOrderPolicy};

pub use crate::cards::{Card, CardData, CardType};

pub use crate::game::{AbilityRecord, GameState};

pub use crate::phases::{
    Decision, EngineStatus, Game, PhaseName, Prompt, PromptKind, Step, StepQueue,
};

pub use crate::interface::{
    accept_card_command, card_menu, card_summary, short_summary, CardSummary, MenuCommand,
    MenuItem, ShortSummary,
};

pub use crate::error::SetupError;
