//! Effect engine: derived values produced by active modifiers.

mod effect;
mod engine;

pub use effect::{Duration, EffectName, EffectSpec, EffectTarget, EffectValue};
pub use engine::{ActiveEffect, EffectEngine};
