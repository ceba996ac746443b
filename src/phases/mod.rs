//! Phases, steps and the queue that drives them.

pub mod machine;
pub mod queue;
pub mod step;

pub use machine::{EngineStatus, Game, PhaseName, ROUND_ORDER};
pub use queue::{QueueStatus, StepQueue};
pub use step::{Decision, Prompt, PromptKind, Step, StepOutcome, BASE_FATE_INCOME};
