//! Event publication and triggered-ability windows.

pub mod bus;
pub mod event;
pub mod window;

pub use bus::{EventBus, Listener};
pub use event::{EventEffect, EventName, GameEvent};
pub use window::{order_window, OrderedWindow, TriggerCandidate, TriggerOrderPolicy};
