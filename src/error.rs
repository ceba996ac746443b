//! Setup-time configuration errors.
//!
//! These are programmer errors in card data, discovered while a card's
//! abilities are being built. They fail the game before it starts;
//! nothing here is recoverable at runtime. Runtime rule violations
//! (an unoffered menu command, an illegal decision) are rejected with
//! plain `bool`/`Option` returns instead and never raise an error.

use thiserror::Error;

use crate::core::Location;

/// A structural error in a card's declared abilities.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SetupError {
    /// A persistent effect was anchored to a location the effect
    /// engine does not support.
    #[error("'{0}' is not a supported effect location")]
    UnsupportedEffectLocation(Location),

    /// An ability declared a per-round usage limit of zero.
    #[error("ability '{0}' declares a zero-use limit")]
    ZeroUseLimit(String),
}
