//! State Signals: a complete state → score mapping from per-state signals.
//!
//! The central entry point is [`get_physical_scores`], which resolves to a
//! score for every member of [`State::ALL`] or fails outright.

pub mod core;
pub mod logger;
pub mod signals;

#[cfg(feature = "cli")]
pub mod cli_app;

pub use crate::core::errors::{Result, SigError};
pub use crate::core::states::State;
pub use crate::signals::{
    ScoreMap, SignalProvider, aggregate, get_physical_scores, get_physical_scores_with,
};
