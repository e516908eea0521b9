//! OBR Signal
//!
//! Turns pivot labels into ENTRY/EXIT signals and scores the key-press
//! reactions to them. The reaction window tightens as the trainee gets
//! consistently fast and accurate.
//!
//! Time is passed in as [`std::time::Instant`] so the model never reads a
//! clock itself.

mod config;
mod error;
mod model;

pub use config::ReactionConfig;
pub use error::{Result, SignalError};
pub use model::{ReactionKey, ReactionResult, ReactionStats, Signal, SignalModel};
