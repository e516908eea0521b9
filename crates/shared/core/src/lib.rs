//! OBR Core Domain
//!
//! Pure domain types for the synthetic quote engine.
//! This crate contains no I/O and no randomness, and is 100% unit testable.

pub mod entities;
pub mod error;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{Pivot, Quote, Tick};
pub use error::KeyParseError;
pub use values::{
    Breakout, ExchangeId, MAX_SIZE_LOTS, Momentum, Outcome, OutcomeBin, PRICE_DELTA_QUANTUM, ROUND_LOT, Regime,
    SIZE_QUANTUM, SPREAD_QUANTUM, Sign, TICK_SIZE, Timestamp, TransitionKey, round_to_cents,
};
