use chrono::{DateTime, Utc};

mod outcome;
mod regime;

pub use outcome::{Outcome, OutcomeBin};
pub use regime::{Breakout, Momentum, Regime, Sign, TransitionKey};

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Venue identifier (e.g. "NSDQ", "ARCA")
pub type ExchangeId = String;

/// Minimum price increment in dollars
pub const TICK_SIZE: f64 = 0.01;

/// Minimum displayable size in shares
pub const ROUND_LOT: u64 = 100;

/// Price-delta discretisation of the transition table (half a cent)
pub const PRICE_DELTA_QUANTUM: f64 = 0.005;

/// Spread discretisation of the transition table (one cent)
pub const SPREAD_QUANTUM: f64 = 0.01;

/// Size discretisation of the transition table (one round lot)
pub const SIZE_QUANTUM: u64 = 100;

/// Largest size bin a transition table may hold (1e11 shares)
pub const MAX_SIZE_LOTS: i64 = 1_000_000_000;

/// Round a dollar price to the nearest cent
#[inline]
pub fn round_to_cents(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}
