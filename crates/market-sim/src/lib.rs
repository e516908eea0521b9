//! Synthetic market-data engine
//!
//! Produces a plausible multi-exchange level-1 stream from a learned
//! [`QuoteModel`](obr_quote_model::QuoteModel) and labels local extrema of
//! the mid-price. One [`PriceModel::update`] call advances the simulation by
//! one second:
//!
//! ```text
//! QuoteModel ──> QuoteGenerator ──> ExchangeBookGenerator ──> PriceModel
//!  (static)      (0..N NBBO ticks)   (last tick -> venues)     (mid buffer, pivot)
//! ```
//!
//! Everything is synchronous and single-threaded; the caller drives time.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-export key types at crate root
pub use application::PriceModel;
pub use application::generators::{ExchangeBookGenerator, QuoteGenerator};
pub use domain::{MidSample, PivotDetection, PivotDetector, RollingBuffer};
pub use error::{ConfigError, Result, SimError};
pub use infrastructure::{ExchangeBookConfig, MAX_WINDOW_SECONDS, SimulationConfig};
