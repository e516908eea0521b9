//! Infrastructure Layer
//!
//! Configuration loading for the simulation.

mod config;

pub use config::{ExchangeBookConfig, MAX_WINDOW_SECONDS, SimulationConfig};
