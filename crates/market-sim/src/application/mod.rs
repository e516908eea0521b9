//! Application layer: Use cases and orchestration
//!
//! Contains:
//! - **generators**: NBBO tick sampling and multi-exchange fan-out
//! - **price_model**: the per-second update loop tying them to pivot detection

pub mod generators;
mod price_model;

pub use price_model::PriceModel;
