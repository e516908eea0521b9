//! Quote model
//!
//! A very small non-parametric model of best bid / best ask dynamics:
//!
//! - **Intensity**: per regime, the empirical number of updates per second,
//!   used as the rate of a Poisson draw of how many ticks the next second has.
//! - **Transition table**: per (regime, sign of the last move), the joint
//!   frequency of discretised `(Δp, spread, size)` outcomes.
//!
//! The model is immutable once built and is shared read-only between
//! generators; every sampling method takes the caller's random source.
//! [`QuoteLearner`] builds a model from historical quotes and
//! [`ModelFile`] is its JSON representation on disk.

mod error;
mod file;
mod learner;
mod model;
pub mod poisson;

pub use error::{ModelError, Result};
pub use file::ModelFile;
pub use learner::{FeatureBuilder, QuoteFeatures, QuoteLearner};
pub use model::QuoteModel;
