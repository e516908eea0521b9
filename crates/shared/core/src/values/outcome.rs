use super::{MAX_SIZE_LOTS, PRICE_DELTA_QUANTUM, SIZE_QUANTUM, SPREAD_QUANTUM};
use crate::error::KeyParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discretised (Δp, spread, size) cell of the transition table
///
/// Each field is an index in units of its quantum: Δp in half cents,
/// spread in cents, size in round lots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutcomeBin {
    pub dp: i64,
    pub spread: i64,
    pub size: i64,
}

impl OutcomeBin {
    pub const fn new(dp: i64, spread: i64, size: i64) -> Self {
        Self { dp, spread, size }
    }

    /// Quantise a continuous observation into its bin
    pub fn from_observation(dp: f64, spread: f64, size: f64) -> Self {
        Self {
            dp: (dp / PRICE_DELTA_QUANTUM).round() as i64,
            spread: (spread / SPREAD_QUANTUM).round() as i64,
            size: (size / SIZE_QUANTUM as f64).round() as i64,
        }
    }

    /// True when the size index is within `[0, MAX_SIZE_LOTS]`
    pub fn has_valid_size(&self) -> bool {
        (0..=MAX_SIZE_LOTS).contains(&self.size)
    }

    /// Map the bin back to dollar / share units
    ///
    /// Sizes are clamped to `[0, MAX_SIZE_LOTS]` lots.
    pub fn decode(&self) -> Outcome {
        Outcome {
            price_delta: self.dp as f64 * PRICE_DELTA_QUANTUM,
            spread: self.spread as f64 * SPREAD_QUANTUM,
            size: self.size.clamp(0, MAX_SIZE_LOTS) as u64 * SIZE_QUANTUM,
        }
    }
}

impl fmt::Display for OutcomeBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.dp, self.spread, self.size)
    }
}

impl FromStr for OutcomeBin {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        let [dp, spread, size] = fields.as_slice() else {
            return Err(KeyParseError::FieldCount {
                key: s.to_string(),
                expected: 3,
            });
        };
        let index = |field: &str| {
            field
                .parse::<i64>()
                .map_err(|_| KeyParseError::BinIndex(field.to_string()))
        };
        Ok(Self::new(index(dp)?, index(spread)?, index(size)?))
    }
}

/// One sampled tick update: price move, spread and total displayed size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub price_delta: f64,
    pub spread: f64,
    pub size: u64,
}

impl Outcome {
    /// Returned when the model has never seen the requested (regime, sign)
    pub const FALLBACK: Outcome = Outcome {
        price_delta: 0.0,
        spread: 0.01,
        size: 100,
    };
}
