use crate::values::Timestamp;
use serde::{Deserialize, Serialize};

/// Synthetic NBBO update
///
/// Produced transiently by the quote generator; prices are rounded to the
/// cent, sizes are in shares.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub timestamp: Timestamp,
    pub bid_price: f64,
    pub ask_price: f64,
    pub bid_size: u64,
    pub ask_size: u64,
}

impl Tick {
    pub fn mid(&self) -> f64 {
        (self.bid_price + self.ask_price) / 2.0
    }

    pub fn spread(&self) -> f64 {
        self.ask_price - self.bid_price
    }
}
