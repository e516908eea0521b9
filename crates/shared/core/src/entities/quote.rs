use crate::values::{ExchangeId, Timestamp};
use serde::{Deserialize, Serialize};

/// One venue's level-1 contribution to a multi-exchange snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub timestamp: Timestamp,
    pub exchange: ExchangeId,
    pub bid_price: f64,
    pub bid_size: u64,
    pub ask_price: f64,
    pub ask_size: u64,
}
