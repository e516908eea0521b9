use serde::{Deserialize, Serialize};
use std::fmt;

/// Local extremum label of the mid-price series
///
/// "No pivot" is expressed as `Option::<Pivot>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pivot {
    /// Centre sample is the window maximum (PH)
    High,
    /// Centre sample is the window minimum (PL)
    Low,
}

impl fmt::Display for Pivot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pivot::High => write!(f, "PH"),
            Pivot::Low => write!(f, "PL"),
        }
    }
}
