use chrono::Utc;
use obr_core::Timestamp;
use obr_ports::Clock;

/// Wall-clock time source
///
/// The interactive trainer advances one simulated second per real second,
/// so `PriceModel` reads this clock and truncates to the second.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}
