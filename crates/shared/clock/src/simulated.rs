use chrono::Duration;
use obr_core::Timestamp;
use obr_ports::Clock;
use parking_lot::Mutex;

/// Clock whose time is controlled by the caller
///
/// In fixed mode the time only changes through [`advance`](Self::advance) or
/// [`set`](Self::set). In stepping mode every [`now`](Clock::now) call returns
/// the current time and then moves it forward by the configured step, so a
/// loop calling `update()` as fast as it can still sees one second per frame.
pub struct SimulatedClock {
    current: Mutex<Timestamp>,
    step: Option<Duration>,
}

impl SimulatedClock {
    /// Frozen clock starting at `start`
    pub fn fixed(start: Timestamp) -> Self {
        Self {
            current: Mutex::new(start),
            step: None,
        }
    }

    /// Clock that advances by `step` after every read
    pub fn stepping(start: Timestamp, step: Duration) -> Self {
        Self {
            current: Mutex::new(start),
            step: Some(step),
        }
    }

    /// Move time forward (or backward, for a negative duration)
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock();
        *current += by;
    }

    /// Jump to an absolute time
    pub fn set(&self, to: Timestamp) {
        *self.current.lock() = to;
    }

    /// Current time without consuming a step
    pub fn peek(&self) -> Timestamp {
        *self.current.lock()
    }
}

impl Clock for SimulatedClock {
    fn now(&self) -> Timestamp {
        let mut current = self.current.lock();
        let now = *current;
        if let Some(step) = self.step {
            *current += step;
        }
        now
    }

    fn name(&self) -> &str {
        "SimulatedClock"
    }
}
