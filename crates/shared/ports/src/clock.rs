use obr_core::Timestamp;

/// Port for time abstraction
///
/// This allows the simulation to use different time sources:
/// - Real system time for the interactive loop
/// - Manually advanced time for fast-forward runs
/// - Fixed time for deterministic tests
pub trait Clock: Send + Sync {
    /// Get the current time according to this clock
    fn now(&self) -> Timestamp;

    /// Get the clock's name/identifier for debugging
    fn name(&self) -> &str {
        "Clock"
    }
}
