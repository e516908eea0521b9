//! OBR Clock Infrastructure
//!
//! Provides time sources for the simulation:
//!
//! - [`SystemClock`]: wall-clock time, what the interactive loop uses
//! - [`SimulatedClock`]: time that only moves when told to, or by a fixed
//!   step on every read (fast-forward replay, deterministic tests)
//!
//! ## Usage
//!
//! ```ignore
//! use obr_clock::{Clock, SimulatedClock};
//! use chrono::Duration;
//!
//! // One simulated second per read
//! let clock = SimulatedClock::stepping(start, Duration::seconds(1));
//! let t0 = clock.now();
//! let t1 = clock.now();
//! assert_eq!(t1 - t0, Duration::seconds(1));
//! ```

mod simulated;
mod system;

pub use simulated::SimulatedClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use obr_ports::Clock;
