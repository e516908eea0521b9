//! OBR Ports
//!
//! Port definitions (traits) for the synthetic quote engine.
//! These define the boundaries between simulation logic and infrastructure.

mod clock;

pub use clock::Clock;
