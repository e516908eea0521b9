//! Domain layer: pure buffering and pivot logic

mod pivot;
mod rolling;

pub use pivot::{MidSample, PivotDetection, PivotDetector};
pub use rolling::RollingBuffer;
