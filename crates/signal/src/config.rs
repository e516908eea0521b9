use crate::error::{Result, SignalError};
use serde::{Deserialize, Serialize};

/// Reaction window tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactionConfig {
    /// Starting reaction window in seconds
    #[serde(default = "default_initial_window")]
    pub initial_window: f64,

    /// Floor the window never shrinks below, in seconds
    #[serde(default = "default_min_window")]
    pub min_window: f64,

    /// Multiplier applied on each tightening step
    #[serde(default = "default_decrease_factor")]
    pub decrease_factor: f64,

    /// Number of most recent reactions the success rate is measured on
    #[serde(default = "default_evaluation_span")]
    pub evaluation_span: usize,

    /// Success rate at or above which the window tightens
    #[serde(default = "default_success_threshold")]
    pub success_threshold: f64,
}

fn default_initial_window() -> f64 {
    1.0
}

fn default_min_window() -> f64 {
    0.12
}

fn default_decrease_factor() -> f64 {
    0.90
}

fn default_evaluation_span() -> usize {
    20
}

fn default_success_threshold() -> f64 {
    0.80
}

impl Default for ReactionConfig {
    fn default() -> Self {
        Self {
            initial_window: default_initial_window(),
            min_window: default_min_window(),
            decrease_factor: default_decrease_factor(),
            evaluation_span: default_evaluation_span(),
            success_threshold: default_success_threshold(),
        }
    }
}

impl ReactionConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| SignalError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min_window > 0.0 && self.min_window <= self.initial_window) {
            return Err(SignalError::InvalidConfig(format!(
                "need 0 < min_window <= initial_window, got {} and {}",
                self.min_window, self.initial_window
            )));
        }
        if !(self.decrease_factor > 0.0 && self.decrease_factor <= 1.0) {
            return Err(SignalError::InvalidConfig(format!(
                "decrease_factor must be in (0, 1], got {}",
                self.decrease_factor
            )));
        }
        if self.evaluation_span == 0 {
            return Err(SignalError::InvalidConfig("evaluation_span must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.success_threshold) {
            return Err(SignalError::InvalidConfig(format!(
                "success_threshold must be in [0, 1], got {}",
                self.success_threshold
            )));
        }
        Ok(())
    }
}
