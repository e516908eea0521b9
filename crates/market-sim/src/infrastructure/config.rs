//! Configuration loading for the price model
//!
//! Supports JSON configuration files for:
//! - The quote model file location
//! - Starting prices and pivot window
//! - Regime / sign the generator is conditioned on
//! - Venue market shares and NBBO offset probabilities
//!
//! Every field has a default, so `{}` is a valid configuration.

use crate::error::{ConfigError, SimError};
use indexmap::IndexMap;
use obr_core::{ExchangeId, Regime, Sign};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration of a [`PriceModel`](crate::PriceModel)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// JSON quote model; absent or unreadable means an empty (flat) model
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// Starting best bid
    #[serde(default = "default_base_bid")]
    pub base_bid: f64,

    /// Starting spread; starting ask = base_bid + spread
    #[serde(default = "default_spread")]
    pub spread: f64,

    /// Pivot lookback in seconds; the buffer holds 2 * window + 1 samples
    #[serde(default = "default_window_seconds")]
    pub window_seconds: usize,

    /// Regime every simulated second is conditioned on
    #[serde(default)]
    pub regime: Regime,

    /// Sign of the "previous" move at the start of each second
    #[serde(default)]
    pub initial_sign: Sign,

    /// Seed for tick sampling (None = entropy)
    #[serde(default)]
    pub quote_seed: Option<u64>,

    /// Multi-exchange fan-out
    #[serde(default)]
    pub exchanges: ExchangeBookConfig,
}

fn default_base_bid() -> f64 {
    100.00
}

fn default_spread() -> f64 {
    0.02
}

/// Longest accepted pivot lookback: one day of seconds
pub const MAX_WINDOW_SECONDS: usize = 86_400;

fn default_window_seconds() -> usize {
    30
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            base_bid: default_base_bid(),
            spread: default_spread(),
            window_seconds: default_window_seconds(),
            regime: Regime::default(),
            initial_sign: Sign::default(),
            quote_seed: None,
            exchanges: ExchangeBookConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    pub fn with_window(mut self, window_seconds: usize) -> Self {
        self.window_seconds = window_seconds;
        self
    }

    pub fn with_seeds(mut self, quote_seed: u64, exchange_seed: u64) -> Self {
        self.quote_seed = Some(quote_seed);
        self.exchanges.seed = Some(exchange_seed);
        self
    }

    /// Starting best ask
    pub fn base_ask(&self) -> f64 {
        self.base_bid + self.spread
    }

    /// Reject starting prices the generator cannot work from
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.base_bid.is_finite() || self.base_bid <= 0.0 {
            return Err(SimError::Configuration(format!(
                "base_bid must be a positive price, got {}",
                self.base_bid
            )));
        }
        if self.window_seconds > MAX_WINDOW_SECONDS {
            return Err(SimError::Configuration(format!(
                "window_seconds must be at most {}, got {}",
                MAX_WINDOW_SECONDS, self.window_seconds
            )));
        }
        if !self.spread.is_finite() || self.spread < 0.0 {
            return Err(SimError::Configuration(format!(
                "spread must be non-negative, got {}",
                self.spread
            )));
        }
        Ok(())
    }
}

/// Venue shares, offset probabilities and seed of the exchange fan-out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeBookConfig {
    /// Venue -> market share; normalised internally, must sum > 0
    #[serde(default = "default_shares")]
    pub shares: IndexMap<ExchangeId, f64>,

    /// Tick offset from NBBO -> probability; normalised internally
    #[serde(default = "default_offsets")]
    pub offsets: IndexMap<i32, f64>,

    /// Seed of the fan-out RNG (None = entropy)
    #[serde(default = "default_exchange_seed")]
    pub seed: Option<u64>,
}

fn default_shares() -> IndexMap<ExchangeId, f64> {
    [
        ("NSDQ", 0.30),
        ("ARCA", 0.18),
        ("BATS", 0.10),
        ("BATY", 0.06),
        ("EDGA", 0.03),
        ("EDGX", 0.07),
        ("IEXG", 0.05),
        ("AMEX", 0.03),
        ("NYSE", 0.12),
        ("PHLX", 0.01),
        ("MEMX", 0.03),
        ("MIAX", 0.01),
        // marginal volume, kept for variety
        ("BOSX", 0.00),
        ("LTSE", 0.01),
    ]
    .into_iter()
    .map(|(venue, share)| (venue.to_string(), share))
    .collect()
}

fn default_offsets() -> IndexMap<i32, f64> {
    [(0, 0.35), (1, 0.30), (-1, 0.20), (2, 0.10), (-2, 0.05)]
        .into_iter()
        .collect()
}

fn default_exchange_seed() -> Option<u64> {
    Some(42)
}

impl Default for ExchangeBookConfig {
    fn default() -> Self {
        Self {
            shares: default_shares(),
            offsets: default_offsets(),
            seed: default_exchange_seed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obr_core::{Breakout, Momentum};

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = SimulationConfig::from_json("{}").unwrap();
        assert_eq!(config.base_bid, 100.00);
        assert_eq!(config.spread, 0.02);
        assert_eq!(config.window_seconds, 30);
        assert_eq!(config.regime, Regime::default());
        assert_eq!(config.initial_sign, Sign::Flat);
        assert!(config.model_path.is_none());
        assert_eq!(config.exchanges.shares.len(), 14);
        assert_eq!(config.exchanges.seed, Some(42));
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_overrides() {
        let json = r#"{
            "model_path": "models/model.json",
            "window_seconds": 5,
            "regime": "M,B",
            "initial_sign": "U",
            "quote_seed": 7,
            "exchanges": { "shares": { "A": 1.0, "B": 3.0 }, "offsets": { "0": 1.0 }, "seed": null }
        }"#;
        let config = SimulationConfig::from_json(json).unwrap();

        assert_eq!(config.model_path, Some(PathBuf::from("models/model.json")));
        assert_eq!(config.window_seconds, 5);
        assert_eq!(config.regime, Regime::new(Momentum::Trending, Breakout::NearLevel));
        assert_eq!(config.initial_sign, Sign::Up);
        assert_eq!(config.quote_seed, Some(7));
        assert_eq!(config.exchanges.shares.len(), 2);
        assert_eq!(config.exchanges.offsets.get(&0), Some(&1.0));
        assert_eq!(config.exchanges.seed, None);
    }

    #[test]
    fn test_bad_regime_token_rejected() {
        let err = SimulationConfig::from_json(r#"{ "regime": "X,O" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validate_rejects_negative_spread() {
        let config = SimulationConfig {
            spread: -0.01,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SimError::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_oversized_window() {
        let config = SimulationConfig::from_json(r#"{ "window_seconds": 18446744073709551615 }"#).unwrap();
        assert!(matches!(config.validate(), Err(SimError::Configuration(_))));

        let config = SimulationConfig::default().with_window(MAX_WINDOW_SECONDS + 1);
        assert!(config.validate().is_err());

        SimulationConfig::default()
            .with_window(MAX_WINDOW_SECONDS)
            .validate()
            .unwrap();
    }

    #[test]
    fn test_missing_file() {
        let err = SimulationConfig::from_file("/nonexistent/sim.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
