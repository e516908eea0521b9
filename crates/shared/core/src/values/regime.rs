//! Conditioning keys of the transition table
//!
//! The model is indexed by a market regime (momentum × breakout) and by the
//! sign of the last price move. Both have a one-letter textual token used by
//! the serialized model ("N,O" for a regime, "N,O,F" for a transition key).

use crate::error::KeyParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Is the price currently trending?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Momentum {
    /// `M`: EWMA of |Δp| above one cent
    Trending,
    /// `N`: no momentum
    Calm,
}

impl Momentum {
    pub fn token(&self) -> char {
        match self {
            Momentum::Trending => 'M',
            Momentum::Calm => 'N',
        }
    }
}

impl FromStr for Momentum {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "M" => Ok(Momentum::Trending),
            "N" => Ok(Momentum::Calm),
            other => Err(KeyParseError::Momentum(other.to_string())),
        }
    }
}

/// Is the mid sitting close to a round dollar or half-dollar level?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Breakout {
    /// `B`: within one cent of a .00 / .50 level
    NearLevel,
    /// `O`: away from psychological levels
    Away,
}

impl Breakout {
    pub fn token(&self) -> char {
        match self {
            Breakout::NearLevel => 'B',
            Breakout::Away => 'O',
        }
    }
}

impl FromStr for Breakout {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "B" => Ok(Breakout::NearLevel),
            "O" => Ok(Breakout::Away),
            other => Err(KeyParseError::Breakout(other.to_string())),
        }
    }
}

/// Market condition bucket conditioning the statistical model
///
/// Serialized as its textual key, e.g. `"N,O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Regime {
    pub momentum: Momentum,
    pub breakout: Breakout,
}

impl Regime {
    pub const fn new(momentum: Momentum, breakout: Breakout) -> Self {
        Self { momentum, breakout }
    }
}

impl Default for Regime {
    /// `N,O`: boring, normal conditions
    fn default() -> Self {
        Self::new(Momentum::Calm, Breakout::Away)
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.momentum.token(), self.breakout.token())
    }
}

impl FromStr for Regime {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(',').collect();
        match fields.as_slice() {
            [momentum, breakout] => Ok(Self::new(momentum.parse()?, breakout.parse()?)),
            _ => Err(KeyParseError::FieldCount {
                key: s.to_string(),
                expected: 2,
            }),
        }
    }
}

impl TryFrom<String> for Regime {
    type Error = KeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Regime> for String {
    fn from(regime: Regime) -> Self {
        regime.to_string()
    }
}

/// Direction of the most recent price move
///
/// Serialized as its one-letter token, e.g. `"F"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sign {
    Up,
    Down,
    #[default]
    Flat,
}

impl Sign {
    /// Sign of a price change
    pub fn of(delta: f64) -> Self {
        if delta > 0.0 {
            Sign::Up
        } else if delta < 0.0 {
            Sign::Down
        } else {
            Sign::Flat
        }
    }

    pub fn token(&self) -> char {
        match self {
            Sign::Up => 'U',
            Sign::Down => 'D',
            Sign::Flat => 'F',
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for Sign {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "U" => Ok(Sign::Up),
            "D" => Ok(Sign::Down),
            "F" => Ok(Sign::Flat),
            other => Err(KeyParseError::Sign(other.to_string())),
        }
    }
}

impl TryFrom<String> for Sign {
    type Error = KeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Sign> for String {
    fn from(sign: Sign) -> Self {
        sign.to_string()
    }
}

/// Row key of the transition table: (regime, sign)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransitionKey {
    pub regime: Regime,
    pub sign: Sign,
}

impl TransitionKey {
    pub const fn new(regime: Regime, sign: Sign) -> Self {
        Self { regime, sign }
    }
}

impl fmt::Display for TransitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.regime, self.sign)
    }
}

impl FromStr for TransitionKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(',').collect();
        match fields.as_slice() {
            [momentum, breakout, sign] => Ok(Self::new(
                Regime::new(momentum.parse()?, breakout.parse()?),
                sign.parse()?,
            )),
            _ => Err(KeyParseError::FieldCount {
                key: s.to_string(),
                expected: 3,
            }),
        }
    }
}
