use thiserror::Error;

/// Errors raised when decoding the textual keys of a model table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("Unknown momentum token: {0}")]
    Momentum(String),

    #[error("Unknown breakout token: {0}")]
    Breakout(String),

    #[error("Unknown sign token: {0}")]
    Sign(String),

    #[error("Expected {expected} comma-separated fields in key '{key}'")]
    FieldCount { key: String, expected: usize },

    #[error("Invalid bin index '{0}'")]
    BinIndex(String),
}
