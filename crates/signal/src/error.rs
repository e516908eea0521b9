use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignalError {
    #[error("Invalid reaction config: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse reaction config: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, SignalError>;
