use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read model file {path}: {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse model: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
