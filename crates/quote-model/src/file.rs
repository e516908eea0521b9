//! On-disk model format
//!
//! ```json
//! {
//!   "transition": { "N,O,F": { "1,2,3": 12, "0,1,2": 40 } },
//!   "ticks_per_regime": { "N,O": 5234 },
//!   "seconds_per_regime": { "N,O": 3600 }
//! }
//! ```
//!
//! Keys stay as strings at this boundary; [`QuoteModel`](crate::QuoteModel)
//! turns them into typed composite keys.

use crate::error::{ModelError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serialized form of a [`QuoteModel`](crate::QuoteModel)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    /// `"r0,r1,sign"` -> (`"dp,spread,size"` -> weight)
    #[serde(default)]
    pub transition: IndexMap<String, IndexMap<String, f64>>,

    /// `"r0,r1"` -> observed tick count
    #[serde(default)]
    pub ticks_per_regime: IndexMap<String, f64>,

    /// `"r0,r1"` -> observed seconds
    #[serde(default)]
    pub seconds_per_regime: IndexMap<String, f64>,
}

impl ModelFile {
    /// Load a model file from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ModelError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse a model file from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ModelError::Parse(e.to_string()))
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ModelError::Parse(e.to_string()))
    }

    /// Write as pretty-printed JSON, creating parent directories
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let io_error = |e: std::io::Error| ModelError::Io {
            path: path.display().to_string(),
            error: e.to_string(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(path, self.to_json()?).map_err(io_error)
    }
}
