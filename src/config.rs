//! Codec configuration
//!
//! Limits and strictness switches shared by the container readers. Loaded
//! from JSON; every field has a default so partial files are accepted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WaveError};

/// Default ceiling on a single PCM payload (512 MiB)
pub const DEFAULT_MAX_DATA_BYTES: u64 = 512 * 1024 * 1024;

/// Reader configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Largest PCM payload a reader will allocate for
    pub max_data_bytes: u64,
    /// Reject RIFF files whose declared size runs past the end of the stream
    pub strict_riff_size: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_data_bytes: DEFAULT_MAX_DATA_BYTES,
            strict_riff_size: false,
        }
    }
}

impl CodecConfig {
    /// Load configuration from a JSON file
    ///
    /// # Errors
    /// * `FileNotFound` - if the file does not exist
    /// * `Config` - if the JSON is malformed
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(WaveError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check a declared payload size against `max_data_bytes`
    pub fn check_data_size(&self, size: u64) -> Result<()> {
        if size > self.max_data_bytes {
            return Err(WaveError::DataTooLarge {
                size,
                limit: self.max_data_bytes,
            });
        }
        Ok(())
    }
}
