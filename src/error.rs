//! Error handling for wavekit
//!
//! Every parse and transform failure maps to one `WaveError` variant. Errors
//! carry a stable code and recovery suggestions so front ends can report them
//! without matching on message text.

use thiserror::Error;

/// Result type alias for wavekit operations
pub type Result<T> = std::result::Result<T, WaveError>;

/// Main error type for wavekit operations
#[derive(Error, Debug)]
pub enum WaveError {
    // Container Errors
    #[error("Bad magic number: expected '{expected}', found '{found}'")]
    BadMagic { expected: String, found: String },

    #[error("Unexpected form type '{found}'")]
    BadFormType { found: String },

    #[error("Chunk '{id}' is undersized ({size} bytes)")]
    UndersizedChunk { id: String, size: u64 },

    #[error("Required chunk '{id}' not found")]
    MissingChunk { id: String },

    #[error("Size mismatch: expected {expected} bytes, found {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("Declared data size {size} exceeds the configured limit of {limit} bytes")]
    DataTooLarge { size: u64, limit: u64 },

    // Format Errors
    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("{operation} does not support {bits_per_sample}-bit samples")]
    UnsupportedTransform {
        operation: &'static str,
        bits_per_sample: u16,
    },

    // File Errors
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration Errors
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl WaveError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            WaveError::BadMagic { .. } => "BAD_MAGIC",
            WaveError::BadFormType { .. } => "BAD_FORM_TYPE",
            WaveError::UndersizedChunk { .. } => "UNDERSIZED_CHUNK",
            WaveError::MissingChunk { .. } => "MISSING_CHUNK",
            WaveError::SizeMismatch { .. } => "SIZE_MISMATCH",
            WaveError::DataTooLarge { .. } => "DATA_TOO_LARGE",
            WaveError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            WaveError::UnsupportedTransform { .. } => "UNSUPPORTED_TRANSFORM",
            WaveError::FileNotFound { .. } => "FILE_NOT_FOUND",
            WaveError::Io(_) => "IO_ERROR",
            WaveError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Check if the error describes a malformed container (as opposed to an
    /// environment or capability problem)
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            WaveError::BadMagic { .. }
                | WaveError::BadFormType { .. }
                | WaveError::UndersizedChunk { .. }
                | WaveError::MissingChunk { .. }
                | WaveError::SizeMismatch { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            WaveError::BadMagic { .. } | WaveError::BadFormType { .. } => vec![
                "Run 'wavekit-cli sniff <file>' to detect the actual container type",
                "The file extension may not match its contents",
            ],
            WaveError::UndersizedChunk { .. } | WaveError::SizeMismatch { .. } => vec![
                "The file may be truncated - try re-exporting from source",
                "Check that the transfer or download completed",
            ],
            WaveError::MissingChunk { .. } => vec![
                "The file is missing required header data",
                "Re-export the file with a standard-compliant encoder",
            ],
            WaveError::DataTooLarge { .. } => vec![
                "Raise 'max_data_bytes' in the codec configuration",
                "The declared size may be corrupt",
            ],
            WaveError::UnsupportedFormat { .. } => vec![
                "Convert to uncompressed PCM WAV or AIFF first",
                "Supported formats: PCM WAV, AIFF, uncompressed AIFF-C",
            ],
            WaveError::UnsupportedTransform { .. } => vec![
                "Only 8-bit and 16-bit buffers support reverse/mono/stereo transforms",
            ],
            WaveError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Verify the file hasn't been moved or deleted",
            ],
            _ => vec![],
        }
    }
}
