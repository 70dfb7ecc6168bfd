//! Error types for oxdelta

use thiserror::Error;

/// Result type for oxdelta operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in oxdelta operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Hex string is not 3 or 6 hex digits with an optional `#`
    #[error("Invalid hex color: {0:?}")]
    InvalidHex(String),

    /// Name is not in the named color table
    #[error("Unknown color name: {0:?}")]
    UnknownColorName(String),

    /// RGB channel outside [0, 255]
    #[error("Channel {channel} out of range: {value}")]
    ChannelOutOfRange { channel: char, value: i64 },

    /// Buffer size mismatch
    #[error("Buffer size mismatch: expected {expected}, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// Index input contained NaN or infinite LAB coordinates
    #[error("Non-finite LAB coordinate for color #{position}")]
    NonFiniteCoordinate { position: usize },

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration JSON could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
