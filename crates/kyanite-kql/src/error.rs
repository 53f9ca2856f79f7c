//! Error types for the KQL value model and codecs.

use thiserror::Error;

/// Result type for kyanite-kql operations.
pub type Result<T> = std::result::Result<T, KqlError>;

/// Errors produced while parsing or encoding KQL values.
#[derive(Debug, Error)]
pub enum KqlError {
    /// A JSON document could not be read or written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A cell or envelope payload did not match its declared type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A timespan string did not match `[-][d.]hh:mm:ss[.fffffff]`.
    #[error("invalid timespan {input:?}: {reason}")]
    InvalidTimespan { input: String, reason: String },

    /// A datetime string was not valid RFC 3339.
    #[error("invalid datetime {input:?}: {source}")]
    InvalidDateTime {
        input: String,
        source: chrono::ParseError,
    },

    /// A guid string was not 32 hex digits (hyphenated or raw).
    #[error("invalid guid: {0}")]
    InvalidGuid(String),

    /// A decimal token could not be parsed with full precision.
    #[error("invalid decimal {input:?}: {reason}")]
    InvalidDecimal { input: String, reason: String },

    /// A type-tagged envelope carried an unrecognized `type` name.
    #[error("unknown value type tag {0:?}")]
    UnknownTypeTag(String),
}
