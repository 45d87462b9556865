//! Error types for declaration loading and registration.
//!
//! All failures are detected at load time and surfaced to the operator
//! before the external scheduler sees any declaration. None are retried.

use thiserror::Error;

/// Unified error type for declaration operations.
#[derive(Debug, Error)]
pub enum DeclarationError {
    /// A declaration field failed validation
    #[error("invalid field `{field}`: {reason}")]
    Validation { field: String, reason: String },

    /// A cron expression did not conform to the 5-field grammar
    #[error("invalid cron expression `{expr}`: {reason}")]
    Schedule { expr: String, reason: String },

    /// The registry rejected a declaration under strict uniqueness
    #[error("job `{0}` is already registered")]
    DuplicateName(String),

    /// Malformed JSON in a declaration file
    #[error("malformed declaration file: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed TOML in a declaration file
    #[error("malformed declaration file: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error reading a declaration file
    #[error("failed to read declaration file: {0}")]
    Io(#[from] std::io::Error),

    /// An environment variable referenced by the file is not set
    #[error("environment variable not set: {0}")]
    EnvVarNotSet(String),
}

impl DeclarationError {
    /// Build a `Validation` error for a named field.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Build a `Schedule` error for a cron expression.
    pub fn schedule(expr: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schedule {
            expr: expr.into(),
            reason: reason.into(),
        }
    }
}
