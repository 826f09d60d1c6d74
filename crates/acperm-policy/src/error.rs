//! Error types for the policy model

use thiserror::Error;

/// Result type alias for policy operations
pub type Result<T> = std::result::Result<T, PolicyError>;

/// Main error type for policy operations
///
/// Validators never use these to report that a document is merely invalid:
/// that answer is `Ok(false)`. An error means the question could not be
/// answered at all.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// Policy bytes are empty or not well-formed JSON
    #[error("Failed to decode policy data: {0}")]
    Decode(String),

    /// Policy bytes were rejected by the bundled JSON schema
    #[error("Policy data does not match the policy schema")]
    SchemaValidation,

    /// The JSON schema itself could not be loaded
    #[error("Invalid policy schema: {0}")]
    Schema(String),

    /// Syntax version is not one this crate understands
    #[error("Unsupported policy syntax version: {0}")]
    UnsupportedVersion(String),

    /// Policy type is not supported by the caller
    #[error("Unsupported policy type: {0}")]
    UnsupportedType(String),

    /// Policy content failed semantic validation
    #[error("Invalid policy data: {0}")]
    InvalidData(String),

    /// Action string does not follow the action grammar
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Resource string does not follow the UUR grammar
    #[error("Invalid UUR: {0}")]
    InvalidUur(String),

    /// Value could not be rendered into its canonical string form
    #[error("Failed to stringify value: {0}")]
    Stringify(String),

    /// Pattern compilation error
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PolicyError {
    /// Create a decode error with context
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        PolicyError::Decode(msg.into())
    }

    /// Create an invalid data error with context
    pub fn invalid_data<S: Into<String>>(msg: S) -> Self {
        PolicyError::InvalidData(msg.into())
    }

    /// Create a stringify error with context
    pub fn stringify<S: Into<String>>(msg: S) -> Self {
        PolicyError::Stringify(msg.into())
    }
}
