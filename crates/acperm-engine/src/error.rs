//! Error types for the permissions engine

use acperm_policy::PolicyError;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PermissionsError>;

/// Permissions engine error type
#[derive(Error, Debug)]
pub enum PermissionsError {
    /// Policy decoding or validation error
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    /// A virtualization stage met a statement it cannot handle
    #[error("Virtualization failed: {0}")]
    Virtualization(String),

    /// Identity cannot be used to look up policies
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PermissionsError {
    /// Create a virtualization error with context
    pub fn virtualization<S: Into<String>>(msg: S) -> Self {
        PermissionsError::Virtualization(msg.into())
    }
}
