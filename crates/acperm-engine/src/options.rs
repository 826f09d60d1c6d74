//! Options controlling how permissions are built

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PermissionsError, Result};

/// How [`crate::PermissionsEngine::build_permissions`] shapes its output
///
/// Missing keys take their default when loaded from YAML or JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionsEngineOptions {
    /// Normalize the state instead of returning it as registered
    pub enable_virtual_state: bool,

    /// Keep all actions of a resource in one statement
    pub virtual_state_view_combined: bool,
}

impl Default for PermissionsEngineOptions {
    fn default() -> Self {
        PermissionsEngineOptions {
            enable_virtual_state: true,
            virtual_state_view_combined: true,
        }
    }
}

impl PermissionsEngineOptions {
    /// Enable or disable virtualization
    pub fn with_virtual_state(mut self, enable: bool) -> Self {
        self.enable_virtual_state = enable;
        self
    }

    /// Choose between the combined and the one-action-per-statement view
    pub fn with_virtual_state_view_combined(mut self, combined: bool) -> Self {
        self.virtual_state_view_combined = combined;
        self
    }

    /// Load options from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load options from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a `.yaml`, `.yml` or `.json` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("json") => Self::from_json(&content),
            other => Err(PermissionsError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("unsupported options file extension: {:?}", other),
            ))),
        }
    }
}
