//! Permissions engine: registers policy documents and builds permissions

use acperm_policy::{
    AC_POLICY_SCHEMA, AcPolicy, PolicyError, PolicyHeader, PolicyVersion, is_valid_json,
    validate_ac_policy,
};
use tracing::debug;

use crate::{
    error::Result,
    options::PermissionsEngineOptions,
    state::{ExtendedPermissionsState, PermissionsState},
    virtualizer::PermissionsStateVirtualizer,
};

/// Accumulates policies into a permissions state
///
/// Registration mutates the engine; building hands out an independent state,
/// never the engine's own.
#[derive(Debug)]
pub struct PermissionsEngine {
    syntax_version: PolicyVersion,
    permissions_state: PermissionsState,
}

impl PermissionsEngine {
    /// Create an engine using the latest syntax version
    pub fn new() -> Self {
        Self::with_syntax_version(PolicyVersion::LATEST)
    }

    /// Create an engine using `syntax_version` for virtualization
    pub fn with_syntax_version(syntax_version: PolicyVersion) -> Self {
        PermissionsEngine {
            syntax_version,
            permissions_state: PermissionsState::new(),
        }
    }

    /// Syntax version used when building permissions
    pub fn syntax_version(&self) -> PolicyVersion {
        self.syntax_version
    }

    /// Register a JSON policy document
    ///
    /// The header is decoded first so that an unknown version or type is
    /// reported as such; the body is then checked against the schema before
    /// it is decoded into an [`AcPolicy`].
    pub fn register_policy(&mut self, data: &[u8]) -> Result<bool> {
        let header: PolicyHeader =
            serde_json::from_slice(data).map_err(|e| PolicyError::decode(e.to_string()))?;
        header.syntax.version()?;
        if !header.policy_type.is_ac() {
            return Err(PolicyError::UnsupportedType(header.policy_type.to_string()).into());
        }
        if !is_valid_json(AC_POLICY_SCHEMA, data)? {
            return Err(PolicyError::SchemaValidation.into());
        }
        let policy: AcPolicy =
            serde_json::from_slice(data).map_err(|e| PolicyError::decode(e.to_string()))?;
        self.register_ac_policy(&policy)
    }

    /// Register an already decoded access control policy
    ///
    /// Nothing is merged unless the whole policy validates.
    pub fn register_ac_policy(&mut self, policy: &AcPolicy) -> Result<bool> {
        if !policy.policy_type.is_ac() {
            return Err(PolicyError::UnsupportedType(policy.policy_type.to_string()).into());
        }
        if !validate_ac_policy(policy)? {
            return Err(PolicyError::invalid_data(format!(
                "policy '{}' failed validation",
                policy.name
            ))
            .into());
        }

        let mut ext = ExtendedPermissionsState::new(&mut self.permissions_state);
        if !policy.permit.is_empty() {
            ext.permit_ac_policy_statements(&policy.permit)?;
        }
        if !policy.forbid.is_empty() {
            ext.forbid_ac_policy_statements(&policy.forbid)?;
        }
        debug!(
            policy = %policy.name,
            permit = policy.permit.len(),
            forbid = policy.forbid.len(),
            "policy registered"
        );
        Ok(true)
    }

    /// Build the permissions registered so far
    pub fn build_permissions(&self, options: &PermissionsEngineOptions) -> Result<PermissionsState> {
        if options.enable_virtual_state {
            return PermissionsStateVirtualizer::new(self.syntax_version, &self.permissions_state)
                .virtualize(options.virtual_state_view_combined);
        }
        Ok(self.permissions_state.clone())
    }
}

impl Default for PermissionsEngine {
    fn default() -> Self {
        Self::new()
    }
}
