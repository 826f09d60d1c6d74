//! JSON schema gate run before a policy document is decoded into its types

use serde_json::Value;
use tracing::debug;

use crate::error::{PolicyError, Result};

/// JSON schema of access control policies
pub const AC_POLICY_SCHEMA: &[u8] = include_bytes!("../data/ac-policy-schema.json");

/// Check `data` against `schema`
///
/// `Ok(false)` means the document was read and does not conform. Errors are
/// reserved for an unreadable schema or bytes that are not JSON at all.
pub fn is_valid_json(schema: &[u8], data: &[u8]) -> Result<bool> {
    let schema: Value =
        serde_json::from_slice(schema).map_err(|e| PolicyError::Schema(e.to_string()))?;
    let instance: Value =
        serde_json::from_slice(data).map_err(|e| PolicyError::decode(e.to_string()))?;
    let validator =
        jsonschema::validator_for(&schema).map_err(|e| PolicyError::Schema(e.to_string()))?;

    if validator.is_valid(&instance) {
        return Ok(true);
    }
    debug!("document rejected by schema");
    Ok(false)
}
