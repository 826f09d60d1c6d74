//! # Access control policies for acperm
//!
//! The policy layer of the permissions engine: syntax-versioned policy
//! documents, the grammar of their labels, actions and resources, and the
//! canonical content hashing used to deduplicate statements.
//!
//! ## Features
//! - Closed set of syntax versions, each with its own grammar
//! - `Ok(false)` for invalid content, `Err` only when a check cannot run
//! - `*` wildcard strings with equality, matching and inclusion
//! - Order-independent stringification and SHA-256 content hashes
//! - Bundled JSON schema checked before typed decoding

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod grammar;
pub mod policy;
pub mod schema;
pub mod text;
pub mod validation;

// Re-export main types
pub use error::{PolicyError, Result};
pub use grammar::{AC_POLICY_TYPE, Grammar, PTI_POLICY_TYPE, PolicyVersion};
pub use policy::{
    AcPolicy, AcPolicyStatement, Action, ActionString, PolicyHeader, PolicyLabel, PolicyType,
    SyntaxVersion, Uur, UurString,
};
pub use schema::{AC_POLICY_SCHEMA, is_valid_json};
pub use text::{WildcardString, content_hash, string_hash, stringify};
pub use validation::{
    sanitize_ac_policy_statement, validate_ac_policy, validate_ac_policy_statement,
};

#[cfg(test)]
mod tests;
