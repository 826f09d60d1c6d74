//! # Permissions engine for acperm
//!
//! Merges access control policies into a permit/forbid state and, on
//! request, rewrites that state into a normalized view for fast lookups.
//!
//! ## Features
//! - Statements deduplicated by content, whatever their names
//! - Deterministic, hash-sorted exports
//! - Virtualized view, combined or one action per statement
//! - Pluggable policy sources keyed by identity

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod engine;
pub mod error;
pub mod options;
pub mod source;
pub mod state;
pub mod virtualizer;

// Re-export main types
pub use engine::PermissionsEngine;
pub use error::{PermissionsError, Result};
pub use options::PermissionsEngineOptions;
pub use source::{DirectoryPolicySource, MemoryPolicySource, PolicySource, RegistrationReport};
pub use state::{
    AcPolicyStatementWrapper, ExtendedPermissionsState, PermissionsState, statement_hash,
};
pub use virtualizer::PermissionsStateVirtualizer;
