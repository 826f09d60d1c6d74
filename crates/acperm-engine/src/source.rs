//! Where policy documents come from
//!
//! The engine only ever sees bytes. A [`PolicySource`] resolves an identity
//! into the policy documents attached to it, and
//! [`PermissionsEngine::register_policies_from`] feeds them in one by one.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::{
    engine::PermissionsEngine,
    error::{PermissionsError, Result},
};

/// Lookup from an identity to the policy documents attached to it
pub trait PolicySource {
    /// Policy documents for `identity`, in registration order
    fn policies(&self, identity: &str) -> Result<Vec<Vec<u8>>>;
}

/// Policy documents held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryPolicySource {
    entries: FxHashMap<String, Vec<Vec<u8>>>,
}

impl MemoryPolicySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a document to `identity`
    pub fn insert(&mut self, identity: impl Into<String>, policy: impl Into<Vec<u8>>) -> &mut Self {
        self.entries
            .entry(identity.into())
            .or_default()
            .push(policy.into());
        self
    }
}

impl PolicySource for MemoryPolicySource {
    fn policies(&self, identity: &str) -> Result<Vec<Vec<u8>>> {
        Ok(self.entries.get(identity).cloned().unwrap_or_default())
    }
}

/// Policy documents stored as `<root>/<identity>/*.json`
#[derive(Debug, Clone)]
pub struct DirectoryPolicySource {
    root: PathBuf,
}

impl DirectoryPolicySource {
    /// Create a source reading below `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        DirectoryPolicySource {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn identity_dir(&self, identity: &str) -> Result<PathBuf> {
        let is_plain = !identity.is_empty()
            && identity != "."
            && identity != ".."
            && !identity.contains(['/', '\\']);
        if !is_plain {
            return Err(PermissionsError::InvalidIdentity(identity.to_string()));
        }
        Ok(self.root.join(identity))
    }
}

impl PolicySource for DirectoryPolicySource {
    fn policies(&self, identity: &str) -> Result<Vec<Vec<u8>>> {
        let dir = self.identity_dir(identity)?;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut paths = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        paths.sort();
        debug!(identity, count = paths.len(), "policy files found");
        paths
            .into_iter()
            .map(|path| fs::read(path).map_err(PermissionsError::from))
            .collect()
    }
}

/// Outcome of registering every document of an identity
#[derive(Debug, Default)]
pub struct RegistrationReport {
    /// Number of documents registered
    pub registered: usize,
    /// Position and error of each rejected document
    pub failures: Vec<(usize, PermissionsError)>,
}

impl RegistrationReport {
    /// Whether every document was registered
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl PermissionsEngine {
    /// Register every policy of `identity` found in `source`
    ///
    /// A rejected document is skipped and recorded in the report; the others
    /// are still registered. Failing to read the source is an error.
    pub fn register_policies_from<S: PolicySource + ?Sized>(
        &mut self,
        source: &S,
        identity: &str,
    ) -> Result<RegistrationReport> {
        let mut report = RegistrationReport::default();
        for (index, policy) in source.policies(identity)?.iter().enumerate() {
            match self.register_policy(policy) {
                Ok(_) => report.registered += 1,
                Err(err) => {
                    warn!(identity, index, error = %err, "policy skipped");
                    report.failures.push((index, err));
                }
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_keeps_order() {
        let mut source = MemoryPolicySource::new();
        source.insert("alice", "first").insert("alice", "second");
        let policies = source.policies("alice").unwrap();
        assert_eq!(policies, vec![b"first".to_vec(), b"second".to_vec()]);
        assert!(source.policies("bob").unwrap().is_empty());
    }

    #[test]
    fn test_directory_source_rejects_path_like_identities() {
        let source = DirectoryPolicySource::new("/nonexistent");
        for identity in ["", ".", "..", "a/b", "..\\x"] {
            assert!(matches!(
                source.policies(identity),
                Err(PermissionsError::InvalidIdentity(_))
            ));
        }
        assert!(source.policies("alice").unwrap().is_empty());
    }
}
