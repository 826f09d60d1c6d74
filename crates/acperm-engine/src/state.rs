//! Consolidated permit/forbid statements keyed by content hash

use acperm_policy::{AcPolicyStatement, PolicyLabel, content_hash, stringify, string_hash};
use rustc_hash::FxHashMap;
use tracing::trace;
use uuid::Uuid;

use crate::error::Result;

/// Fields left out of a statement's content identity
const IDENTITY_EXCLUDED_KEYS: &[&str] = &["Name"];

/// Statement together with its canonical form and content hash
#[derive(Debug, Clone)]
pub struct AcPolicyStatementWrapper {
    id: Uuid,
    statement: AcPolicyStatement,
    stringified: String,
    content_hash: String,
}

impl AcPolicyStatementWrapper {
    /// Wrap `statement`, computing its content hash
    pub fn new(statement: AcPolicyStatement) -> Result<Self> {
        let stringified = stringify(&statement, IDENTITY_EXCLUDED_KEYS)?;
        let content_hash = string_hash(&stringified);
        Ok(AcPolicyStatementWrapper {
            id: Uuid::new_v4(),
            statement,
            stringified,
            content_hash,
        })
    }

    /// Unique id of this wrapper instance
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Name of the wrapped statement
    pub fn name(&self) -> &PolicyLabel {
        &self.statement.name
    }

    /// The wrapped statement
    pub fn statement(&self) -> &AcPolicyStatement {
        &self.statement
    }

    /// Canonical string the hash is computed from
    pub fn stringified(&self) -> &str {
        &self.stringified
    }

    /// Content hash, equal for statements with the same actions and resources
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    pub(crate) fn into_statement(self) -> AcPolicyStatement {
        self.statement
    }
}

/// Map from content hash to statement wrapper
pub(crate) type StatementMap = FxHashMap<String, AcPolicyStatementWrapper>;

/// Insert `wrapper` unless a statement with the same content is present
///
/// Returns whether the wrapper was inserted.
pub(crate) fn insert_wrapper(target: &mut StatementMap, wrapper: AcPolicyStatementWrapper) -> bool {
    if target.contains_key(wrapper.content_hash()) {
        trace!(hash = wrapper.content_hash(), "duplicate statement skipped");
        return false;
    }
    target.insert(wrapper.content_hash.clone(), wrapper);
    true
}

fn merge_statements(target: &mut StatementMap, statements: &[AcPolicyStatement]) -> Result<()> {
    for statement in statements {
        let wrapper = AcPolicyStatementWrapper::new(statement.clone())?;
        insert_wrapper(target, wrapper);
    }
    Ok(())
}

fn sorted_by_hash(source: &StatementMap) -> Vec<AcPolicyStatementWrapper> {
    let mut items: Vec<AcPolicyStatementWrapper> = source.values().cloned().collect();
    items.sort_by(|a, b| a.content_hash.cmp(&b.content_hash));
    items
}

/// Forbidden and permitted statements, each deduplicated by content
///
/// Cloning copies every wrapper, so a clone shares nothing with its source.
#[derive(Debug, Clone, Default)]
pub struct PermissionsState {
    forbid: StatementMap,
    permit: StatementMap,
}

impl PermissionsState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Forbidden statements sorted by content hash
    pub fn ac_forbidden_permissions(&self) -> Vec<AcPolicyStatementWrapper> {
        sorted_by_hash(&self.forbid)
    }

    /// Permitted statements sorted by content hash
    pub fn ac_permitted_permissions(&self) -> Vec<AcPolicyStatementWrapper> {
        sorted_by_hash(&self.permit)
    }

    /// Whether a forbidden statement with `hash` exists
    pub fn is_forbidden(&self, hash: &str) -> bool {
        self.forbid.contains_key(hash)
    }

    /// Whether a permitted statement with `hash` exists
    pub fn is_permitted(&self, hash: &str) -> bool {
        self.permit.contains_key(hash)
    }

    /// Whether neither list holds a statement
    pub fn is_empty(&self) -> bool {
        self.forbid.is_empty() && self.permit.is_empty()
    }

    pub(crate) fn forbid_map(&self) -> &StatementMap {
        &self.forbid
    }

    pub(crate) fn permit_map(&self) -> &StatementMap {
        &self.permit
    }
}

/// Write access to a [`PermissionsState`]
///
/// The only way statements get into a state.
pub struct ExtendedPermissionsState<'a> {
    state: &'a mut PermissionsState,
}

impl<'a> ExtendedPermissionsState<'a> {
    /// Borrow `state` for writing
    pub fn new(state: &'a mut PermissionsState) -> Self {
        ExtendedPermissionsState { state }
    }

    /// Merge statements into the permit list
    pub fn permit_ac_policy_statements(&mut self, statements: &[AcPolicyStatement]) -> Result<()> {
        merge_statements(&mut self.state.permit, statements)
    }

    /// Merge statements into the forbid list
    pub fn forbid_ac_policy_statements(&mut self, statements: &[AcPolicyStatement]) -> Result<()> {
        merge_statements(&mut self.state.forbid, statements)
    }
}

/// Content hash a statement would get once wrapped
pub fn statement_hash(statement: &AcPolicyStatement) -> Result<String> {
    Ok(content_hash(statement, IDENTITY_EXCLUDED_KEYS)?)
}
