//! Normalized view of a permissions state
//!
//! Each list goes through up to three stages:
//! 1. split every statement into one statement per resource
//! 2. merge the actions of statements sharing a resource
//! 3. when the view is not combined, split again into one statement per action
//!
//! The source state is only read; the result is a brand-new state.

use acperm_policy::{AcPolicyStatement, PolicyLabel, PolicyVersion, sanitize_ac_policy_statement};
use rustc_hash::FxHashMap;
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::{PermissionsError, Result},
    state::{
        AcPolicyStatementWrapper, ExtendedPermissionsState, PermissionsState, StatementMap,
        insert_wrapper,
    },
};

/// Builds the virtual view of a [`PermissionsState`]
pub struct PermissionsStateVirtualizer<'a> {
    syntax_version: PolicyVersion,
    state: &'a PermissionsState,
}

/// Fresh statement name that cannot clash with a user-chosen one in practice
fn synthetic_name() -> PolicyLabel {
    PolicyLabel::new(Uuid::new_v4().simple().to_string())
}

/// The single resource of a statement that went through the resource split
fn single_resource(statement: &AcPolicyStatement) -> Result<&str> {
    match statement.resources.as_slice() {
        [resource] => Ok(resource.as_str()),
        resources => Err(PermissionsError::virtualization(format!(
            "statement expected to carry one resource, found {}",
            resources.len()
        ))),
    }
}

impl<'a> PermissionsStateVirtualizer<'a> {
    /// Create a virtualizer reading from `state`
    pub fn new(syntax_version: PolicyVersion, state: &'a PermissionsState) -> Self {
        PermissionsStateVirtualizer {
            syntax_version,
            state,
        }
    }

    /// Produce the virtual state
    ///
    /// With `combined` each statement holds one resource and all of its
    /// actions, otherwise one resource and one action. Nothing is returned
    /// if any stage fails.
    pub fn virtualize(&self, combined: bool) -> Result<PermissionsState> {
        let forbid = self.virtualize_statements(self.state.forbid_map(), combined)?;
        let permit = self.virtualize_statements(self.state.permit_map(), combined)?;

        let mut output = PermissionsState::new();
        let mut ext = ExtendedPermissionsState::new(&mut output);
        ext.forbid_ac_policy_statements(&forbid)?;
        ext.permit_ac_policy_statements(&permit)?;
        Ok(output)
    }

    fn virtualize_statements(
        &self,
        wrappers: &StatementMap,
        combined: bool,
    ) -> Result<Vec<AcPolicyStatement>> {
        let split = self.split_by_resource(wrappers)?;
        let grouped = self.group_by_resource(split)?;
        let output = if combined {
            grouped
        } else {
            self.split_by_action(grouped)?
        };
        debug!(
            input = wrappers.len(),
            output = output.len(),
            combined,
            "statements virtualized"
        );
        Ok(output
            .into_values()
            .map(AcPolicyStatementWrapper::into_statement)
            .collect())
    }

    fn split_by_resource(&self, wrappers: &StatementMap) -> Result<StatementMap> {
        let mut output = StatementMap::default();
        for wrapper in wrappers.values() {
            let statement = wrapper.statement();
            for resource in &statement.resources {
                let mut copy = statement.clone();
                copy.name = synthetic_name();
                if copy.resources.len() > 1 {
                    copy.resources = vec![resource.clone()];
                }
                insert_wrapper(&mut output, AcPolicyStatementWrapper::new(copy)?);
            }
        }
        Ok(output)
    }

    // TODO: key by resource plus condition hash once statements carry conditions.
    fn group_by_resource(&self, wrappers: StatementMap) -> Result<StatementMap> {
        let mut groups: FxHashMap<String, AcPolicyStatement> = FxHashMap::default();
        for wrapper in wrappers.into_values() {
            let mut statement = wrapper.into_statement();
            single_resource(&statement)?;
            sanitize_ac_policy_statement(self.syntax_version, &mut statement);
            let key = single_resource(&statement)?.to_string();
            match groups.get_mut(&key) {
                Some(seed) => {
                    seed.actions.append(&mut statement.actions);
                    sanitize_ac_policy_statement(self.syntax_version, seed);
                }
                None => {
                    groups.insert(key, statement);
                }
            }
        }
        let mut output = StatementMap::default();
        for statement in groups.into_values() {
            insert_wrapper(&mut output, AcPolicyStatementWrapper::new(statement)?);
        }
        Ok(output)
    }

    fn split_by_action(&self, wrappers: StatementMap) -> Result<StatementMap> {
        let mut output = StatementMap::default();
        for wrapper in wrappers.values() {
            let statement = wrapper.statement();
            single_resource(statement)?;
            for action in &statement.actions {
                let mut copy = statement.clone();
                copy.name = synthetic_name();
                copy.actions = vec![action.clone()];
                insert_wrapper(&mut output, AcPolicyStatementWrapper::new(copy)?);
            }
        }
        Ok(output)
    }
}
