//! Semantic validation and sanitization of access control policies
//!
//! Every validator answers `Ok(false)` when the input was checked and does
//! not qualify, and `Err` only when the check itself could not run.

use std::collections::BTreeSet;

use crate::{
    error::Result,
    grammar::PolicyVersion,
    policy::{AcPolicy, AcPolicyStatement},
};

fn sorted_unique<T: Ord>(items: Vec<T>) -> Vec<T> {
    items.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Sort and deduplicate the actions and resources of `statement` in place
pub fn sanitize_ac_policy_statement(_version: PolicyVersion, statement: &mut AcPolicyStatement) {
    statement.actions = sorted_unique(std::mem::take(&mut statement.actions));
    statement.resources = sorted_unique(std::mem::take(&mut statement.resources));
}

/// Validate the name, actions and resources of `statement`, in that order
pub fn validate_ac_policy_statement(
    version: PolicyVersion,
    statement: &AcPolicyStatement,
) -> Result<bool> {
    if !statement.name.is_valid(version)? {
        return Ok(false);
    }
    for action in &statement.actions {
        if !action.is_valid(version)? {
            return Ok(false);
        }
    }
    for resource in &statement.resources {
        if !resource.is_valid(version)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Validate a whole access control policy
///
/// An unknown syntax version or a type other than `AC` makes the policy
/// invalid rather than failing the check.
pub fn validate_ac_policy(policy: &AcPolicy) -> Result<bool> {
    let Ok(version) = policy.syntax.version() else {
        return Ok(false);
    };
    if !policy.policy_type.is_ac() {
        return Ok(false);
    }
    if !policy.name.is_valid(version)? {
        return Ok(false);
    }
    for statement in policy.permit.iter().chain(policy.forbid.iter()) {
        if !validate_ac_policy_statement(version, statement)? {
            return Ok(false);
        }
    }
    Ok(true)
}
