//! Policy documents, statements and the strings they are made of
//!
//! A resource is identified by a UUR (Applicative Resource Name) such as
//! `uur:581616507495:default:hr-app:time-management:person/*`, an action by
//! `resource:action` such as `person:ReadTimesheet`.

use std::fmt;

use regex::Captures;
use serde::{Deserialize, Serialize};

use crate::{
    error::{PolicyError, Result},
    grammar::{AC_POLICY_TYPE, PolicyVersion},
    text::{WildcardString, cache},
};

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw string
            pub fn new(value: impl Into<String>) -> Self {
                $name(value.into())
            }

            /// The raw string
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the string is empty
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                $name(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                $name(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_newtype!(
    /// Syntax version as written in a document, possibly unknown
    SyntaxVersion
);
string_newtype!(
    /// Policy type as written in a document
    PolicyType
);
string_newtype!(
    /// Name of a policy or of a statement
    PolicyLabel
);
string_newtype!(
    /// `resource:action` string, both sides wildcard-capable
    ActionString
);
string_newtype!(
    /// `uur:<account>:<tenant>:<schema>:<domain>:<resource>[/<filter>]` string
    UurString
);

fn matches_grammar(pattern: &str, value: &str) -> Result<bool> {
    Ok(cache::compiled(pattern)?.is_match(value))
}

fn token(captures: &Captures<'_>, name: &str) -> WildcardString {
    match captures.name(name).map(|m| m.as_str()) {
        Some(value) if !value.is_empty() => WildcardString::new(value),
        _ => WildcardString::new("*"),
    }
}

impl SyntaxVersion {
    /// Resolve into a known version
    pub fn version(&self) -> Result<PolicyVersion> {
        self.0.parse()
    }

    /// Whether the version is known
    pub fn is_valid(&self) -> bool {
        self.version().is_ok()
    }
}

impl From<PolicyVersion> for SyntaxVersion {
    fn from(version: PolicyVersion) -> Self {
        SyntaxVersion::new(version.as_str())
    }
}

impl PolicyType {
    /// Access control policy type
    pub fn ac() -> Self {
        PolicyType::new(AC_POLICY_TYPE)
    }

    /// Whether this is the access control type
    pub fn is_ac(&self) -> bool {
        self.0 == AC_POLICY_TYPE
    }

    /// Whether the type exists in `version`
    pub fn is_valid(&self, version: PolicyVersion) -> Result<bool> {
        if self.0.is_empty() {
            return Ok(false);
        }
        Ok(version.grammar().recognizes_type(&self.0))
    }
}

impl PolicyLabel {
    /// Whether the label follows the grammar of `version`
    pub fn is_valid(&self, version: PolicyVersion) -> Result<bool> {
        if self.0.is_empty() {
            return Ok(false);
        }
        matches_grammar(version.grammar().label_pattern(), &self.0)
    }
}

/// Parsed action: the resource scope and the verb
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    resource: WildcardString,
    action: WildcardString,
}

impl Action {
    /// Resource scope, `*` when omitted
    pub fn resource(&self) -> &WildcardString {
        &self.resource
    }

    /// Action verb, `*` when omitted
    pub fn action(&self) -> &WildcardString {
        &self.action
    }
}

impl ActionString {
    /// Whether the action follows the grammar of `version`
    pub fn is_valid(&self, version: PolicyVersion) -> Result<bool> {
        if self.0.is_empty() {
            return Ok(false);
        }
        matches_grammar(version.grammar().action_pattern(), &self.0)
    }

    /// Split into resource scope and verb
    pub fn parse(&self, version: PolicyVersion) -> Result<Action> {
        if !self.is_valid(version)? {
            return Err(PolicyError::InvalidAction(self.0.clone()));
        }
        let regex = cache::compiled(version.grammar().action_pattern())?;
        let captures = regex
            .captures(&self.0)
            .ok_or_else(|| PolicyError::InvalidAction(self.0.clone()))?;
        Ok(Action {
            resource: token(&captures, "resource"),
            action: token(&captures, "action"),
        })
    }
}

/// Parsed UUR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uur {
    account: WildcardString,
    tenant: WildcardString,
    schema: WildcardString,
    domain: WildcardString,
    resource: WildcardString,
    resource_filter: WildcardString,
}

impl Uur {
    /// Numeric account id, `*` when omitted
    pub fn account(&self) -> &WildcardString {
        &self.account
    }

    /// Tenant name
    pub fn tenant(&self) -> &WildcardString {
        &self.tenant
    }

    /// Schema name
    pub fn schema(&self) -> &WildcardString {
        &self.schema
    }

    /// Domain, possibly slash-separated
    pub fn domain(&self) -> &WildcardString {
        &self.domain
    }

    /// Resource name
    pub fn resource(&self) -> &WildcardString {
        &self.resource
    }

    /// Filter following the resource name
    pub fn resource_filter(&self) -> &WildcardString {
        &self.resource_filter
    }
}

impl UurString {
    /// Whether the UUR follows the grammar of `version`
    pub fn is_valid(&self, version: PolicyVersion) -> Result<bool> {
        if self.0.is_empty() {
            return Ok(false);
        }
        matches_grammar(version.grammar().uur_pattern(), &self.0)
    }

    /// Split into its segments
    pub fn parse(&self, version: PolicyVersion) -> Result<Uur> {
        if !self.is_valid(version)? {
            return Err(PolicyError::InvalidUur(self.0.clone()));
        }
        let regex = cache::compiled(version.grammar().uur_pattern())?;
        let captures = regex
            .captures(&self.0)
            .ok_or_else(|| PolicyError::InvalidUur(self.0.clone()))?;
        Ok(Uur {
            account: token(&captures, "account"),
            tenant: token(&captures, "tenant"),
            schema: token(&captures, "schema"),
            domain: token(&captures, "domain"),
            resource: token(&captures, "resource"),
            resource_filter: token(&captures, "resourcefilter"),
        })
    }
}

/// Fields every policy document starts with
///
/// Decoded first so that the version and type can be checked before the
/// rest of the document is trusted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyHeader {
    /// Syntax version
    #[serde(rename = "Syntax", default)]
    pub syntax: SyntaxVersion,

    /// Policy type
    #[serde(rename = "Type", default)]
    pub policy_type: PolicyType,
}

/// Access control policy: what can and cannot be done on which resources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcPolicy {
    /// Syntax version
    #[serde(rename = "Syntax", default)]
    pub syntax: SyntaxVersion,

    /// Policy type, `AC`
    #[serde(rename = "Type", default)]
    pub policy_type: PolicyType,

    /// Policy name
    #[serde(rename = "Name", default, skip_serializing_if = "PolicyLabel::is_empty")]
    pub name: PolicyLabel,

    /// Statements granting access
    #[serde(rename = "Permit", default, skip_serializing_if = "Vec::is_empty")]
    pub permit: Vec<AcPolicyStatement>,

    /// Statements denying access
    #[serde(rename = "Forbid", default, skip_serializing_if = "Vec::is_empty")]
    pub forbid: Vec<AcPolicyStatement>,
}

impl AcPolicy {
    /// Create an empty access control policy
    pub fn new(version: PolicyVersion, name: impl Into<PolicyLabel>) -> Self {
        AcPolicy {
            syntax: version.into(),
            policy_type: PolicyType::ac(),
            name: name.into(),
            permit: Vec::new(),
            forbid: Vec::new(),
        }
    }
}

/// Actions associated to resources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcPolicyStatement {
    /// Statement name, not part of the statement's content identity
    #[serde(rename = "Name", default, skip_serializing_if = "PolicyLabel::is_empty")]
    pub name: PolicyLabel,

    /// Actions covered by the statement
    #[serde(rename = "Actions", default)]
    pub actions: Vec<ActionString>,

    /// Resources covered by the statement
    #[serde(rename = "Resources", default)]
    pub resources: Vec<UurString>,
}

impl AcPolicyStatement {
    /// Build a statement from plain strings
    pub fn new<A, R>(name: impl Into<PolicyLabel>, actions: A, resources: R) -> Self
    where
        A: IntoIterator,
        A::Item: Into<ActionString>,
        R: IntoIterator,
        R::Item: Into<UurString>,
    {
        AcPolicyStatement {
            name: name.into(),
            actions: actions.into_iter().map(Into::into).collect(),
            resources: resources.into_iter().map(Into::into).collect(),
        }
    }
}
