//! Syntax versions and the grammar each of them accepts

use std::{fmt, str::FromStr, sync::LazyLock};

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

static V1_GRAMMAR: LazyLock<Grammar> = LazyLock::new(Grammar::v1);

/// Access control policy type
pub const AC_POLICY_TYPE: &str = "AC";
/// Trust identity policy type
pub const PTI_POLICY_TYPE: &str = "PTI";

/// Policy syntax versions understood by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyVersion {
    /// `permguard1`
    #[serde(rename = "permguard1")]
    V1,
}

impl PolicyVersion {
    /// Version used when nothing else is requested
    pub const LATEST: PolicyVersion = PolicyVersion::V1;

    /// Wire name of the version
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyVersion::V1 => "permguard1",
        }
    }

    /// Grammar of labels, actions and resources for this version
    pub fn grammar(self) -> &'static Grammar {
        match self {
            PolicyVersion::V1 => &V1_GRAMMAR,
        }
    }
}

impl fmt::Display for PolicyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyVersion {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "permguard1" => Ok(PolicyVersion::V1),
            other => Err(PolicyError::UnsupportedVersion(other.to_string())),
        }
    }
}

/// Regex sources and recognized policy types of one syntax version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    label: String,
    action: String,
    uur: String,
    policy_types: &'static [&'static str],
}

impl Grammar {
    fn v1() -> Self {
        let hyphen_name = r"([a-zA-Z0-9*]+(-[a-zA-Z0-9*]+)*)";
        let slash_hyphen_name = format!("{h}+(/{h})*", h = hyphen_name);
        let hyphen_extended_name = r"([a-zA-Z0-9.@*]+(-[a-zA-Z0-9.@*]+)*)";
        let slash_hyphen_extended_name = format!("{e}+(/{e})*", e = hyphen_extended_name);
        let account = r"\d{10,14}";
        let resource_with_filter = format!(
            "(?P<resource>{h}+)(/(?P<resourcefilter>{f}))*",
            h = hyphen_name,
            f = slash_hyphen_extended_name
        );
        let uur = format!(
            "^uur:(?P<account>({a})?):(?P<tenant>({h})?):(?P<schema>({h})?):(?P<domain>({d})?):({r})?$",
            a = account,
            h = hyphen_name,
            d = slash_hyphen_name,
            r = resource_with_filter
        );

        let action = format!(
            "^(?P<resource>({h})?):(?P<action>({h})?)$",
            h = hyphen_name
        );

        // Labels also allow ':' after the first hyphen.
        let label_name = r"([a-zA-Z0-9*]+(-[a-zA-Z0-9:*]+)*)";
        let label = format!("^(({l}+(/{l})*)?)$", l = label_name);

        Grammar {
            label,
            action,
            uur,
            policy_types: &[AC_POLICY_TYPE, PTI_POLICY_TYPE],
        }
    }

    /// Anchored pattern for policy and statement names
    pub fn label_pattern(&self) -> &str {
        &self.label
    }

    /// Anchored pattern for `resource:action` strings
    pub fn action_pattern(&self) -> &str {
        &self.action
    }

    /// Anchored pattern for UUR strings
    pub fn uur_pattern(&self) -> &str {
        &self.uur
    }

    /// Whether `policy_type` exists in this version
    pub fn recognizes_type(&self, policy_type: &str) -> bool {
        self.policy_types.contains(&policy_type)
    }
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::*;

    #[test]
    fn test_version_round_trip_through_str() {
        let version: PolicyVersion = "permguard1".parse().unwrap();
        assert_eq!(version, PolicyVersion::V1);
        assert_eq!(version.to_string(), "permguard1");
        assert_eq!(PolicyVersion::LATEST, PolicyVersion::V1);
    }

    #[test]
    fn test_unknown_version_is_unsupported() {
        let err = "2022-08-08".parse::<PolicyVersion>().unwrap_err();
        assert!(matches!(err, PolicyError::UnsupportedVersion(v) if v == "2022-08-08"));
    }

    #[test]
    fn test_v1_patterns_compile() {
        let grammar = PolicyVersion::V1.grammar();
        assert!(Regex::new(grammar.label_pattern()).is_ok());
        assert!(Regex::new(grammar.action_pattern()).is_ok());
        assert!(Regex::new(grammar.uur_pattern()).is_ok());
    }

    #[test]
    fn test_v1_policy_types() {
        let grammar = PolicyVersion::V1.grammar();
        assert!(grammar.recognizes_type("AC"));
        assert!(grammar.recognizes_type("PTI"));
        assert!(!grammar.recognizes_type("ABC"));
        assert!(!grammar.recognizes_type(""));
    }
}
