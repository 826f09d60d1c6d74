#[cfg(test)]
mod tests {
    use crate::*;

    const V1: PolicyVersion = PolicyVersion::V1;

    #[test]
    fn test_policy_parsing_json() {
        let json = r#"{
            "Syntax": "permguard1",
            "Type": "AC",
            "Name": "person-base-reader",
            "Permit": [
                {
                    "Name": "permit-hr/person/reader/any",
                    "Actions": ["person:ListEmployee", "person:ReadEmployee"],
                    "Resources": ["uur:581616507495:default:hr-app:organisation:person/*"]
                }
            ],
            "Forbid": [
                {
                    "Name": "forbid-write-hr/person/reader/any",
                    "Actions": ["person:WriteEmployee"],
                    "Resources": ["uur:581616507495:default:hr-app:organisation:person/*"]
                }
            ]
        }"#;

        let policy: AcPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(policy.syntax.version().unwrap(), V1);
        assert!(policy.policy_type.is_ac());
        assert_eq!(policy.name.as_str(), "person-base-reader");
        assert_eq!(policy.permit.len(), 1);
        assert_eq!(policy.forbid.len(), 1);
        assert_eq!(policy.permit[0].actions.len(), 2);
        assert!(validate_ac_policy(&policy).unwrap());
    }

    #[test]
    fn test_header_decodes_without_body() {
        let header: PolicyHeader = serde_json::from_str(r#"{"Syntax":"2022-08-08"}"#).unwrap();
        assert!(!header.syntax.is_valid());
        assert!(header.policy_type.is_empty());
        assert!(matches!(
            header.syntax.version(),
            Err(PolicyError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_serialization_omits_empty_name() {
        let statement = AcPolicyStatement::new("", ["a:b"], ["uur::t:s:d:r"]);
        let json = serde_json::to_value(&statement).unwrap();
        assert_eq!(json, serde_json::json!({"Actions": ["a:b"], "Resources": ["uur::t:s:d:r"]}));
    }

    #[test]
    fn test_statement_hash_ignores_name_and_order() {
        let first = AcPolicyStatement::new(
            "first",
            ["person:Read", "person:List"],
            ["uur:581616507495:default:hr-app:org:person/*"],
        );
        let second = AcPolicyStatement::new(
            "second",
            ["person:List", "person:Read"],
            ["uur:581616507495:default:hr-app:org:person/*"],
        );
        assert_eq!(
            content_hash(&first, &["Name"]).unwrap(),
            content_hash(&second, &["Name"]).unwrap()
        );
        assert_ne!(
            content_hash(&first, &[]).unwrap(),
            content_hash(&second, &[]).unwrap()
        );
        assert_eq!(
            stringify(&first, &["Name"]).unwrap(),
            "#Actions##person:List#person:Read#Resources##uur:581616507495:default:hr-app:org:person/*"
        );
    }

    #[test]
    fn test_label_grammar() {
        for label in ["reader", "r1", "person-base-reader", "hr/person/reader", "a-b:c", "*"] {
            assert!(PolicyLabel::new(label).is_valid(V1).unwrap(), "{label}");
        }
        for label in ["", "12 3465 ", "-reader", "reader-", "a//b", "with_underscore"] {
            assert!(!PolicyLabel::new(label).is_valid(V1).unwrap(), "{label}");
        }
    }

    #[test]
    fn test_action_parsing() {
        let action = ActionString::new("person:ReadTimesheet").parse(V1).unwrap();
        assert_eq!(action.resource().as_str(), "person");
        assert_eq!(action.action().as_str(), "ReadTimesheet");

        let action = ActionString::new(":").parse(V1).unwrap();
        assert_eq!(action.resource().as_str(), "*");
        assert_eq!(action.action().as_str(), "*");

        let action = ActionString::new("time-sheet:*").parse(V1).unwrap();
        assert_eq!(action.resource().as_str(), "time-sheet");
        assert_eq!(action.action().as_str(), "*");
    }

    #[test]
    fn test_invalid_action_is_rejected() {
        for action in ["", "person", "person:Read:Twice", "per son:Read"] {
            assert!(!ActionString::new(action).is_valid(V1).unwrap(), "{action}");
        }
        assert!(matches!(
            ActionString::new("person").parse(V1),
            Err(PolicyError::InvalidAction(_))
        ));
    }

    #[test]
    fn test_uur_parsing() {
        let uur = UurString::new("uur:581616507495:default:hr-app:time-management:person/*")
            .parse(V1)
            .unwrap();
        assert_eq!(uur.account().as_str(), "581616507495");
        assert_eq!(uur.tenant().as_str(), "default");
        assert_eq!(uur.schema().as_str(), "hr-app");
        assert_eq!(uur.domain().as_str(), "time-management");
        assert_eq!(uur.resource().as_str(), "person");
        assert_eq!(uur.resource_filter().as_str(), "*");
    }

    #[test]
    fn test_uur_empty_segments_default_to_wildcard() {
        let uur = UurString::new("uur::::hr-app:").parse(V1).unwrap();
        assert_eq!(uur.account().as_str(), "*");
        assert_eq!(uur.tenant().as_str(), "*");
        assert_eq!(uur.schema().as_str(), "*");
        assert_eq!(uur.domain().as_str(), "hr-app");
        assert_eq!(uur.resource().as_str(), "*");
        assert_eq!(uur.resource_filter().as_str(), "*");
    }

    #[test]
    fn test_uur_resource_filter_allows_extended_characters() {
        let uur = UurString::new("uur:581616507495:default:hr-app:org:person/john.doe@acme.com")
            .parse(V1)
            .unwrap();
        assert_eq!(uur.resource().as_str(), "person");
        assert_eq!(uur.resource_filter().as_str(), "john.doe@acme.com");
    }

    #[test]
    fn test_invalid_uur_is_rejected() {
        for uur in [
            "",
            "uur:58161650:default:hr-app:org:person/*",
            "uur:581616507495:default:hr-app:org",
            "arn:581616507495:default:hr-app:org:person",
            "uur:581616507495:def ault:hr-app:org:person",
        ] {
            assert!(!UurString::new(uur).is_valid(V1).unwrap(), "{uur}");
        }
        assert!(matches!(
            UurString::new("uur:1:a:b:c:d").parse(V1),
            Err(PolicyError::InvalidUur(_))
        ));
    }

    #[test]
    fn test_policy_type_validity() {
        assert!(PolicyType::new("AC").is_valid(V1).unwrap());
        assert!(PolicyType::new("PTI").is_valid(V1).unwrap());
        assert!(!PolicyType::new("ABC").is_valid(V1).unwrap());
        assert!(!PolicyType::default().is_valid(V1).unwrap());
    }
}
