//! Property-based tests for fenceline-core types.
//!
//! These tests use proptest to verify invariants across many randomly generated inputs.

use proptest::prelude::*;

use crate::cloudformation::{AwsRegion, CloudFormationWizard};
use crate::fields::{nest_fields, FlatFieldMap};
use crate::{FieldSet, RegistryAddRequest, RegistryType};

/// Strategy for generating plain field names without a dot.
fn flat_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,20}"
}

/// Strategy for generating `group.leaf` field names.
fn dotted_key_strategy() -> impl Strategy<Value = String> {
    ("(secret|non_secret|extras)", "[a-z_]{1,20}").prop_map(|(g, l)| format!("{g}.{l}"))
}

/// Strategy for generating mixed submissions.
fn field_map_strategy() -> impl Strategy<Value = FlatFieldMap> {
    prop::collection::btree_map(
        prop_oneof![flat_key_strategy(), dotted_key_strategy()],
        "[ -~]{0,30}",
        0..20,
    )
}

fn registry_type_strategy() -> impl Strategy<Value = RegistryType> {
    prop::sample::select(RegistryType::ALL.to_vec())
}

fn region_strategy() -> impl Strategy<Value = AwsRegion> {
    prop::sample::select(AwsRegion::ALL.to_vec())
}

proptest! {
    /// Keys without a dot never survive nesting.
    #[test]
    fn nest_fields_drops_undotted_keys(flat in field_map_strategy()) {
        let nested = nest_fields(&flat);
        for key in flat.keys().filter(|k| !k.contains('.')) {
            prop_assert!(!nested.contains_key(key));
        }
    }

    /// Every dotted key ends up under its group with its value intact.
    #[test]
    fn nest_fields_keeps_dotted_values(flat in field_map_strategy()) {
        let nested = nest_fields(&flat);
        for (key, value) in flat.iter().filter(|(k, _)| k.contains('.')) {
            let (group, leaf) = key.split_once('.').unwrap();
            let fields = nested[group].as_group().unwrap();
            prop_assert_eq!(&fields[leaf], value);
        }
    }

    /// Every nested entry comes from some dotted input key.
    #[test]
    fn nest_fields_invents_nothing(flat in field_map_strategy()) {
        let nested = nest_fields(&flat);
        for (group, value) in &nested {
            for leaf in value.as_group().unwrap().keys() {
                let key = format!("{group}.{leaf}");
                prop_assert!(flat.contains_key(&key));
            }
        }
    }

    /// The request body always carries the registry tag and forwards the name.
    #[test]
    fn registry_request_carries_tag_and_name(
        registry_type in registry_type_strategy(),
        name in "[a-z][a-z0-9-]{0,20}",
        mut flat in prop::collection::btree_map(dotted_key_strategy(), "[a-z0-9]{1,10}", 0..8),
    ) {
        flat.insert("name".to_string(), name.clone());
        let request = RegistryAddRequest::from_fields(registry_type, &flat);
        let json = serde_json::to_value(&request).unwrap();

        prop_assert_eq!(json["registry_type"].as_str(), Some(registry_type.as_str()));
        prop_assert_eq!(json["name"].as_str(), Some(name.as_str()));
    }

    /// Registry tags round-trip through their string form.
    #[test]
    fn registry_type_parse_roundtrip(registry_type in registry_type_strategy()) {
        let parsed: RegistryType = registry_type.to_string().parse().unwrap();
        prop_assert_eq!(parsed, registry_type);
    }

    /// Strings outside the tag list never parse.
    #[test]
    fn registry_type_rejects_unknown(tag in "[a-z_]{1,30}") {
        let known = RegistryType::ALL.iter().any(|t| t.as_str() == tag);
        prop_assert_eq!(tag.parse::<RegistryType>().is_ok(), known);
    }

    /// Console links always point at the selected region.
    #[test]
    fn deploy_links_follow_region(region in region_strategy()) {
        let mut wizard = CloudFormationWizard::new();
        wizard.select_region(region);
        let host = format!("https://{region}.console.aws.amazon.com/");
        let query = format!("?region={region}#");

        for url in [wizard.single_account_deploy_url(), wizard.organization_deploy_url()] {
            prop_assert!(url.starts_with(&host));
            prop_assert!(url.contains(&query));
        }
    }

    /// A submission with every required text field filled validates, file inputs aside.
    #[test]
    fn filled_field_set_validates(registry_type in registry_type_strategy(), value in "[a-z0-9]{1,12}") {
        let set = FieldSet::for_registry(registry_type);
        let values: FlatFieldMap = set
            .fields()
            .iter()
            .map(|f| (f.key.to_string(), value.clone()))
            .collect();
        let files: Vec<&str> = set
            .fields()
            .iter()
            .filter(|f| f.kind == crate::FieldKind::File)
            .map(|f| f.key)
            .collect();

        prop_assert!(set.validate(&values, files).is_ok());
    }
}
