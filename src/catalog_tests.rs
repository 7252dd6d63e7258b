use super::*;

fn parse_mapping(text: &str) -> Mapping {
    serde_yaml::from_str(text).expect("parse mapping")
}

fn keys(mapping: &Mapping) -> Vec<String> {
    mapping
        .keys()
        .map(|key| key.as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn load_missing_file_reports_not_found() {
    let err = load_catalog(Path::new("does/not/exist.yaml")).unwrap_err();
    assert!(
        err.to_string().contains("YAML file not found: does/not/exist.yaml"),
        "{err}"
    );
}

#[test]
fn load_reads_sequence_of_mappings() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("integrations.yaml");
    std::fs::write(
        &path,
        "- name: Gmail\n  tools:\n  - name: send_email\n- name: Outlook\n",
    )
    .expect("write catalog");

    let catalog = load_catalog(&path).expect("load catalog");
    assert_eq!(catalog.integrations().len(), 2);
    assert_eq!(
        record_name(&catalog.integrations()[1], DEFAULT_INTEGRATION_NAME).unwrap(),
        "Outlook"
    );
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let err = Catalog::from_yaml_str("- name: [unclosed\n").unwrap_err();
    assert!(format!("{err:#}").contains("parse catalog YAML"), "{err:#}");
}

#[test]
fn non_sequence_root_is_rejected() {
    let err = Catalog::from_yaml_str("name: Gmail\n").unwrap_err();
    assert!(err.to_string().contains("got mapping"), "{err}");
    assert!(Catalog::from_yaml_str("").is_err());
}

#[test]
fn non_mapping_integration_is_rejected() {
    let err = Catalog::from_yaml_str("- name: Gmail\n- just a string\n").unwrap_err();
    assert!(err.to_string().contains("integration #2"), "{err}");
}

#[test]
fn record_name_defaults_when_absent_or_null() {
    let record = parse_mapping("tools: []\n");
    assert_eq!(
        record_name(&record, DEFAULT_INTEGRATION_NAME).unwrap(),
        "Unknown Integration"
    );
    let record = parse_mapping("name: ~\n");
    assert_eq!(record_name(&record, DEFAULT_TOOL_NAME).unwrap(), "Unknown Tool");
    let record = parse_mapping("name: 365\n");
    assert_eq!(record_name(&record, DEFAULT_TOOL_NAME).unwrap(), "365");
    let record = parse_mapping("name: [a, b]\n");
    assert!(record_name(&record, DEFAULT_TOOL_NAME).is_err());
}

#[test]
fn set_description_appends_then_overwrites_in_place() {
    let mut record = parse_mapping("name: Gmail\ntools: []\n");
    set_description(&mut record, "first".to_string());
    assert_eq!(keys(&record), ["name", "tools", "description"]);

    let mut record = parse_mapping("name: Gmail\ndescription: old\ntools: []\n");
    set_description(&mut record, "new".to_string());
    assert_eq!(keys(&record), ["name", "description", "tools"]);
    assert_eq!(record.get(DESCRIPTION_KEY), Some(&Value::from("new")));
}

#[test]
fn tools_mut_handles_absent_null_and_invalid() {
    let mut record = parse_mapping("name: Gmail\n");
    assert!(tools_mut(&mut record).unwrap().is_none());
    let mut record = parse_mapping("name: Gmail\ntools: ~\n");
    assert!(tools_mut(&mut record).unwrap().is_none());
    let mut record = parse_mapping("name: Gmail\ntools:\n- name: a\n- name: b\n");
    assert_eq!(tools_mut(&mut record).unwrap().map(|tools| tools.len()), Some(2));
    let mut record = parse_mapping("name: Gmail\ntools: send_email\n");
    assert!(tools_mut(&mut record).is_err());
}

#[test]
fn tool_arguments_reads_legacy_key_first() {
    let tool = parse_mapping(
        "name: send_email\narg_schema:\n- {name: cc, description: copy}\narg_schena:\n- {name: to, description: recipient address}\n",
    );
    let args = tool_arguments(&tool).unwrap();
    assert_eq!(
        args,
        vec![Argument {
            name: "to".to_string(),
            description: "recipient address".to_string()
        }]
    );

    let tool = parse_mapping("name: send_email\narg_schema:\n- {name: cc, description: copy}\n");
    assert_eq!(tool_arguments(&tool).unwrap()[0].name, "cc");

    let tool = parse_mapping("name: list_labels\n");
    assert!(tool_arguments(&tool).unwrap().is_empty());
}

#[test]
fn tool_arguments_requires_name_and_description() {
    let tool = parse_mapping("arg_schena:\n- {name: to}\n");
    let err = tool_arguments(&tool).unwrap_err();
    let rendered = format!("{err:#}");
    assert!(rendered.contains("`arg_schena` entry #1"), "{rendered}");
    assert!(rendered.contains("`description`"), "{rendered}");
}

#[test]
fn render_arguments_joins_name_and_description() {
    let args = vec![
        Argument {
            name: "to".to_string(),
            description: "recipient address".to_string(),
        },
        Argument {
            name: "subject".to_string(),
            description: "subject line".to_string(),
        },
    ];
    assert_eq!(
        render_arguments(&args),
        "to (recipient address), subject (subject line)"
    );
    assert_eq!(render_arguments(&[]), "");
}

#[test]
fn migrate_arg_schema_renames_and_keeps_order() {
    let mut tool = parse_mapping(
        "name: send_email\narg_schena:\n- {name: to, description: recipient address}\ndescription: sends\n",
    );
    let original = tool.get(LEGACY_ARG_SCHEMA_KEY).cloned();
    assert!(migrate_arg_schema(&mut tool));
    assert_eq!(keys(&tool), ["name", "description", "arg_schema"]);
    assert_eq!(tool.get(ARG_SCHEMA_KEY).cloned(), original);
    assert!(!tool.contains_key(LEGACY_ARG_SCHEMA_KEY));

    assert!(!migrate_arg_schema(&mut tool));
}

#[test]
fn migrate_arg_schema_replaces_existing_correct_key() {
    let mut tool = parse_mapping(
        "name: t\narg_schema: [{name: old, description: o}]\narg_schena: [{name: new, description: n}]\n",
    );
    assert!(migrate_arg_schema(&mut tool));
    assert_eq!(keys(&tool), ["name", "arg_schema"]);
    assert_eq!(tool_arguments(&tool).unwrap()[0].name, "new");
}

#[test]
fn serialization_preserves_key_order() {
    let catalog =
        Catalog::from_yaml_str("- name: Gmail\n  zeta: 1\n  alpha: 2\n").expect("parse catalog");
    let yaml = catalog.to_yaml_string().expect("serialize");
    assert_eq!(yaml, "- name: Gmail\n  zeta: 1\n  alpha: 2\n");
}

#[test]
fn merge_keys_are_resolved() {
    let catalog = Catalog::from_yaml_str(
        "- &base\n  name: Gmail\n- <<: *base\n  tools: []\n",
    )
    .expect("parse catalog");
    let merged = &catalog.integrations()[1];
    assert_eq!(
        record_name(merged, DEFAULT_INTEGRATION_NAME).unwrap(),
        "Gmail"
    );
    assert!(!merged.contains_key("<<"));
    assert!(merged.contains_key("tools"));
}
