use std::fs;

use simopt_config::{ConfigError, TableFile};
use simopt_core::{Declaration, OptionDecl, ParseError, Value, ValueType};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sample_table() -> TableFile {
    TableFile::new(
        Some("martinize"),
        vec![
            Declaration::section("Input/output:"),
            OptionDecl::new("-f", "input", ValueType::String)
                .multi()
                .with_description("Input structure")
                .into(),
            OptionDecl::new("-o", "output", ValueType::String)
                .mandatory()
                .with_description("Output topology")
                .into(),
            Declaration::section("Expert:"),
            OptionDecl::new("-ef", "elastic_force", ValueType::Float)
                .with_default(500.0)
                .at_level(5)
                .with_description("Elastic bond force constant")
                .into(),
            OptionDecl::switch("-ed", "elastic").into(),
        ],
    )
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

#[test]
fn yaml_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("options.yaml");

    let table = sample_table();
    table.save(&path).unwrap();
    let loaded = TableFile::load(&path).unwrap();
    assert_eq!(loaded, table);
}

#[test]
fn json_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("options.json");

    let table = sample_table();
    table.save(&path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"program\": \"martinize\""));
    assert_eq!(TableFile::load(&path).unwrap(), table);
}

#[test]
fn unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("options.toml");
    fs::write(&path, "").unwrap();

    let err = TableFile::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = TableFile::load(dir.path().join("absent.yml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

// ---------------------------------------------------------------------------
// Loaded tables drive the engine
// ---------------------------------------------------------------------------

#[test]
fn loaded_table_parses_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("options.yml");
    fs::write(
        &path,
        r#"program: martinize
declarations:
  - "Input/output:"
  - flag: -f
    attribute: input
    type: string
    behavior: { multi: true }
  - flag: -o
    attribute: output
    type: string
    behavior: { mandatory: true }
  - flag: -n
    attribute: count
    type: integer
    arity: 2
"#,
    )
    .unwrap();

    let options = TableFile::load(&path).unwrap().into_options().unwrap();
    let parsed = options
        .parse(&["-f", "a.pdb", "-n", "3", "-o", "out.top"])
        .unwrap();
    assert_eq!(parsed["input"], Value::List(vec!["a.pdb".into()]));
    assert_eq!(parsed["count"], Value::Tuple(vec![Value::Int(3), Value::Int(3)]));

    let err = options.parse(&["-f", "a.pdb"]).unwrap_err();
    assert!(matches!(err, ParseError::MissingMandatory(_)));
    assert!(
        options
            .parse(&["-o", "x", "-q"])
            .unwrap_err()
            .to_string()
            .starts_with("martinize: Unrecognized option '-q'")
    );
}

#[test]
fn loaded_arity_counts_remaining_tokens() {
    let table = TableFile::from_yaml_str(
        "declarations:\n  - {flag: -n, attribute: count, type: integer, arity: 2}\n",
    )
    .unwrap();
    let err = table.into_options().unwrap().parse(&["-n", "3"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to parse options: Option '-n' requires 2 arguments"
    );
}

#[test]
fn loaded_bool_switch_takes_no_argument() {
    let table = TableFile::from_yaml_str(
        r#"
declarations:
  - {flag: -v, attribute: verbose, type: bool}
  - {flag: -o, attribute: output, type: string}
"#,
    )
    .unwrap();
    let options = table.into_options().unwrap();

    let parsed = options.parse(&["-v", "-o", "out"]).unwrap();
    assert_eq!(parsed["verbose"], Value::Bool(true));
    assert_eq!(parsed["output"], Value::from("out"));

    let parsed = options.parse(&["-o", "out", "-v"]).unwrap();
    assert_eq!(parsed["verbose"], Value::Bool(true));
}

#[test]
fn loaded_table_renders_help_by_level() {
    let options = sample_table().into_options().unwrap();
    let basic = options.help::<&str>(None, 0).unwrap();
    assert!(basic.starts_with("martinize\n"));
    assert!(basic.contains("Expert:"));
    assert!(!basic.contains("-ef "));
    assert!(options.usage().contains("Elastic bond force constant ( 500.0 )"));
}
