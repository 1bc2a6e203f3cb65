//! Integration tests for building a gate from a config file.

use std::io::Write;

use lectern_config::{Config, ConfigError};
use lectern_core::{AccessError, DenyReason, Identity, RawCredential, Role};
use lectern_policy::{Gate, OperationArgs, PolicyShape, PolicyTableError};
use lectern_telemetry::{LogConfig, LogFormat};

const SCHOOL_TOML: &str = r#"
[sessions]
cookie_name = "school_sid"
max_issue_attempts = 4

[logging]
level = "debug"
format = "json"
directives = ["lectern_sessions=trace"]

[[operations]]
name = "view_grades"
shape = "student_self"
resource_arg = "student_id"

[[operations]]
name = "create_course"
shape = "teacher_only"

[[operations]]
name = "list_courses"
shape = "authenticated"
"#;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_gate_from_config_file() {
    let file = write_config(SCHOOL_TOML);
    let config = Config::load_file(file.path()).unwrap();
    let gate = Gate::from_config(&config).unwrap();

    assert_eq!(gate.cookie_name(), "school_sid");
    let ops: Vec<&str> = gate.table().operations().collect();
    assert_eq!(ops, vec!["create_course", "list_courses", "view_grades"]);
    assert_eq!(
        gate.table().binding("view_grades").map(lectern_policy::PolicyBinding::shape),
        Some(PolicyShape::StudentSelf)
    );

    let token = gate.sign_in(Identity::new("s7", Role::Student)).unwrap();
    let cookie_header = format!("school_sid={token}");
    let credential = gate.credential_from(None, Some(cookie_header.as_str()));

    let args = OperationArgs::new().with("student_id", "s7");
    assert!(gate.authorize("view_grades", &credential, &args).is_ok());

    let err = gate
        .authorize("create_course", &credential, &OperationArgs::new())
        .unwrap_err();
    assert_eq!(
        err,
        PolicyTableError::Access(AccessError::Forbidden(DenyReason::NotATeacher))
    );
}

#[test]
fn test_logging_section_converts() {
    let file = write_config(SCHOOL_TOML);
    let config = Config::load_file(file.path()).unwrap();
    let log = LogConfig::from_config(&config.logging).unwrap();
    assert_eq!(log.level, "debug");
    assert_eq!(log.format, LogFormat::Json);
    assert_eq!(log.directives, vec!["lectern_sessions=trace".to_owned()]);
}

#[test]
fn test_invalid_operation_table_rejected_at_load() {
    let file = write_config(
        r#"
        [[operations]]
        name = "view_grades"
        shape = "student_self"
        "#,
    );
    let err = Config::load_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError { .. }));
}

#[test]
fn test_unconfigured_gate_refuses_everything() {
    let gate = Gate::from_config(&Config::default()).unwrap();
    let token = gate.sign_in(Identity::new("t1", Role::Teacher)).unwrap();
    let err = gate
        .authorize(
            "create_course",
            &RawCredential::header(format!("Bearer {token}")),
            &OperationArgs::new(),
        )
        .unwrap_err();
    assert!(matches!(err, PolicyTableError::UnknownOperation(_)));
}
