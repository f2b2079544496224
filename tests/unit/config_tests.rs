use exec_relay::config::{BackendEntry, GlobalConfig};
use exec_relay::AppError;

fn sample_toml() -> &'static str {
    r#"
bind_addr = "127.0.0.1:9000"
max_line_bytes = 4096

backends = [
    { command = "RUN", argv = ["/bin/cat"] },
    "STATUS:/usr/bin/uptime -p",
]
"#
}

#[test]
fn parses_valid_config() {
    let config = GlobalConfig::from_toml_str(sample_toml()).expect("config parses");

    assert_eq!(config.bind_addr, "127.0.0.1:9000");
    assert_eq!(config.max_line_bytes, 4096);
    assert_eq!(config.backends.len(), 2);
}

#[test]
fn applies_defaults() {
    let config = GlobalConfig::from_toml_str(
        r#"
backends = [{ command = "RUN", argv = ["/bin/cat"] }]
"#,
    )
    .expect("config parses");

    assert_eq!(config.bind_addr, "127.0.0.1:7035");
    assert_eq!(config.max_line_bytes, 1_048_576);
}

#[test]
fn loads_from_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("config.toml");
    std::fs::write(&path, sample_toml()).expect("write config");

    let config = GlobalConfig::load_from_path(&path).expect("config loads");
    assert_eq!(config.backends.len(), 2);
}

#[test]
fn resolves_compact_entry() {
    let entry = BackendEntry::Compact("STATUS:/usr/bin/uptime -p".into());
    let (command, argv) = entry.resolve().expect("entry resolves");

    assert_eq!(command, "STATUS");
    assert_eq!(argv, vec!["/usr/bin/uptime".to_owned(), "-p".to_owned()]);
}

#[test]
fn rejects_compact_entry_without_separator() {
    let config = GlobalConfig::from_toml_str(
        r#"
backends = ["no-colon-here"]
"#,
    );

    assert!(matches!(config, Err(AppError::Config(_))));
}

#[test]
fn rejects_empty_backend_list() {
    let config = GlobalConfig::from_toml_str("backends = []");
    assert!(matches!(config, Err(AppError::Config(_))));
}

#[test]
fn rejects_empty_argv() {
    let config = GlobalConfig::from_toml_str(
        r#"
backends = [{ command = "RUN", argv = [] }]
"#,
    );

    assert!(matches!(config, Err(AppError::Config(_))));
}

#[test]
fn rejects_compact_entry_with_empty_argv() {
    let config = GlobalConfig::from_toml_str(
        r#"
backends = ["RUN:"]
"#,
    );

    assert!(matches!(config, Err(AppError::Config(_))));
}

#[test]
fn rejects_non_atom_command() {
    let config = GlobalConfig::from_toml_str(
        r#"
backends = [{ command = "BAD\"NAME", argv = ["/bin/cat"] }]
"#,
    );

    assert!(matches!(config, Err(AppError::Config(_))));
}

#[test]
fn rejects_zero_line_limit() {
    let config = GlobalConfig::from_toml_str(
        r#"
max_line_bytes = 0
backends = [{ command = "RUN", argv = ["/bin/cat"] }]
"#,
    );

    assert!(matches!(config, Err(AppError::Config(_))));
}

#[test]
fn rejects_missing_config_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = GlobalConfig::load_from_path(temp.path().join("absent.toml"));
    assert!(matches!(config, Err(AppError::Config(_))));
}
