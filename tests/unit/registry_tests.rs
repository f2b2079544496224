use exec_relay::config::GlobalConfig;
use exec_relay::registry::BackendRegistry;

fn registry_from(toml: &str) -> BackendRegistry {
    let config = GlobalConfig::from_toml_str(toml).expect("config parses");
    BackendRegistry::from_config(&config).expect("registry builds")
}

fn sample_registry() -> BackendRegistry {
    registry_from(
        r#"
backends = [
    { command = "Run", argv = ["/bin/cat"] },
    { command = "STATUS", argv = ["/usr/bin/uptime", "-p"] },
]
"#,
    )
}

#[test]
fn lookup_is_case_insensitive() {
    let registry = sample_registry();

    for token in ["run", "RUN", "Run", "rUn"] {
        let spec = registry.lookup(token).expect("entry found");
        assert_eq!(spec.argv, vec!["/bin/cat".to_owned()]);
    }
}

#[test]
fn lookup_misses_unknown_token() {
    let registry = sample_registry();
    assert!(registry.lookup("FROBNICATE").is_none());
}

#[test]
fn first_configured_entry_wins_on_duplicate_tokens() {
    let registry = registry_from(
        r#"
backends = [
    { command = "RUN", argv = ["/bin/true"] },
    { command = "run", argv = ["/bin/false"] },
]
"#,
    );

    let spec = registry.lookup("run").expect("entry found");
    assert_eq!(spec.argv, vec!["/bin/true".to_owned()]);
}

#[test]
fn command_names_preserve_configured_order() {
    let registry = sample_registry();
    assert_eq!(registry.command_names(), vec!["Run", "STATUS"]);
    assert_eq!(registry.len(), 2);
    assert!(!registry.is_empty());
}

#[test]
fn compact_entries_resolve_into_specs() {
    let registry = registry_from(
        r#"
backends = ["ECHO:/bin/echo hello world"]
"#,
    );

    let spec = registry.lookup("echo").expect("entry found");
    assert_eq!(
        spec.argv,
        vec![
            "/bin/echo".to_owned(),
            "hello".to_owned(),
            "world".to_owned()
        ]
    );
}
