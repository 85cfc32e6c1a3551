use pomgraph_core::config::{dirs_path, ExclusionPropagation, GraphConfig, ScopePolicy};
use pomgraph_core::dependency::Scope;

#[test]
fn test_default_config_suppresses_provided_keeps_test() {
    let config = GraphConfig::default();
    assert!(!config.scopes.provided);
    assert!(config.scopes.test);
    assert!(!config.scopes.optional);
}

#[test]
fn test_empty_scopes_section_keeps_root_test_dependencies() {
    let config = GraphConfig::from_toml_str("[scopes]\nprovided = true\n").unwrap();
    assert!(config.scopes.test);
    let config: GraphConfig = toml::from_str("").unwrap();
    assert_eq!(config.scopes, ScopePolicy::default());
}

#[test]
fn test_root_test_dependencies_can_be_switched_off() {
    let config = GraphConfig::from_toml_str("[scopes]\ntest = false\n").unwrap();
    assert!(!config.scopes.test);
    assert!(!config.scopes.admits(Scope::Test, 0, false));
}

#[test]
fn test_default_exclusions_are_transitive() {
    let config: GraphConfig = toml::from_str("").unwrap();
    assert_eq!(
        config.exclusions.propagation,
        ExclusionPropagation::Transitive
    );
}

#[test]
fn test_default_repository() {
    let config: GraphConfig = toml::from_str("").unwrap();
    assert_eq!(config.repository.local, "~/.m2/repository");
    assert_eq!(config.repository.relocation_limit, 8);
    assert!(config.repository.local_path().ends_with(".m2/repository"));
}

#[test]
fn test_dirs_path_contains_pomgraph() {
    assert!(dirs_path().ends_with(".pomgraph"));
}

#[test]
fn test_parse_from_toml() {
    let toml = r#"
[scopes]
provided = true
test = true

[exclusions]
propagation = "direct"

[repository]
local = "/srv/m2"
relocation-limit = 2
"#;
    let config = GraphConfig::from_toml_str(toml).unwrap();
    assert!(config.scopes.provided);
    assert!(config.scopes.test);
    assert!(!config.scopes.optional);
    assert_eq!(config.exclusions.propagation, ExclusionPropagation::Direct);
    assert_eq!(config.repository.local, "/srv/m2");
    assert_eq!(config.repository.relocation_limit, 2);
}

#[test]
fn test_parse_error_is_config_error() {
    let err = GraphConfig::from_toml_str("[scopes\nprovided = true").unwrap_err();
    assert!(err.to_string().contains("Configuration error"), "got: {err}");
}

#[test]
fn test_load_from_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.toml");
    std::fs::write(&path, "[scopes]\noptional = true\n").unwrap();
    let config = GraphConfig::load_from(&path).unwrap();
    assert!(config.scopes.optional);
}

#[test]
fn test_scope_policy_defaults() {
    let policy = ScopePolicy::default();
    assert!(policy.admits(Scope::Compile, 3, false));
    assert!(policy.admits(Scope::Runtime, 0, false));
    assert!(!policy.admits(Scope::Provided, 0, false));
    assert!(policy.admits(Scope::Test, 0, false));
    assert!(!policy.admits(Scope::Test, 1, false));
    assert!(!policy.admits(Scope::Import, 0, false));
    assert!(policy.admits(Scope::Compile, 0, true));
    assert!(!policy.admits(Scope::Compile, 1, true));
}

#[test]
fn test_scope_policy_switches_only_affect_root() {
    let policy = ScopePolicy {
        provided: true,
        test: true,
        optional: true,
    };
    assert!(policy.admits(Scope::Provided, 0, false));
    assert!(!policy.admits(Scope::Provided, 1, false));
    assert!(policy.admits(Scope::Test, 0, false));
    assert!(!policy.admits(Scope::Test, 2, false));
    assert!(policy.admits(Scope::Compile, 2, true));
}
