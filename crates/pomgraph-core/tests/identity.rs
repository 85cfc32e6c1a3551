use pomgraph_core::identity::{ArtifactId, ArtifactKey};

#[test]
fn artifact_id_parse_valid() {
    let id = ArtifactId::parse("com.example:my-lib:1.0.0").unwrap();
    assert_eq!(id.group, "com.example");
    assert_eq!(id.name, "my-lib");
    assert_eq!(id.version, "1.0.0");
}

#[test]
fn artifact_id_parse_two_parts_fails() {
    let err = ArtifactId::parse("group:artifact").unwrap_err();
    assert!(err.to_string().contains("Invalid artifact identity"), "got: {err}");
}

#[test]
fn artifact_id_parse_four_parts_fails() {
    assert!(ArtifactId::parse("group:artifact:1.0:extra").is_err());
}

#[test]
fn artifact_id_parse_empty_part_fails() {
    assert!(ArtifactId::parse("group::1.0").is_err());
    assert!(ArtifactId::parse("").is_err());
}

#[test]
fn artifact_id_validate_rejects_whitespace() {
    let id = ArtifactId::new("org.example", "my lib", "1.0");
    assert!(id.validate().is_err());
}

#[test]
fn artifact_id_display_roundtrip() {
    let s = "com.example:my-lib:1.0.0";
    let id: ArtifactId = s.parse().unwrap();
    assert_eq!(id.to_string(), s);
}

#[test]
fn same_artifact_ignores_version() {
    let a = ArtifactId::new("org.example", "lib", "1.0");
    let b = a.with_version("1.1");
    assert_ne!(a, b);
    assert!(a.same_artifact(&b));
    assert_eq!(a.key(), b.key());
}

#[test]
fn artifact_key_parse_and_display() {
    let key = ArtifactKey::parse("org.example:lib").unwrap();
    assert_eq!(key, ArtifactKey::new("org.example", "lib"));
    assert_eq!(key.to_string(), "org.example:lib");
    assert!(ArtifactKey::parse("lib").is_err());
    assert!(ArtifactKey::parse("a:b:c").is_err());
}
