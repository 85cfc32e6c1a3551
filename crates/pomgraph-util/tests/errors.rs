use pomgraph_util::errors::GraphError;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = GraphError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn test_invalid_identity_display() {
    let err = GraphError::InvalidIdentity {
        input: "org.example:lib".to_string(),
        reason: "expected 3 parts, found 2".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Invalid artifact identity `org.example:lib`: expected 3 parts, found 2"
    );
}

#[test]
fn test_pom_error_display() {
    let err = GraphError::Pom {
        message: "unexpected eof".to_string(),
    };
    assert_eq!(err.to_string(), "POM error: unexpected eof");
}

#[test]
fn test_not_found_display() {
    let err = GraphError::NotFound {
        coordinate: "org.example:lib:1.0".to_string(),
    };
    assert_eq!(err.to_string(), "Artifact not found: org.example:lib:1.0");
}

#[test]
fn test_relocation_error_display() {
    let err = GraphError::Relocation {
        message: "too many hops".to_string(),
    };
    assert_eq!(err.to_string(), "Relocation error: too many hops");
}

#[test]
fn test_config_error_display() {
    let err = GraphError::Config {
        message: "bad toml".to_string(),
    };
    assert_eq!(err.to_string(), "Configuration error: bad toml");
}

#[test]
fn test_generic_error_converts_to_report() {
    let report: miette::Report = GraphError::Generic {
        message: "something broke".to_string(),
    }
    .into();
    assert_eq!(report.to_string(), "something broke");
}
