use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all pomgraph operations.
#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An artifact identity string or value is structurally invalid.
    #[error("Invalid artifact identity `{input}`: {reason}")]
    #[diagnostic(help("Artifact identities have the form group:name:version"))]
    InvalidIdentity { input: String, reason: String },

    /// A POM file could not be parsed.
    #[error("POM error: {message}")]
    Pom { message: String },

    /// Neither a POM nor a binary exists for the requested artifact.
    #[error("Artifact not found: {coordinate}")]
    NotFound { coordinate: String },

    /// A relocation chain could not be followed.
    #[error("Relocation error: {message}")]
    Relocation { message: String },

    /// Invalid or unreadable configuration file.
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check ~/.pomgraph/config.toml for syntax errors"))]
    Config { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type GraphResult<T> = miette::Result<T>;
