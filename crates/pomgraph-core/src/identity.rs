//! Artifact identities: the `group:name:version` triple and its
//! version-less `group:name` key.

use std::fmt;
use std::str::FromStr;

use pomgraph_util::errors::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};

/// An artifact coordinate. Used both for what a POM declares and for what
/// the graph finally resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactId {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl ArtifactId {
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parse `"group:name:version"`.
    pub fn parse(s: &str) -> GraphResult<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(invalid(
                s,
                format!("expected 3 parts, found {}", parts.len()),
            ));
        }
        let id = Self::new(parts[0].trim(), parts[1].trim(), parts[2].trim());
        id.validate()?;
        Ok(id)
    }

    /// Check that every part is non-empty and free of `:` and whitespace.
    pub fn validate(&self) -> GraphResult<()> {
        for (label, value) in [
            ("group", &self.group),
            ("name", &self.name),
            ("version", &self.version),
        ] {
            if value.is_empty() {
                return Err(invalid(&self.to_string(), format!("{label} is empty")));
            }
            if value.contains(':') || value.chars().any(char::is_whitespace) {
                return Err(invalid(
                    &self.to_string(),
                    format!("{label} `{value}` contains a separator or whitespace"),
                ));
            }
        }
        Ok(())
    }

    /// The version-less `group:name` key used for mediation.
    pub fn key(&self) -> ArtifactKey {
        ArtifactKey::new(&self.group, &self.name)
    }

    /// Same group and name, different version.
    pub fn with_version(&self, version: impl Into<String>) -> Self {
        Self::new(&self.group, &self.name, version)
    }

    /// Whether both identities name the same logical artifact.
    pub fn same_artifact(&self, other: &ArtifactId) -> bool {
        self.group == other.group && self.name == other.name
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

impl FromStr for ArtifactId {
    type Err = miette::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// `group:name` without a version: one logical artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactKey {
    pub group: String,
    pub name: String,
}

impl ArtifactKey {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }

    /// Parse `"group:name"`.
    pub fn parse(s: &str) -> GraphResult<Self> {
        match s.split_once(':') {
            Some((group, name))
                if !group.trim().is_empty() && !name.trim().is_empty() && !name.contains(':') =>
            {
                Ok(Self::new(group.trim(), name.trim()))
            }
            _ => Err(invalid(s, "expected group:name".to_string())),
        }
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)
    }
}

fn invalid(input: &str, reason: String) -> miette::Report {
    GraphError::InvalidIdentity {
        input: input.to_string(),
        reason,
    }
    .into()
}
