//! Declared dependencies and the per-edge context that travels with them:
//! scopes, exclusions and dependency management.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::{ArtifactId, ArtifactKey};

/// Maven-compatible dependency scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Compile,
    Runtime,
    Provided,
    Test,
    System,
    Import,
}

impl Scope {
    /// Parse a scope string exactly as it appears in a POM.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "compile" => Some(Self::Compile),
            "runtime" => Some(Self::Runtime),
            "provided" => Some(Self::Provided),
            "test" => Some(Self::Test),
            "system" => Some(Self::System),
            "import" => Some(Self::Import),
            _ => None,
        }
    }

    /// Like [`Scope::parse`], but an empty or unknown scope counts as `compile`.
    pub fn parse_lenient(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            if !s.trim().is_empty() {
                tracing::debug!("Unknown scope `{s}`, treating as compile");
            }
            Self::Compile
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compile => "compile",
            Self::Runtime => "runtime",
            Self::Provided => "provided",
            Self::Test => "test",
            Self::System => "system",
            Self::Import => "import",
        }
    }

    /// The scope a transitive dependency ends up in, given the scope its
    /// parent was requested in and the scope it was declared with.
    pub fn propagate(self, declared: Scope) -> Scope {
        use Scope::*;
        match (self, declared) {
            (Compile, Compile) => Compile,
            (Compile, Runtime) | (Runtime, Compile) | (Runtime, Runtime) => Runtime,
            (Test, _) | (_, Test) => Test,
            (Provided, _) | (_, Provided) => Provided,
            (System, _) | (_, System) => System,
            _ => Compile,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared dependency edge, recorded as the declaring artifact wrote it.
///
/// `to` carries the version that was asked for; mediation may bind the edge
/// to a vertex of another version, but the descriptor itself never changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyDescriptor {
    pub from: ArtifactId,
    pub to: ArtifactId,
    pub scope: String,
}

impl DependencyDescriptor {
    pub fn new(from: ArtifactId, to: ArtifactId, scope: impl Into<String>) -> Self {
        Self {
            from,
            to,
            scope: scope.into(),
        }
    }

    /// Shorthand for a `compile` dependency.
    pub fn compile(from: ArtifactId, to: ArtifactId) -> Self {
        Self::new(from, to, Scope::Compile.as_str())
    }

    pub fn declared_version(&self) -> &str {
        &self.to.version
    }

    pub fn scope(&self) -> Scope {
        Scope::parse_lenient(&self.scope)
    }
}

impl fmt::Display for DependencyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.from, self.to, self.scope)
    }
}

const WILDCARD: &str = "*";

/// Keys whose artifacts must not appear below the point the exclusion was
/// declared. Either part of a key may be `*`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    keys: BTreeSet<ArtifactKey>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: ArtifactKey) -> bool {
        self.keys.insert(key)
    }

    /// Exclude every artifact of a group.
    pub fn insert_group(&mut self, group: impl Into<String>) -> bool {
        self.keys.insert(ArtifactKey::new(group, WILDCARD))
    }

    pub fn matches(&self, key: &ArtifactKey) -> bool {
        self.keys.iter().any(|excl| {
            (excl.group == WILDCARD || excl.group == key.group)
                && (excl.name == WILDCARD || excl.name == key.name)
        })
    }

    /// A new set containing the exclusions of both sets.
    pub fn union(&self, other: &ExclusionSet) -> ExclusionSet {
        ExclusionSet {
            keys: self.keys.union(&other.keys).cloned().collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArtifactKey> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<ArtifactKey> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = ArtifactKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

/// A `<dependencyManagement>` entry: the version and/or scope to force on an
/// artifact wherever it shows up below the declaring artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagedDependency {
    pub version: Option<String>,
    pub scope: Option<String>,
}

impl ManagedDependency {
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            scope: None,
        }
    }

    pub fn with_scope(scope: impl Into<String>) -> Self {
        Self {
            version: None,
            scope: Some(scope.into()),
        }
    }
}

/// Dependency-management context keyed by `group:name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyManagement {
    entries: BTreeMap<ArtifactKey, ManagedDependency>,
}

impl DependencyManagement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: ArtifactKey, managed: ManagedDependency) {
        self.entries.insert(key, managed);
    }

    pub fn get(&self, key: &ArtifactKey) -> Option<&ManagedDependency> {
        self.entries.get(key)
    }

    /// Managed version for a key, if any.
    pub fn version_of(&self, key: &ArtifactKey) -> Option<&str> {
        self.entries.get(key).and_then(|m| m.version.as_deref())
    }

    /// Derive a child context: entries already present here came from an
    /// ancestor nearer the root and win over the entries in `own`.
    pub fn extended_with(&self, own: &DependencyManagement) -> DependencyManagement {
        let mut merged = self.clone();
        for (key, managed) in &own.entries {
            merged
                .entries
                .entry(key.clone())
                .or_insert_with(|| managed.clone());
        }
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArtifactKey, &ManagedDependency)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(ArtifactKey, ManagedDependency)> for DependencyManagement {
    fn from_iter<I: IntoIterator<Item = (ArtifactKey, ManagedDependency)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
