//! Mediation reporting: every place where the version bound into the graph
//! is not the version a descriptor asked for.

use std::fmt;

use pomgraph_core::identity::{ArtifactId, ArtifactKey};
use pomgraph_core::version::MavenVersion;

/// Why the requested version lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// Another declaration of the same artifact was reached first.
    NearestWins {
        bound_depth: usize,
        requested_depth: usize,
    },
    /// Dependency management replaced the declared version.
    Managed,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NearestWins {
                bound_depth,
                requested_depth,
            } => write!(
                f,
                "nearest wins: bound at depth {bound_depth}, requested at depth {requested_depth}"
            ),
            Self::Managed => write!(f, "managed"),
        }
    }
}

/// A single version conflict where a descriptor requested one version but
/// the graph holds another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConflict {
    pub key: ArtifactKey,
    pub requested: String,
    pub resolved: String,
    /// The artifact whose descriptor lost.
    pub requested_by: ArtifactId,
    pub reason: ConflictReason,
}

impl VersionConflict {
    /// Whether the graph ended up on an older version than requested.
    pub fn is_downgrade(&self) -> bool {
        MavenVersion::parse(&self.resolved) < MavenVersion::parse(&self.requested)
    }
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {} (requested by {}, {})",
            self.key, self.requested, self.resolved, self.requested_by, self.reason
        )
    }
}

/// A report of all version conflicts encountered while building a graph, in
/// the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictReport {
    conflicts: Vec<VersionConflict>,
}

impl ConflictReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, conflict: VersionConflict) {
        self.conflicts.push(conflict);
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VersionConflict> {
        self.conflicts.iter()
    }

    /// Conflicts recorded for one `group:name`, in the order they were found.
    pub fn for_key(&self, key: &ArtifactKey) -> impl Iterator<Item = &VersionConflict> + '_ {
        let key = key.clone();
        self.conflicts.iter().filter(move |c| c.key == key)
    }

    /// Conflicts where the resolved version is older than the requested one.
    pub fn downgrades(&self) -> Vec<&VersionConflict> {
        self.conflicts.iter().filter(|c| c.is_downgrade()).collect()
    }
}

impl<'a> IntoIterator for &'a ConflictReport {
    type Item = &'a VersionConflict;
    type IntoIter = std::slice::Iter<'a, VersionConflict>;

    fn into_iter(self) -> Self::IntoIter {
        self.conflicts.iter()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conflicts.is_empty() {
            return write!(f, "No version conflicts.");
        }
        writeln!(f, "Version conflicts ({}):", self.conflicts.len())?;
        for c in &self.conflicts {
            writeln!(f, "  {c}")?;
        }
        Ok(())
    }
}
