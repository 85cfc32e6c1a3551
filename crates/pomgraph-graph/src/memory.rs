//! A resolver backed by in-memory tables, for callers that already know the
//! artifacts (and for tests).

use std::collections::{HashMap, HashSet};

use pomgraph_core::dependency::{DependencyManagement, ManagedDependency};
use pomgraph_core::identity::{ArtifactId, ArtifactKey};
use pomgraph_core::resolve::{
    ArtifactResolver, Resolution, ResolveRequest, ResolvedArtifact, ResolvedDependency,
};
use pomgraph_util::errors::{GraphError, GraphResult};

const DEFAULT_RELOCATION_LIMIT: usize = 8;

#[derive(Debug, Clone, Default)]
struct Entry {
    size: Option<u64>,
    dependencies: Vec<ResolvedDependency>,
    management: DependencyManagement,
}

/// Resolver over artifacts registered up front.
///
/// Unknown identities resolve to `NotFound`. Identities registered with
/// [`InMemoryResolver::fail`] always return an error.
#[derive(Debug, Clone)]
pub struct InMemoryResolver {
    artifacts: HashMap<ArtifactId, Entry>,
    relocations: HashMap<ArtifactId, ArtifactId>,
    failing: HashSet<ArtifactId>,
    relocation_limit: usize,
}

impl Default for InMemoryResolver {
    fn default() -> Self {
        Self {
            artifacts: HashMap::new(),
            relocations: HashMap::new(),
            failing: HashSet::new(),
            relocation_limit: DEFAULT_RELOCATION_LIMIT,
        }
    }
}

impl InMemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_relocation_limit(mut self, limit: usize) -> Self {
        self.relocation_limit = limit;
        self
    }

    /// Register an artifact. `None` means the artifact is known but its
    /// binary is missing.
    pub fn insert(&mut self, id: ArtifactId, size: Option<u64>) -> &mut Self {
        self.artifacts.entry(id).or_default().size = size;
        self
    }

    /// Append a direct dependency to `from`, registering `from` if needed.
    pub fn declare(&mut self, from: &ArtifactId, dependency: ResolvedDependency) -> &mut Self {
        self.artifacts
            .entry(from.clone())
            .or_default()
            .dependencies
            .push(dependency);
        self
    }

    /// Add an entry to `owner`'s dependency-management section.
    pub fn manage(
        &mut self,
        owner: &ArtifactId,
        key: ArtifactKey,
        managed: ManagedDependency,
    ) -> &mut Self {
        self.artifacts
            .entry(owner.clone())
            .or_default()
            .management
            .insert(key, managed);
        self
    }

    pub fn relocate(&mut self, from: ArtifactId, to: ArtifactId) -> &mut Self {
        self.relocations.insert(from, to);
        self
    }

    /// Make every request for `id` fail.
    pub fn fail(&mut self, id: ArtifactId) -> &mut Self {
        self.failing.insert(id);
        self
    }

    fn follow_relocations(&self, id: &ArtifactId) -> GraphResult<ArtifactId> {
        let mut current = id.clone();
        for _ in 0..=self.relocation_limit {
            match self.relocations.get(&current) {
                Some(next) => current = next.clone(),
                None => return Ok(current),
            }
        }
        Err(GraphError::Relocation {
            message: format!(
                "{id} exceeds {} relocation hops",
                self.relocation_limit
            ),
        }
        .into())
    }
}

impl ArtifactResolver for InMemoryResolver {
    fn resolve(&self, request: &ResolveRequest<'_>) -> GraphResult<Resolution> {
        if self.failing.contains(request.identity) {
            return Err(GraphError::Generic {
                message: format!("Resolution of {} failed", request.identity),
            }
            .into());
        }

        let target = self.follow_relocations(request.identity)?;
        if target != *request.identity {
            tracing::debug!("{} relocated to {target}", request.identity);
        }
        let entry = self.artifacts.get(&target).ok_or_else(|| GraphError::NotFound {
            coordinate: target.to_string(),
        })?;

        let dependencies = entry
            .dependencies
            .iter()
            .filter(|dep| !request.exclusions.matches(&dep.descriptor.to.key()))
            .map(|dep| {
                let mut dep = dep.clone();
                if dep.managed.is_none() {
                    dep.managed = request
                        .management
                        .get(&dep.descriptor.to.key())
                        .cloned();
                }
                dep
            })
            .collect();

        Ok(Resolution {
            artifact: ResolvedArtifact::new(target, entry.size),
            dependencies,
            management: entry.management.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomgraph_core::dependency::{DependencyDescriptor, ExclusionSet, Scope};

    fn id(name: &str, version: &str) -> ArtifactId {
        ArtifactId::new("org.example", name, version)
    }

    fn request<'a>(
        identity: &'a ArtifactId,
        exclusions: &'a ExclusionSet,
        management: &'a DependencyManagement,
    ) -> ResolveRequest<'a> {
        ResolveRequest {
            identity,
            scope: Scope::Compile,
            exclusions,
            management,
            classifier: None,
        }
    }

    #[test]
    fn unknown_artifact_is_not_found() {
        let resolver = InMemoryResolver::new();
        let (ex, mgmt) = (ExclusionSet::new(), DependencyManagement::new());
        let err = resolver
            .resolve(&request(&id("a", "1.0"), &ex, &mgmt))
            .unwrap_err();
        assert!(err.to_string().contains("Artifact not found"));
    }

    #[test]
    fn relocation_is_followed() {
        let mut resolver = InMemoryResolver::new();
        resolver
            .insert(id("new", "2.0"), Some(7))
            .relocate(id("old", "1.0"), id("new", "2.0"));
        let (ex, mgmt) = (ExclusionSet::new(), DependencyManagement::new());
        let res = resolver
            .resolve(&request(&id("old", "1.0"), &ex, &mgmt))
            .unwrap();
        assert_eq!(res.artifact.identity, id("new", "2.0"));
        assert_eq!(res.artifact.size, Some(7));
    }

    #[test]
    fn relocation_cycle_is_an_error() {
        let mut resolver = InMemoryResolver::new().with_relocation_limit(3);
        resolver
            .relocate(id("a", "1.0"), id("b", "1.0"))
            .relocate(id("b", "1.0"), id("a", "1.0"));
        let (ex, mgmt) = (ExclusionSet::new(), DependencyManagement::new());
        let err = resolver
            .resolve(&request(&id("a", "1.0"), &ex, &mgmt))
            .unwrap_err();
        assert!(err.to_string().contains("Relocation error"));
    }

    #[test]
    fn management_hint_is_filled_in() {
        let mut resolver = InMemoryResolver::new();
        resolver.declare(
            &id("a", "1.0"),
            ResolvedDependency::new(DependencyDescriptor::compile(id("a", "1.0"), id("b", "1.0"))),
        );
        let ex = ExclusionSet::new();
        let mut mgmt = DependencyManagement::new();
        mgmt.insert(
            ArtifactKey::new("org.example", "b"),
            ManagedDependency::with_version("2.0"),
        );
        let res = resolver
            .resolve(&request(&id("a", "1.0"), &ex, &mgmt))
            .unwrap();
        assert_eq!(
            res.dependencies[0].managed,
            Some(ManagedDependency::with_version("2.0"))
        );
    }
}
