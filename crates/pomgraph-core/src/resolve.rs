//! The resolution interface between graph construction and whatever backend
//! knows about artifacts (a local repository, an in-memory fixture, ...).

use pomgraph_util::errors::GraphResult;

use crate::dependency::{
    DependencyDescriptor, DependencyManagement, ExclusionSet, ManagedDependency, Scope,
};
use crate::identity::ArtifactId;

/// What the graph builder asks a resolver about one artifact.
#[derive(Debug, Clone, Copy)]
pub struct ResolveRequest<'a> {
    pub identity: &'a ArtifactId,
    /// The scope the artifact is being pulled in with.
    pub scope: Scope,
    /// Exclusions accumulated from ancestors.
    pub exclusions: &'a ExclusionSet,
    /// Dependency management inherited from ancestors.
    pub management: &'a DependencyManagement,
    pub classifier: Option<&'a str>,
}

/// The binary behind an identity. `size` is `None` when it could not be
/// located; that is a valid outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    /// The identity actually resolved, which differs from the requested one
    /// when a relocation was followed.
    pub identity: ArtifactId,
    pub size: Option<u64>,
}

impl ResolvedArtifact {
    pub fn new(identity: ArtifactId, size: Option<u64>) -> Self {
        Self { identity, size }
    }

    pub fn unavailable(identity: ArtifactId) -> Self {
        Self::new(identity, None)
    }

    pub fn is_available(&self) -> bool {
        self.size.is_some()
    }

    pub fn size_or_zero(&self) -> u64 {
        self.size.unwrap_or(0)
    }
}

/// A direct dependency plus the hints that apply to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub descriptor: DependencyDescriptor,
    /// Exclusions declared on this dependency.
    pub exclusions: ExclusionSet,
    /// Override the resolver wants applied to this dependency.
    pub managed: Option<ManagedDependency>,
    pub optional: bool,
    pub classifier: Option<String>,
}

impl ResolvedDependency {
    pub fn new(descriptor: DependencyDescriptor) -> Self {
        Self {
            descriptor,
            exclusions: ExclusionSet::new(),
            managed: None,
            optional: false,
            classifier: None,
        }
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn with_managed(mut self, managed: ManagedDependency) -> Self {
        self.managed = Some(managed);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }
}

/// Everything a resolver knows about one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub artifact: ResolvedArtifact,
    /// Direct dependencies in declaration order.
    pub dependencies: Vec<ResolvedDependency>,
    /// The artifact's own dependency-management section. It applies to the
    /// artifact's descendants, below anything its ancestors manage.
    pub management: DependencyManagement,
}

impl Resolution {
    /// A resolution for an artifact nothing could be learned about.
    pub fn unresolved(identity: ArtifactId) -> Self {
        Self {
            artifact: ResolvedArtifact::unavailable(identity),
            dependencies: Vec::new(),
            management: DependencyManagement::new(),
        }
    }
}

/// A backend that can describe artifacts.
///
/// Failures are per artifact: the graph builder absorbs an `Err` and keeps
/// traversing. Timeouts, if any, belong to the implementation.
pub trait ArtifactResolver {
    fn resolve(&self, request: &ResolveRequest<'_>) -> GraphResult<Resolution>;
}

impl<R: ArtifactResolver + ?Sized> ArtifactResolver for &R {
    fn resolve(&self, request: &ResolveRequest<'_>) -> GraphResult<Resolution> {
        (**self).resolve(request)
    }
}

impl<R: ArtifactResolver + ?Sized> ArtifactResolver for Box<R> {
    fn resolve(&self, request: &ResolveRequest<'_>) -> GraphResult<Resolution> {
        (**self).resolve(request)
    }
}
