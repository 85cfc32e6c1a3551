//! Breadth-first graph construction with "nearest wins" mediation.
//!
//! The first declaration of a `group:name` reached in FIFO order binds its
//! version for the whole graph. Later declarations of the same key get an
//! edge to the bound vertex and are never explored, which is also what makes
//! cycles terminate.

use std::collections::VecDeque;

use pomgraph_core::config::{ExclusionPropagation, GraphConfig, ScopePolicy};
use pomgraph_core::dependency::{DependencyManagement, ExclusionSet, Scope};
use pomgraph_core::identity::ArtifactId;
use pomgraph_core::resolve::{ArtifactResolver, Resolution, ResolveRequest, ResolvedDependency};
use pomgraph_util::errors::GraphResult;

use crate::conflict::{ConflictReason, VersionConflict};
use crate::graph::{Graph, VertexId};

/// An artifact waiting to have its dependencies expanded.
struct WorkItem {
    vertex: VertexId,
    identity: ArtifactId,
    scope: Scope,
    exclusions: ExclusionSet,
    management: DependencyManagement,
    classifier: Option<String>,
    depth: usize,
}

/// Builds dependency graphs by asking an [`ArtifactResolver`] about each
/// artifact it reaches.
pub struct GraphBuilder<R> {
    resolver: R,
    policy: ScopePolicy,
    propagation: ExclusionPropagation,
}

impl<R: ArtifactResolver> GraphBuilder<R> {
    /// A builder with the default scope and exclusion policies.
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            policy: ScopePolicy::default(),
            propagation: ExclusionPropagation::default(),
        }
    }

    /// A builder using the `[scopes]` and `[exclusions]` sections of `config`.
    pub fn with_config(resolver: R, config: &GraphConfig) -> Self {
        Self {
            resolver,
            policy: config.scopes,
            propagation: config.exclusions.propagation,
        }
    }

    /// Replace the policy deciding which scopes become edges.
    pub fn scope_policy(mut self, policy: ScopePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Choose whether exclusions reach the whole subtree or one level.
    pub fn exclusion_propagation(mut self, propagation: ExclusionPropagation) -> Self {
        self.propagation = propagation;
        self
    }

    /// Build the graph reachable from `root`.
    ///
    /// Only a malformed root identity is an error. Artifacts the resolver
    /// cannot describe become vertices without a size and without children.
    pub fn build_graph(&self, root: &ArtifactId) -> GraphResult<Graph> {
        root.validate()?;

        let mut graph = Graph::new(root);
        let mut queue = VecDeque::new();
        queue.push_back(WorkItem {
            vertex: graph.root_id(),
            identity: root.clone(),
            scope: Scope::Compile,
            exclusions: ExclusionSet::new(),
            management: DependencyManagement::new(),
            classifier: None,
            depth: 0,
        });

        while let Some(item) = queue.pop_front() {
            let resolution = self.resolve(&item);
            let actual = resolution.artifact.identity.key();
            graph.set_resolved_artifact(item.vertex, resolution.artifact);

            // A relocated artifact is expanded once, under whichever vertex
            // bound its actual key first.
            if actual != item.identity.key() {
                let owner = graph.bind_alias(actual, item.vertex);
                if owner != item.vertex {
                    tracing::debug!("{} relocates onto an existing vertex", item.identity);
                    continue;
                }
            }

            let child_management = item.management.extended_with(&resolution.management);
            for dep in resolution.dependencies {
                if let Some(child) = self.expand(&mut graph, &item, dep, &child_management) {
                    queue.push_back(child);
                }
            }
        }

        tracing::info!(
            "Built graph for {root}: {} vertices, {} edges, {} conflicts",
            graph.vertex_count(),
            graph.edge_count(),
            graph.conflicts().len()
        );
        Ok(graph)
    }

    fn resolve(&self, item: &WorkItem) -> Resolution {
        let request = ResolveRequest {
            identity: &item.identity,
            scope: item.scope,
            exclusions: &item.exclusions,
            management: &item.management,
            classifier: item.classifier.as_deref(),
        };
        match self.resolver.resolve(&request) {
            Ok(resolution) => resolution,
            Err(e) => {
                tracing::warn!("Could not resolve {}: {e}", item.identity);
                Resolution::unresolved(item.identity.clone())
            }
        }
    }

    /// Apply filtering and mediation to one declared dependency of `item`,
    /// adding its edge. Returns the work item for a newly bound vertex.
    fn expand(
        &self,
        graph: &mut Graph,
        item: &WorkItem,
        dep: ResolvedDependency,
        child_management: &DependencyManagement,
    ) -> Option<WorkItem> {
        let declared = &dep.descriptor.to;
        if let Err(e) = declared.validate() {
            tracing::warn!("Skipping malformed dependency of {}: {e}", item.identity);
            return None;
        }

        let key = declared.key();
        if item.exclusions.matches(&key) {
            tracing::debug!("Excluded {key} below {}", item.identity);
            return None;
        }

        let context = item.management.get(&key);
        let hint = dep.managed.as_ref();
        let managed_scope = hint
            .and_then(|m| m.scope.as_deref())
            .or_else(|| context.and_then(|m| m.scope.as_deref()));
        let scope = Scope::parse_lenient(managed_scope.unwrap_or(&dep.descriptor.scope));
        if !self.policy.admits(scope, item.depth, dep.optional) {
            tracing::debug!(
                "Skipping {declared} ({scope}{}) below {}",
                if dep.optional { ", optional" } else { "" },
                item.identity
            );
            return None;
        }

        let version = hint
            .and_then(|m| m.version.as_deref())
            .or_else(|| context.and_then(|m| m.version.as_deref()))
            .unwrap_or(&declared.version);

        if let Some(bound) = graph.find(&key) {
            let bound_id = bound.id();
            // aliases carry the relocated version on their resolved artifact
            let bound_version = if bound.identity().key() == key {
                bound.identity().version.clone()
            } else {
                bound.resolved_artifact().identity.version.clone()
            };
            let bound_depth = bound.depth();
            if bound_version != version {
                tracing::debug!("{key}: keeping {bound_version} over {version}");
                graph.conflicts_mut().add(VersionConflict {
                    key,
                    requested: version.to_string(),
                    resolved: bound_version,
                    requested_by: item.identity.clone(),
                    reason: ConflictReason::NearestWins {
                        bound_depth,
                        requested_depth: item.depth + 1,
                    },
                });
            }
            graph.add_edge(item.vertex, dep.descriptor, bound_id);
            return None;
        }

        let identity = declared.with_version(version);
        let depth = item.depth + 1;
        let vertex = graph.find_or_create_vertex(&identity, depth);
        if version != declared.version {
            graph.conflicts_mut().add(VersionConflict {
                key,
                requested: declared.version.clone(),
                resolved: version.to_string(),
                requested_by: item.identity.clone(),
                reason: ConflictReason::Managed,
            });
        }

        let exclusions = match self.propagation {
            ExclusionPropagation::Transitive => item.exclusions.union(&dep.exclusions),
            ExclusionPropagation::Direct => dep.exclusions,
        };
        graph.add_edge(item.vertex, dep.descriptor, vertex);

        Some(WorkItem {
            vertex,
            identity,
            scope: item.scope.propagate(scope),
            exclusions,
            management: child_management.clone(),
            classifier: dep.classifier,
            depth,
        })
    }
}
