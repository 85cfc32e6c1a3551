//! The resolved dependency graph.
//!
//! At most one vertex exists per `group:name`. Edges keep the descriptor the
//! declaring artifact wrote, so an edge may point at a vertex whose version
//! differs from the version the descriptor asked for.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef as _;
use petgraph::Direction;
use pomgraph_core::dependency::DependencyDescriptor;
use pomgraph_core::identity::{ArtifactId, ArtifactKey};
use pomgraph_core::resolve::ResolvedArtifact;

use crate::conflict::ConflictReport;

pub type VertexId = NodeIndex;

/// Vertex payload: the identity mediation bound for this `group:name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
    identity: ArtifactId,
    artifact: ResolvedArtifact,
    depth: usize,
}

impl Vertex {
    pub fn identity(&self) -> &ArtifactId {
        &self.identity
    }

    /// What the resolver found for this vertex. Its identity differs from
    /// [`Vertex::identity`] when the artifact was relocated.
    pub fn resolved_artifact(&self) -> &ResolvedArtifact {
        &self.artifact
    }

    /// Breadth-first depth at which the vertex was first discovered.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn key(&self) -> ArtifactKey {
        self.identity.key()
    }
}

/// A dependency graph rooted at one artifact, backed by petgraph.
#[derive(Debug, Clone)]
pub struct Graph {
    graph: DiGraph<Vertex, DependencyDescriptor>,
    /// Mediation ledger: the single vertex bound to each `group:name`.
    registry: HashMap<ArtifactKey, VertexId>,
    root: VertexId,
    conflicts: ConflictReport,
}

impl Graph {
    /// A graph holding only the root vertex.
    pub(crate) fn new(root: &ArtifactId) -> Self {
        let mut graph = DiGraph::new();
        let idx = graph.add_node(Vertex {
            identity: root.clone(),
            artifact: ResolvedArtifact::unavailable(root.clone()),
            depth: 0,
        });
        let mut registry = HashMap::new();
        registry.insert(root.key(), idx);
        Self {
            graph,
            registry,
            root: idx,
            conflicts: ConflictReport::new(),
        }
    }

    /// Return the vertex bound to `identity`'s `group:name`, creating it if
    /// the key is unbound. An existing vertex is returned unchanged even if
    /// its version differs.
    pub(crate) fn find_or_create_vertex(
        &mut self,
        identity: &ArtifactId,
        depth: usize,
    ) -> VertexId {
        let key = identity.key();
        if let Some(&idx) = self.registry.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(Vertex {
            identity: identity.clone(),
            artifact: ResolvedArtifact::unavailable(identity.clone()),
            depth,
        });
        self.registry.insert(key, idx);
        idx
    }

    /// Append an edge. Outgoing edges are reported in insertion order.
    pub(crate) fn add_edge(
        &mut self,
        from: VertexId,
        descriptor: DependencyDescriptor,
        to: VertexId,
    ) {
        self.graph.add_edge(from, to, descriptor);
    }

    /// Bind an additional key to an existing vertex, for an artifact that
    /// was relocated away from the key it was requested under. Returns the
    /// vertex already bound to `key` instead, if there is one.
    pub(crate) fn bind_alias(&mut self, key: ArtifactKey, idx: VertexId) -> VertexId {
        *self.registry.entry(key).or_insert(idx)
    }

    pub(crate) fn set_resolved_artifact(&mut self, idx: VertexId, artifact: ResolvedArtifact) {
        self.graph[idx].artifact = artifact;
    }

    pub(crate) fn conflicts_mut(&mut self) -> &mut ConflictReport {
        &mut self.conflicts
    }

    pub fn root(&self) -> VertexRef<'_> {
        self.vertex(self.root)
    }

    pub fn root_id(&self) -> VertexId {
        self.root
    }

    /// Handle for a vertex id obtained from this graph.
    pub fn vertex(&self, idx: VertexId) -> VertexRef<'_> {
        VertexRef { graph: self, idx }
    }

    /// Look up the vertex bound to `group:name`.
    pub fn find(&self, key: &ArtifactKey) -> Option<VertexRef<'_>> {
        self.registry.get(key).map(|&idx| self.vertex(idx))
    }

    /// Look up a vertex by `group:name`, falling back to a bare name match.
    pub fn lookup(&self, query: &str) -> Option<VertexRef<'_>> {
        if let Ok(key) = ArtifactKey::parse(query) {
            if let Some(v) = self.find(&key) {
                return Some(v);
            }
        }
        self.vertices().find(|v| v.identity().name == query)
    }

    /// All vertices in discovery order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexRef<'_>> {
        self.graph.node_indices().map(|idx| self.vertex(idx))
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'_>> {
        self.graph
            .edge_indices()
            .map(|idx| EdgeRef { graph: self, idx })
    }

    pub fn outgoing_edges(&self, idx: VertexId) -> Vec<EdgeRef<'_>> {
        self.edges_directed(idx, Direction::Outgoing)
    }

    /// Edges pointing at a vertex: who depends on it.
    pub fn incoming_edges(&self, idx: VertexId) -> Vec<EdgeRef<'_>> {
        self.edges_directed(idx, Direction::Incoming)
    }

    fn edges_directed(&self, idx: VertexId, dir: Direction) -> Vec<EdgeRef<'_>> {
        let mut ids: Vec<EdgeIndex> = self.graph.edges_directed(idx, dir).map(|e| e.id()).collect();
        // petgraph walks adjacency lists newest-first
        ids.sort();
        ids.into_iter().map(|idx| EdgeRef { graph: self, idx }).collect()
    }

    /// Path of vertices from the root to the vertex matching `query`
    /// (`group:name` or bare name).
    pub fn find_path(&self, query: &str) -> Option<Vec<VertexRef<'_>>> {
        let target = self.lookup(query)?.id();
        let mut path = Vec::new();
        let mut visited = HashSet::new();
        if self.dfs_path(self.root, target, &mut path, &mut visited) {
            Some(path.into_iter().map(|idx| self.vertex(idx)).collect())
        } else {
            None
        }
    }

    fn dfs_path(
        &self,
        current: VertexId,
        target: VertexId,
        path: &mut Vec<VertexId>,
        visited: &mut HashSet<VertexId>,
    ) -> bool {
        path.push(current);
        if current == target {
            return true;
        }
        if visited.insert(current) {
            for edge in self.outgoing_edges(current) {
                if self.dfs_path(edge.to_id(), target, path, visited) {
                    return true;
                }
            }
        }
        path.pop();
        false
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Sum of the sizes of every resolved artifact whose binary was found.
    /// An artifact reached under several identities is counted once.
    pub fn total_size(&self) -> u64 {
        let mut seen = HashSet::new();
        self.graph
            .node_indices()
            .map(|idx| &self.graph[idx].artifact)
            .filter(|artifact| seen.insert(&artifact.identity))
            .map(ResolvedArtifact::size_or_zero)
            .sum()
    }

    /// Mediation decisions taken while building the graph.
    pub fn conflicts(&self) -> &ConflictReport {
        &self.conflicts
    }
}

/// A vertex borrowed from a [`Graph`].
#[derive(Clone, Copy)]
pub struct VertexRef<'g> {
    graph: &'g Graph,
    idx: VertexId,
}

impl<'g> VertexRef<'g> {
    pub fn id(&self) -> VertexId {
        self.idx
    }

    pub fn data(&self) -> &'g Vertex {
        &self.graph.graph[self.idx]
    }

    pub fn identity(&self) -> &'g ArtifactId {
        &self.data().identity
    }

    pub fn resolved_artifact(&self) -> &'g ResolvedArtifact {
        &self.data().artifact
    }

    pub fn depth(&self) -> usize {
        self.data().depth
    }

    /// Outgoing edges in declaration order.
    pub fn outgoing_edges(&self) -> Vec<EdgeRef<'g>> {
        self.graph.outgoing_edges(self.idx)
    }
}

impl std::fmt::Debug for VertexRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("VertexRef").field(self.identity()).finish()
    }
}

/// An edge borrowed from a [`Graph`].
#[derive(Clone, Copy)]
pub struct EdgeRef<'g> {
    graph: &'g Graph,
    idx: EdgeIndex,
}

impl<'g> EdgeRef<'g> {
    pub fn from_id(&self) -> VertexId {
        self.endpoints().0
    }

    pub fn to_id(&self) -> VertexId {
        self.endpoints().1
    }

    pub fn from(&self) -> VertexRef<'g> {
        self.graph.vertex(self.from_id())
    }

    pub fn to(&self) -> VertexRef<'g> {
        self.graph.vertex(self.to_id())
    }

    /// The dependency as declared, including the requested version.
    pub fn descriptor(&self) -> &'g DependencyDescriptor {
        &self.graph.graph[self.idx]
    }

    fn endpoints(&self) -> (VertexId, VertexId) {
        self.graph
            .graph
            .edge_endpoints(self.idx)
            .unwrap_or((self.graph.root, self.graph.root))
    }
}

impl std::fmt::Debug for EdgeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeRef")
            .field("descriptor", self.descriptor())
            .field("to", self.to().identity())
            .finish()
    }
}
