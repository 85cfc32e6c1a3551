//! Dependency graph construction: breadth-first traversal with Maven's
//! "nearest wins" mediation, exclusions, dependency management and edge
//! rewriting onto the winning vertex.

pub mod builder;
pub mod conflict;
pub mod graph;
pub mod memory;
