//! Local Maven repository access: POM parsing, repository layout, and an
//! [`ArtifactResolver`](pomgraph_core::resolve::ArtifactResolver) that reads
//! a `~/.m2/repository`-style directory.

pub mod pom;
pub mod repository;
pub mod resolver;
