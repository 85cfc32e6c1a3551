//! Core data types for pomgraph.
//!
//! This crate defines the values every other pomgraph crate speaks in:
//! artifact identities, declared dependencies, scopes, exclusions,
//! dependency management, Maven version ordering, the resolver interface
//! and configuration.
//!
//! This crate performs no repository I/O.

pub mod config;
pub mod dependency;
pub mod identity;
pub mod resolve;
pub mod version;
