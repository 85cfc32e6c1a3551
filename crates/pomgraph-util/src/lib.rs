//! Shared utilities for pomgraph.
//!
//! This crate provides the cross-cutting concerns used by the other pomgraph
//! crates: the unified error type and a few filesystem helpers.

pub mod errors;
pub mod fs;
