// src/dag/mod.rs

//! Dependency graph algorithms.
//!
//! - [`graph`] holds the prerequisite map built from a job collection.
//! - [`resolver`] turns it into concurrency tiers (and detects cycles).
//! - [`reachability`] answers "who transitively depends on this job?".

pub mod graph;
pub mod reachability;
pub mod resolver;

pub use graph::DependencyGraph;
pub use reachability::ReverseReachability;
pub use resolver::{Tier, resolve_tiers};
