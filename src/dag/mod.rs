// src/dag/mod.rs

//! Dependency graph and ordering.
//!
//! - [`graph`] builds and validates the prerequisite graph (unknown names,
//!   duplicates, cycles with a concrete witness).
//! - [`order`] linearizes a validated graph with an explicit tie-break.

pub mod graph;
pub mod order;

pub use graph::DependencyGraph;
pub use order::{order, OrderedTask, TaskOrder};
