//! Circuit graph representation and validation.
//!
//! This module provides the in-memory graph built from a parsed netlist.
//! Nodes live in an arena owned by the [`Circuit`] and refer to each other by
//! [`NodeId`]; the [`CircuitBuilder`] is the only place the graph is mutated.

mod builder;
mod graph;
mod types;
mod validate;

pub use builder::CircuitBuilder;
pub use graph::Circuit;
pub use types::*;
pub use validate::validate_circuit;
