//! Structural analysis of built circuits.
//!
//! Everything here works on an [`Adjacency`] projection rather than on the
//! circuit itself:
//!
//! - [`adjacency`] - per-node fanin/fanout view and topological ordering
//! - [`paths`] - number of distinct input-to-node paths
//! - [`logic`] - 0/1/X values and primitive gate evaluation
//! - [`simulator`] - one-pass logic simulation for an input assignment
//!
//! ## Path Counting
//!
//! Every primary input starts a path. A node reachable from the inputs is on
//! as many paths as all of its fanins together, so walking the nodes in
//! topological order and summing fanin counts gives every node's count in a
//! single pass:
//!
//! ```text
//! paths(pi) = 1
//! paths(n)  = sum(paths(f) for f in fanins(n))
//! total     = sum(paths(po) for po in primary outputs)
//! ```

pub mod adjacency;
pub mod logic;
pub mod paths;
pub mod simulator;

pub use adjacency::{Adjacency, NodeEntry};
pub use logic::Logic;
pub use paths::{count_paths, PathCounts};
pub use simulator::{InputVector, SimulationResult, Simulator};
