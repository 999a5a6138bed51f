//! # Netpath Core
//!
//! Structural analysis of gate-level combinational netlists.
//!
//! This library provides:
//! - A parser for the declarative gate-level Verilog subset used by the
//!   ISCAS benchmark circuits
//! - An explicit node graph with fan-out normalized into branch nodes
//! - Counting of distinct primary-input-to-primary-output paths
//! - Three-valued (0/1/X) logic simulation
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`verilog`] - Lexer and statement parser for the netlist subset
//! - [`circuit`] - Circuit graph construction, normalization and validation
//! - [`analysis`] - Adjacency projection, path counting and logic simulation
//! - [`session`] - Report-oriented query surface for front ends
//! - `scan` - Netlist file discovery (CLI only)
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! netpath paths c17.v
//! netpath simulate c17.v --inputs N1=1,N2=0,N3=1,N6=1,N7=0
//! ```
//!
//! ### Library
//!
//! ```
//! use netpath_core::{analysis::{count_paths, Adjacency}, verilog};
//!
//! let circuit = verilog::parse("module m(a,b,y); input a,b; output y; AND g1(y,a,b);")?;
//! let counts = count_paths(&Adjacency::new(&circuit))?;
//! assert_eq!(counts.total(), 2);
//! # Ok::<(), netpath_core::NetpathError>(())
//! ```
//!
//! ## Graph Construction
//!
//! Parsing creates one node per primary input, primary output, declared wire
//! and gate instance, and connects instance outputs and inputs by name. A
//! final pass replaces every multi-target fan-out with one branch node per
//! target, so afterwards only branch nodes split a signal. Node identities
//! start at 1 and follow creation order.

pub mod analysis;
pub mod circuit;
pub mod error;
pub mod session;
pub mod verilog;

#[cfg(feature = "cli")]
pub mod logging;

#[cfg(feature = "cli")]
pub mod scan;

// Re-export main types for convenience
pub use circuit::Circuit;
pub use error::{NetpathError, Result};
pub use session::{
    adjacency_report, circuit_summary, load_circuit, path_report, simulation_report, Session,
};
