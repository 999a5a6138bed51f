//! Error types for the netlist analyzer.
//!
//! This module provides a unified error type [`NetpathError`] that covers
//! all error conditions that can occur while reading a netlist, building the
//! circuit graph, and querying it.

use thiserror::Error;

/// Result type alias using [`NetpathError`].
pub type Result<T> = std::result::Result<T, NetpathError>;

/// Unified error type for all netlist operations.
#[derive(Error, Debug)]
pub enum NetpathError {
    // ============ Parsing Errors ============
    /// No `module <name> ( <ports> );` header was found
    #[error("Invalid Verilog format: module declaration not found")]
    ModuleNotFound,

    /// A name was declared twice
    #[error("Duplicate node name `{name}`")]
    DuplicateNode { name: String },

    /// A gate input references a name that was never declared
    #[error("Undefined node: `{name}`")]
    UndefinedNode { name: String },

    /// Gate type token outside the supported primitive set
    #[error("Unknown gate type: `{gate_type}`")]
    UnknownGateType { gate_type: String },

    // ============ Circuit Validation Errors ============
    /// Invalid circuit topology
    #[error("Invalid circuit topology: {message}")]
    InvalidTopology { message: String },

    // ============ Query Errors ============
    /// A query was issued before any circuit was loaded
    #[error("No circuit loaded")]
    NoCircuitLoaded,

    /// Path count no longer fits in a u64
    #[error("Path count overflow at node '{node}'")]
    PathCountOverflow { node: String },

    /// Bad primary input assignment for simulation
    #[error("Invalid input vector: {message}")]
    InvalidInputVector { message: String },

    /// A report could not be rendered in the requested format
    #[error("Failed to render report: {message}")]
    ReportError { message: String },

    // ============ I/O Errors ============
    /// Error reading a netlist file
    #[error("Error reading Verilog file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error walking a directory for netlist files
    #[error("Failed to scan directory '{path}': {message}")]
    ScanError { path: String, message: String },
}

impl NetpathError {
    /// Create a duplicate node error
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateNode { name: name.into() }
    }

    /// Create an undefined node error
    pub fn undefined(name: impl Into<String>) -> Self {
        Self::UndefinedNode { name: name.into() }
    }

    /// Create an invalid topology error
    pub fn topology(message: impl Into<String>) -> Self {
        Self::InvalidTopology {
            message: message.into(),
        }
    }

    /// Create an invalid input vector error
    pub fn input_vector(message: impl Into<String>) -> Self {
        Self::InvalidInputVector {
            message: message.into(),
        }
    }
}
