//! Query surface for front ends.
//!
//! The free functions build a report from a circuit in one call. [`Session`]
//! keeps the most recently loaded circuit (and its adjacency projection) so a
//! front end can issue several queries against it, and reports
//! [`NetpathError::NoCircuitLoaded`] when queried before anything is loaded.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::analysis::{adjacency, count_paths, Adjacency, InputVector, Logic, NodeEntry, Simulator};
use crate::circuit::{Circuit, NodeId};
use crate::error::{NetpathError, Result};
use crate::verilog;

/// Headline numbers for a circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircuitSummary {
    pub name: String,
    pub input_count: usize,
    pub output_count: usize,
    pub total_node_count: usize,
}

impl fmt::Display for CircuitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Circuit: {}", self.name)?;
        writeln!(f, "Inputs: {}", self.input_count)?;
        writeln!(f, "Outputs: {}", self.output_count)?;
        writeln!(f, "Total Nodes: {}", self.total_node_count)
    }
}

/// Fanin/fanout listing of every node, in identity order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdjacencyReport {
    pub circuit: String,
    pub nodes: Vec<NodeEntry>,
}

impl fmt::Display for AdjacencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        adjacency::write_listing(f, &self.circuit, &self.nodes)
    }
}

/// Per-node path counts and their total at the primary outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathReport {
    pub circuit: String,
    pub per_node: BTreeMap<NodeId, u64>,
    pub total: u64,
    #[serde(skip)]
    names: BTreeMap<NodeId, String>,
}

impl fmt::Display for PathReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Path Counts:")?;
        writeln!(f, "------------")?;
        for (id, count) in &self.per_node {
            let name = self.names.get(id).map(String::as_str).unwrap_or("?");
            writeln!(f, "Node {} ({}): {} paths", id, name, count)?;
        }
        writeln!(f, "------------")?;
        writeln!(f, "Total paths in circuit: {}", self.total)
    }
}

/// One node's value in a simulation report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeValue {
    pub id: NodeId,
    pub name: String,
    pub value: Logic,
}

/// Node and primary output values for one input assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub circuit: String,
    pub nodes: Vec<NodeValue>,
    pub outputs: Vec<NodeValue>,
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Node Values:")?;
        for node in &self.nodes {
            writeln!(f, "  {} ({}): {}", node.id, node.name, node.value)?;
        }
        writeln!(f, "## Primary Output Values:")?;
        for node in &self.outputs {
            writeln!(f, "  {}: {}", node.name, node.value)?;
        }
        Ok(())
    }
}

/// Parse a netlist file into a circuit.
pub fn load_circuit(path: impl AsRef<Path>) -> Result<Circuit> {
    verilog::parse_file(path.as_ref())
}

pub fn circuit_summary(circuit: &Circuit) -> CircuitSummary {
    CircuitSummary {
        name: circuit.name().to_string(),
        input_count: circuit.input_count(),
        output_count: circuit.output_count(),
        total_node_count: circuit.node_count(),
    }
}

pub fn adjacency_report(circuit: &Circuit) -> AdjacencyReport {
    report_adjacency(&Adjacency::new(circuit))
}

pub fn path_report(circuit: &Circuit) -> Result<PathReport> {
    report_paths(&Adjacency::new(circuit))
}

pub fn simulation_report(circuit: &Circuit, inputs: &InputVector) -> Result<SimulationReport> {
    report_simulation(&Adjacency::new(circuit), inputs)
}

fn report_adjacency(adjacency: &Adjacency) -> AdjacencyReport {
    AdjacencyReport {
        circuit: adjacency.name().to_string(),
        nodes: adjacency.entries().to_vec(),
    }
}

fn report_paths(adjacency: &Adjacency) -> Result<PathReport> {
    let counts = count_paths(adjacency)?;
    let total = counts.total();
    Ok(PathReport {
        circuit: adjacency.name().to_string(),
        per_node: counts.into_map(),
        total,
        names: adjacency
            .entries()
            .iter()
            .map(|e| (e.id, e.name.clone()))
            .collect(),
    })
}

fn report_simulation(adjacency: &Adjacency, inputs: &InputVector) -> Result<SimulationReport> {
    let result = Simulator::new(adjacency).simulate(inputs)?;
    let value_of = |entry: &NodeEntry| NodeValue {
        id: entry.id,
        name: entry.name.clone(),
        value: result.value(entry.id).unwrap_or_default(),
    };
    Ok(SimulationReport {
        circuit: adjacency.name().to_string(),
        nodes: adjacency.entries().iter().map(value_of).collect(),
        outputs: adjacency.primary_outputs().map(value_of).collect(),
    })
}

/// A circuit together with its projection.
#[derive(Debug)]
struct Loaded {
    source: Option<PathBuf>,
    circuit: Circuit,
    adjacency: Adjacency,
}

/// Holds the currently loaded circuit for repeated queries.
#[derive(Debug, Default)]
pub struct Session {
    loaded: Option<Loaded>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a netlist file, replacing the current circuit on success.
    /// On failure the previously loaded circuit is kept.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&Circuit> {
        let path = path.as_ref();
        let circuit = load_circuit(path)?;
        info!(path = %path.display(), "loaded circuit");
        Ok(self.install(Some(path.to_path_buf()), circuit))
    }

    /// Load netlist source text, replacing the current circuit on success.
    pub fn load_source(&mut self, source: &str) -> Result<&Circuit> {
        let circuit = verilog::parse(source)?;
        Ok(self.install(None, circuit))
    }

    fn install(&mut self, source: Option<PathBuf>, circuit: Circuit) -> &Circuit {
        let adjacency = Adjacency::new(&circuit);
        let loaded = self.loaded.insert(Loaded {
            source,
            circuit,
            adjacency,
        });
        &loaded.circuit
    }

    fn loaded(&self) -> Result<&Loaded> {
        self.loaded.as_ref().ok_or(NetpathError::NoCircuitLoaded)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// The loaded circuit.
    pub fn circuit(&self) -> Result<&Circuit> {
        Ok(&self.loaded()?.circuit)
    }

    /// File the current circuit was loaded from, if any.
    pub fn source_path(&self) -> Option<&Path> {
        self.loaded.as_ref()?.source.as_deref()
    }

    pub fn summary(&self) -> Result<CircuitSummary> {
        Ok(circuit_summary(self.circuit()?))
    }

    pub fn adjacency(&self) -> Result<AdjacencyReport> {
        Ok(report_adjacency(&self.loaded()?.adjacency))
    }

    pub fn paths(&self) -> Result<PathReport> {
        report_paths(&self.loaded()?.adjacency)
    }

    pub fn simulate(&self, inputs: &InputVector) -> Result<SimulationReport> {
        report_simulation(&self.loaded()?.adjacency, inputs)
    }

    /// Forget the loaded circuit.
    pub fn clear(&mut self) {
        self.loaded = None;
    }
}
