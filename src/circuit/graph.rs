//! Circuit graph structure.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, info};

use super::builder::CircuitBuilder;
use super::types::{GateKind, Node, NodeId};
use crate::error::{NetpathError, Result};
use crate::verilog::ModuleAst;

/// A fully connected, fan-out-normalized circuit.
///
/// A `Circuit` has no mutating API; it is produced once by
/// [`Circuit::from_ast`] (or [`CircuitBuilder::finish`]) and only read
/// afterwards, so it can be shared freely between readers.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// Module name
    name: String,

    /// Port list from the module header
    ports: Vec<String>,

    /// Node arena; node `id` lives at `id - 1`
    nodes: Vec<Node>,

    /// Mapping from node names to node IDs
    node_map: HashMap<String, NodeId>,

    /// Primary inputs in declaration order
    primary_inputs: Vec<NodeId>,

    /// Primary outputs in declaration order
    primary_outputs: Vec<NodeId>,
}

impl Circuit {
    pub(crate) fn from_parts(
        name: String,
        ports: Vec<String>,
        nodes: Vec<Node>,
        node_map: HashMap<String, NodeId>,
        primary_inputs: Vec<NodeId>,
        primary_outputs: Vec<NodeId>,
    ) -> Self {
        Self {
            name,
            ports,
            nodes,
            node_map,
            primary_inputs,
            primary_outputs,
        }
    }

    /// Build a circuit from a parsed module.
    ///
    /// Nodes are created in the order inputs, outputs, wires, then for each
    /// gate instance its (possibly auto-created) output followed by the
    /// instance itself. Fan-out is normalized once at the end.
    pub fn from_ast(ast: ModuleAst) -> Result<Self> {
        let mut builder = CircuitBuilder::new(ast.name).with_ports(ast.ports);

        for name in &ast.inputs {
            builder.create_input(name)?;
        }
        for name in &ast.outputs {
            builder.create_output(name)?;
        }
        for name in &ast.wires {
            builder.create_gate(name, None)?;
        }

        for gate in &ast.gates {
            // Undeclared outputs are tolerated; undeclared inputs are not.
            let output = match builder.find_node(&gate.output) {
                Some(id) => id,
                None => {
                    debug!(line = gate.line, signal = %gate.output, "creating undeclared gate output");
                    builder.create_gate(&gate.output, None)?
                }
            };

            let kind = GateKind::from_keyword(&gate.gate_type).ok_or_else(|| {
                NetpathError::UnknownGateType {
                    gate_type: gate.gate_type.clone(),
                }
            })?;

            let instance = builder.create_gate(&gate.instance, Some(kind))?;
            builder.connect(instance, output);

            for input in &gate.inputs {
                let driver = builder
                    .find_node(input)
                    .ok_or_else(|| NetpathError::undefined(input))?;
                builder.connect(driver, instance);
            }
        }

        let declared = builder.node_count();
        let branches = builder.normalize_fanout()?;
        let circuit = builder.finish();

        info!(
            module = %circuit.name,
            inputs = circuit.input_count(),
            outputs = circuit.output_count(),
            gates = ast.gates.len(),
            nodes = declared,
            branches,
            "circuit built"
        );

        Ok(circuit)
    }

    /// Module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Port list as written in the module header.
    pub fn ports(&self) -> &[String] {
        &self.ports
    }

    /// All nodes in identity order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Get a node by identity.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        id.0.checked_sub(1).and_then(|i| self.nodes.get(i))
    }

    /// Find a node ID by name.
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.node_map.get(name).copied()
    }

    /// Find a node by name.
    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.find_node(name).and_then(|id| self.node(id))
    }

    /// Get the name of a node.
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.name.as_str())
    }

    /// Primary inputs in declaration order.
    pub fn primary_inputs(&self) -> &[NodeId] {
        &self.primary_inputs
    }

    /// Primary outputs in declaration order.
    pub fn primary_outputs(&self) -> &[NodeId] {
        &self.primary_outputs
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn input_count(&self) -> usize {
        self.primary_inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.primary_outputs.len()
    }

    /// Number of branch nodes added by fan-out normalization.
    pub fn branch_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.kind.is_branch()).count()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Circuit: {}", self.name)?;
        writeln!(f, "Inputs: {}", self.input_count())?;
        writeln!(f, "Outputs: {}", self.output_count())?;
        writeln!(f, "Total Nodes: {}", self.node_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::NodeKind;
    use crate::verilog::parse;

    fn id(circuit: &Circuit, name: &str) -> NodeId {
        circuit.find_node(name).unwrap()
    }

    #[test_log::test]
    fn test_two_input_and() {
        let circuit = parse("module m(a,b,y); input a,b; output y; AND g1(y,a,b);").unwrap();
        assert_eq!(circuit.name(), "m");
        assert_eq!(circuit.ports(), ["a", "b", "y"]);
        assert_eq!(circuit.node_count(), 4);

        let g1 = circuit.node_by_name("g1").unwrap();
        assert_eq!(g1.id, NodeId(4));
        assert_eq!(g1.kind, NodeKind::Gate { gate: Some(GateKind::And) });
        assert_eq!(g1.fanins, vec![id(&circuit, "a"), id(&circuit, "b")]);
        assert_eq!(g1.fanouts, vec![id(&circuit, "y")]);
    }

    #[test_log::test]
    fn test_fanout_becomes_branches() {
        let src = "module m(a, y, z);\ninput a;\noutput y, z;\nnot g1 (y, a);\nbuf g2 (z, a);\nendmodule\n";
        let circuit = parse(src).unwrap();

        let a = id(&circuit, "a");
        let a1 = id(&circuit, "a_1");
        let a2 = id(&circuit, "a_2");
        assert_eq!(circuit.node(a).unwrap().fanouts, vec![a1, a2]);

        let branch = circuit.node(a1).unwrap();
        assert_eq!(branch.kind, NodeKind::Branch { source: a, index: 1 });
        assert_eq!(branch.fanins, vec![a]);
        assert_eq!(branch.fanouts, vec![id(&circuit, "g1")]);
        assert_eq!(circuit.node(a2).unwrap().fanouts, vec![id(&circuit, "g2")]);
        assert_eq!(circuit.branch_count(), 2);
    }

    #[test]
    fn test_branch_is_appended_to_fanins() {
        let src = "module m(a, b, y, z);\ninput a, b;\noutput y, z;\nand g1 (y, a, b);\nbuf g2 (z, a);\nendmodule";
        let circuit = parse(src).unwrap();
        let g1 = circuit.node_by_name("g1").unwrap();
        let names: Vec<&str> = g1
            .fanins
            .iter()
            .map(|&f| circuit.node_name(f).unwrap())
            .collect();
        assert_eq!(names, vec!["b", "a_1"]);
    }

    #[test]
    fn test_creation_order() {
        let src = "module m(a, y);\ninput a;\noutput y;\nwire w;\nnot g1 (w, a);\nbuf g2 (y, w);\nendmodule";
        let circuit = parse(src).unwrap();
        let names: Vec<&str> = circuit.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "y", "w", "g1", "g2"]);
        for (i, node) in circuit.nodes().iter().enumerate() {
            assert_eq!(node.id, NodeId(i + 1));
        }
    }

    #[test]
    fn test_undeclared_output_is_created() {
        let src = "module m(a, y);\ninput a;\noutput y;\nnot g1 (t, a);\nbuf g2 (y, t);\nendmodule";
        let circuit = parse(src).unwrap();
        let t = circuit.node_by_name("t").unwrap();
        assert_eq!(t.kind, NodeKind::Gate { gate: None });
        assert_eq!(t.fanins, vec![id(&circuit, "g1")]);
        assert_eq!(t.fanouts, vec![id(&circuit, "g2")]);
    }

    #[test]
    fn test_undefined_input() {
        let src = "module m(a, y);\ninput a;\noutput y;\nand g1 (y, a, ghost);\nendmodule";
        let err = parse(src).unwrap_err();
        assert!(matches!(err, NetpathError::UndefinedNode { ref name } if name == "ghost"));
        assert_eq!(err.to_string(), "Undefined node: `ghost`");
    }

    #[test]
    fn test_duplicate_input() {
        let err = parse("module m(a, y); input a, a; output y;").unwrap_err();
        assert!(matches!(err, NetpathError::DuplicateNode { ref name } if name == "a"));
    }

    #[test]
    fn test_unknown_gate_type() {
        let src = "module m(a, y);\ninput a;\noutput y;\ndff r1 (y, a);\nendmodule";
        let err = parse(src).unwrap_err();
        assert!(matches!(err, NetpathError::UnknownGateType { ref gate_type } if gate_type == "dff"));
    }

    #[test]
    fn test_gate_type_is_case_insensitive() {
        let src = "module m(a, b, y);\ninput a, b;\noutput y;\nNaNd g1 (y, a, b);\nendmodule";
        let circuit = parse(src).unwrap();
        let g1 = circuit.node_by_name("g1").unwrap();
        assert_eq!(g1.kind, NodeKind::Gate { gate: Some(GateKind::Nand) });
    }

    #[test]
    fn test_later_declaration_blocks_are_dropped() {
        let src = "module m(a, b, y);\ninput a;\ninput b;\noutput y;\nand g1 (y, a, b);\nendmodule";
        let err = parse(src).unwrap_err();
        assert!(matches!(err, NetpathError::UndefinedNode { ref name } if name == "b"));
    }

    #[test]
    fn test_summary_display() {
        let circuit = parse("module m(a,b,y); input a,b; output y; AND g1(y,a,b);").unwrap();
        assert_eq!(
            circuit.to_string(),
            "Circuit: m\nInputs: 2\nOutputs: 1\nTotal Nodes: 4\n"
        );
    }

    #[test]
    fn test_circuit_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Circuit>();
    }
}
