//! Mutable construction of a circuit graph.

use std::collections::HashMap;

use tracing::debug;

use super::graph::Circuit;
use super::types::{GateKind, Node, NodeId, NodeKind};
use crate::error::{NetpathError, Result};

/// Builds a [`Circuit`] node by node.
///
/// All graph mutation lives here. [`CircuitBuilder::finish`] hands the result
/// over as a read-only [`Circuit`].
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    name: String,
    ports: Vec<String>,
    nodes: Vec<Node>,
    node_map: HashMap<String, NodeId>,
    primary_inputs: Vec<NodeId>,
    primary_outputs: Vec<NodeId>,
}

impl CircuitBuilder {
    /// Start an empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ports: Vec::new(),
            nodes: Vec::new(),
            node_map: HashMap::new(),
            primary_inputs: Vec::new(),
            primary_outputs: Vec::new(),
        }
    }

    /// Record the module port list.
    pub fn with_ports(mut self, ports: Vec<String>) -> Self {
        self.ports = ports;
        self
    }

    /// Create a primary input.
    pub fn create_input(&mut self, name: &str) -> Result<NodeId> {
        let id = self.insert(name.to_string(), NodeKind::PrimaryInput)?;
        self.primary_inputs.push(id);
        Ok(id)
    }

    /// Create a primary output.
    pub fn create_output(&mut self, name: &str) -> Result<NodeId> {
        let id = self.insert(name.to_string(), NodeKind::PrimaryOutput)?;
        self.primary_outputs.push(id);
        Ok(id)
    }

    /// Create a gate node. `None` creates an untyped signal placeholder.
    pub fn create_gate(&mut self, name: &str, gate: Option<GateKind>) -> Result<NodeId> {
        self.insert(name.to_string(), NodeKind::Gate { gate })
    }

    /// Create branch `index` of `source`, named `<source>_<index>`.
    ///
    /// # Panics
    ///
    /// Panics if `source` is not a node of this circuit.
    pub fn create_branch(&mut self, source: NodeId, index: usize) -> Result<NodeId> {
        let name = format!("{}_{}", self.node(source).name, index);
        self.insert(name, NodeKind::Branch { source, index })
    }

    fn insert(&mut self, name: String, kind: NodeKind) -> Result<NodeId> {
        if self.node_map.contains_key(&name) {
            return Err(NetpathError::duplicate(name));
        }
        let id = NodeId(self.nodes.len() + 1);
        self.node_map.insert(name.clone(), id);
        self.nodes.push(Node::new(id, name, kind));
        Ok(id)
    }

    /// Look up a node by name.
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.node_map.get(name).copied()
    }

    /// Borrow a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a node of this circuit.
    pub fn node(&self, id: NodeId) -> &Node {
        self.nodes
            .get(id.index())
            .unwrap_or_else(|| panic!("node {} does not exist", id))
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes
            .get_mut(id.index())
            .unwrap_or_else(|| panic!("node {} does not exist", id))
    }

    /// Number of nodes created so far.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Add the edge `from -> to`. Connecting an existing pair again is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if either end is not a node of this circuit.
    pub fn connect(&mut self, from: NodeId, to: NodeId) {
        let _ = self.node(to);
        let source = self.node_mut(from);
        if !source.fanouts.contains(&to) {
            source.fanouts.push(to);
        }
        let target = self.node_mut(to);
        if !target.fanins.contains(&from) {
            target.fanins.push(from);
        }
    }

    /// Split every node with more than one fanout into explicit branch nodes.
    ///
    /// For a node with fanouts `[t1, .., tn]` (n > 1) the fanout list becomes
    /// `[src_1, .., src_n]`. Each `ti` drops `src` from its fanins and gains
    /// `src_i` at the end of them. Only nodes that existed when the pass started
    /// are examined, so branches are never split again. Returns the number of
    /// branch nodes created; running the pass twice creates none the second
    /// time.
    pub fn normalize_fanout(&mut self) -> Result<usize> {
        let snapshot = self.nodes.len();
        let mut created = 0;

        for index in 0..snapshot {
            let source = self.nodes[index].id;
            if self.nodes[index].fanouts.len() <= 1 || self.is_split(source) {
                continue;
            }

            let targets = std::mem::take(&mut self.nodes[index].fanouts);
            debug!(node = %self.nodes[index].name, fanout = targets.len(), "splitting fan-out");

            for (i, target) in targets.into_iter().enumerate() {
                let branch = self.create_branch(source, i + 1)?;
                self.connect(source, branch);

                self.node_mut(target).fanins.retain(|&f| f != source);
                self.connect(branch, target);
                created += 1;
            }
        }

        Ok(created)
    }

    /// Whether every fanout of `source` is already one of its branches.
    fn is_split(&self, source: NodeId) -> bool {
        self.node(source).fanouts.iter().all(|&t| {
            matches!(self.node(t).kind, NodeKind::Branch { source: s, .. } if s == source)
        })
    }

    /// Freeze the graph.
    pub fn finish(self) -> Circuit {
        Circuit::from_parts(
            self.name,
            self.ports,
            self.nodes,
            self.node_map,
            self.primary_inputs,
            self.primary_outputs,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    /// `a` drives g1 and g2; `b` drives g1 only.
    fn fanout_pair() -> (CircuitBuilder, [NodeId; 4]) {
        let mut b = CircuitBuilder::new("fan");
        let a = b.create_input("a").unwrap();
        let bb = b.create_input("b").unwrap();
        let g1 = b.create_gate("g1", Some(GateKind::And)).unwrap();
        let g2 = b.create_gate("g2", Some(GateKind::Not)).unwrap();
        b.connect(a, g1);
        b.connect(bb, g1);
        b.connect(a, g2);
        (b, [a, bb, g1, g2])
    }

    #[test]
    fn test_ids_are_dense_and_increasing() {
        let mut b = CircuitBuilder::new("ids");
        let ids = [
            b.create_input("a").unwrap(),
            b.create_output("y").unwrap(),
            b.create_gate("w", None).unwrap(),
            b.create_gate("g", Some(GateKind::Or)).unwrap(),
        ];
        assert_eq!(ids, [NodeId(1), NodeId(2), NodeId(3), NodeId(4)]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut b = CircuitBuilder::new("dup");
        b.create_input("a").unwrap();
        let err = b.create_gate("a", None).unwrap_err();
        assert!(matches!(err, NetpathError::DuplicateNode { ref name } if name == "a"));
        // Failed insertions do not consume an identity.
        assert_eq!(b.create_output("y").unwrap(), NodeId(2));
    }

    #[test]
    fn test_connect_is_idempotent() {
        let mut b = CircuitBuilder::new("edges");
        let a = b.create_input("a").unwrap();
        let g = b.create_gate("g", Some(GateKind::Buf)).unwrap();
        b.connect(a, g);
        b.connect(a, g);
        assert_eq!(b.node(a).fanouts, vec![g]);
        assert_eq!(b.node(g).fanins, vec![a]);
    }

    #[test]
    #[should_panic(expected = "does not exist")]
    fn test_connect_unknown_node_panics() {
        let mut b = CircuitBuilder::new("bad");
        let a = b.create_input("a").unwrap();
        b.connect(a, NodeId(9));
    }

    #[test]
    fn test_branch_naming() {
        let mut b = CircuitBuilder::new("br");
        let a = b.create_input("N1").unwrap();
        let br = b.create_branch(a, 2).unwrap();
        assert_eq!(b.node(br).name, "N1_2");
        assert_eq!(b.node(br).kind, NodeKind::Branch { source: a, index: 2 });
    }

    #[test]
    fn test_normalize_splits_fanout() {
        let (mut b, [a, bb, g1, g2]) = fanout_pair();
        assert_eq!(b.normalize_fanout().unwrap(), 2);

        let a1 = b.find_node("a_1").unwrap();
        let a2 = b.find_node("a_2").unwrap();
        assert_eq!(b.node(a).fanouts, vec![a1, a2]);
        assert_eq!(b.node(a1).fanins, vec![a]);
        assert_eq!(b.node(a1).fanouts, vec![g1]);
        assert_eq!(b.node(a2).fanins, vec![a]);
        assert_eq!(b.node(a2).fanouts, vec![g2]);

        // The branch is appended after the remaining fanins.
        assert_eq!(b.node(g1).fanins, vec![bb, a1]);
        assert_eq!(b.node(g2).fanins, vec![a2]);
    }

    #[test]
    fn test_normalize_preserves_targets() {
        let mut b = CircuitBuilder::new("wide");
        let a = b.create_input("a").unwrap();
        let gates: Vec<NodeId> = (0..5)
            .map(|i| b.create_gate(&format!("g{}", i), Some(GateKind::Buf)).unwrap())
            .collect();
        for &g in &gates {
            b.connect(a, g);
        }
        b.normalize_fanout().unwrap();

        let reached: Vec<NodeId> = b
            .node(a)
            .fanouts
            .iter()
            .flat_map(|&br| b.node(br).fanouts.clone())
            .collect();
        assert_eq!(reached, gates);
        let unique: HashSet<_> = reached.iter().collect();
        assert_eq!(unique.len(), gates.len());

        for node in (1..=b.node_count()).map(|i| b.node(NodeId(i))) {
            if node.fanouts.len() > 1 {
                assert!(
                    node.fanouts.iter().all(|&t| b.node(t).kind.is_branch()),
                    "{} still fans out",
                    node.name
                );
            }
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let (mut b, _) = fanout_pair();
        b.normalize_fanout().unwrap();
        let before = b.clone().finish();
        assert_eq!(b.normalize_fanout().unwrap(), 0);
        let after = b.finish();
        assert_eq!(before.nodes(), after.nodes());
    }

    #[test]
    fn test_branch_name_collision_reported() {
        let (mut b, _) = fanout_pair();
        b.create_gate("a_1", None).unwrap();
        let err = b.normalize_fanout().unwrap_err();
        assert!(matches!(err, NetpathError::DuplicateNode { ref name } if name == "a_1"));
    }
}
