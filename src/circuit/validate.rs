//! Circuit validation.

use crate::error::{NetpathError, Result};

use super::{Circuit, NodeId, NodeKind};

/// Validate the structural invariants of a built circuit.
///
/// Checks:
/// - Node identities are dense and every edge points at an existing node
/// - Primary inputs have no fanins
/// - A node with more than one fanout drives only its own branch nodes
/// - The graph has no combinational loop
pub fn validate_circuit(circuit: &Circuit) -> Result<()> {
    let nodes = circuit.nodes();
    let count = nodes.len();

    for (i, node) in nodes.iter().enumerate() {
        if node.id != NodeId(i + 1) {
            return Err(NetpathError::topology(format!(
                "node '{}' has identity {} at position {}",
                node.name,
                node.id,
                i + 1
            )));
        }

        if let Some(bad) = node
            .fanins
            .iter()
            .chain(&node.fanouts)
            .find(|id| id.0 == 0 || id.0 > count)
        {
            return Err(NetpathError::topology(format!(
                "node '{}' references missing node {}",
                node.name, bad
            )));
        }

        if node.kind.is_primary_input() && !node.fanins.is_empty() {
            return Err(NetpathError::topology(format!(
                "primary input '{}' has fanins",
                node.name
            )));
        }

        let split = node.fanouts.iter().all(|&t| {
            matches!(nodes[t.index()].kind, NodeKind::Branch { source, .. } if source == node.id)
        });
        if node.fanouts.len() > 1 && !split {
            return Err(NetpathError::topology(format!(
                "node '{}' fans out to {} nodes without branches",
                node.name,
                node.fanouts.len()
            )));
        }
    }

    check_acyclic(circuit)
}

/// Kahn's algorithm over the whole graph; anything left over sits on a loop.
fn check_acyclic(circuit: &Circuit) -> Result<()> {
    let nodes = circuit.nodes();
    let mut pending: Vec<usize> = nodes.iter().map(|n| n.fanins.len()).collect();
    let mut ready: Vec<NodeId> = nodes
        .iter()
        .filter(|n| n.fanins.is_empty())
        .map(|n| n.id)
        .collect();
    let mut processed = 0;

    while let Some(id) = ready.pop() {
        processed += 1;
        for &next in &nodes[id.index()].fanouts {
            let slot = &mut pending[next.index()];
            *slot -= 1;
            if *slot == 0 {
                ready.push(next);
            }
        }
    }

    if processed == nodes.len() {
        return Ok(());
    }

    let stuck = nodes
        .iter()
        .zip(&pending)
        .find(|(_, p)| **p > 0)
        .map(|(n, _)| n.name.as_str())
        .unwrap_or("?");
    Err(NetpathError::topology(format!(
        "combinational loop through '{}'",
        stuck
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{CircuitBuilder, GateKind};
    use crate::verilog::parse;

    #[test]
    fn test_valid_circuit() {
        let src = "module m(a, b, y, z);\ninput a, b;\noutput y, z;\nand g1 (y, a, b);\nor g2 (z, a, b);\nendmodule";
        let circuit = parse(src).unwrap();
        assert!(validate_circuit(&circuit).is_ok());
    }

    #[test]
    fn test_loop_detected() {
        // The wire feeds the gate that drives it.
        let src = "module m(a, y);\ninput a;\noutput y;\nwire w;\nand g1 (w, a, w);\nbuf g2 (y, w);\nendmodule";
        let circuit = parse(src).unwrap();
        let err = validate_circuit(&circuit).unwrap_err();
        assert!(matches!(err, NetpathError::InvalidTopology { ref message } if message.contains("loop")));
    }

    #[test]
    fn test_unnormalized_fanout_rejected() {
        let mut b = CircuitBuilder::new("raw");
        let a = b.create_input("a").unwrap();
        let g1 = b.create_gate("g1", Some(GateKind::Buf)).unwrap();
        let g2 = b.create_gate("g2", Some(GateKind::Buf)).unwrap();
        b.connect(a, g1);
        b.connect(a, g2);
        let err = validate_circuit(&b.finish()).unwrap_err();
        assert!(matches!(err, NetpathError::InvalidTopology { ref message } if message.contains("fans out")));
    }
}
