//! Read-only adjacency projection of a circuit.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::circuit::{Circuit, NodeId, NodeKind};

/// Fanin/fanout view of one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeEntry {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub fanins: Vec<NodeId>,
    pub fanouts: Vec<NodeId>,
}

impl fmt::Display for NodeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}) Fanins: [{}] Fanouts: [{}]",
            self.id,
            self.name,
            self.kind,
            join_ids(&self.fanins),
            join_ids(&self.fanouts)
        )
    }
}

fn join_ids(ids: &[NodeId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Snapshot of a circuit's connectivity, indexed by node identity.
///
/// The projection copies edge lists verbatim and never changes; build a new
/// one if the circuit it came from is replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    name: String,
    entries: Vec<NodeEntry>,
    index: HashMap<NodeId, usize>,
    /// Entry positions of the primary inputs, in circuit order
    inputs: Vec<usize>,
    /// Entry positions of the primary outputs, in circuit order
    outputs: Vec<usize>,
}

impl Adjacency {
    /// Project a circuit.
    pub fn new(circuit: &Circuit) -> Self {
        let entries: Vec<NodeEntry> = circuit
            .nodes()
            .iter()
            .map(|node| NodeEntry {
                id: node.id,
                name: node.name.clone(),
                kind: node.kind,
                fanins: node.fanins.clone(),
                fanouts: node.fanouts.clone(),
            })
            .collect();

        let index: HashMap<NodeId, usize> = entries
            .iter()
            .enumerate()
            .map(|(pos, entry)| (entry.id, pos))
            .collect();

        let positions = |ids: &[NodeId]| -> Vec<usize> {
            ids.iter().filter_map(|id| index.get(id).copied()).collect()
        };
        let inputs = positions(circuit.primary_inputs());
        let outputs = positions(circuit.primary_outputs());

        Self {
            name: circuit.name().to_string(),
            entries,
            index,
            inputs,
            outputs,
        }
    }

    /// Name of the projected circuit.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All entries in identity order.
    pub fn entries(&self) -> &[NodeEntry] {
        &self.entries
    }

    /// Look up an entry by node identity.
    pub fn entry(&self, id: NodeId) -> Option<&NodeEntry> {
        self.index.get(&id).map(|&pos| &self.entries[pos])
    }

    /// Primary input entries in circuit order.
    pub fn primary_inputs(&self) -> impl Iterator<Item = &NodeEntry> + '_ {
        self.inputs.iter().map(|&pos| &self.entries[pos])
    }

    /// Primary output entries in circuit order.
    pub fn primary_outputs(&self) -> impl Iterator<Item = &NodeEntry> + '_ {
        self.outputs.iter().map(|&pos| &self.entries[pos])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sources-before-sinks order of every node reachable from a primary input.
    ///
    /// Depth-first search along fanouts, seeded from each primary input in
    /// order, records nodes on post-visit; the reversed record is the
    /// topological order. Uses an explicit stack so deep circuits cannot
    /// exhaust the call stack. Unreachable nodes are left out.
    pub fn topological_order(&self) -> Vec<NodeId> {
        let mut visited = vec![false; self.entries.len()];
        let mut order = Vec::with_capacity(self.entries.len());
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for &seed in &self.inputs {
            if visited[seed] {
                continue;
            }
            visited[seed] = true;
            stack.push((seed, 0));

            while let Some((pos, next)) = stack.last_mut() {
                let pos = *pos;
                match self.entries[pos].fanouts.get(*next) {
                    Some(child) => {
                        *next += 1;
                        if let Some(&child_pos) = self.index.get(child) {
                            if !visited[child_pos] {
                                visited[child_pos] = true;
                                stack.push((child_pos, 0));
                            }
                        }
                    }
                    None => {
                        order.push(self.entries[pos].id);
                        stack.pop();
                    }
                }
            }
        }

        order.reverse();
        order
    }
}

/// Write the linked-list listing of a circuit's entries.
pub(crate) fn write_listing(
    f: &mut fmt::Formatter<'_>,
    circuit: &str,
    entries: &[NodeEntry],
) -> fmt::Result {
    writeln!(f, "Linked List Representation for {}:", circuit)?;
    writeln!(f, "Format: ID: Name (Type) Fanins: [ids] Fanouts: [ids]")?;
    writeln!(f, "----------------------------------------------------")?;
    for entry in entries {
        writeln!(f, "{}", entry)?;
    }
    Ok(())
}

impl fmt::Display for Adjacency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_listing(f, &self.name, &self.entries)
    }
}
