//! Input-to-output path counting.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use super::adjacency::Adjacency;
use crate::circuit::NodeId;
use crate::error::{NetpathError, Result};

/// Number of distinct primary-input-to-node paths for every node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCounts {
    counts: BTreeMap<NodeId, u64>,
    total: u64,
}

impl PathCounts {
    /// Path count of one node.
    pub fn get(&self, id: NodeId) -> Option<u64> {
        self.counts.get(&id).copied()
    }

    /// Counts in identity order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, u64)> + '_ {
        self.counts.iter().map(|(&id, &count)| (id, count))
    }

    /// Sum of the counts at all primary outputs.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn into_map(self) -> BTreeMap<NodeId, u64> {
        self.counts
    }
}

/// Count paths over a projection.
///
/// Primary inputs count 1. Every other node reachable from an input counts the
/// sum of its fanins, evaluated in topological order; unreachable nodes stay
/// at 0. A reachable fanin that has not been counted yet closes a loop, which
/// is reported as [`NetpathError::InvalidTopology`]. Counts grow
/// combinatorially with reconvergent fan-out, so every addition is checked and
/// overflow is reported as [`NetpathError::PathCountOverflow`] instead of
/// wrapping.
pub fn count_paths(adjacency: &Adjacency) -> Result<PathCounts> {
    let mut counts: BTreeMap<NodeId, u64> =
        adjacency.entries().iter().map(|e| (e.id, 0)).collect();

    for entry in adjacency.primary_inputs() {
        counts.insert(entry.id, 1);
    }

    let order = adjacency.topological_order();
    debug!(circuit = adjacency.name(), reachable = order.len(), "counting paths");

    let reachable: HashSet<NodeId> = order.iter().copied().collect();
    let mut counted: HashSet<NodeId> = HashSet::with_capacity(order.len());

    for id in order {
        let Some(entry) = adjacency.entry(id) else {
            continue;
        };
        counted.insert(id);
        if entry.kind.is_primary_input() {
            continue;
        }

        let mut sum: u64 = 0;
        for fanin in &entry.fanins {
            if reachable.contains(fanin) && !counted.contains(fanin) {
                return Err(NetpathError::topology(format!(
                    "combinational loop through '{}'",
                    entry.name
                )));
            }
            let count = counts.get(fanin).copied().unwrap_or(0);
            sum = sum.checked_add(count).ok_or_else(|| NetpathError::PathCountOverflow {
                node: entry.name.clone(),
            })?;
        }
        counts.insert(id, sum);
    }

    let mut total: u64 = 0;
    for entry in adjacency.primary_outputs() {
        let count = counts.get(&entry.id).copied().unwrap_or(0);
        total = total
            .checked_add(count)
            .ok_or_else(|| NetpathError::PathCountOverflow {
                node: entry.name.clone(),
            })?;
    }

    Ok(PathCounts { counts, total })
}
