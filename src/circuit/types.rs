//! Core types for circuit representation.

use std::fmt;

use serde::Serialize;

/// A unique identifier for a node in the circuit.
///
/// Identities start at 1 and are assigned densely in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The first identity handed out by a circuit.
    pub const FIRST: NodeId = NodeId(1);

    /// Position of this node in the circuit's node arena.
    pub fn index(self) -> usize {
        debug_assert!(self.0 > 0, "node identities start at 1");
        self.0 - 1
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Primitive combinational gate kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateKind {
    And,
    Or,
    Not,
    Nand,
    Nor,
    Xor,
    Xnor,
    Buf,
}

impl GateKind {
    /// Every supported gate kind.
    pub const ALL: [GateKind; 8] = [
        Self::And,
        Self::Or,
        Self::Not,
        Self::Nand,
        Self::Nor,
        Self::Xor,
        Self::Xnor,
        Self::Buf,
    ];

    /// Parse a gate kind from a netlist keyword (case-insensitive).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "NOT" => Some(Self::Not),
            "NAND" => Some(Self::Nand),
            "NOR" => Some(Self::Nor),
            "XOR" => Some(Self::Xor),
            "XNOR" => Some(Self::Xnor),
            "BUF" | "BUFF" => Some(Self::Buf),
            _ => None,
        }
    }

    /// Canonical upper-case name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Nand => "NAND",
            Self::Nor => "NOR",
            Self::Xor => "XOR",
            Self::Xnor => "XNOR",
            Self::Buf => "BUF",
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Structural role of a node, with the fields that only that role carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    /// Primary input (circuit boundary, no fanins)
    PrimaryInput,
    /// Primary output (circuit boundary)
    PrimaryOutput,
    /// Gate instance or signal carrier. `None` marks a wire placeholder
    /// whose kind was never given.
    Gate { gate: Option<GateKind> },
    /// One leg of a fan-out split off `source`; `index` is 1-based.
    Branch { source: NodeId, index: usize },
}

impl NodeKind {
    /// Short tag used in listings.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::PrimaryInput => "PI",
            Self::PrimaryOutput => "PO",
            Self::Gate { .. } => "GATE",
            Self::Branch { .. } => "BRNH",
        }
    }

    pub fn is_primary_input(&self) -> bool {
        matches!(self, Self::PrimaryInput)
    }

    pub fn is_primary_output(&self) -> bool {
        matches!(self, Self::PrimaryOutput)
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, Self::Branch { .. })
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A node in the circuit graph.
///
/// Edges are stored as identity lists on both ends; `fanins` and `fanouts`
/// keep insertion order and never hold duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub fanins: Vec<NodeId>,
    pub fanouts: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(id: NodeId, name: String, kind: NodeKind) -> Self {
        Self {
            id,
            name,
            kind,
            fanins: Vec::new(),
            fanouts: Vec::new(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ID: {}, Name: {}", self.kind, self.id, self.name)?;
        match self.kind {
            NodeKind::Gate { gate: Some(kind) } => write!(f, ", Type: {}", kind)?,
            NodeKind::Gate { gate: None } => write!(f, ", Type: -")?,
            NodeKind::Branch { source, index } => {
                write!(f, ", Source: {}, Branch: {}", source, index)?
            }
            NodeKind::PrimaryInput | NodeKind::PrimaryOutput => {}
        }
        write!(f, ")")
    }
}
