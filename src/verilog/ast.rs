//! Abstract Syntax Tree types for the netlist subset.

/// Declarations recovered from one module.
///
/// Only the first `input`, `output` and `wire` statement of a source is
/// recorded; later blocks of the same kind are dropped by the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleAst {
    /// Module name from the header
    pub name: String,
    /// Port list as written in the header (not checked against declarations)
    pub ports: Vec<String>,
    /// Names from the first `input` statement
    pub inputs: Vec<String>,
    /// Names from the first `output` statement
    pub outputs: Vec<String>,
    /// Names from the first `wire` statement
    pub wires: Vec<String>,
    /// Gate instantiations in textual order
    pub gates: Vec<GateInstance>,
}

impl ModuleAst {
    /// Create an empty module with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A primitive gate instantiation: `<type> <instance> ( <output>, <inputs>... );`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateInstance {
    /// Gate type token exactly as written (resolved when the graph is built)
    pub gate_type: String,
    /// Instance name
    pub instance: String,
    /// Driven signal (first connection)
    pub output: String,
    /// Driving signals (remaining connections)
    pub inputs: Vec<String>,
    /// Source line number for diagnostics
    pub line: usize,
}
