//! Three-valued logic simulation of a normalized circuit.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use tracing::debug;

use super::adjacency::Adjacency;
use super::logic::Logic;
use crate::circuit::{NodeId, NodeKind};
use crate::error::{NetpathError, Result};

/// Assignment of values to primary inputs, keyed by input name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputVector {
    values: HashMap<String, Logic>,
}

impl InputVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a value to an input.
    pub fn with(mut self, name: impl Into<String>, value: Logic) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<Logic> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromStr for InputVector {
    type Err = NetpathError;

    /// Parse `name=value` pairs separated by commas, e.g. `a=1,b=0,c=x`.
    fn from_str(s: &str) -> Result<Self> {
        let mut vector = Self::new();
        for pair in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, value) = pair
                .split_once('=')
                .ok_or_else(|| NetpathError::input_vector(format!("expected name=value, got '{}'", pair)))?;
            let name = name.trim();
            let value = value.trim();
            let mut chars = value.chars();
            let logic = match (chars.next(), chars.next()) {
                (Some(ch), None) => Logic::from_char(ch),
                _ => None,
            }
            .ok_or_else(|| {
                NetpathError::input_vector(format!("invalid value '{}' for '{}'", value, name))
            })?;
            if vector.values.insert(name.to_string(), logic).is_some() {
                return Err(NetpathError::input_vector(format!("'{}' assigned twice", name)));
            }
        }
        Ok(vector)
    }
}

/// Node values after one simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationResult {
    values: BTreeMap<NodeId, Logic>,
}

impl SimulationResult {
    pub fn value(&self, id: NodeId) -> Option<Logic> {
        self.values.get(&id).copied()
    }

    /// Values in identity order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Logic)> + '_ {
        self.values.iter().map(|(&id, &v)| (id, v))
    }
}

/// Evaluates a circuit projection for input assignments.
///
/// Nodes are visited once in topological order, which is exact for an
/// acyclic circuit. Nodes that no primary input reaches stay `X`.
pub struct Simulator<'a> {
    adjacency: &'a Adjacency,
    order: Vec<NodeId>,
}

impl<'a> Simulator<'a> {
    pub fn new(adjacency: &'a Adjacency) -> Self {
        let order = adjacency.topological_order();
        Self { adjacency, order }
    }

    /// Run one evaluation. Every primary input must be assigned, and every
    /// assigned name must be a primary input.
    pub fn simulate(&self, inputs: &InputVector) -> Result<SimulationResult> {
        let mut values: BTreeMap<NodeId, Logic> = self
            .adjacency
            .entries()
            .iter()
            .map(|e| (e.id, Logic::X))
            .collect();

        let mut assigned = 0;
        for entry in self.adjacency.primary_inputs() {
            let value = inputs.get(&entry.name).ok_or_else(|| {
                NetpathError::input_vector(format!("no value for primary input '{}'", entry.name))
            })?;
            values.insert(entry.id, value);
            assigned += 1;
        }
        if assigned != inputs.len() {
            let mut unknown: Vec<&str> = inputs
                .values
                .keys()
                .filter(|name| {
                    !self
                        .adjacency
                        .primary_inputs()
                        .any(|e| &e.name == *name)
                })
                .map(String::as_str)
                .collect();
            unknown.sort_unstable();
            return Err(NetpathError::input_vector(format!(
                "not primary inputs: {}",
                unknown.join(", ")
            )));
        }

        for &id in &self.order {
            let Some(entry) = self.adjacency.entry(id) else {
                continue;
            };
            let fanin_values: Vec<Logic> = entry
                .fanins
                .iter()
                .map(|f| values.get(f).copied().unwrap_or_default())
                .collect();

            let value = match entry.kind {
                NodeKind::PrimaryInput => continue,
                NodeKind::Gate { gate: Some(kind) } => kind.evaluate(&fanin_values),
                NodeKind::Gate { gate: None } | NodeKind::Branch { .. } | NodeKind::PrimaryOutput => {
                    resolve(&fanin_values)
                }
            };
            values.insert(id, value);
        }

        debug!(circuit = self.adjacency.name(), evaluated = self.order.len(), "simulation finished");
        Ok(SimulationResult { values })
    }
}

/// Value of a plain signal carrier: its driver's value, or `X` when it has
/// no driver or its drivers disagree.
fn resolve(drivers: &[Logic]) -> Logic {
    match drivers.split_first() {
        Some((&first, rest)) if rest.iter().all(|&v| v == first) => first,
        _ => Logic::X,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verilog::parse;
    use Logic::{One, Zero, X};

    const C17: &str = "\
module c17 (N1, N2, N3, N6, N7, N22, N23);
input N1, N2, N3, N6, N7;
output N22, N23;
wire N10, N11, N16, N19;
nand NAND2_1 (N10, N1, N3);
nand NAND2_2 (N11, N3, N6);
nand NAND2_3 (N16, N2, N11);
nand NAND2_4 (N19, N11, N7);
nand NAND2_5 (N22, N10, N16);
nand NAND2_6 (N23, N16, N19);
endmodule
";

    fn nand(a: bool, b: bool) -> bool {
        !(a && b)
    }

    #[test]
    fn test_c17_exhaustive() {
        let circuit = parse(C17).unwrap();
        let adjacency = Adjacency::new(&circuit);
        let sim = Simulator::new(&adjacency);
        let n22 = circuit.find_node("N22").unwrap();
        let n23 = circuit.find_node("N23").unwrap();

        for bits in 0u32..32 {
            let bit = |i: u32| bits & (1 << i) != 0;
            let (n1, n2, n3, n6, n7) = (bit(0), bit(1), bit(2), bit(3), bit(4));
            let inputs = InputVector::new()
                .with("N1", n1.into())
                .with("N2", n2.into())
                .with("N3", n3.into())
                .with("N6", n6.into())
                .with("N7", n7.into());
            let result = sim.simulate(&inputs).unwrap();

            let n10 = nand(n1, n3);
            let n11 = nand(n3, n6);
            let n16 = nand(n2, n11);
            let n19 = nand(n11, n7);
            assert_eq!(result.value(n22), Some(Logic::from(nand(n10, n16))), "inputs {:05b}", bits);
            assert_eq!(result.value(n23), Some(Logic::from(nand(n16, n19))), "inputs {:05b}", bits);
        }
    }

    #[test]
    fn test_unknown_inputs_propagate() {
        let circuit = parse("module m(a,b,y); input a,b; output y; AND g1(y,a,b);").unwrap();
        let adjacency = Adjacency::new(&circuit);
        let sim = Simulator::new(&adjacency);
        let y = circuit.find_node("y").unwrap();

        let masked = sim.simulate(&"a=0,b=x".parse().unwrap()).unwrap();
        assert_eq!(masked.value(y), Some(Zero));

        let unknown = sim.simulate(&"a=1,b=x".parse().unwrap()).unwrap();
        assert_eq!(unknown.value(y), Some(X));

        let high = sim.simulate(&"a=1, b=1".parse().unwrap()).unwrap();
        assert_eq!(high.value(y), Some(One));
    }

    #[test]
    fn test_missing_input_rejected() {
        let circuit = parse("module m(a,b,y); input a,b; output y; AND g1(y,a,b);").unwrap();
        let adjacency = Adjacency::new(&circuit);
        let err = Simulator::new(&adjacency)
            .simulate(&InputVector::new().with("a", One))
            .unwrap_err();
        assert!(err.to_string().contains("'b'"));
    }

    #[test]
    fn test_extra_input_rejected() {
        let circuit = parse("module m(a,y); input a; output y; NOT g1(y,a);").unwrap();
        let adjacency = Adjacency::new(&circuit);
        let err = Simulator::new(&adjacency)
            .simulate(&"a=1,g1=0".parse().unwrap())
            .unwrap_err();
        assert!(matches!(err, NetpathError::InvalidInputVector { ref message } if message.contains("g1")));
    }

    #[test]
    fn test_input_vector_parse_errors() {
        assert!("a".parse::<InputVector>().is_err());
        assert!("a=2".parse::<InputVector>().is_err());
        assert!("a=1,a=0".parse::<InputVector>().is_err());
        assert!("".parse::<InputVector>().unwrap().is_empty());
    }

    #[test]
    fn test_resolve_conflicting_drivers() {
        assert_eq!(resolve(&[One, One]), One);
        assert_eq!(resolve(&[One, Zero]), X);
        assert_eq!(resolve(&[]), X);
    }
}
