//! Three-valued logic and primitive gate evaluation.

use std::fmt;
use std::ops::Not;

use serde::Serialize;

use crate::circuit::GateKind;

/// A signal value: 0, 1 or unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Logic {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1")]
    One,
    /// Unknown or uninitialized
    #[default]
    #[serde(rename = "X")]
    X,
}

impl Logic {
    /// Parse `0`, `1`, `x` or `X`.
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '0' => Some(Self::Zero),
            '1' => Some(Self::One),
            'x' | 'X' => Some(Self::X),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Self::Zero => '0',
            Self::One => '1',
            Self::X => 'X',
        }
    }

    pub fn is_known(self) -> bool {
        self != Self::X
    }
}

impl From<bool> for Logic {
    fn from(value: bool) -> Self {
        if value {
            Self::One
        } else {
            Self::Zero
        }
    }
}

impl Not for Logic {
    type Output = Logic;

    fn not(self) -> Logic {
        match self {
            Self::Zero => Self::One,
            Self::One => Self::Zero,
            Self::X => Self::X,
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl GateKind {
    /// Evaluate this gate over its input values.
    ///
    /// AND/OR families short-circuit on their controlling value, so a known
    /// controlling input masks unknowns on the others. XOR/XNOR are n-input
    /// parity and unknown if any input is. NOT and BUF take exactly one input.
    /// An input count the gate cannot take yields `X`.
    pub fn evaluate(&self, inputs: &[Logic]) -> Logic {
        if inputs.is_empty() {
            return Logic::X;
        }
        match self {
            Self::And => and(inputs),
            Self::Nand => !and(inputs),
            Self::Or => or(inputs),
            Self::Nor => !or(inputs),
            Self::Xor => parity(inputs),
            Self::Xnor => !parity(inputs),
            Self::Not => single(inputs).map_or(Logic::X, |v| !v),
            Self::Buf => single(inputs).unwrap_or(Logic::X),
        }
    }
}

fn and(inputs: &[Logic]) -> Logic {
    if inputs.contains(&Logic::Zero) {
        Logic::Zero
    } else if inputs.contains(&Logic::X) {
        Logic::X
    } else {
        Logic::One
    }
}

fn or(inputs: &[Logic]) -> Logic {
    if inputs.contains(&Logic::One) {
        Logic::One
    } else if inputs.contains(&Logic::X) {
        Logic::X
    } else {
        Logic::Zero
    }
}

fn parity(inputs: &[Logic]) -> Logic {
    if inputs.contains(&Logic::X) {
        return Logic::X;
    }
    let ones = inputs.iter().filter(|&&v| v == Logic::One).count();
    Logic::from(ones % 2 == 1)
}

fn single(inputs: &[Logic]) -> Option<Logic> {
    match inputs {
        [value] => Some(*value),
        _ => None,
    }
}
