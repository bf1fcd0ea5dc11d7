//! Boolean gates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::circuit::Signal;

/// Largest input arity a gate can be widened to.
pub const MAX_GATE_INPUTS: usize = 64;

/// Gate function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateKind {
    And,
    Or,
    Not,
    Xor,
    Nand,
    Nor,
    Xnor,
    /// Single-input buffer (identity)
    Buf,
}

impl GateKind {
    /// All gate kinds, in declaration order.
    pub const ALL: [GateKind; 8] = [
        GateKind::And,
        GateKind::Or,
        GateKind::Not,
        GateKind::Xor,
        GateKind::Nand,
        GateKind::Nor,
        GateKind::Xnor,
        GateKind::Buf,
    ];

    /// Parse a gate kind from its netlist keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "NOT" | "INV" => Some(Self::Not),
            "XOR" => Some(Self::Xor),
            "NAND" => Some(Self::Nand),
            "NOR" => Some(Self::Nor),
            "XNOR" => Some(Self::Xnor),
            "BUF" => Some(Self::Buf),
            _ => None,
        }
    }

    /// Netlist keyword for this kind.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Xor => "XOR",
            Self::Nand => "NAND",
            Self::Nor => "NOR",
            Self::Xnor => "XNOR",
            Self::Buf => "BUF",
        }
    }

    /// Check if the input arity of this kind is fixed.
    pub fn is_unary(&self) -> bool {
        matches!(self, Self::Not | Self::Buf)
    }

    /// Smallest allowed input arity.
    pub fn min_inputs(&self) -> usize {
        if self.is_unary() {
            1
        } else {
            2
        }
    }

    /// Largest allowed input arity.
    pub fn max_inputs(&self) -> usize {
        if self.is_unary() {
            1
        } else {
            MAX_GATE_INPUTS
        }
    }

    /// Apply the gate function.
    ///
    /// Any disabled input disables the output, for every kind. This keeps
    /// each gate monotone: a determinate output can only appear once all
    /// inputs are determinate.
    pub fn apply(&self, inputs: &[Signal]) -> Signal {
        let mut bits = Vec::with_capacity(inputs.len());
        for input in inputs {
            match input.to_bool() {
                Some(bit) => bits.push(bit),
                None => return Signal::Disabled,
            }
        }
        if bits.is_empty() {
            return Signal::Disabled;
        }

        let ones = bits.iter().filter(|&&b| b).count();
        let value = match self {
            Self::And => ones == bits.len(),
            Self::Or => ones > 0,
            Self::Not => !bits[0],
            Self::Xor => ones % 2 == 1,
            Self::Nand => ones != bits.len(),
            Self::Nor => ones == 0,
            Self::Xnor => ones % 2 == 0,
            Self::Buf => bits[0],
        };
        Signal::from(value)
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A gate node: N inputs, one output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    pub kind: GateKind,
    inputs: usize,
}

impl Gate {
    /// Create a gate with the minimum arity for its kind.
    pub fn new(kind: GateKind) -> Self {
        Self {
            kind,
            inputs: kind.min_inputs(),
        }
    }

    /// Create a gate with an explicit input arity.
    /// Returns `None` if the arity is outside the kind's range.
    pub fn with_inputs(kind: GateKind, inputs: usize) -> Option<Self> {
        if inputs < kind.min_inputs() || inputs > kind.max_inputs() {
            return None;
        }
        Some(Self { kind, inputs })
    }

    /// Current input arity.
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    /// Add one input socket. Returns false at the upper bound.
    pub fn increment(&mut self) -> bool {
        if self.inputs >= self.kind.max_inputs() {
            return false;
        }
        self.inputs += 1;
        true
    }

    /// Remove the highest input socket. Returns false at the lower bound.
    pub fn decrement(&mut self) -> bool {
        if self.inputs <= self.kind.min_inputs() {
            return false;
        }
        self.inputs -= 1;
        true
    }

    /// Evaluate the gate output.
    pub fn evaluate(&self, inputs: &[Signal]) -> Signal {
        self.kind.apply(inputs)
    }
}
