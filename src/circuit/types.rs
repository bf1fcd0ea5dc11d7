//! Core types for circuit representation.

use std::fmt;
use std::ops::Not;

use serde::{Deserialize, Serialize};

/// A unique identifier for a node in a scene.
/// Ids are handed out in increasing order and never reused by the same scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tri-state logic value carried by every socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    /// Logic high
    True,
    /// Logic low
    False,
    /// Undriven or indeterminate (not the same as low)
    #[default]
    Disabled,
}

impl Signal {
    /// Check if the signal carries a determinate value.
    pub fn is_determinate(&self) -> bool {
        !matches!(self, Signal::Disabled)
    }

    /// Convert to a boolean, `None` when disabled.
    pub fn to_bool(self) -> Option<bool> {
        match self {
            Signal::True => Some(true),
            Signal::False => Some(false),
            Signal::Disabled => None,
        }
    }

    /// Parse the single-character form used by the netlist and CLI
    /// (`1`, `0`, `x`).
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.to_ascii_lowercase().as_str() {
            "1" | "true" | "high" => Some(Signal::True),
            "0" | "false" | "low" => Some(Signal::False),
            "x" | "z" | "disabled" => Some(Signal::Disabled),
            _ => None,
        }
    }
}

impl From<bool> for Signal {
    fn from(value: bool) -> Self {
        if value {
            Signal::True
        } else {
            Signal::False
        }
    }
}

impl From<Option<bool>> for Signal {
    fn from(value: Option<bool>) -> Self {
        value.map(Signal::from).unwrap_or(Signal::Disabled)
    }
}

impl Not for Signal {
    type Output = Signal;

    fn not(self) -> Signal {
        match self {
            Signal::True => Signal::False,
            Signal::False => Signal::True,
            Signal::Disabled => Signal::Disabled,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::True => write!(f, "1"),
            Signal::False => write!(f, "0"),
            Signal::Disabled => write!(f, "x"),
        }
    }
}

/// Whether a socket receives or produces a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Input => write!(f, "input"),
            Direction::Output => write!(f, "output"),
        }
    }
}

/// One socket on one node. The direction is implied by where the reference
/// is used (connection source or target).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SocketRef {
    pub node: NodeId,
    pub index: usize,
}

impl SocketRef {
    pub fn new(node: NodeId, index: usize) -> Self {
        Self { node, index }
    }
}

impl fmt::Display for SocketRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.node, self.index)
    }
}

/// Fully qualified socket address `(node, index, direction)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SocketAddr {
    pub node: NodeId,
    pub index: usize,
    pub direction: Direction,
}

impl SocketAddr {
    /// Address an input socket.
    pub fn input(node: NodeId, index: usize) -> Self {
        Self {
            node,
            index,
            direction: Direction::Input,
        }
    }

    /// Address an output socket.
    pub fn output(node: NodeId, index: usize) -> Self {
        Self {
            node,
            index,
            direction: Direction::Output,
        }
    }
}

/// Directed edge from an output socket to an input socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Connection {
    /// Driving output socket
    pub source: SocketRef,
    /// Driven input socket
    pub target: SocketRef,
}

impl Connection {
    /// Check if either endpoint sits on the given node.
    pub fn touches(&self, node: NodeId) -> bool {
        self.source.node == node || self.target.node == node
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}
