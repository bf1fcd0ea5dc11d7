//! Error types for the Gatesim circuit engine.
//!
//! This module provides a unified error type [`GatesimError`] that covers
//! structural edits of a scene, netlist parsing, and snapshot I/O.
//! Propagation itself never fails: unresolved state degrades to
//! [`Signal::Disabled`](crate::circuit::Signal::Disabled).

use thiserror::Error;

use crate::circuit::{Direction, NodeId};
use crate::nodes::GateKind;

/// Result type alias using [`GatesimError`].
pub type Result<T> = std::result::Result<T, GatesimError>;

/// Unified error type for all Gatesim operations.
#[derive(Error, Debug)]
pub enum GatesimError {
    // ============ Scene Errors ============
    /// Referenced node does not exist in the scene
    #[error("Node {node} does not exist in the scene")]
    InvalidNode { node: NodeId },

    /// Socket index outside the node's current arity
    #[error("Node {node} has no {direction} socket {index} (arity {arity})")]
    InvalidSocket {
        node: NodeId,
        index: usize,
        direction: Direction,
        arity: usize,
    },

    /// Edge from a node's output back to its own input
    #[error("Node {node} cannot be connected to itself")]
    SelfConnection { node: NodeId },

    /// Gate arity change outside the allowed range
    #[error("Gate {node} cannot change arity from {arity} (allowed {min}..={max})")]
    ArityBound {
        node: NodeId,
        arity: usize,
        min: usize,
        max: usize,
    },

    /// Gate requested with an input count outside its kind's range
    #[error("{kind} gate cannot have {arity} inputs (allowed {min}..={max})")]
    GateArity {
        kind: GateKind,
        arity: usize,
        min: usize,
        max: usize,
    },

    /// Operation applied to a node of the wrong variant
    #[error("Node {node} is not {expected}")]
    WrongNodeKind { node: NodeId, expected: &'static str },

    /// Node id already present when restoring a snapshot
    #[error("Node {node} appears more than once")]
    DuplicateNode { node: NodeId },

    // ============ Netlist Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Unknown element keyword
    #[error("Unknown element '{keyword}' at line {line}")]
    UnknownElement { keyword: String, line: usize },

    /// Element name declared twice in the same circuit
    #[error("Duplicate element name '{name}' at line {line}")]
    DuplicateName { name: String, line: usize },

    /// Reference to an element that was never declared
    #[error("Undefined element '{name}' referenced at line {line}")]
    UndefinedName { name: String, line: usize },

    /// Instance of a sub-circuit that was never defined
    #[error("Undefined sub-circuit '{name}' referenced at line {line}")]
    UndefinedDefinition { name: String, line: usize },

    /// Sub-circuit that instantiates itself
    #[error("Sub-circuit '{name}' instantiates itself")]
    RecursiveDefinition { name: String },

    /// Malformed literal value
    #[error("Invalid value '{value}' at line {line}: {message}")]
    InvalidValue {
        value: String,
        line: usize,
        message: String,
    },

    // ============ Analysis Errors ============
    /// Truth table requested for too many inputs
    #[error("Truth table needs at most {max} inputs, circuit has {count}")]
    TooManyInputs { count: usize, max: usize },

    // ============ I/O Errors ============
    /// Error reading circuit file
    #[error("Failed to read circuit file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot (de)serialization failure
    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GatesimError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid socket error
    pub fn invalid_socket(node: NodeId, index: usize, direction: Direction, arity: usize) -> Self {
        Self::InvalidSocket {
            node,
            index,
            direction,
            arity,
        }
    }

    /// Create a gate arity error for a gate that does not exist yet
    pub fn gate_arity(kind: GateKind, arity: usize) -> Self {
        Self::GateArity {
            kind,
            arity,
            min: kind.min_inputs(),
            max: kind.max_inputs(),
        }
    }

    /// Create an invalid literal error
    pub fn invalid_value(value: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            value: value.into(),
            line,
            message: message.into(),
        }
    }
}
