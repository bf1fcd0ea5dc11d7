//! Node models for circuit simulation.
//!
//! This module provides the four kinds of circuit elements:
//! - Pins: Input (stimulus), Output (probe)
//! - Gates: AND, OR, NOT, XOR, NAND, NOR, XNOR, BUF
//! - Components: nested sub-circuits
//!
//! Each kind evaluates its output sockets from its input sockets.

mod component;
mod gate;
mod pins;

pub use component::{ComponentNode, Port};
pub use gate::{Gate, GateKind, MAX_GATE_INPUTS};
pub use pins::{InputPin, OutputPin};

use crate::circuit::{NodeId, Signal};

/// The variant part of a node.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Input(InputPin),
    Output(OutputPin),
    Gate(Gate),
    Component(ComponentNode),
}

impl NodeKind {
    /// Short type tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Input(_) => "input",
            NodeKind::Output(_) => "output",
            NodeKind::Gate(_) => "gate",
            NodeKind::Component(_) => "component",
        }
    }

    /// Number of input sockets.
    pub fn arity_in(&self) -> usize {
        match self {
            NodeKind::Input(_) => 0,
            NodeKind::Output(_) => 1,
            NodeKind::Gate(g) => g.inputs(),
            NodeKind::Component(c) => c.input_ports().len(),
        }
    }

    /// Number of output sockets.
    pub fn arity_out(&self) -> usize {
        match self {
            NodeKind::Input(_) => 1,
            NodeKind::Output(_) => 0,
            NodeKind::Gate(_) => 1,
            NodeKind::Component(c) => c.output_ports().len(),
        }
    }

    /// Compute output values from input values.
    pub fn evaluate(&mut self, inputs: &[Signal]) -> Vec<Signal> {
        match self {
            NodeKind::Input(pin) => vec![pin.get()],
            NodeKind::Output(_) => Vec::new(),
            NodeKind::Gate(gate) => vec![gate.evaluate(inputs)],
            NodeKind::Component(component) => component.evaluate(inputs),
        }
    }
}

/// A circuit element owned by a scene.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    label: Option<String>,
    kind: NodeKind,
    /// Value seen on each input socket after the last propagation
    inputs: Vec<Signal>,
    /// Value on each output socket after the last propagation
    outputs: Vec<Signal>,
}

impl Node {
    /// Create a node with all sockets disabled.
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            label: None,
            inputs: vec![Signal::Disabled; kind.arity_in()],
            outputs: vec![Signal::Disabled; kind.arity_out()],
            kind,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn arity_in(&self) -> usize {
        self.kind.arity_in()
    }

    pub fn arity_out(&self) -> usize {
        self.kind.arity_out()
    }

    /// Cached value of an input socket.
    pub fn input(&self, index: usize) -> Option<Signal> {
        self.inputs.get(index).copied()
    }

    /// Cached value of an output socket.
    pub fn output(&self, index: usize) -> Option<Signal> {
        self.outputs.get(index).copied()
    }

    pub fn input_values(&self) -> &[Signal] {
        &self.inputs
    }

    pub fn output_values(&self) -> &[Signal] {
        &self.outputs
    }

    /// Gate parameters, if this node is a gate.
    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            NodeKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    pub(crate) fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    pub(crate) fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    pub(crate) fn evaluate(&mut self, inputs: &[Signal]) -> Vec<Signal> {
        self.kind.evaluate(inputs)
    }

    /// Store the values computed by propagation.
    pub(crate) fn store(&mut self, inputs: Vec<Signal>, outputs: Vec<Signal>) {
        self.inputs = inputs;
        self.outputs = outputs;
    }

    /// Resize caches after an arity change; new sockets start disabled.
    pub(crate) fn sync_arity(&mut self) {
        self.inputs.resize(self.kind.arity_in(), Signal::Disabled);
        self.outputs.resize(self.kind.arity_out(), Signal::Disabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_per_kind() {
        let input = Node::new(NodeId(0), NodeKind::Input(InputPin::new()));
        assert_eq!((input.arity_in(), input.arity_out()), (0, 1));

        let output = Node::new(NodeId(1), NodeKind::Output(OutputPin));
        assert_eq!((output.arity_in(), output.arity_out()), (1, 0));

        let gate = Node::new(NodeId(2), NodeKind::Gate(Gate::new(GateKind::Or)));
        assert_eq!((gate.arity_in(), gate.arity_out()), (2, 1));
        assert_eq!(gate.input_values(), &[Signal::Disabled, Signal::Disabled]);
        assert_eq!(gate.type_name(), "gate");
    }

    #[test]
    fn test_sync_arity_after_increment() {
        let mut node = Node::new(NodeId(0), NodeKind::Gate(Gate::new(GateKind::And)));
        if let NodeKind::Gate(g) = node.kind_mut() {
            assert!(g.increment());
        }
        node.sync_arity();
        assert_eq!(node.input_values().len(), 3);
        assert_eq!(node.input(2), Some(Signal::Disabled));
        assert_eq!(node.input(3), None);
    }
}
