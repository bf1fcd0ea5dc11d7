//! The scene: one circuit's nodes, connections, and propagated state.

use std::collections::BTreeMap;

use tracing::debug;

use super::graph::Connections;
use super::types::{Connection, Direction, NodeId, Signal, SocketAddr, SocketRef};
use crate::engine::{PropagationConfig, PropagationReport, Propagator};
use crate::error::{GatesimError, Result};
use crate::events::{EventQueue, SceneEvent};
use crate::nodes::{ComponentNode, Gate, GateKind, InputPin, Node, NodeKind, OutputPin};

/// A circuit: owns its nodes and connections and keeps every socket value
/// propagated.
///
/// Nodes are addressed by [`NodeId`]. Callers hold ids, never references,
/// and re-resolve them with [`Scene::get_node`] after each mutation.
/// Every successful mutation re-propagates before returning; a failed one
/// leaves the scene untouched.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: BTreeMap<NodeId, Node>,
    connections: Connections,
    next_id: u64,
    config: PropagationConfig,
    events: EventQueue,
    last_report: PropagationReport,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene with the default propagation configuration.
    pub fn new() -> Self {
        Self::with_config(PropagationConfig::default())
    }

    /// Create an empty scene with a custom propagation configuration.
    pub fn with_config(config: PropagationConfig) -> Self {
        Self {
            nodes: BTreeMap::new(),
            connections: Connections::new(),
            next_id: 0,
            config,
            events: EventQueue::new(),
            last_report: PropagationReport {
                converged: true,
                ..Default::default()
            },
        }
    }

    pub fn config(&self) -> &PropagationConfig {
        &self.config
    }

    /// Replace the propagation configuration and re-propagate.
    pub fn set_config(&mut self, config: PropagationConfig) {
        self.config = config;
        self.propagate();
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The id the next added node will receive.
    pub fn next_id(&self) -> NodeId {
        NodeId(self.next_id)
    }

    // ============ Nodes ============

    /// Add a node of any kind and return its id.
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let id = self.insert_node(kind);
        self.propagate();
        id
    }

    /// Add an input pin (initially disabled).
    pub fn add_input(&mut self) -> NodeId {
        self.add_node(NodeKind::Input(InputPin::new()))
    }

    /// Add an output pin.
    pub fn add_output(&mut self) -> NodeId {
        self.add_node(NodeKind::Output(OutputPin))
    }

    /// Add a gate with the minimum arity for its kind.
    pub fn add_gate(&mut self, kind: GateKind) -> NodeId {
        self.add_node(NodeKind::Gate(Gate::new(kind)))
    }

    /// Add a gate with an explicit input arity.
    pub fn add_gate_with_inputs(&mut self, kind: GateKind, inputs: usize) -> Result<NodeId> {
        let gate = Gate::with_inputs(kind, inputs)
            .ok_or_else(|| GatesimError::gate_arity(kind, inputs))?;
        Ok(self.add_node(NodeKind::Gate(gate)))
    }

    /// Add a sub-circuit instance.
    pub fn add_component(&mut self, component: ComponentNode) -> NodeId {
        self.add_node(NodeKind::Component(component))
    }

    /// Look up a node. Returns `None` if it does not exist (any more).
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Look up a node, failing with `InvalidNode`.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(&id)
            .ok_or(GatesimError::InvalidNode { node: id })
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Find the first node carrying the given label.
    pub fn find_by_label(&self, label: &str) -> Option<NodeId> {
        self.nodes
            .values()
            .find(|n| n.label() == Some(label))
            .map(Node::id)
    }

    /// Ids of all input pins in id order.
    pub fn input_pins(&self) -> Vec<NodeId> {
        self.ids_where(|kind| matches!(kind, NodeKind::Input(_)))
    }

    /// Ids of all output pins in id order.
    pub fn output_pins(&self) -> Vec<NodeId> {
        self.ids_where(|kind| matches!(kind, NodeKind::Output(_)))
    }

    /// Attach a display label to a node.
    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.set_label(Some(label.into()));
        Ok(())
    }

    /// Delete a node together with every connection touching it.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node> {
        let node = self
            .nodes
            .remove(&id)
            .ok_or(GatesimError::InvalidNode { node: id })?;
        let removed = self.connections.remove_node(id);
        debug!(node = %id, connections = removed.len(), "node removed");

        for connection in removed {
            self.events.emit(SceneEvent::Disconnected { connection });
        }
        self.events.emit(SceneEvent::NodeRemoved { node: id });
        self.propagate();
        Ok(node)
    }

    // ============ Connections ============

    /// Drive input `target_index` of `target` from output `source_index`
    /// of `source`.
    ///
    /// An existing edge on the target input is replaced and returned.
    pub fn connect(
        &mut self,
        target: NodeId,
        target_index: usize,
        source: NodeId,
        source_index: usize,
    ) -> Result<Option<Connection>> {
        let connection = self.check_connection(target, target_index, source, source_index)?;
        let replaced = self.insert_connection(connection);
        self.propagate();
        Ok(replaced)
    }

    /// Remove the edge driving input `index` of `target`, if any.
    pub fn disconnect(&mut self, target: NodeId, index: usize) -> Result<Option<Connection>> {
        self.node(target)?;
        let removed = self.connections.remove(SocketRef::new(target, index));
        if let Some(connection) = removed {
            debug!(%connection, "disconnected");
            self.events.emit(SceneEvent::Disconnected { connection });
            self.propagate();
        }
        Ok(removed)
    }

    /// All connections, ordered by target socket.
    pub fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        self.connections.iter()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Output socket driving input `index` of `target`.
    pub fn driver_of(&self, target: NodeId, index: usize) -> Option<SocketRef> {
        self.connections.driver(SocketRef::new(target, index))
    }

    /// Nodes consuming any output of `node`.
    pub fn consumers_of(&self, node: NodeId) -> Vec<NodeId> {
        self.connections.consumers_of(node).into_iter().collect()
    }

    // ============ Stimulus and values ============

    /// Set the stimulus of an input pin. Setting the current value again
    /// changes nothing.
    pub fn set_input(&mut self, id: NodeId, value: Signal) -> Result<()> {
        let pin = self.input_pin_mut(id)?;
        if pin.get() == value {
            return Ok(());
        }
        pin.set(value);
        self.events.emit(SceneEvent::InputChanged { node: id, value });
        self.propagate();
        Ok(())
    }

    /// Set several input pins, propagating once. Fails without changing
    /// anything if any id is not an input pin.
    pub fn set_inputs(&mut self, values: &[(NodeId, Signal)]) -> Result<()> {
        for (id, _) in values {
            self.input_pin(*id)?;
        }
        let mut changed = false;
        for &(id, value) in values {
            let pin = self.input_pin_mut(id)?;
            if pin.get() != value {
                pin.set(value);
                self.events.emit(SceneEvent::InputChanged { node: id, value });
                changed = true;
            }
        }
        if changed {
            self.propagate();
        }
        Ok(())
    }

    /// Flip an input pin between true and false. A disabled pin is left
    /// alone. Returns the resulting stimulus.
    pub fn toggle_input(&mut self, id: NodeId) -> Result<Signal> {
        let pin = self.input_pin_mut(id)?;
        let before = pin.get();
        let value = pin.toggle();
        if value != before {
            self.events.emit(SceneEvent::InputChanged { node: id, value });
            self.propagate();
        }
        Ok(value)
    }

    /// Current stimulus of an input pin.
    pub fn input_value(&self, id: NodeId) -> Result<Signal> {
        Ok(self.input_pin(id)?.get())
    }

    /// Value displayed by an output pin.
    pub fn output_value(&self, id: NodeId) -> Result<Signal> {
        let node = self.node(id)?;
        match node.kind() {
            NodeKind::Output(_) => Ok(node.input(0).unwrap_or_default()),
            _ => Err(GatesimError::WrongNodeKind {
                node: id,
                expected: "an output pin",
            }),
        }
    }

    /// Current value of any socket.
    pub fn socket_value(&self, addr: SocketAddr) -> Result<Signal> {
        let node = self.node(addr.node)?;
        let (value, arity) = match addr.direction {
            Direction::Input => (node.input(addr.index), node.arity_in()),
            Direction::Output => (node.output(addr.index), node.arity_out()),
        };
        value.ok_or_else(|| {
            GatesimError::invalid_socket(addr.node, addr.index, addr.direction, arity)
        })
    }

    // ============ Gate arity ============

    /// Add one input socket to a gate. Returns the new arity.
    pub fn increment(&mut self, id: NodeId) -> Result<usize> {
        let gate = self.gate_mut(id)?;
        let arity = gate.inputs();
        if !gate.increment() {
            return Err(arity_bound(id, gate));
        }
        self.finish_arity_change(id, arity + 1);
        Ok(arity + 1)
    }

    /// Remove the highest input socket of a gate, detaching any edge on it.
    /// Returns the new arity.
    pub fn decrement(&mut self, id: NodeId) -> Result<usize> {
        let gate = self.gate_mut(id)?;
        let arity = gate.inputs();
        if !gate.decrement() {
            return Err(arity_bound(id, gate));
        }
        for connection in self.connections.inputs_from(id, arity - 1) {
            self.connections.remove(connection.target);
            debug!(%connection, "detached by decrement");
            self.events.emit(SceneEvent::Disconnected { connection });
        }
        self.finish_arity_change(id, arity - 1);
        Ok(arity - 1)
    }

    // ============ Evaluation ============

    /// Host tick. Evaluation is combinational, so `delta_time` only paces
    /// the caller; the scene keeps no clock.
    pub fn run(&mut self, delta_time: f64) -> &PropagationReport {
        debug!(delta_time, "run");
        self.propagate();
        &self.last_report
    }

    /// Report of the most recent propagation.
    pub fn last_report(&self) -> &PropagationReport {
        &self.last_report
    }

    // ============ Events ============

    /// Take all pending change notifications.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        self.events.drain()
    }

    /// Turn change notifications on or off.
    pub fn set_event_recording(&mut self, enabled: bool) {
        self.events.set_enabled(enabled);
    }

    pub fn events_recording(&self) -> bool {
        self.events.is_enabled()
    }

    // ============ Internals ============

    /// Set input pins and propagate, skipping ids that are not input pins.
    pub(crate) fn drive_inputs(&mut self, values: &[(NodeId, Signal)]) {
        for &(id, value) in values {
            if let Ok(pin) = self.input_pin_mut(id) {
                pin.set(value);
            }
        }
        self.propagate();
    }

    /// Insert a node without propagating.
    pub(crate) fn insert_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        debug!(node = %id, kind = kind.type_name(), "node added");
        self.nodes.insert(id, Node::new(id, kind));
        self.events.emit(SceneEvent::NodeAdded { node: id });
        id
    }

    /// Insert a node under a caller-chosen id without propagating.
    /// Used when restoring snapshots.
    pub(crate) fn insert_node_with_id(&mut self, id: NodeId, kind: NodeKind) -> Result<()> {
        if self.nodes.contains_key(&id) {
            return Err(GatesimError::DuplicateNode { node: id });
        }
        // The counter must be able to move past the new id
        let next = id
            .0
            .checked_add(1)
            .ok_or(GatesimError::InvalidNode { node: id })?;
        self.nodes.insert(id, Node::new(id, kind));
        self.next_id = self.next_id.max(next);
        self.events.emit(SceneEvent::NodeAdded { node: id });
        Ok(())
    }

    /// Raise the id counter so that ids below `next` are never handed out.
    pub(crate) fn reserve_ids(&mut self, next: u64) {
        self.next_id = self.next_id.max(next);
    }

    /// Validate an edge against the current node set and arities.
    pub(crate) fn check_connection(
        &self,
        target: NodeId,
        target_index: usize,
        source: NodeId,
        source_index: usize,
    ) -> Result<Connection> {
        let target_node = self.node(target)?;
        let source_node = self.node(source)?;
        if target == source {
            return Err(GatesimError::SelfConnection { node: target });
        }
        if target_index >= target_node.arity_in() {
            return Err(GatesimError::invalid_socket(
                target,
                target_index,
                Direction::Input,
                target_node.arity_in(),
            ));
        }
        if source_index >= source_node.arity_out() {
            return Err(GatesimError::invalid_socket(
                source,
                source_index,
                Direction::Output,
                source_node.arity_out(),
            ));
        }
        Ok(Connection {
            source: SocketRef::new(source, source_index),
            target: SocketRef::new(target, target_index),
        })
    }

    /// Insert a validated edge without propagating.
    pub(crate) fn insert_connection(&mut self, connection: Connection) -> Option<Connection> {
        let replaced = self.connections.insert(connection);
        debug!(%connection, replaced = replaced.is_some(), "connected");
        if let Some(old) = replaced {
            self.events.emit(SceneEvent::Disconnected { connection: old });
        }
        self.events.emit(SceneEvent::Connected { connection });
        replaced
    }

    /// Recompute all socket values and report what changed.
    pub(crate) fn propagate(&mut self) {
        let before: Option<BTreeMap<NodeId, (Vec<Signal>, Vec<Signal>)>> =
            self.events.is_enabled().then(|| {
                self.nodes
                    .iter()
                    .map(|(&id, n)| (id, (n.input_values().to_vec(), n.output_values().to_vec())))
                    .collect()
            });

        let propagator = Propagator::new(self.config.clone());
        self.last_report = propagator.run(&mut self.nodes, &self.connections);

        if let Some(before) = before {
            for (&id, node) in &self.nodes {
                let unchanged = before.get(&id).is_some_and(|(inputs, outputs)| {
                    inputs.as_slice() == node.input_values()
                        && outputs.as_slice() == node.output_values()
                });
                if !unchanged {
                    self.events.emit(SceneEvent::ValuesChanged { node: id });
                }
            }
        }
    }

    fn finish_arity_change(&mut self, id: NodeId, arity: usize) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.sync_arity();
        }
        debug!(node = %id, arity, "gate arity changed");
        self.events.emit(SceneEvent::ArityChanged { node: id, arity });
        self.propagate();
    }

    fn ids_where(&self, predicate: impl Fn(&NodeKind) -> bool) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|n| predicate(n.kind()))
            .map(Node::id)
            .collect()
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(&id)
            .ok_or(GatesimError::InvalidNode { node: id })
    }

    fn input_pin(&self, id: NodeId) -> Result<&InputPin> {
        match self.node(id)?.kind() {
            NodeKind::Input(pin) => Ok(pin),
            _ => Err(GatesimError::WrongNodeKind {
                node: id,
                expected: "an input pin",
            }),
        }
    }

    fn input_pin_mut(&mut self, id: NodeId) -> Result<&mut InputPin> {
        match self.node_mut(id)?.kind_mut() {
            NodeKind::Input(pin) => Ok(pin),
            _ => Err(GatesimError::WrongNodeKind {
                node: id,
                expected: "an input pin",
            }),
        }
    }

    fn gate_mut(&mut self, id: NodeId) -> Result<&mut Gate> {
        match self.node_mut(id)?.kind_mut() {
            NodeKind::Gate(gate) => Ok(gate),
            _ => Err(GatesimError::WrongNodeKind {
                node: id,
                expected: "a gate",
            }),
        }
    }
}

fn arity_bound(id: NodeId, gate: &Gate) -> GatesimError {
    GatesimError::ArityBound {
        node: id,
        arity: gate.inputs(),
        min: gate.kind.min_inputs(),
        max: gate.kind.max_inputs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: Signal = Signal::True;
    const F: Signal = Signal::False;
    const D: Signal = Signal::Disabled;

    struct AndFixture {
        scene: Scene,
        v: NodeId,
        v2: NodeId,
        g: NodeId,
        o: NodeId,
    }

    fn and_fixture() -> AndFixture {
        let mut scene = Scene::new();
        let v = scene.add_input();
        let v2 = scene.add_input();
        let g = scene.add_gate(GateKind::And);
        let o = scene.add_output();
        scene.set_input(v, T).unwrap();
        scene.set_input(v2, T).unwrap();
        scene.connect(o, 0, g, 0).unwrap();
        scene.connect(g, 0, v, 0).unwrap();
        scene.connect(g, 1, v2, 0).unwrap();
        AndFixture { scene, v, v2, g, o }
    }

    #[test]
    fn test_and_increment_decrement_scenario() {
        let AndFixture { mut scene, g, o, .. } = and_fixture();
        assert_eq!(scene.output_value(o).unwrap(), T);

        assert_eq!(scene.increment(g).unwrap(), 3);
        assert_eq!(scene.output_value(o).unwrap(), D);

        assert_eq!(scene.decrement(g).unwrap(), 2);
        assert_eq!(scene.output_value(o).unwrap(), T);
    }

    #[test]
    fn test_decrement_two_input_gate_fails() {
        let AndFixture { mut scene, g, o, .. } = and_fixture();
        let err = scene.decrement(g).unwrap_err();
        assert!(matches!(err, GatesimError::ArityBound { arity: 2, min: 2, .. }));
        assert_eq!(scene.connection_count(), 3);
        assert_eq!(scene.output_value(o).unwrap(), T);
    }

    #[test]
    fn test_decrement_detaches_removed_socket() {
        let AndFixture { mut scene, v, g, o, .. } = and_fixture();
        scene.increment(g).unwrap();
        scene.connect(g, 2, v, 0).unwrap();
        assert_eq!(scene.output_value(o).unwrap(), T);

        scene.decrement(g).unwrap();
        assert_eq!(scene.connection_count(), 3);
        assert!(scene.driver_of(g, 2).is_none());
        assert!(scene.driver_of(g, 1).is_some());
        assert_eq!(scene.output_value(o).unwrap(), T);
    }

    #[test]
    fn test_unset_input_reads_disabled() {
        let mut scene = Scene::new();
        let a = scene.add_input();
        let b = scene.add_input();
        let g = scene.add_gate(GateKind::Or);
        let not = scene.add_gate(GateKind::Not);
        let o = scene.add_output();
        scene.connect(g, 0, a, 0).unwrap();
        scene.connect(g, 1, b, 0).unwrap();
        scene.connect(not, 0, g, 0).unwrap();
        scene.connect(o, 0, not, 0).unwrap();
        scene.set_input(a, T).unwrap();
        assert_eq!(scene.output_value(o).unwrap(), D);

        scene.set_input(b, F).unwrap();
        assert_eq!(scene.output_value(o).unwrap(), F);
    }

    #[test]
    fn test_disabled_dominance() {
        let mut scene = Scene::new();
        let on = scene.add_input();
        let off = scene.add_input();
        let and = scene.add_gate(GateKind::And);
        let not = scene.add_gate(GateKind::Not);
        let o1 = scene.add_output();
        let o2 = scene.add_output();
        scene.set_input(on, T).unwrap();
        scene.connect(and, 0, on, 0).unwrap();
        scene.connect(and, 1, off, 0).unwrap();
        scene.connect(not, 0, off, 0).unwrap();
        scene.connect(o1, 0, and, 0).unwrap();
        scene.connect(o2, 0, not, 0).unwrap();
        assert_eq!(scene.output_value(o1).unwrap(), D);
        assert_eq!(scene.output_value(o2).unwrap(), D);
    }

    #[test]
    fn test_connect_replaces_driver() {
        let mut scene = Scene::new();
        let old = scene.add_input();
        let new = scene.add_input();
        let o = scene.add_output();
        scene.set_input(old, T).unwrap();
        scene.set_input(new, F).unwrap();
        scene.connect(o, 0, old, 0).unwrap();
        assert_eq!(scene.output_value(o).unwrap(), T);

        let replaced = scene.connect(o, 0, new, 0).unwrap();
        assert_eq!(replaced.map(|c| c.source.node), Some(old));
        assert_eq!(scene.connection_count(), 1);
        assert_eq!(scene.output_value(o).unwrap(), F);

        scene.toggle_input(old).unwrap();
        assert_eq!(scene.output_value(o).unwrap(), F);
        scene.toggle_input(old).unwrap();
        assert_eq!(scene.output_value(o).unwrap(), F);
    }

    #[test]
    fn test_fan_in_invariant() {
        let mut scene = Scene::new();
        let sources: Vec<_> = (0..4).map(|_| scene.add_input()).collect();
        let g = scene.add_gate(GateKind::Xor);
        for &s in &sources {
            scene.connect(g, 0, s, 0).unwrap();
            scene.connect(g, 1, s, 0).unwrap();
        }
        let targets: Vec<_> = scene.connections().map(|c| c.target).collect();
        assert_eq!(targets.len(), 2);
        assert_eq!(scene.driver_of(g, 0).map(|s| s.node), Some(sources[3]));
    }

    #[test]
    fn test_connect_errors_leave_scene_unchanged() {
        let AndFixture { mut scene, v, g, o, .. } = and_fixture();
        let missing = NodeId(999);

        assert!(matches!(
            scene.connect(g, 0, missing, 0),
            Err(GatesimError::InvalidNode { .. })
        ));
        assert!(matches!(
            scene.connect(g, 0, g, 0),
            Err(GatesimError::SelfConnection { .. })
        ));
        assert!(matches!(
            scene.connect(g, 2, v, 0),
            Err(GatesimError::InvalidSocket {
                direction: Direction::Input,
                ..
            })
        ));
        assert!(matches!(
            scene.connect(g, 0, v, 1),
            Err(GatesimError::InvalidSocket {
                direction: Direction::Output,
                ..
            })
        ));
        assert!(matches!(
            scene.connect(v, 0, g, 0),
            Err(GatesimError::InvalidSocket { .. })
        ));
        assert_eq!(scene.connection_count(), 3);
        assert_eq!(scene.output_value(o).unwrap(), T);
    }

    #[test]
    fn test_disconnect() {
        let AndFixture { mut scene, g, o, .. } = and_fixture();
        let removed = scene.disconnect(g, 1).unwrap();
        assert!(removed.is_some());
        assert_eq!(scene.output_value(o).unwrap(), D);
        assert!(scene.disconnect(g, 1).unwrap().is_none());
        assert!(scene.disconnect(NodeId(42), 0).is_err());
    }

    #[test]
    fn test_remove_node_cascades() {
        let AndFixture { mut scene, v, g, o, .. } = and_fixture();
        let removed = scene.remove_node(g).unwrap();
        assert_eq!(removed.id(), g);
        assert_eq!(scene.connection_count(), 0);
        assert!(scene.get_node(g).is_none());
        assert_eq!(scene.output_value(o).unwrap(), D);
        assert_eq!(scene.input_value(v).unwrap(), T);
        assert!(scene.remove_node(g).is_err());
    }

    #[test]
    fn test_ids_never_reused() {
        let mut scene = Scene::new();
        let a = scene.add_input();
        scene.remove_node(a).unwrap();
        let b = scene.add_input();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_run_is_idempotent() {
        let AndFixture { mut scene, .. } = and_fixture();
        scene.run(0.016);
        let first: Vec<_> = scene
            .nodes()
            .map(|n| (n.input_values().to_vec(), n.output_values().to_vec()))
            .collect();
        scene.run(0.016);
        let second: Vec<_> = scene
            .nodes()
            .map(|n| (n.input_values().to_vec(), n.output_values().to_vec()))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        fn build(reverse: bool) -> Signal {
            let mut scene = Scene::new();
            let mut ids = BTreeMap::new();
            let mut names = vec!["a", "b", "x", "n", "o"];
            if reverse {
                names.reverse();
            }
            for name in names {
                let id = match name {
                    "a" | "b" => scene.add_input(),
                    "x" => scene.add_gate(GateKind::Xor),
                    "n" => scene.add_gate(GateKind::Not),
                    _ => scene.add_output(),
                };
                ids.insert(name, id);
            }
            scene.set_input(ids["a"], T).unwrap();
            scene.set_input(ids["b"], F).unwrap();
            scene.connect(ids["x"], 0, ids["a"], 0).unwrap();
            scene.connect(ids["x"], 1, ids["b"], 0).unwrap();
            scene.connect(ids["n"], 0, ids["x"], 0).unwrap();
            scene.connect(ids["o"], 0, ids["n"], 0).unwrap();
            scene.output_value(ids["o"]).unwrap()
        }
        assert_eq!(build(false), F);
        assert_eq!(build(true), F);
    }

    #[test]
    fn test_socket_value() {
        let AndFixture { scene, g, .. } = and_fixture();
        assert_eq!(scene.socket_value(SocketAddr::input(g, 1)).unwrap(), T);
        assert_eq!(scene.socket_value(SocketAddr::output(g, 0)).unwrap(), T);
        assert!(matches!(
            scene.socket_value(SocketAddr::output(g, 1)),
            Err(GatesimError::InvalidSocket { arity: 1, .. })
        ));
        assert!(scene.socket_value(SocketAddr::input(NodeId(77), 0)).is_err());
    }

    #[test]
    fn test_wrong_kind_errors() {
        let AndFixture { mut scene, v, g, o, .. } = and_fixture();
        assert!(matches!(
            scene.set_input(g, T),
            Err(GatesimError::WrongNodeKind { .. })
        ));
        assert!(scene.increment(v).is_err());
        assert!(scene.output_value(v).is_err());
        assert!(scene.input_value(o).is_err());
    }

    #[test]
    fn test_set_inputs_is_atomic() {
        let AndFixture { mut scene, v, v2, g, o, .. } = and_fixture();
        assert!(scene.set_inputs(&[(v, F), (g, F)]).is_err());
        assert_eq!(scene.input_value(v).unwrap(), T);

        scene.set_inputs(&[(v, F), (v2, F)]).unwrap();
        assert_eq!(scene.output_value(o).unwrap(), F);
    }

    #[test]
    fn test_set_input_same_value_is_silent() {
        let AndFixture { mut scene, v, v2, .. } = and_fixture();
        scene.drain_events();

        scene.set_input(v, T).unwrap();
        scene.set_inputs(&[(v, T), (v2, T)]).unwrap();
        assert!(scene.drain_events().is_empty());

        scene.set_inputs(&[(v, T), (v2, F)]).unwrap();
        let events = scene.drain_events();
        assert_eq!(events[0], SceneEvent::InputChanged { node: v2, value: F });
        assert!(!events.contains(&SceneEvent::InputChanged { node: v, value: T }));
    }

    #[test]
    fn test_toggle_disabled_input_is_noop() {
        let mut scene = Scene::new();
        let a = scene.add_input();
        scene.drain_events();
        assert_eq!(scene.toggle_input(a).unwrap(), D);
        assert!(scene.drain_events().is_empty());
    }

    #[test]
    fn test_events() {
        let mut scene = Scene::new();
        let a = scene.add_input();
        let o = scene.add_output();
        scene.connect(o, 0, a, 0).unwrap();
        scene.drain_events();

        scene.set_input(a, T).unwrap();
        let events = scene.drain_events();
        assert_eq!(events[0], SceneEvent::InputChanged { node: a, value: T });
        assert!(events.contains(&SceneEvent::ValuesChanged { node: a }));
        assert!(events.contains(&SceneEvent::ValuesChanged { node: o }));

        scene.run(0.0);
        assert!(scene.drain_events().is_empty());

        scene.set_event_recording(false);
        scene.set_input(a, F).unwrap();
        assert!(scene.drain_events().is_empty());
    }

    #[test]
    fn test_component_in_scene() {
        let mut inner = Scene::new();
        let a = inner.add_input();
        let b = inner.add_input();
        let nand = inner.add_gate(GateKind::Nand);
        let out = inner.add_output();
        inner.connect(nand, 0, a, 0).unwrap();
        inner.connect(nand, 1, b, 0).unwrap();
        inner.connect(out, 0, nand, 0).unwrap();

        let mut scene = Scene::new();
        let x = scene.add_input();
        let y = scene.add_input();
        let c = scene.add_component(ComponentNode::new("NAND2", inner));
        let o = scene.add_output();
        scene.connect(c, 0, x, 0).unwrap();
        scene.connect(c, 1, y, 0).unwrap();
        scene.connect(o, 0, c, 0).unwrap();
        assert_eq!(scene.get_node(c).map(Node::arity_in), Some(2));
        assert_eq!(scene.output_value(o).unwrap(), D);

        scene.set_inputs(&[(x, T), (y, T)]).unwrap();
        assert_eq!(scene.output_value(o).unwrap(), F);
        assert!(scene.last_report().converged);
        scene.toggle_input(y).unwrap();
        assert_eq!(scene.output_value(o).unwrap(), T);
        assert!(scene.last_report().converged);
    }

    #[test]
    fn test_add_gate_with_inputs() {
        let mut scene = Scene::new();
        let g = scene.add_gate_with_inputs(GateKind::Or, 4).unwrap();
        assert_eq!(scene.get_node(g).map(Node::arity_in), Some(4));
        assert!(matches!(
            scene.add_gate_with_inputs(GateKind::Not, 2),
            Err(GatesimError::GateArity {
                kind: GateKind::Not,
                arity: 2,
                min: 1,
                max: 1,
            })
        ));
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.next_id(), NodeId(1));
    }
}
