//! Scene snapshots for persistence.
//!
//! A [`SceneSnapshot`] enumerates everything needed to rebuild a scene:
//! nodes with their type-specific parameters and input pin values, and all
//! connections. Cached socket values are not stored; restoring runs one
//! propagation instead.
//!
//! ```
//! use gatesim_core::{GateKind, Scene, Signal};
//!
//! let mut scene = Scene::new();
//! let a = scene.add_input();
//! let not = scene.add_gate(GateKind::Not);
//! scene.connect(not, 0, a, 0).unwrap();
//! scene.set_input(a, Signal::True).unwrap();
//!
//! let json = scene.snapshot().to_json().unwrap();
//! let restored = Scene::restore(&gatesim_core::SceneSnapshot::from_json(&json).unwrap()).unwrap();
//! assert_eq!(restored.get_node(not).unwrap().output(0), Some(Signal::False));
//! ```

use serde::{Deserialize, Serialize};

use crate::circuit::{validate_scene, Connection, NodeId, Scene, Signal};
use crate::engine::PropagationConfig;
use crate::error::{GatesimError, Result};
use crate::nodes::{ComponentNode, Gate, GateKind, InputPin, NodeKind, OutputPin};

/// Serializable description of a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Id counter at the time of the snapshot
    pub next_id: u64,
    pub nodes: Vec<NodeRecord>,
    pub connections: Vec<Connection>,
}

/// One node of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub node: NodeRecordKind,
}

/// Type-specific parameters of a node record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeRecordKind {
    Input { value: Signal },
    Output,
    Gate { kind: GateKind, inputs: usize },
    Component { name: String, scene: SceneSnapshot },
}

impl SceneSnapshot {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Scene {
    /// Enumerate nodes and connections for persistence.
    pub fn snapshot(&self) -> SceneSnapshot {
        let nodes = self
            .nodes()
            .map(|node| NodeRecord {
                id: node.id(),
                label: node.label().map(str::to_string),
                node: match node.kind() {
                    NodeKind::Input(pin) => NodeRecordKind::Input { value: pin.get() },
                    NodeKind::Output(_) => NodeRecordKind::Output,
                    NodeKind::Gate(gate) => NodeRecordKind::Gate {
                        kind: gate.kind,
                        inputs: gate.inputs(),
                    },
                    NodeKind::Component(component) => NodeRecordKind::Component {
                        name: component.name.clone(),
                        scene: component.scene().snapshot(),
                    },
                },
            })
            .collect();

        SceneSnapshot {
            next_id: self.next_id().0,
            nodes,
            connections: self.connections().collect(),
        }
    }

    /// Rebuild a scene from a snapshot, keeping node ids.
    pub fn restore(snapshot: &SceneSnapshot) -> Result<Scene> {
        Self::restore_with_config(snapshot, PropagationConfig::default())
    }

    /// Rebuild a scene from a snapshot with a custom propagation config.
    pub fn restore_with_config(snapshot: &SceneSnapshot, config: PropagationConfig) -> Result<Scene> {
        let mut scene = Scene::with_config(config);

        for record in &snapshot.nodes {
            let kind = match &record.node {
                NodeRecordKind::Input { value } => NodeKind::Input(InputPin::with_state(*value)),
                NodeRecordKind::Output => NodeKind::Output(OutputPin),
                NodeRecordKind::Gate { kind, inputs } => {
                    let gate = Gate::with_inputs(*kind, *inputs).ok_or(GatesimError::ArityBound {
                        node: record.id,
                        arity: *inputs,
                        min: kind.min_inputs(),
                        max: kind.max_inputs(),
                    })?;
                    NodeKind::Gate(gate)
                }
                NodeRecordKind::Component { name, scene } => {
                    NodeKind::Component(ComponentNode::new(name.clone(), Scene::restore(scene)?))
                }
            };
            scene.insert_node_with_id(record.id, kind)?;
            if let Some(label) = &record.label {
                scene.set_label(record.id, label.clone())?;
            }
        }
        scene.reserve_ids(snapshot.next_id);

        for connection in &snapshot.connections {
            let checked = scene.check_connection(
                connection.target.node,
                connection.target.index,
                connection.source.node,
                connection.source.index,
            )?;
            scene.insert_connection(checked);
        }

        validate_scene(&scene)?;
        scene.run(0.0);
        scene.drain_events();
        Ok(scene)
    }
}

/// Find the first record carrying the given label.
pub fn find_record<'a>(snapshot: &'a SceneSnapshot, label: &str) -> Option<&'a NodeRecord> {
    snapshot
        .nodes
        .iter()
        .find(|record| record.label.as_deref() == Some(label))
}
