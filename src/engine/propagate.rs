//! Fixed-point propagation over a scene's nodes.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{trace, warn};

use crate::circuit::{Connections, NodeId, Signal, SocketRef};
use crate::nodes::Node;

use super::EXTRA_PASSES;

/// Configuration for the propagation engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationConfig {
    /// Pass budget per round. `None` uses `output_sockets + EXTRA_PASSES`,
    /// which is enough for any scene without a socket-level cycle.
    pub max_passes: Option<usize>,
}

impl PropagationConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pass budget per round.
    ///
    /// A budget smaller than the depth of the scene pins the deepest nodes
    /// to disabled; this is mostly useful to bound work on huge scenes.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = Some(max_passes.max(1));
        self
    }

    /// The effective pass budget for a scene with `output_sockets` output
    /// sockets in total.
    ///
    /// Each output socket leaves `Disabled` at most once, and a
    /// multi-output component may settle one socket per pass.
    pub fn budget(&self, output_sockets: usize) -> usize {
        self.max_passes.unwrap_or(output_sockets + EXTRA_PASSES).max(1)
    }
}

/// Outcome of one propagation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationReport {
    /// Total evaluation passes across all rounds
    pub passes: usize,
    /// False if any node had to be pinned
    pub converged: bool,
    /// Nodes forced to disabled because they were still changing
    pub pinned: Vec<NodeId>,
}

/// Relaxation engine.
#[derive(Debug, Clone, Default)]
pub struct Propagator {
    config: PropagationConfig,
}

impl Propagator {
    pub fn new(config: PropagationConfig) -> Self {
        Self { config }
    }

    /// Recompute every socket value from scratch and store it on the nodes.
    pub fn run(
        &self,
        nodes: &mut BTreeMap<NodeId, Node>,
        connections: &Connections,
    ) -> PropagationReport {
        let sockets = nodes.values().map(Node::arity_out).sum();
        let budget = self.config.budget(sockets);
        let fanout = connections.fanout();

        let mut current: BTreeMap<NodeId, Vec<Signal>> = nodes
            .iter()
            .map(|(&id, node)| (id, vec![Signal::Disabled; node.arity_out()]))
            .collect();
        let mut dirty: BTreeSet<NodeId> = nodes.keys().copied().collect();
        let mut changed: BTreeSet<NodeId> = BTreeSet::new();
        let mut pinned: BTreeSet<NodeId> = BTreeSet::new();

        let mut passes = 0usize;
        let mut round_passes = 0usize;

        while !dirty.is_empty() {
            if round_passes == budget {
                // Everything that moved in the last pass is still unsettled
                warn!(
                    budget,
                    unsettled = changed.len(),
                    "propagation budget exhausted, pinning nodes to disabled"
                );
                dirty.clear();
                for &id in &changed {
                    pinned.insert(id);
                    if let Some(values) = current.get_mut(&id) {
                        values.fill(Signal::Disabled);
                    }
                    if let Some(consumers) = fanout.get(&id) {
                        dirty.extend(consumers.iter().copied());
                    }
                }
                dirty.retain(|id| !pinned.contains(id));
                changed.clear();
                round_passes = 0;
                continue;
            }

            let mut updates = Vec::new();
            for id in &dirty {
                if pinned.contains(id) {
                    continue;
                }
                let Some(node) = nodes.get_mut(id) else {
                    continue;
                };
                let inputs = gather_inputs(*id, node.arity_in(), connections, &current);
                let outputs = node.evaluate(&inputs);
                if current.get(id) != Some(&outputs) {
                    updates.push((*id, outputs));
                }
            }

            dirty.clear();
            changed.clear();
            for (id, outputs) in updates {
                current.insert(id, outputs);
                changed.insert(id);
                if let Some(consumers) = fanout.get(&id) {
                    dirty.extend(consumers.iter().copied());
                }
            }

            passes += 1;
            round_passes += 1;
            trace!(pass = passes, changed = changed.len(), "propagation pass");
        }

        // Gather every input before any output is moved out of `current`
        let settled: Vec<(NodeId, Vec<Signal>)> = nodes
            .iter()
            .map(|(&id, node)| (id, gather_inputs(id, node.arity_in(), connections, &current)))
            .collect();
        for (id, inputs) in settled {
            let outputs = current.remove(&id).unwrap_or_default();
            if let Some(node) = nodes.get_mut(&id) {
                node.store(inputs, outputs);
            }
        }

        PropagationReport {
            passes,
            converged: pinned.is_empty(),
            pinned: pinned.into_iter().collect(),
        }
    }
}

/// Read the value arriving at each input socket of `node`.
/// Undriven sockets read disabled.
fn gather_inputs(
    node: NodeId,
    arity: usize,
    connections: &Connections,
    current: &BTreeMap<NodeId, Vec<Signal>>,
) -> Vec<Signal> {
    (0..arity)
        .map(|index| {
            connections
                .driver(SocketRef::new(node, index))
                .and_then(|source| current.get(&source.node)?.get(source.index).copied())
                .unwrap_or(Signal::Disabled)
        })
        .collect()
}
