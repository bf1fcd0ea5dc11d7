//! Connection graph between sockets.
//!
//! Edges are keyed by their target input socket, which makes the fan-in
//! limit of one driver per input structural: inserting a second edge on the
//! same input replaces the first.

use std::collections::{BTreeMap, BTreeSet};

use super::types::{Connection, NodeId, SocketRef};

/// The set of directed edges of one scene.
#[derive(Debug, Clone, Default)]
pub struct Connections {
    /// Driven input socket -> driving output socket
    edges: BTreeMap<SocketRef, SocketRef>,
}

impl Connections {
    /// Create an empty connection set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Check if there are no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Insert an edge, returning the edge it replaced on the same input.
    pub fn insert(&mut self, connection: Connection) -> Option<Connection> {
        self.edges
            .insert(connection.target, connection.source)
            .map(|source| Connection {
                source,
                target: connection.target,
            })
    }

    /// Remove the edge driving the given input socket.
    pub fn remove(&mut self, target: SocketRef) -> Option<Connection> {
        self.edges
            .remove(&target)
            .map(|source| Connection { source, target })
    }

    /// Get the output socket driving an input socket.
    pub fn driver(&self, target: SocketRef) -> Option<SocketRef> {
        self.edges.get(&target).copied()
    }

    /// Iterate over all edges in target order.
    pub fn iter(&self) -> impl Iterator<Item = Connection> + '_ {
        self.edges.iter().map(|(&target, &source)| Connection { source, target })
    }

    /// Edges with either endpoint on the given node.
    pub fn touching(&self, node: NodeId) -> Vec<Connection> {
        self.iter().filter(|c| c.touches(node)).collect()
    }

    /// Remove every edge touching the given node.
    pub fn remove_node(&mut self, node: NodeId) -> Vec<Connection> {
        let removed = self.touching(node);
        for connection in &removed {
            self.edges.remove(&connection.target);
        }
        removed
    }

    /// Edges driving inputs of `node` at or above `index`.
    pub fn inputs_from(&self, node: NodeId, index: usize) -> Vec<Connection> {
        self.edges
            .range(SocketRef::new(node, index)..=SocketRef::new(node, usize::MAX))
            .map(|(&target, &source)| Connection { source, target })
            .collect()
    }

    /// Nodes consuming any output of `node`, in id order.
    pub fn consumers_of(&self, node: NodeId) -> BTreeSet<NodeId> {
        self.edges
            .iter()
            .filter(|(_, source)| source.node == node)
            .map(|(target, _)| target.node)
            .collect()
    }

    /// Fan-out table: source node -> consuming nodes.
    pub fn fanout(&self) -> BTreeMap<NodeId, BTreeSet<NodeId>> {
        let mut table: BTreeMap<NodeId, BTreeSet<NodeId>> = BTreeMap::new();
        for (target, source) in &self.edges {
            table.entry(source.node).or_default().insert(target.node);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(src: u64, src_idx: usize, dst: u64, dst_idx: usize) -> Connection {
        Connection {
            source: SocketRef::new(NodeId(src), src_idx),
            target: SocketRef::new(NodeId(dst), dst_idx),
        }
    }

    #[test]
    fn test_insert_replaces_driver() {
        let mut graph = Connections::new();
        assert!(graph.insert(edge(1, 0, 3, 0)).is_none());
        let replaced = graph.insert(edge(2, 0, 3, 0));
        assert_eq!(replaced, Some(edge(1, 0, 3, 0)));
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.driver(SocketRef::new(NodeId(3), 0)), Some(SocketRef::new(NodeId(2), 0)));
    }

    #[test]
    fn test_remove_node_drops_both_directions() {
        let mut graph = Connections::new();
        graph.insert(edge(1, 0, 2, 0));
        graph.insert(edge(2, 0, 3, 1));
        graph.insert(edge(4, 0, 3, 0));
        let removed = graph.remove_node(NodeId(2));
        assert_eq!(removed.len(), 2);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_inputs_from_range() {
        let mut graph = Connections::new();
        graph.insert(edge(1, 0, 5, 0));
        graph.insert(edge(2, 0, 5, 1));
        graph.insert(edge(3, 0, 5, 2));
        graph.insert(edge(3, 0, 6, 0));
        let high = graph.inputs_from(NodeId(5), 1);
        assert_eq!(high, vec![edge(2, 0, 5, 1), edge(3, 0, 5, 2)]);
    }

    #[test]
    fn test_fanout() {
        let mut graph = Connections::new();
        graph.insert(edge(1, 0, 2, 0));
        graph.insert(edge(1, 0, 3, 0));
        let fanout = graph.fanout();
        assert_eq!(fanout[&NodeId(1)].len(), 2);
        assert_eq!(graph.consumers_of(NodeId(1)).len(), 2);
        assert!(graph.consumers_of(NodeId(2)).is_empty());
    }
}
