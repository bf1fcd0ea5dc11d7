//! Change notifications for hosts of a scene.
//!
//! A scene records what changed during each operation into an
//! [`EventQueue`]; a presentation layer drains it once per frame instead of
//! diffing the whole scene.

use std::collections::VecDeque;

use crate::circuit::{Connection, NodeId, Signal};

/// Something that changed in a scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    /// Node was added
    NodeAdded { node: NodeId },
    /// Node was removed (its connections are reported separately)
    NodeRemoved { node: NodeId },
    /// Edge was created
    Connected { connection: Connection },
    /// Edge was removed or replaced
    Disconnected { connection: Connection },
    /// Gate input arity changed
    ArityChanged { node: NodeId, arity: usize },
    /// Input pin stimulus changed
    InputChanged { node: NodeId, value: Signal },
    /// Cached socket values of a node changed during propagation
    ValuesChanged { node: NodeId },
}

impl SceneEvent {
    /// Get the node this event relates to. Connection events report their
    /// target node.
    pub fn node(&self) -> NodeId {
        match self {
            Self::NodeAdded { node }
            | Self::NodeRemoved { node }
            | Self::ArityChanged { node, .. }
            | Self::InputChanged { node, .. }
            | Self::ValuesChanged { node } => *node,
            Self::Connected { connection } | Self::Disconnected { connection } => {
                connection.target.node
            }
        }
    }
}

/// FIFO of pending scene events.
#[derive(Debug, Clone)]
pub struct EventQueue {
    queue: VecDeque<SceneEvent>,
    enabled: bool,
}

impl EventQueue {
    /// Create an empty, recording queue.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            enabled: true,
        }
    }

    /// Enqueue an event if recording is enabled.
    pub fn emit(&mut self, event: SceneEvent) {
        if self.enabled {
            self.queue.push_back(event);
        }
    }

    /// Whether events are being recorded.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn recording on or off. Turning it off drops pending events.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.queue.clear();
        }
    }

    /// Get the number of pending events
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Take all pending events, oldest first.
    pub fn drain(&mut self) -> Vec<SceneEvent> {
        self.queue.drain(..).collect()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_and_drain() {
        let mut queue = EventQueue::new();
        queue.emit(SceneEvent::NodeAdded { node: NodeId(1) });
        queue.emit(SceneEvent::NodeRemoved { node: NodeId(1) });
        assert_eq!(queue.pending_count(), 2);

        let events = queue.drain();
        assert_eq!(events[0], SceneEvent::NodeAdded { node: NodeId(1) });
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn test_disabled_queue_drops_events() {
        let mut queue = EventQueue::new();
        queue.emit(SceneEvent::NodeAdded { node: NodeId(1) });
        queue.set_enabled(false);
        assert_eq!(queue.pending_count(), 0);
        queue.emit(SceneEvent::NodeAdded { node: NodeId(2) });
        assert!(queue.drain().is_empty());
    }
}
