//! Scene validation.

use crate::error::{GatesimError, Result};

use super::{Direction, Scene};

/// Validate the structural invariants of a scene.
///
/// Checks:
/// - Every connection endpoint references an existing node
/// - Every connection index lies within the current arity
/// - No node drives its own input
/// - The id counter is ahead of every node id
///
/// Fan-in of one per input socket holds by construction of the
/// connection graph.
pub fn validate_scene(scene: &Scene) -> Result<()> {
    for connection in scene.connections() {
        let source = scene.node(connection.source.node)?;
        let target = scene.node(connection.target.node)?;

        if source.id() == target.id() {
            return Err(GatesimError::SelfConnection { node: source.id() });
        }
        if connection.source.index >= source.arity_out() {
            return Err(GatesimError::invalid_socket(
                source.id(),
                connection.source.index,
                Direction::Output,
                source.arity_out(),
            ));
        }
        if connection.target.index >= target.arity_in() {
            return Err(GatesimError::invalid_socket(
                target.id(),
                connection.target.index,
                Direction::Input,
                target.arity_in(),
            ));
        }
    }

    // The id counter must stay ahead of every live id
    if let Some(node) = scene.nodes().find(|n| n.id() >= scene.next_id()) {
        return Err(GatesimError::InvalidNode { node: node.id() });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::GateKind;

    #[test]
    fn test_valid_scene_passes() {
        let mut scene = Scene::new();
        let a = scene.add_input();
        let g = scene.add_gate(GateKind::Not);
        scene.connect(g, 0, a, 0).unwrap();
        assert!(validate_scene(&scene).is_ok());
    }

    #[test]
    fn test_empty_scene_passes() {
        assert!(validate_scene(&Scene::new()).is_ok());
    }
}
