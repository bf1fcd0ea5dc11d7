//! Building scenes from parsed netlists.

use std::collections::HashMap;

use tracing::debug;

use super::{NodeId, Scene};
use crate::dsl::{CircuitAst, ElementDef, ElementKind};
use crate::error::{GatesimError, Result};
use crate::nodes::{ComponentNode, Gate, InputPin, NodeKind, OutputPin};

impl Scene {
    /// Build a scene from a parsed netlist.
    ///
    /// Every element becomes a node labelled with its name. Definitions are
    /// built first, in source order, and each instance receives its own copy
    /// of the definition's scene.
    pub fn from_ast(ast: &CircuitAst) -> Result<Self> {
        let mut definitions: HashMap<String, Scene> = HashMap::new();

        for def in &ast.definitions {
            let recursive = def.elements.iter().any(|e| {
                matches!(&e.kind, ElementKind::Instance { definition } if *definition == def.name)
            });
            if recursive {
                return Err(GatesimError::RecursiveDefinition {
                    name: def.name.clone(),
                });
            }
            let scene = build_circuit(&def.elements, &definitions)?;
            debug!(definition = %def.name, nodes = scene.len(), "sub-circuit defined");
            definitions.insert(def.name.clone(), scene);
        }

        build_circuit(&ast.elements, &definitions)
    }
}

fn build_circuit(elements: &[ElementDef], definitions: &HashMap<String, Scene>) -> Result<Scene> {
    let mut scene = Scene::new();
    let mut names: HashMap<&str, NodeId> = HashMap::new();

    // Nodes first so that sources may refer forward
    for element in elements {
        if names.contains_key(element.name.as_str()) {
            return Err(GatesimError::DuplicateName {
                name: element.name.clone(),
                line: element.line,
            });
        }

        let kind = match &element.kind {
            ElementKind::Input { value } => NodeKind::Input(InputPin::with_state(*value)),
            ElementKind::Output => NodeKind::Output(OutputPin),
            ElementKind::Gate { kind, inputs } => {
                let arity = inputs.unwrap_or_else(|| element.sources.len().max(kind.min_inputs()));
                let gate = Gate::with_inputs(*kind, arity)
                    .ok_or_else(|| GatesimError::gate_arity(*kind, arity))?;
                NodeKind::Gate(gate)
            }
            ElementKind::Instance { definition } => {
                let template = definitions.get(definition).ok_or_else(|| {
                    GatesimError::UndefinedDefinition {
                        name: definition.clone(),
                        line: element.line,
                    }
                })?;
                NodeKind::Component(ComponentNode::new(definition.clone(), template.clone()))
            }
        };

        let id = scene.insert_node(kind);
        scene.set_label(id, element.name.clone())?;
        names.insert(element.name.as_str(), id);
    }

    for element in elements {
        let target = names[element.name.as_str()];
        for (index, source) in element.sources.iter().enumerate() {
            let Some(source) = source else {
                continue;
            };
            let driver = *names.get(source.name.as_str()).ok_or_else(|| {
                GatesimError::UndefinedName {
                    name: source.name.clone(),
                    line: element.line,
                }
            })?;
            let connection = scene.check_connection(target, index, driver, source.index)?;
            scene.insert_connection(connection);
        }
    }

    scene.run(0.0);
    scene.drain_events();
    Ok(scene)
}
