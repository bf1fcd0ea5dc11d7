//! Abstract Syntax Tree types for the netlist DSL.

use crate::circuit::Signal;
use crate::nodes::GateKind;

/// Complete AST representation of a parsed netlist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CircuitAst {
    /// Top-level elements
    pub elements: Vec<ElementDef>,
    /// Sub-circuit definitions, in source order
    pub definitions: Vec<DefinitionAst>,
}

impl CircuitAst {
    /// Create a new empty circuit AST.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a definition by name.
    pub fn definition(&self, name: &str) -> Option<&DefinitionAst> {
        self.definitions.iter().find(|d| d.name == name)
    }
}

/// A `.def NAME` ... `.end` block.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionAst {
    pub name: String,
    pub elements: Vec<ElementDef>,
    /// Line of the `.def` directive
    pub line: usize,
}

/// One element declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDef {
    pub kind: ElementKind,
    /// Unique element name within its circuit
    pub name: String,
    /// Driver of each input socket, `None` for `_`
    pub sources: Vec<Option<SourceRef>>,
    /// Source line number for error reporting
    pub line: usize,
}

/// Element types supported by the DSL.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// `.input NAME [value]`
    Input { value: Signal },
    /// `.output NAME [source]`
    Output,
    /// `KIND NAME source... [inputs=N]`
    Gate { kind: GateKind, inputs: Option<usize> },
    /// `SUB NAME DEF source...`
    Instance { definition: String },
}

/// Reference to an output socket by element name: `name` or `name:index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRef {
    pub name: String,
    pub index: usize,
}
