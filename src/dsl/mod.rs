//! Netlist DSL for describing logic circuits.
//!
//! The format is line-oriented and human-editable. Elements refer to their
//! drivers by name, so statements may appear in any order and feedback
//! loops can be written directly.
//!
//! # Grammar Overview
//!
//! ```text
//! netlist     = { line }
//! line        = comment | directive | element | empty
//! comment     = ('#' | ';') { any_char }
//! directive   = ".input" name [value]
//!             | ".output" name [source]
//!             | ".def" name
//!             | ".end"
//! element     = gate_kind name { source } ["inputs" "=" number]
//!             | "SUB" name definition { source }
//!
//! gate_kind   = "AND" | "OR" | "NOT" | "XOR" | "NAND" | "NOR" | "XNOR" | "BUF"
//! source      = name [":" number] | "_"
//! value       = "0" | "1" | "x"
//! name        = (letter | '_') { letter | digit | '_' }
//! ```
//!
//! Source `i` of an element drives its input socket `i`; `_` leaves a socket
//! unconnected. A gate's arity is `inputs=N` when given, otherwise the
//! number of sources (at least the kind's minimum).
//!
//! # Sub-circuits
//!
//! A `.def NAME` ... `.end` block defines a reusable circuit. Its `.input`
//! pins become the instance's input sockets and its `.output` pins the
//! output sockets, in declaration order. Definitions must appear before
//! the instances that use them and cannot nest.
//!
//! # Example
//!
//! ```text
//! # Full adder from two half adders
//! .def HA
//! .input a
//! .input b
//! XOR s a b
//! AND c a b
//! .output sum s
//! .output carry c
//! .end
//!
//! .input a 1
//! .input b 1
//! .input cin 0
//! SUB h1 HA a b
//! SUB h2 HA h1:0 cin
//! OR cout h1:1 h2:1
//! .output sum h2:0
//! .output carry cout
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;

use std::path::Path;

use crate::error::{GatesimError, Result};

/// Parse a netlist string into an AST.
pub fn parse(input: &str) -> Result<CircuitAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer);
    parser.parse()
}

/// Parse a netlist file.
pub fn parse_file(path: &Path) -> Result<CircuitAst> {
    let content = std::fs::read_to_string(path).map_err(|e| GatesimError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}
