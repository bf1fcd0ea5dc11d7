//! Parser for the netlist DSL.

use super::ast::*;
use super::lexer::{Lexer, Token, TokenKind};
use crate::circuit::Signal;
use crate::error::{GatesimError, Result};
use crate::nodes::GateKind;

/// Keyword introducing a sub-circuit instance.
const INSTANCE_KEYWORD: &str = "SUB";

/// Placeholder for an unconnected input.
const UNCONNECTED: &str = "_";

/// Parser for netlist DSL.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    /// Definition currently being parsed
    open_definition: Option<DefinitionAst>,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self {
            lexer,
            current: Token {
                kind: TokenKind::Newline,
                text: String::new(),
                line: 1,
                column: 1,
            },
            open_definition: None,
        }
    }

    /// Parse the entire netlist.
    pub fn parse(&mut self) -> Result<CircuitAst> {
        let mut ast = CircuitAst::new();
        self.advance()?;

        while self.current.kind != TokenKind::Eof {
            // Skip empty lines
            if self.current.kind == TokenKind::Newline {
                self.advance()?;
                continue;
            }

            match self.current.kind {
                TokenKind::Directive => self.parse_directive(&mut ast)?,
                TokenKind::Identifier => {
                    let element = self.parse_element()?;
                    self.push_element(&mut ast, element);
                }
                _ => {
                    return Err(GatesimError::parse(
                        self.current.line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }

            match self.current.kind {
                TokenKind::Newline => self.advance()?,
                TokenKind::Eof => {}
                _ => {
                    return Err(GatesimError::parse(
                        self.current.line,
                        format!("unexpected trailing token: {:?}", self.current.text),
                    ));
                }
            }
        }

        if let Some(def) = &self.open_definition {
            return Err(GatesimError::parse(
                def.line,
                format!("definition '{}' is missing .end", def.name),
            ));
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(GatesimError::parse(
                self.current.line,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    fn at_line_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Newline | TokenKind::Eof)
    }

    fn push_element(&mut self, ast: &mut CircuitAst, element: ElementDef) {
        match &mut self.open_definition {
            Some(def) => def.elements.push(element),
            None => ast.elements.push(element),
        }
    }

    fn parse_directive(&mut self, ast: &mut CircuitAst) -> Result<()> {
        let directive = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        match directive.to_lowercase().as_str() {
            ".input" => {
                let name = self.expect(TokenKind::Identifier)?.text;
                let value = if self.at_line_end() {
                    Signal::Disabled
                } else {
                    let tok = self.current.clone();
                    self.advance()?;
                    Signal::from_symbol(&tok.text).ok_or_else(|| {
                        GatesimError::invalid_value(&tok.text, line, "expected 0, 1 or x")
                    })?
                };
                self.push_element(
                    ast,
                    ElementDef {
                        kind: ElementKind::Input { value },
                        name,
                        sources: Vec::new(),
                        line,
                    },
                );
            }
            ".output" => {
                let name = self.expect(TokenKind::Identifier)?.text;
                let sources = if self.at_line_end() {
                    Vec::new()
                } else {
                    vec![self.parse_source()?]
                };
                self.push_element(
                    ast,
                    ElementDef {
                        kind: ElementKind::Output,
                        name,
                        sources,
                        line,
                    },
                );
            }
            ".def" => {
                if let Some(open) = &self.open_definition {
                    return Err(GatesimError::parse(
                        line,
                        format!("definitions cannot nest (inside '{}')", open.name),
                    ));
                }
                let name = self.expect(TokenKind::Identifier)?.text;
                if ast.definition(&name).is_some() {
                    return Err(GatesimError::DuplicateName { name, line });
                }
                self.open_definition = Some(DefinitionAst {
                    name,
                    elements: Vec::new(),
                    line,
                });
            }
            ".end" => {
                let def = self
                    .open_definition
                    .take()
                    .ok_or_else(|| GatesimError::parse(line, ".end without .def"))?;
                ast.definitions.push(def);
            }
            _ => {
                return Err(GatesimError::parse(
                    line,
                    format!("unknown directive: {}", directive),
                ));
            }
        }

        Ok(())
    }

    fn parse_element(&mut self) -> Result<ElementDef> {
        let keyword = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        if keyword.eq_ignore_ascii_case(INSTANCE_KEYWORD) {
            let name = self.expect(TokenKind::Identifier)?.text;
            let definition = self.expect(TokenKind::Identifier)?.text;
            let (sources, _) = self.parse_sources(line, false)?;
            return Ok(ElementDef {
                kind: ElementKind::Instance { definition },
                name,
                sources,
                line,
            });
        }

        let kind = GateKind::from_keyword(&keyword).ok_or_else(|| GatesimError::UnknownElement {
            keyword: keyword.clone(),
            line,
        })?;
        let name = self.expect(TokenKind::Identifier)?.text;
        let (sources, inputs) = self.parse_sources(line, true)?;

        Ok(ElementDef {
            kind: ElementKind::Gate { kind, inputs },
            name,
            sources,
            line,
        })
    }

    /// Parse sources until end of line, plus an optional `inputs=N` when
    /// `allow_inputs` is set.
    fn parse_sources(
        &mut self,
        line: usize,
        allow_inputs: bool,
    ) -> Result<(Vec<Option<SourceRef>>, Option<usize>)> {
        let mut sources = Vec::new();
        let mut inputs = None;

        while !self.at_line_end() {
            if self.current.kind == TokenKind::Identifier
                && self.current.text.eq_ignore_ascii_case("inputs")
            {
                if !allow_inputs {
                    return Err(GatesimError::parse(line, "inputs= is only valid on gates"));
                }
                self.advance()?;
                self.expect(TokenKind::Equals)?;
                let value = self.expect(TokenKind::Number)?.text;
                let count = value
                    .parse::<usize>()
                    .map_err(|e| GatesimError::invalid_value(&value, line, e.to_string()))?;
                inputs = Some(count);
                continue;
            }
            sources.push(self.parse_source()?);
        }

        Ok((sources, inputs))
    }

    /// Parse `name`, `name:index` or `_`.
    fn parse_source(&mut self) -> Result<Option<SourceRef>> {
        let line = self.current.line;
        let name = self.expect(TokenKind::Identifier)?.text;
        if name == UNCONNECTED {
            return Ok(None);
        }

        let mut index = 0;
        if self.current.kind == TokenKind::Colon {
            self.advance()?;
            let text = self.expect(TokenKind::Number)?.text;
            index = text
                .parse::<usize>()
                .map_err(|e| GatesimError::invalid_value(&text, line, e.to_string()))?;
        }
        Ok(Some(SourceRef { name, index }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::parse;

    fn source(name: &str, index: usize) -> Option<SourceRef> {
        Some(SourceRef {
            name: name.to_string(),
            index,
        })
    }

    #[test]
    fn test_parse_gate() {
        let ast = parse("AND g1 a b").unwrap();
        assert_eq!(ast.elements.len(), 1);
        let g = &ast.elements[0];
        assert_eq!(g.kind, ElementKind::Gate { kind: GateKind::And, inputs: None });
        assert_eq!(g.name, "g1");
        assert_eq!(g.sources, vec![source("a", 0), source("b", 0)]);
    }

    #[test]
    fn test_parse_pins() {
        let ast = parse(".input a 1\n.input b\n.output y g:0").unwrap();
        assert_eq!(ast.elements[0].kind, ElementKind::Input { value: Signal::True });
        assert_eq!(ast.elements[1].kind, ElementKind::Input { value: Signal::Disabled });
        assert_eq!(ast.elements[2].kind, ElementKind::Output);
        assert_eq!(ast.elements[2].sources, vec![source("g", 0)]);
    }

    #[test]
    fn test_parse_inputs_param_and_placeholder() {
        let ast = parse("OR g a _ inputs=4").unwrap();
        let g = &ast.elements[0];
        assert_eq!(g.kind, ElementKind::Gate { kind: GateKind::Or, inputs: Some(4) });
        assert_eq!(g.sources, vec![source("a", 0), None]);
    }

    #[test]
    fn test_parse_definition_and_instance() {
        let input = "\
.def HA
.input a
.input b
XOR s a b
AND c a b
.output sum s
.output carry c
.end

.input x 1
.input y 0
SUB h HA x y
.output s h:0
.output c h:1
";
        let ast = parse(input).unwrap();
        assert_eq!(ast.definitions.len(), 1);
        assert_eq!(ast.definitions[0].elements.len(), 6);
        assert_eq!(ast.elements.len(), 5);
        assert_eq!(
            ast.elements[2].kind,
            ElementKind::Instance { definition: "HA".to_string() }
        );
        assert_eq!(ast.elements[4].sources, vec![source("h", 1)]);
    }

    #[test]
    fn test_parse_with_comments() {
        let input = "# This is a comment\nNOT n a ; inline comment style\n";
        let ast = parse(input).unwrap();
        assert_eq!(ast.elements.len(), 1);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse("MUX m a b"),
            Err(GatesimError::UnknownElement { line: 1, .. })
        ));
        assert!(matches!(
            parse(".input a 2"),
            Err(GatesimError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse(".def A\nNOT n x\n"),
            Err(GatesimError::ParseError { line: 1, .. })
        ));
        assert!(matches!(
            parse(".end"),
            Err(GatesimError::ParseError { .. })
        ));
        assert!(matches!(
            parse(".def A\n.def B\n.end\n.end"),
            Err(GatesimError::ParseError { line: 2, .. })
        ));
        assert!(matches!(
            parse(".wire a b"),
            Err(GatesimError::ParseError { .. })
        ));
        assert!(matches!(
            parse("SUB h HA a inputs=2"),
            Err(GatesimError::ParseError { .. })
        ));
    }
}
