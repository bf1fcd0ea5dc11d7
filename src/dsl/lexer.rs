//! Lexer (tokenizer) for the netlist DSL.

use crate::error::{GatesimError, Result};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Token types in the DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// An identifier (element name, keyword, `x`)
    Identifier,
    /// An unsigned integer
    Number,
    /// A directive (starts with '.')
    Directive,
    /// Socket separator ':'
    Colon,
    /// Equals sign '='
    Equals,
    /// Newline
    Newline,
    /// End of file
    Eof,
}

/// Lexer for tokenizing netlist input.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();

        let line = self.line;
        let column = self.column;
        let token = |kind, text: String| Token {
            kind,
            text,
            line,
            column,
        };

        let Some(&ch) = self.chars.peek() else {
            return Ok(token(TokenKind::Eof, String::new()));
        };

        let token = match ch {
            '\n' => {
                self.advance();
                token(TokenKind::Newline, "\n".to_string())
            }
            '.' => {
                self.advance();
                let name = self.read_while(|c| c.is_alphanumeric() || c == '_');
                if name.is_empty() {
                    return Err(GatesimError::lexer(line, column, "expected directive name after '.'"));
                }
                token(TokenKind::Directive, format!(".{}", name))
            }
            ':' => {
                self.advance();
                token(TokenKind::Colon, ":".to_string())
            }
            '=' => {
                self.advance();
                token(TokenKind::Equals, "=".to_string())
            }
            '0'..='9' => {
                let text = self.read_while(|c| c.is_ascii_digit());
                if self.chars.peek().is_some_and(|c| c.is_alphabetic() || *c == '_') {
                    return Err(GatesimError::lexer(
                        line,
                        column,
                        "identifiers must not start with a digit",
                    ));
                }
                token(TokenKind::Number, text)
            }
            _ if ch.is_alphabetic() || ch == '_' => {
                let text = self.read_while(|c| c.is_alphanumeric() || c == '_');
                token(TokenKind::Identifier, text)
            }
            _ => {
                return Err(GatesimError::lexer(
                    line,
                    column,
                    format!("unexpected character '{}'", ch),
                ));
            }
        };

        Ok(token)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch == ' ' || ch == '\t' || ch == '\r' {
                self.advance();
            } else if ch == '#' || ch == ';' {
                // Skip comment until end of line
                while let Some(&c) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if !accept(ch) {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        let mut kinds = Vec::new();
        loop {
            let tok = lexer.next_token().unwrap();
            kinds.push(tok.kind);
            if tok.kind == TokenKind::Eof {
                break;
            }
        }
        kinds
    }

    #[test]
    fn test_lexer_basic() {
        let input = "AND g1 a b";
        let mut lexer = Lexer::new(input);

        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Identifier);
        assert_eq!(tok.text, "AND");

        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Identifier);
        assert_eq!(tok.text, "g1");
        assert_eq!(tok.column, 5);
    }

    #[test]
    fn test_lexer_directive() {
        let mut lexer = Lexer::new(".input a 1");
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Directive);
        assert_eq!(tok.text, ".input");
    }

    #[test]
    fn test_lexer_socket_and_param() {
        use TokenKind::*;
        assert_eq!(
            kinds("OR g ha:1 b inputs=3 # trailing\n"),
            vec![Identifier, Identifier, Identifier, Colon, Number, Identifier, Identifier, Equals, Number, Newline, Eof]
        );
    }

    #[test]
    fn test_lexer_errors() {
        let mut lexer = Lexer::new("AND g @");
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        let err = lexer.next_token().unwrap_err();
        assert!(matches!(err, GatesimError::LexerError { line: 1, column: 7, .. }));

        let mut lexer = Lexer::new("\n1abc");
        lexer.next_token().unwrap();
        assert!(matches!(
            lexer.next_token(),
            Err(GatesimError::LexerError { line: 2, .. })
        ));
    }
}
