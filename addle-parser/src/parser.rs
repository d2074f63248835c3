use std::ops::Range;

use crate::ast::Stmt;
use crate::lexer::{Token, TokenKind};
use addle_source::{Diagnostic, DiagnosticKind, Diagnostics};

mod expr;
mod stmt;

/// Recursive-descent parser over a token sequence.
///
/// The parser never fails: tokens that do not fit the construct being parsed are skipped and,
/// when a [`Diagnostics`] channel is attached, reported.
pub struct Parser<'a> {
    tokens: &'a [Token<'a>],
    /// Index of the current token.
    current: usize,
    /// Number of enclosing function bodies.
    depth: usize,
    diagnostics: Option<&'a Diagnostics>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            current: 0,
            depth: 0,
            diagnostics: None,
        }
    }

    pub fn with_diagnostics(tokens: &'a [Token<'a>], diagnostics: &'a Diagnostics) -> Self {
        Self {
            diagnostics: Some(diagnostics),
            ..Self::new(tokens)
        }
    }

    /// Parses every remaining statement.
    /// A stray `}` at top level ends the program early, like it ends any other block.
    pub fn parse_program(&mut self) -> Vec<Stmt> {
        let program = self.parse_block();
        tracing::debug!(statements = program.len(), consumed = self.current, "parsed program");
        program
    }

    /// Index of the current token.
    pub fn position(&self) -> usize {
        self.current
    }

    /// Returns `true` once every token has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }
}

/// Parse utilities
impl<'a> Parser<'a> {
    /// Returns the token `offset` positions after the current one.
    fn peek(&self, offset: usize) -> Option<Token<'a>> {
        self.tokens.get(self.current + offset).copied()
    }

    fn current(&self) -> Option<Token<'a>> {
        self.peek(0)
    }

    fn advance(&mut self) {
        self.current += 1;
    }

    fn report(&self, kind: DiagnosticKind, message: impl ToString, span: Range<usize>) {
        if let Some(diagnostics) = self.diagnostics {
            diagnostics.report(Diagnostic::new(kind, message, span));
        }
    }

    /// Skips `token`, reporting it unless it is layout.
    fn skip(&mut self, token: Token<'a>) {
        if !matches!(token.kind, TokenKind::Space | TokenKind::LineBreak) {
            self.report(
                DiagnosticKind::SkippedToken,
                format!("Unexpected `{}`", token.text.escape_debug()),
                token.span(),
            );
        }
        self.advance();
    }

    /// Raises an unexpected end of input diagnostic.
    fn unexpected_end(&self, expected: &str) {
        let end = self
            .tokens
            .last()
            .map_or(0, |token| token.position + token.text.len());
        self.report(
            DiagnosticKind::UnexpectedEnd,
            format!("Expected {} before end of input", expected),
            end..end,
        );
    }

    /// Skips tokens until one satisfies `predicate` and returns it without consuming it.
    fn skip_until(&mut self, predicate: impl Fn(&Token) -> bool, expected: &str) -> Option<Token<'a>> {
        loop {
            match self.current() {
                Some(token) if predicate(&token) => return Some(token),
                Some(token) => self.skip(token),
                None => {
                    self.unexpected_end(expected);
                    return None;
                }
            }
        }
    }
}

/// Parses `tokens` as a whole program.
pub fn parse_program<'a>(tokens: &'a [Token<'a>]) -> Vec<Stmt> {
    Parser::new(tokens).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn test_peek() {
        let tokens = tokenize("a + b");
        let mut parser = Parser::new(&tokens);
        assert_eq!(parser.peek(2).map(|token| token.text), Some("+"));

        parser.advance();
        assert_eq!(parser.current().map(|token| token.kind), Some(TokenKind::Space));
        assert_eq!(parser.peek(3).map(|token| token.text), Some("b"));
        assert_eq!(parser.peek(4), None);
    }

    #[test]
    fn test_skip_until_reports_skipped_tokens() {
        let source = "x 1 =";
        let tokens = tokenize(source);
        let diagnostics = Diagnostics::new();
        let mut parser = Parser::with_diagnostics(&tokens, &diagnostics);

        let found = parser.skip_until(|token| token.is("="), "`=`");
        assert_eq!(found.map(|token| token.position), Some(4));
        // `x` and `1` are reported, the spaces are not
        assert_eq!(
            diagnostics.kinds(),
            vec![DiagnosticKind::SkippedToken, DiagnosticKind::SkippedToken]
        );
    }

    #[test]
    fn test_skip_until_end() {
        let tokens = tokenize("x");
        let diagnostics = Diagnostics::new();
        let mut parser = Parser::with_diagnostics(&tokens, &diagnostics);

        assert_eq!(parser.skip_until(|token| token.is("{"), "`{`"), None);
        assert!(parser.is_at_end());
        assert_eq!(diagnostics.to_vec().last().map(|d| d.span.clone()), Some(1..1));
    }

    #[test]
    fn test_empty_program() {
        assert!(parse_program(&[]).is_empty());
        assert!(parse_program(&tokenize(" \n\n ")).is_empty());
    }
}
