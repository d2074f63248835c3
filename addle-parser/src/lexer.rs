use std::ops::Range;

use addle_source::{Diagnostic, DiagnosticKind, Diagnostics, Source};
use lazy_static::lazy_static;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // keywords
    FunctionKeyword,
    ReturnKeyword,
    LetKeyword,

    // operands
    Number,
    Word,

    // layout
    Space,
    Semicolon,
    LineBreak,

    // punctuation
    Brace,
    Paren,
    Punctuator,

    /// A single character that no rule matches.
    Other,
}

/// A classified fragment of the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Exact matched text.
    pub text: &'a str,
    /// Byte offset of the first byte of `text` in the source.
    pub position: usize,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, position: usize) -> Self {
        Self {
            kind,
            text,
            position,
        }
    }

    /// Returns `true` if the token text is exactly `text`.
    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }

    pub fn span(&self) -> Range<usize> {
        self.position..self.position + self.text.len()
    }
}

/// What the lexer does after emitting an [`TokenKind::Other`] token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownCharPolicy {
    /// Stop lexing. The rest of the input is dropped.
    Halt,
    /// Keep lexing after the unmatched character.
    Recover,
}

impl Default for UnknownCharPolicy {
    fn default() -> Self {
        Self::Halt
    }
}

lazy_static! {
    /// Lexer rules in the order they are tried. The first rule matching at the cursor wins,
    /// so keywords must come before `Word` and `Number` before `Word`.
    static ref RULES: Vec<(TokenKind, Regex)> = [
        (TokenKind::FunctionKeyword, r"^function\b"),
        (TokenKind::ReturnKeyword, r"^return\b"),
        (TokenKind::LetKeyword, r"^let\b"),
        (TokenKind::Number, r"^[0-9]+(\.[0-9]+)?"),
        (TokenKind::Word, r"^[A-Za-z0-9_]+"),
        (TokenKind::Space, r"^[^\S\r\n]+"),
        (TokenKind::Semicolon, r"^;"),
        (TokenKind::LineBreak, r"^(\r\n|\n|\r)"),
        (TokenKind::Brace, r"^[{}]"),
        (TokenKind::Paren, r"^[()]"),
        (TokenKind::Punctuator, r"^[=+]"),
    ]
    .iter()
    .map(|&(kind, pattern)| (kind, Regex::new(pattern).expect("lexer rules are valid regexes")))
    .collect();
}

/// Ordered-rule lexer. Yields tokens until the input is exhausted, or until the first
/// unmatched character when running with [`UnknownCharPolicy::Halt`].
pub struct Lexer<'a> {
    input: &'a str,
    /// Byte offset of the remaining input.
    cursor: usize,
    policy: UnknownCharPolicy,
    halted: bool,
    diagnostics: Option<&'a Diagnostics>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            cursor: 0,
            policy: UnknownCharPolicy::default(),
            halted: false,
            diagnostics: None,
        }
    }

    /// Creates a lexer over `source.content` that reports unmatched characters to `source.diagnostics`.
    pub fn with_source(source: &'a Source<'a>) -> Self {
        Self {
            diagnostics: Some(&source.diagnostics),
            ..Self::new(source.content)
        }
    }

    pub fn policy(mut self, policy: UnknownCharPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the unconsumed part of the input.
    pub fn remainder(&self) -> &'a str {
        &self.input[self.cursor..]
    }

    fn unknown_char(&mut self) -> Token<'a> {
        let rest = self.remainder();
        // `rest` is non-empty here, so there is always a first character.
        let len = rest.chars().next().map_or(1, char::len_utf8);
        let token = Token::new(TokenKind::Other, &rest[..len], self.cursor);

        if let Some(diagnostics) = self.diagnostics {
            diagnostics.report(Diagnostic::new(
                DiagnosticKind::UnknownCharacter,
                format!("No rule matches `{}`", token.text),
                token.span(),
            ));
        }

        match self.policy {
            UnknownCharPolicy::Halt => self.halted = true,
            UnknownCharPolicy::Recover => self.cursor += len,
        }
        token
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.halted || self.cursor >= self.input.len() {
            return None;
        }

        let rest = self.remainder();
        let matched = RULES
            .iter()
            .find_map(|(kind, rule)| rule.find(rest).map(|m| (*kind, m.end())));

        let token = match matched {
            Some((kind, len)) => {
                let token = Token::new(kind, &rest[..len], self.cursor);
                self.cursor += len;
                token
            }
            None => self.unknown_char(),
        };
        tracing::trace!(kind = ?token.kind, position = token.position, "{:?}", token.text);
        Some(token)
    }
}

/// Splits `source` into tokens, halting at the first unmatched character.
pub fn tokenize(source: &str) -> Vec<Token> {
    let tokens: Vec<_> = Lexer::new(source).collect();
    tracing::debug!(count = tokens.len(), "tokenized source");
    tokens
}
