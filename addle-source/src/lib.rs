//! Source code representation and diagnostic management.

use std::{cell::RefCell, fmt, ops::Range};

/// Represents source code.
pub struct Source<'a> {
    /// Original source code.
    pub content: &'a str,
    /// Accumulated diagnostics.
    pub diagnostics: Diagnostics,
}

impl<'a> Source<'a> {
    /// Create a new `Source` with the specified `content`.
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Returns `true` if `Source` has no accumulated diagnostics. Returns `false` otherwise.
    pub fn has_no_diagnostics(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(content: &'a str) -> Self {
        Source::new(content)
    }
}

/// The stage-specific reason a [`Diagnostic`] was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The lexer found a character matched by no rule.
    UnknownCharacter,
    /// The parser dropped a token that does not fit the current construct.
    SkippedToken,
    /// An operand followed another operand without an operator in between.
    MissingOperator,
    /// A closing brace ended the top-level block.
    UnbalancedBrace,
    /// Input ended in the middle of a construct.
    UnexpectedEnd,
    /// An identifier was read before being bound.
    UndefinedIdentifier,
    /// A call named something that is not a function.
    NotCallable,
    /// An operator without arithmetic meaning was applied.
    UnsupportedOperator,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UnknownCharacter => "unknown character",
            Self::SkippedToken => "skipped token",
            Self::MissingOperator => "missing operator",
            Self::UnbalancedBrace => "unbalanced brace",
            Self::UnexpectedEnd => "unexpected end of input",
            Self::UndefinedIdentifier => "undefined identifier",
            Self::NotCallable => "not callable",
            Self::UnsupportedOperator => "unsupported operator",
        };
        f.write_str(name)
    }
}

/// A non-fatal event recorded by one of the pipeline stages.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// Byte range in the source. Evaluation diagnostics carry an empty span.
    pub span: Range<usize>,
}

impl Diagnostic {
    /// Create a new diagnostic with the specified `kind`, `message` and `span`.
    pub fn new(kind: DiagnosticKind, message: impl ToString, span: Range<usize>) -> Self {
        Self {
            kind,
            message: message.to_string(),
            span,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{kind}: {message} at position {position}",
            kind = self.kind,
            message = self.message,
            position = self.span.start
        )
    }
}

/// Collects all the diagnostics.
#[derive(Debug, Default)]
pub struct Diagnostics {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Diagnostics {
    /// Create an empty `Diagnostics`.
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Adds a diagnostic.
    /// This method uses the interior mutability pattern so that every stage can share a `&Diagnostics`.
    pub fn report(&self, diagnostic: Diagnostic) {
        tracing::debug!(kind = ?diagnostic.kind, position = diagnostic.span.start, "{}", diagnostic.message);
        // This should be the only place where self.diagnostics is borrowed mutably.
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    /// Returns a copy of every diagnostic reported so far, in report order.
    pub fn to_vec(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Returns the kinds of every diagnostic reported so far, in report order.
    pub fn kinds(&self) -> Vec<DiagnosticKind> {
        self.diagnostics.borrow().iter().map(|d| d.kind).collect()
    }

    /// Removes and returns every diagnostic reported so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow_mut().drain(..).collect()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in self.diagnostics.borrow().iter() {
            writeln!(f, "warning: {}", diagnostic)?;
        }

        Ok(())
    }
}
