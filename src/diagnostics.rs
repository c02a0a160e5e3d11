use std::fmt;

use thiserror::Error;

/// Represents a byte span within a snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn to(self, other: SourceSpan) -> Self {
        Self {
            start: self.start,
            end: other.end,
        }
    }
}

/// Classification of a diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lexer,
    Parser,
    Normalize,
    Evaluate,
}

/// Rich diagnostic information surfaced to end users.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Option<SourceSpan>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span: None,
            notes: Vec::new(),
        }
    }

    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// True for diagnostics that reject a snippet's syntax.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self.kind,
            DiagnosticKind::Lexer | DiagnosticKind::Parser | DiagnosticKind::Normalize
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)?;
        if let Some(span) = self.span {
            write!(f, " ({}..{})", span.start, span.end)?;
        }
        if !self.notes.is_empty() {
            writeln!(f)?;
            for note in &self.notes {
                writeln!(f, "  note: {note}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

/// Unified error type for serialization, normalization and the CLI.
#[derive(Debug, Error)]
pub enum LiveSourceError {
    #[error("{0}")]
    Diagnostic(#[from] Diagnostic),
    /// A structured value was reached again while it was still being rendered.
    #[error("[Recursive data structure]")]
    Recursion,
    /// No selector resolves to the value; `kind` is `object` or `symbol`.
    #[error("[{kind} with no known selector]")]
    NoSelector { kind: &'static str },
    #[error("[{0}]")]
    UnsupportedType(&'static str),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LiveSourceError {
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Diagnostic(diag) if diag.is_syntax())
    }
}

pub type Result<T> = std::result::Result<T, LiveSourceError>;
