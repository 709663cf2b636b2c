//! The fatal error type shared by every interpreter phase.
//!
//! skai has exactly one failure mode: a fatal error that aborts the run.
//! [`Fatal`] carries a category ([`ErrorKind`]), a human-readable message,
//! and - when the failing phase knows one - a source [`Span`]. The driver
//! renders it as `file:line:column - message`, or just the message when no
//! span is attached (lex and eval errors).

use thiserror::Error;

use crate::span::{SourceMap, Span};

/// Result alias used across the interpreter crates.
pub type Result<T> = std::result::Result<T, Fatal>;

/// Category of a fatal error.
///
/// The category never changes how an error propagates - everything is
/// fatal - but it keeps messages classifiable in tests and lets the driver
/// distinguish user-facing failure classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed source text (unterminated string, invalid float literal).
    Lex,
    /// Syntax error (unexpected token, missing delimiter, too many params).
    Parse,
    /// Use of an undeclared name, or redefinition in the same frame.
    Name,
    /// Invalid operand combination, non-callable call target, implicit
    /// bool conversion on a non-bool/non-null value.
    Type,
    /// Argument count outside the callee's declared range.
    Arity,
    /// `return` outside a function, `break`/`continue` outside a loop.
    Control,
    /// Assignment to an `imm`-declared variable.
    Const,
    /// Out-of-range subscript or non-integer index.
    Index,
    /// Non-null return from an `init` constructor.
    Constructor,
    /// Failure in the driver's own I/O (unreadable script file).
    Io,
}

/// A fatal interpreter error.
///
/// # Examples
///
/// ```
/// use skai_util::{ErrorKind, Fatal};
/// use skai_util::span::Span;
///
/// let err = Fatal::parse("expected ';' after expression", Span::DUMMY);
/// assert_eq!(err.kind, ErrorKind::Parse);
/// assert!(err.span.is_some());
/// ```
#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub struct Fatal {
    /// Error category.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Location of the offending token, when known.
    pub span: Option<Span>,
}

impl Fatal {
    /// Create an error with an explicit category and no location.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span: None,
        }
    }

    /// Attach a source location.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Lexical error (no location; the lexer reports these before a token
    /// exists to point at).
    pub fn lex(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Lex, message)
    }

    /// Syntax error at the given token location.
    pub fn parse(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Parse, message).with_span(span)
    }

    /// Name resolution error.
    pub fn name(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Name, message)
    }

    /// Operand/type error.
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Type, message)
    }

    /// Argument count error.
    pub fn arity(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Arity, message)
    }

    /// Control-flow misuse error.
    pub fn control(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Control, message)
    }

    /// Assignment to a constant.
    pub fn constant(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Const, message)
    }

    /// Subscript error.
    pub fn index(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Index, message)
    }

    /// Constructor misuse error.
    pub fn constructor(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Constructor, message)
    }

    /// Driver I/O error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    /// Render for the user: `file:line:column - message` when a span is
    /// attached, the bare message otherwise.
    pub fn render(&self, sources: &SourceMap) -> String {
        match self.span {
            Some(span) => format!(
                "{}:{}:{} - {}",
                sources.name(span.file),
                span.line,
                span.column,
                self.message
            ),
            None => self.message.clone(),
        }
    }
}
