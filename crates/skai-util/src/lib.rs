//! skai-util - Shared infrastructure for the skai interpreter.
//!
//! This crate hosts the pieces every phase of the pipeline needs:
//!
//! - [`span`]: source locations ([`FileId`], [`Span`]) and the [`SourceMap`]
//!   that resolves them back to file names for error rendering.
//! - [`error`]: the single fatal error type ([`Fatal`]) the lexer, parser,
//!   and evaluator all propagate, categorized by [`ErrorKind`].
//!
//! The interpreter aborts at the first error, so there is no diagnostic
//! accumulation here: fallible functions return [`Result`] and the driver
//! renders whatever bubbles up.

pub mod error;
pub mod span;

pub use error::{ErrorKind, Fatal, Result};
pub use span::{FileId, SourceFile, SourceMap, Span};
