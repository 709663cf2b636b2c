//! skai-eval - Runtime for the skai language.
//!
//! This crate hosts everything past the parser:
//!
//! - [`value`]: the closed [`Value`] family, variable cells, and the
//!   polymorphic operator dispatch (with Integer → Float promotion);
//! - [`env`]: the lexical scope chain as an id-indexed frame arena, which
//!   is what lets closures capture frames without ownership cycles;
//! - [`interp`]: the tree-walking [`Interpreter`] with `Flow`-based
//!   control flow (`return`/`break`/`continue` are values returned up the
//!   statement walk, not evaluator flags);
//! - [`builtins`]: the native functions (`print`, `prompt`, `time`,
//!   `sleep`, `random`, `type_of`, `pow`, `abs`).
//!
//! The interpreter is single-threaded and synchronous; the only blocking
//! points are `sleep`, `prompt`, and output. I/O is injected, so embedders
//! and tests can capture everything a program prints.
//!
//! # Example
//!
//! ```
//! use skai_eval::Interpreter;
//! use skai_lex::Lexer;
//! use skai_par::Parser;
//! use skai_util::FileId;
//!
//! let tokens = Lexer::new("let x = 2 + 3;", FileId::DUMMY).tokenize().unwrap();
//! let program = Parser::new(tokens).parse().unwrap();
//! Interpreter::new().interpret(&program).unwrap();
//! ```

pub mod builtins;
pub mod env;
pub mod interp;
pub mod value;

#[cfg(test)]
mod scenarios;

pub use env::{EnvId, Environments};
pub use interp::{Flow, Interpreter};
pub use value::{Builtin, Function, NativeFn, Value, VarCell};
