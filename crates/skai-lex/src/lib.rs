//! skai-lex - Lexical analysis for the skai language.
//!
//! The lexer turns source text into an ordered sequence of classified
//! tokens in a single forward pass. The structurally delicate cases live
//! here so the parser never has to re-inspect raw text:
//!
//! - compound operators are recognized with one character of lookahead
//!   (`==`, `<=`, `<<`, `->`, `+=`, ..., and the `&&`/`||` spellings of
//!   `and`/`or`);
//! - string literals keep their raw text - escape sequences are expanded
//!   only when a value is rendered, and a backslash folds a closing quote
//!   into the literal;
//! - a number's trailing dot is split off as its own token, so `3.foo`
//!   lexes as member access rather than a malformed float;
//! - `//` comments and whitespace vanish, and unknown characters are
//!   silently skipped.
//!
//! # Example
//!
//! ```
//! use skai_lex::{Lexer, TokenKind};
//! use skai_util::FileId;
//!
//! let tokens = Lexer::new("print(\"hi\");", FileId::DUMMY).tokenize().unwrap();
//! assert_eq!(tokens[0].kind, TokenKind::Ident);
//! assert_eq!(tokens[2].kind, TokenKind::Str);
//! ```

pub mod cursor;
pub mod lexer;
pub mod token;

#[cfg(test)]
mod edge_cases;

pub use lexer::Lexer;
pub use token::{keyword_or_ident, Token, TokenKind};
