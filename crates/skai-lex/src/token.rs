//! Token definitions for the skai language.
//!
//! A [`Token`] pairs a [`TokenKind`] tag with the lexeme text it was read
//! from and the source location it starts at. Tokens are immutable once
//! emitted; the parser only ever inspects them.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;
use skai_util::Span;

/// The closed set of token kinds skai recognizes.
///
/// `&&` and `||` lex to [`TokenKind::And`] / [`TokenKind::Or`] - the symbol
/// and keyword spellings are interchangeable everywhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================================================
    // DELIMITERS
    // =========================================================================
    /// "("
    LParen,
    /// ")"
    RParen,
    /// "{"
    LBrace,
    /// "}"
    RBrace,
    /// "["
    LBracket,
    /// "]"
    RBracket,
    /// ","
    Comma,
    /// ";"
    Semicolon,
    /// ":"
    Colon,
    /// "." - member access, also emitted after a trailing-dot number
    Dot,

    // =========================================================================
    // OPERATORS
    // =========================================================================
    /// "="
    Eq,
    /// "=="
    EqEq,
    /// "!"
    Bang,
    /// "!="
    BangEq,
    /// "<"
    Lt,
    /// "<="
    LtEq,
    /// "<<"
    Shl,
    /// ">"
    Gt,
    /// ">="
    GtEq,
    /// ">>"
    Shr,
    /// "+"
    Plus,
    /// "+="
    PlusEq,
    /// "-"
    Minus,
    /// "-="
    MinusEq,
    /// "->"
    Arrow,
    /// "*"
    Star,
    /// "*="
    StarEq,
    /// "/"
    Slash,
    /// "/="
    SlashEq,
    /// "%"
    Percent,
    /// "%="
    PercentEq,
    /// "^"
    Caret,
    /// "^="
    CaretEq,
    /// "&"
    Amp,
    /// "&="
    AmpEq,
    /// "|"
    Pipe,
    /// "|="
    PipeEq,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    /// "and" or "&&"
    And,
    /// "or" or "||"
    Or,
    /// "if"
    If,
    /// "else"
    Else,
    /// "while"
    While,
    /// "for"
    For,
    /// "fnc" - function declaration
    Fnc,
    /// "let"
    Let,
    /// "imm" - const marker on a `let`
    Imm,
    /// "lm" - reserved
    Lm,
    /// "class"
    Class,
    /// "true"
    True,
    /// "false"
    False,
    /// "null"
    Null,
    /// "of" - reserved
    Of,
    /// "return"
    Return,
    /// "break"
    Break,
    /// "continue"
    Continue,
    /// "self"
    SelfKw,

    // =========================================================================
    // LITERALS
    // =========================================================================
    /// Integer literal; the digits live in the token's lexeme.
    Integer,
    /// Float literal (one interior dot).
    Float,
    /// String literal; the lexeme is the raw text between the quotes,
    /// escape sequences not yet expanded.
    Str,
    /// Identifier.
    Ident,

    /// End of input.
    Eof,
}

impl TokenKind {
    /// True for the compound-assignment operator kinds (`+=` and friends),
    /// which the evaluator gives mutate-in-place semantics.
    pub fn is_compound_assign(self) -> bool {
        matches!(
            self,
            TokenKind::PlusEq
                | TokenKind::MinusEq
                | TokenKind::StarEq
                | TokenKind::SlashEq
                | TokenKind::PercentEq
                | TokenKind::AmpEq
                | TokenKind::PipeEq
                | TokenKind::CaretEq
        )
    }
}

/// A classified lexical unit with its source text and location.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// What the lexer classified this as.
    pub kind: TokenKind,
    /// The literal text. For [`TokenKind::Str`] this is the raw content
    /// between the quotes; for everything else, the characters consumed.
    pub lexeme: String,
    /// Where the token starts.
    pub span: Span,
}

impl Token {
    /// Create a token.
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// True if this token is any of the given kinds.
    pub fn is_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }
}

/// The keyword table.
fn keywords() -> &'static FxHashMap<&'static str, TokenKind> {
    static KEYWORDS: OnceLock<FxHashMap<&'static str, TokenKind>> = OnceLock::new();
    KEYWORDS.get_or_init(|| {
        FxHashMap::from_iter([
            ("and", TokenKind::And),
            ("or", TokenKind::Or),
            ("if", TokenKind::If),
            ("else", TokenKind::Else),
            ("while", TokenKind::While),
            ("for", TokenKind::For),
            ("fnc", TokenKind::Fnc),
            ("let", TokenKind::Let),
            ("imm", TokenKind::Imm),
            ("lm", TokenKind::Lm),
            ("class", TokenKind::Class),
            ("true", TokenKind::True),
            ("false", TokenKind::False),
            ("null", TokenKind::Null),
            ("of", TokenKind::Of),
            ("return", TokenKind::Return),
            ("break", TokenKind::Break),
            ("continue", TokenKind::Continue),
            ("self", TokenKind::SelfKw),
        ])
    })
}

/// Classify an identifier-shaped lexeme: a keyword kind if it is reserved,
/// [`TokenKind::Ident`] otherwise.
///
/// # Examples
///
/// ```
/// use skai_lex::token::{keyword_or_ident, TokenKind};
///
/// assert_eq!(keyword_or_ident("while"), TokenKind::While);
/// assert_eq!(keyword_or_ident("whale"), TokenKind::Ident);
/// ```
pub fn keyword_or_ident(text: &str) -> TokenKind {
    keywords().get(text).copied().unwrap_or(TokenKind::Ident)
}
