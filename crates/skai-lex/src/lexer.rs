//! Main lexer implementation for the skai language.
//!
//! The lexer makes a single forward pass over the source, classifying by
//! the current character and peeking one ahead for the compound operator
//! forms (`==`, `<=`, `<<`, `+=`, `->`, ...). Whitespace and `//` comments
//! are discarded; unknown characters are skipped without producing a token,
//! leaving any resulting confusion to the parser.
//!
//! String literals are stored raw: escape sequences are not expanded here,
//! only when a value is rendered. A backslash at the end of the buffered
//! content swallows the closing quote and the literal continues.

use skai_util::{Fatal, FileId, Result, Span};

use crate::cursor::Cursor;
use crate::token::{keyword_or_ident, Token, TokenKind};

/// The skai lexer.
///
/// # Example
///
/// ```
/// use skai_lex::{Lexer, TokenKind};
/// use skai_util::FileId;
///
/// let tokens = Lexer::new("let x = 42;", FileId::DUMMY).tokenize().unwrap();
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     [
///         TokenKind::Let,
///         TokenKind::Ident,
///         TokenKind::Eq,
///         TokenKind::Integer,
///         TokenKind::Semicolon,
///         TokenKind::Eof,
///     ]
/// );
/// ```
pub struct Lexer<'a> {
    /// Character cursor over the source.
    cursor: Cursor<'a>,

    /// File the source came from, stamped into every span.
    file: FileId,

    /// Tokens emitted so far.
    tokens: Vec<Token>,

    /// Start line of the token being scanned.
    token_line: u32,

    /// Start column of the token being scanned.
    token_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `source`.
    pub fn new(source: &'a str, file: FileId) -> Self {
        Self {
            cursor: Cursor::new(source),
            file,
            tokens: Vec::new(),
            token_line: 1,
            token_column: 1,
        }
    }

    /// Consumes the whole input and returns the token sequence, terminated
    /// by a [`TokenKind::Eof`] token.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        loop {
            self.skip_whitespace();
            if self.cursor.is_at_end() {
                break;
            }
            self.token_line = self.cursor.line();
            self.token_column = self.cursor.column();
            self.scan_token()?;
        }
        let eof = Span::new(self.cursor.line(), self.cursor.column(), self.file);
        self.tokens.push(Token::new(TokenKind::Eof, "", eof));
        Ok(self.tokens)
    }

    /// Span of the token currently being scanned.
    fn span(&self) -> Span {
        Span::new(self.token_line, self.token_column, self.file)
    }

    /// Emit a token starting at the recorded start position.
    fn push(&mut self, kind: TokenKind, lexeme: impl Into<String>) {
        let span = self.span();
        self.tokens.push(Token::new(kind, lexeme, span));
    }

    fn skip_whitespace(&mut self) {
        while self.cursor.current_char().is_whitespace() {
            self.cursor.advance();
        }
    }

    /// Classify one token (or skip a comment/unknown character) starting at
    /// the current position.
    fn scan_token(&mut self) -> Result<()> {
        let c = self.cursor.current_char();
        match c {
            '(' => self.single(TokenKind::LParen, "("),
            ')' => self.single(TokenKind::RParen, ")"),
            '{' => self.single(TokenKind::LBrace, "{"),
            '}' => self.single(TokenKind::RBrace, "}"),
            '[' => self.single(TokenKind::LBracket, "["),
            ']' => self.single(TokenKind::RBracket, "]"),
            ',' => self.single(TokenKind::Comma, ","),
            ';' => self.single(TokenKind::Semicolon, ";"),
            ':' => self.single(TokenKind::Colon, ":"),
            '.' => self.single(TokenKind::Dot, "."),

            '=' => self.one_or_eq(TokenKind::Eq, "=", TokenKind::EqEq, "=="),
            '!' => self.one_or_eq(TokenKind::Bang, "!", TokenKind::BangEq, "!="),
            '*' => self.one_or_eq(TokenKind::Star, "*", TokenKind::StarEq, "*="),
            '%' => self.one_or_eq(TokenKind::Percent, "%", TokenKind::PercentEq, "%="),
            '^' => self.one_or_eq(TokenKind::Caret, "^", TokenKind::CaretEq, "^="),
            '+' => self.one_or_eq(TokenKind::Plus, "+", TokenKind::PlusEq, "+="),

            '<' => self.lex_less(),
            '>' => self.lex_greater(),
            '-' => self.lex_minus(),
            '&' => self.lex_ampersand(),
            '|' => self.lex_pipe(),
            '/' => self.lex_slash(),

            '"' => {
                self.cursor.advance();
                return self.lex_string();
            }

            c if c.is_ascii_digit() => return self.lex_number(),
            c if is_ident_start(c) => self.lex_identifier(),

            // Unknown characters make no token; the parser deals with
            // whatever gap they leave.
            _ => self.cursor.advance(),
        }
        Ok(())
    }

    /// Emit a single-character token.
    fn single(&mut self, kind: TokenKind, text: &str) {
        self.cursor.advance();
        self.push(kind, text);
    }

    /// Emit `double` if the next character is `=`, otherwise `simple`.
    fn one_or_eq(&mut self, simple: TokenKind, st: &str, double: TokenKind, dt: &str) {
        self.cursor.advance();
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
            self.push(double, dt);
        } else {
            self.push(simple, st);
        }
    }

    fn lex_less(&mut self) {
        self.cursor.advance();
        match self.cursor.current_char() {
            '=' => {
                self.cursor.advance();
                self.push(TokenKind::LtEq, "<=");
            }
            '<' => {
                self.cursor.advance();
                self.push(TokenKind::Shl, "<<");
            }
            _ => self.push(TokenKind::Lt, "<"),
        }
    }

    fn lex_greater(&mut self) {
        self.cursor.advance();
        match self.cursor.current_char() {
            '=' => {
                self.cursor.advance();
                self.push(TokenKind::GtEq, ">=");
            }
            '>' => {
                self.cursor.advance();
                self.push(TokenKind::Shr, ">>");
            }
            _ => self.push(TokenKind::Gt, ">"),
        }
    }

    fn lex_minus(&mut self) {
        self.cursor.advance();
        match self.cursor.current_char() {
            '>' => {
                self.cursor.advance();
                self.push(TokenKind::Arrow, "->");
            }
            '=' => {
                self.cursor.advance();
                self.push(TokenKind::MinusEq, "-=");
            }
            _ => self.push(TokenKind::Minus, "-"),
        }
    }

    fn lex_ampersand(&mut self) {
        self.cursor.advance();
        match self.cursor.current_char() {
            // "&&" is the symbol spelling of the `and` keyword.
            '&' => {
                self.cursor.advance();
                self.push(TokenKind::And, "&&");
            }
            '=' => {
                self.cursor.advance();
                self.push(TokenKind::AmpEq, "&=");
            }
            _ => self.push(TokenKind::Amp, "&"),
        }
    }

    fn lex_pipe(&mut self) {
        self.cursor.advance();
        match self.cursor.current_char() {
            '|' => {
                self.cursor.advance();
                self.push(TokenKind::Or, "||");
            }
            '=' => {
                self.cursor.advance();
                self.push(TokenKind::PipeEq, "|=");
            }
            _ => self.push(TokenKind::Pipe, "|"),
        }
    }

    /// `/` leads three ways: a line comment, `/=`, or plain division.
    fn lex_slash(&mut self) {
        self.cursor.advance();
        match self.cursor.current_char() {
            '/' => {
                while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                    self.cursor.advance();
                }
            }
            '=' => {
                self.cursor.advance();
                self.push(TokenKind::SlashEq, "/=");
            }
            _ => self.push(TokenKind::Slash, "/"),
        }
    }

    /// Scan a string literal. The opening quote has been consumed.
    ///
    /// The raw text is stored as-is; a closing quote preceded by a
    /// backslash is folded into the literal and scanning continues.
    fn lex_string(&mut self) -> Result<()> {
        let mut buf = String::new();
        loop {
            if self.cursor.is_at_end() {
                return Err(Fatal::lex("unterminated string literal '\"'"));
            }
            let c = self.cursor.current_char();
            self.cursor.advance();
            if c == '"' {
                if buf.ends_with('\\') {
                    buf.push('"');
                    continue;
                }
                break;
            }
            buf.push(c);
        }
        self.push(TokenKind::Str, buf);
        Ok(())
    }

    /// Scan a number literal: digits with at most one interior dot.
    ///
    /// A trailing dot is not part of the number; it is emitted as a
    /// separate [`TokenKind::Dot`] token so that member access on a
    /// numeric literal (`3.foo`) stays expressible.
    fn lex_number(&mut self) -> Result<()> {
        let mut buf = String::new();
        while self.cursor.current_char().is_ascii_digit() || self.cursor.current_char() == '.' {
            buf.push(self.cursor.current_char());
            self.cursor.advance();
        }

        let trailing_dot = buf.ends_with('.');
        if trailing_dot {
            buf.pop();
        }

        let dots = buf.matches('.').count();
        if dots > 1 {
            return Err(Fatal::lex(format!("invalid float literal '{buf}'")));
        }
        let kind = if dots == 1 {
            TokenKind::Float
        } else {
            TokenKind::Integer
        };

        let len = buf.chars().count() as u32;
        self.push(kind, buf);
        if trailing_dot {
            let dot_span = Span::new(self.token_line, self.token_column + len, self.file);
            self.tokens.push(Token::new(TokenKind::Dot, ".", dot_span));
        }
        Ok(())
    }

    /// Scan an identifier or keyword.
    fn lex_identifier(&mut self) {
        let mut buf = String::new();
        while is_ident_continue(self.cursor.current_char()) {
            buf.push(self.cursor.current_char());
            self.cursor.advance();
        }
        let kind = keyword_or_ident(&buf);
        self.push(kind, buf);
    }
}

/// Leading identifier characters: alphabetic, underscore, or apostrophe.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '\''
}

/// Continuation identifier characters additionally admit digits.
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '\''
}
