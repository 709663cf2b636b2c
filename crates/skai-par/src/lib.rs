//! skai-par - Recursive-descent parser for the skai language.
//!
//! The parser consumes the token sequence produced by `skai-lex` and builds
//! the [`Ast`] tree. It is a classic hand-written recursive descent parser:
//! one function per grammar production, a cascade of precedence levels for
//! expressions, and a single postfix loop for the highest-precedence forms
//! (call, subscript, member access).
//!
//! # Grammar (precedence low → high)
//!
//! ```text
//! declaration := var_decl | function_decl | class_decl | statement
//! statement   := if | while | for | return | block | expr ";"
//! expression  := assignment
//! assignment  := or ("=" assignment)?          -- right-associative
//! or          := and ("or" and)*
//! and         := equality ("and" equality)*
//! equality    := comparison (("==" | "!=") comparison)*
//! comparison  := term (("<" | "<=" | ">" | ">=") term)*
//! term        := factor (("+" | "-" | "+=" | "-=") factor)*
//! factor      := unary (("&" | "&=" | "|" | "|=" | "^" | "^=" | "<<" | ">>"
//!                       | "/" | "/=" | "*" | "*=" | "%" | "%=") unary)*
//! unary       := ("!" | "-" | "+") unary | postfix
//! postfix     := primary ("(" args? ")" | "[" expression "]" | "." primary)*
//! primary     := literal | identifier | "(" expression ")" | array_literal
//!              | "break" | "continue" | "self"
//! ```
//!
//! Parse errors are fatal and carry the offending token's location.
//!
//! # Example
//!
//! ```
//! use skai_lex::Lexer;
//! use skai_par::{Ast, Parser};
//! use skai_util::FileId;
//!
//! let tokens = Lexer::new("print(1 + 2);", FileId::DUMMY).tokenize().unwrap();
//! let program = Parser::new(tokens).parse().unwrap();
//! assert_eq!(program.len(), 1);
//! assert!(matches!(program[0], Ast::Call(_)));
//! ```

pub mod ast;
pub mod pretty;

mod expr;
mod stmt;

pub use ast::{
    AccessExpr, AssignExpr, Ast, BinaryExpr, CallExpr, ClassDecl, FnDecl, ForStmt, IfStmt,
    LogicalExpr, LogicalOp, Param, Program, SubscriptExpr, UnaryExpr, UnaryOp, VarDecl, WhileStmt,
};
pub use pretty::{op_text, pretty};

use std::rc::Rc;

use skai_lex::{Token, TokenKind};
use skai_util::{Fatal, Result, Span};

/// Maximum number of parameters a function may declare, and of arguments a
/// call may pass.
pub const MAX_PARAMS: usize = 255;

/// Recursive descent parser over a token sequence.
pub struct Parser {
    /// Token stream from the lexer, terminated by an Eof token.
    tokens: Vec<Token>,

    /// Current position in the token stream.
    position: usize,
}

impl Parser {
    /// Create a parser from tokens. The lexer terminates its output with
    /// an Eof token; one is appended here if the caller did not.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let span = tokens.last().map(|t| t.span).unwrap_or(Span::DUMMY);
            tokens.push(Token::new(TokenKind::Eof, "", span));
        }
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parse a complete program: declarations until end of input.
    pub fn parse(mut self) -> Result<Program> {
        let mut program = Vec::new();
        while !self.is_at_end() {
            program.push(self.declaration()?);
        }
        Ok(program)
    }

    /// declaration := var_decl | function_decl | class_decl | statement
    fn declaration(&mut self) -> Result<Ast> {
        if self.match_token(TokenKind::Let) {
            self.var_declaration()
        } else if self.match_token(TokenKind::Fnc) {
            self.function_declaration()
        } else if self.match_token(TokenKind::Class) {
            self.class_declaration()
        } else {
            self.statement()
        }
    }

    /// var_decl := "let" "imm"? identifier ("=" expression)? ";"
    ///
    /// The `let` keyword has already been consumed.
    fn var_declaration(&mut self) -> Result<Ast> {
        let is_const = self.match_token(TokenKind::Imm);
        let name = self
            .expect(TokenKind::Ident, "expected identifier for variable name")?
            .lexeme;
        let init = if self.match_token(TokenKind::Eq) {
            Some(Box::new(self.expression()?))
        } else {
            None
        };
        self.expect(TokenKind::Semicolon, "expected ';' after variable declaration")?;
        Ok(Ast::VarDecl(VarDecl {
            name,
            init,
            is_const,
        }))
    }

    /// function_decl := "fnc" identifier "(" params? ")" "{" declaration* "}"
    ///
    /// A parameter is an identifier, optionally followed by `= default`.
    fn function_declaration(&mut self) -> Result<Ast> {
        let name = self.expect(TokenKind::Ident, "expected identifier")?.lexeme;
        self.expect(TokenKind::LParen, "expected '(' after function name")?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                if params.len() >= MAX_PARAMS {
                    return Err(self.error_here("can't have more than 255 parameters"));
                }
                let param = self.expect(TokenKind::Ident, "expected identifier")?.lexeme;
                let default = if self.match_token(TokenKind::Eq) {
                    Some(self.expression()?)
                } else {
                    None
                };
                params.push(Param {
                    name: param,
                    default,
                });
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "expected ')' after argument list")?;
        self.expect(TokenKind::LBrace, "expected '{' after argument list")?;
        let body = self.block_body()?;
        Ok(Ast::Function(Rc::new(FnDecl { name, params, body })))
    }

    /// class_decl := "class" identifier "{" declaration* "}"
    fn class_declaration(&mut self) -> Result<Ast> {
        let name = self.expect(TokenKind::Ident, "expected identifier")?.lexeme;
        self.expect(TokenKind::LBrace, "expected '{' after class name")?;
        let mut members = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            members.push(self.declaration()?);
        }
        self.expect(TokenKind::RBrace, "expected '}' after class body")?;
        Ok(Ast::Class(Rc::new(ClassDecl { name, members })))
    }

    /// Statements inside `{ ... }` up to and including the closing brace.
    fn block_body(&mut self) -> Result<Vec<Ast>> {
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            stmts.push(self.declaration()?);
        }
        self.expect(TokenKind::RBrace, "expected '}' after block statement")?;
        Ok(stmts)
    }

    // =========================================================================
    // TOKEN STREAM HELPERS
    // =========================================================================

    /// The token under the cursor. The stream is Eof-terminated, so this is
    /// always valid.
    fn current_token(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    /// Kind of the token under the cursor.
    fn current_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Location of the token under the cursor.
    fn current_span(&self) -> Span {
        self.current_token().span
    }

    /// True once the cursor reaches the Eof token.
    fn is_at_end(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    /// Move past the current token.
    fn advance(&mut self) {
        if !self.is_at_end() {
            self.position += 1;
        }
    }

    /// The most recently consumed token.
    fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    /// True if the current token has the given kind (without consuming).
    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Consume the current token if it has the given kind.
    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the current token if its kind is any of `kinds`.
    fn match_any(&mut self, kinds: &[TokenKind]) -> bool {
        if kinds.contains(&self.current_kind()) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Require a token of the given kind; fatal parse error otherwise.
    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<Token> {
        if self.check(kind) {
            let token = self.current_token().clone();
            self.advance();
            Ok(token)
        } else {
            Err(self.error_here(message))
        }
    }

    /// A parse error pointing at the current token.
    fn error_here(&self, message: impl Into<String>) -> Fatal {
        Fatal::parse(message, self.current_span())
    }
}
