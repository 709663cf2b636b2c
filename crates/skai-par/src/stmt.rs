//! Statement parsing - if, while, for, return, blocks, expression statements.

use skai_lex::TokenKind;
use skai_util::Result;

use crate::ast::{Ast, ForStmt, IfStmt, WhileStmt};
use crate::Parser;

impl Parser {
    /// statement := if | while | for | return | block | expr ";"
    pub(crate) fn statement(&mut self) -> Result<Ast> {
        if self.match_token(TokenKind::If) {
            self.if_statement()
        } else if self.match_token(TokenKind::While) {
            self.while_statement()
        } else if self.match_token(TokenKind::For) {
            self.for_statement()
        } else if self.match_token(TokenKind::Return) {
            self.return_statement()
        } else if self.match_token(TokenKind::LBrace) {
            Ok(Ast::Block(self.block_body()?))
        } else {
            self.expression_statement()
        }
    }

    /// if := "if" ("let" var_decl)? expression statement ("else" statement)?
    ///
    /// The condition needs no parentheses. The optional `let` initializer
    /// runs once before the condition and consumes its own semicolon.
    fn if_statement(&mut self) -> Result<Ast> {
        let init = if self.match_token(TokenKind::Let) {
            Some(Box::new(self.var_declaration()?))
        } else {
            None
        };
        let cond = Box::new(self.expression()?);
        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.match_token(TokenKind::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Ast::If(IfStmt {
            init,
            cond,
            then_branch,
            else_branch,
        }))
    }

    /// while := "while" ("let" var_decl)? expression statement
    fn while_statement(&mut self) -> Result<Ast> {
        let init = if self.match_token(TokenKind::Let) {
            Some(Box::new(self.var_declaration()?))
        } else {
            None
        };
        let cond = Box::new(self.expression()?);
        let body = Box::new(self.statement()?);
        Ok(Ast::While(WhileStmt { init, cond, body }))
    }

    /// for := "for" "let" var_decl expression ";" expression statement
    ///
    /// The initializer uses the `let` declaration form and consumes its own
    /// trailing semicolon; the step expression takes none.
    fn for_statement(&mut self) -> Result<Ast> {
        self.expect(TokenKind::Let, "expected 'let' in for initializer")?;
        let init = Box::new(self.var_declaration()?);
        let cond = Box::new(self.expression()?);
        self.expect(TokenKind::Semicolon, "expected ';' after loop condition")?;
        let step = Box::new(self.expression()?);
        let body = Box::new(self.statement()?);
        Ok(Ast::For(ForStmt {
            init,
            cond,
            step,
            body,
        }))
    }

    /// return := "return" expression? ";"
    fn return_statement(&mut self) -> Result<Ast> {
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.expression()?))
        };
        self.expect(TokenKind::Semicolon, "expected ';' after return expression")?;
        Ok(Ast::Return(value))
    }

    /// expr_stmt := expression ";"
    fn expression_statement(&mut self) -> Result<Ast> {
        let expr = self.expression()?;
        self.expect(TokenKind::Semicolon, "expected ';' after expression")?;
        Ok(expr)
    }
}
