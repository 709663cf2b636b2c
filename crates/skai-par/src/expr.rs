//! Expression parsing - the precedence cascade.
//!
//! One function per precedence level, lowest binding first. Left-associative
//! levels loop; assignment recurses to stay right-associative. Compound
//! assignment operators (`+=`, `&=`, ...) sit at the same levels as their
//! plain forms and produce ordinary Binary nodes - the evaluator gives them
//! mutate-in-place semantics through variable cells.
//!
//! Member access, subscripting, and calls all live in one postfix loop at
//! the highest precedence, so chains like `a[0].m(1)` associate naturally.

use skai_lex::TokenKind;
use skai_util::Result;

use crate::ast::{
    AccessExpr, AssignExpr, Ast, BinaryExpr, CallExpr, LogicalExpr, LogicalOp, SubscriptExpr,
    UnaryExpr, UnaryOp,
};
use crate::{Parser, MAX_PARAMS};

/// Operator kinds accepted at the `term` level.
const TERM_OPS: &[TokenKind] = &[
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::PlusEq,
    TokenKind::MinusEq,
];

/// Operator kinds accepted at the `factor` level.
const FACTOR_OPS: &[TokenKind] = &[
    TokenKind::Amp,
    TokenKind::AmpEq,
    TokenKind::Pipe,
    TokenKind::PipeEq,
    TokenKind::Caret,
    TokenKind::CaretEq,
    TokenKind::Shl,
    TokenKind::Shr,
    TokenKind::Slash,
    TokenKind::SlashEq,
    TokenKind::Star,
    TokenKind::StarEq,
    TokenKind::Percent,
    TokenKind::PercentEq,
];

impl Parser {
    /// expression := assignment
    pub(crate) fn expression(&mut self) -> Result<Ast> {
        self.assignment()
    }

    /// assignment := or ("=" assignment)?
    ///
    /// Right-associative; whether the left side is a legal assignment
    /// target is the evaluator's problem.
    fn assignment(&mut self) -> Result<Ast> {
        let expr = self.or_expr()?;
        if self.match_token(TokenKind::Eq) {
            let value = self.assignment()?;
            return Ok(Ast::Assign(AssignExpr {
                target: Box::new(expr),
                value: Box::new(value),
            }));
        }
        Ok(expr)
    }

    /// or := and ("or" and)*
    fn or_expr(&mut self) -> Result<Ast> {
        let mut expr = self.and_expr()?;
        while self.match_token(TokenKind::Or) {
            let rhs = self.and_expr()?;
            expr = Ast::Logical(LogicalExpr {
                lhs: Box::new(expr),
                op: LogicalOp::Or,
                rhs: Box::new(rhs),
            });
        }
        Ok(expr)
    }

    /// and := equality ("and" equality)*
    fn and_expr(&mut self) -> Result<Ast> {
        let mut expr = self.equality()?;
        while self.match_token(TokenKind::And) {
            let rhs = self.equality()?;
            expr = Ast::Logical(LogicalExpr {
                lhs: Box::new(expr),
                op: LogicalOp::And,
                rhs: Box::new(rhs),
            });
        }
        Ok(expr)
    }

    /// equality := comparison (("==" | "!=") comparison)*
    fn equality(&mut self) -> Result<Ast> {
        let mut expr = self.comparison()?;
        while self.match_any(&[TokenKind::EqEq, TokenKind::BangEq]) {
            let op = self.previous().kind;
            let rhs = self.comparison()?;
            expr = binary(expr, op, rhs);
        }
        Ok(expr)
    }

    /// comparison := term (("<" | "<=" | ">" | ">=") term)*
    fn comparison(&mut self) -> Result<Ast> {
        let mut expr = self.term()?;
        while self.match_any(&[
            TokenKind::Lt,
            TokenKind::LtEq,
            TokenKind::Gt,
            TokenKind::GtEq,
        ]) {
            let op = self.previous().kind;
            let rhs = self.term()?;
            expr = binary(expr, op, rhs);
        }
        Ok(expr)
    }

    /// term := factor (("+" | "-" | "+=" | "-=") factor)*
    fn term(&mut self) -> Result<Ast> {
        let mut expr = self.factor()?;
        while self.match_any(TERM_OPS) {
            let op = self.previous().kind;
            let rhs = self.factor()?;
            expr = binary(expr, op, rhs);
        }
        Ok(expr)
    }

    /// factor := unary ((bitwise | shift | "*" | "/" | "%" | compound) unary)*
    fn factor(&mut self) -> Result<Ast> {
        let mut expr = self.unary()?;
        while self.match_any(FACTOR_OPS) {
            let op = self.previous().kind;
            let rhs = self.unary()?;
            expr = binary(expr, op, rhs);
        }
        Ok(expr)
    }

    /// unary := ("!" | "-" | "+") unary | postfix
    fn unary(&mut self) -> Result<Ast> {
        let op = match self.current_kind() {
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Pos),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.unary()?;
            return Ok(Ast::Unary(UnaryExpr {
                op,
                operand: Box::new(operand),
            }));
        }
        self.postfix()
    }

    /// postfix := primary ("(" args? ")" | "[" expression "]" | "." primary)*
    fn postfix(&mut self) -> Result<Ast> {
        let mut expr = self.primary()?;
        loop {
            if self.match_token(TokenKind::LParen) {
                let args = self.call_arguments()?;
                expr = Ast::Call(CallExpr {
                    callee: Box::new(expr),
                    args,
                });
            } else if self.match_token(TokenKind::LBracket) {
                let index = self.expression()?;
                self.expect(TokenKind::RBracket, "expected ']' after subscript")?;
                expr = Ast::Subscript(SubscriptExpr {
                    object: Box::new(expr),
                    index: Box::new(index),
                });
            } else if self.match_token(TokenKind::Dot) {
                let member = self.primary()?;
                expr = Ast::Access(AccessExpr {
                    object: Box::new(expr),
                    member: Box::new(member),
                });
            } else {
                break;
            }
        }
        Ok(expr)
    }

    /// Comma-separated argument list; the opening paren has been consumed.
    fn call_arguments(&mut self) -> Result<Vec<Ast>> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                if args.len() >= MAX_PARAMS {
                    return Err(self.error_here("can't have more than 255 arguments"));
                }
                args.push(self.expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "expected ')' after argument list")?;
        Ok(args)
    }

    /// primary := literal | identifier | "(" expression ")" | array_literal
    ///          | "break" | "continue" | "self"
    fn primary(&mut self) -> Result<Ast> {
        match self.current_kind() {
            TokenKind::True => {
                self.advance();
                Ok(Ast::Bool(true))
            }
            TokenKind::False => {
                self.advance();
                Ok(Ast::Bool(false))
            }
            TokenKind::Null => {
                self.advance();
                Ok(Ast::Null)
            }
            TokenKind::Integer => {
                let token = self.current_token().clone();
                self.advance();
                let value: i64 = token
                    .lexeme
                    .parse()
                    .map_err(|_| skai_util::Fatal::parse("integer literal out of range", token.span))?;
                Ok(Ast::Integer(value))
            }
            TokenKind::Float => {
                let token = self.current_token().clone();
                self.advance();
                let value: f64 = token
                    .lexeme
                    .parse()
                    .map_err(|_| skai_util::Fatal::parse("invalid float literal", token.span))?;
                Ok(Ast::Float(value))
            }
            TokenKind::Str => {
                let token = self.current_token().clone();
                self.advance();
                Ok(Ast::Str(token.lexeme))
            }
            TokenKind::Ident => {
                let token = self.current_token().clone();
                self.advance();
                Ok(Ast::Ident(token.lexeme))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.expression()?;
                self.expect(TokenKind::RParen, "expected ')' after expression")?;
                Ok(expr)
            }
            TokenKind::LBracket => {
                self.advance();
                self.array_literal()
            }
            TokenKind::Break => {
                self.advance();
                Ok(Ast::Break)
            }
            TokenKind::Continue => {
                self.advance();
                Ok(Ast::Continue)
            }
            TokenKind::SelfKw => {
                self.advance();
                Ok(Ast::SelfExpr)
            }
            TokenKind::Eof => Err(self.error_here("unexpected end of input")),
            _ => {
                let lexeme = self.current_token().lexeme.clone();
                Err(self.error_here(format!("unexpected token '{lexeme}'")))
            }
        }
    }

    /// array_literal := "[" expression ("," expression)* "]"
    ///
    /// The opening bracket has been consumed. An empty literal is allowed.
    fn array_literal(&mut self) -> Result<Ast> {
        let mut elements = Vec::new();
        if !self.check(TokenKind::RBracket) {
            loop {
                elements.push(self.expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBracket, "expected ']' after array literal")?;
        Ok(Ast::Array(elements))
    }
}

/// Build a Binary node.
fn binary(lhs: Ast, op: TokenKind, rhs: Ast) -> Ast {
    Ast::Binary(BinaryExpr {
        lhs: Box::new(lhs),
        op,
        rhs: Box::new(rhs),
    })
}
