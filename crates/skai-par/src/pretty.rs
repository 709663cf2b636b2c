//! AST pretty-printer.
//!
//! Renders a parsed program back to source text. The output is normalized
//! (every composite subexpression parenthesized, four-space indentation)
//! rather than a copy of the input, but re-parsing it yields a structurally
//! equal tree - that round-trip is the printer's contract and is what the
//! tests pin down.

use skai_lex::TokenKind;

use crate::ast::{Ast, LogicalOp, UnaryOp};

/// Render a program to source text.
pub fn pretty(program: &[Ast]) -> String {
    let mut printer = Printer::default();
    for stmt in program {
        printer.stmt(stmt);
    }
    printer.out
}

#[derive(Default)]
struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    fn pad(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
    }

    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// One statement on its own line(s).
    fn stmt(&mut self, node: &Ast) {
        self.pad();
        self.stmt_bare(node);
        self.out.push('\n');
    }

    /// A statement without leading indent or trailing newline, so it can be
    /// embedded after `if`/`while`/`for` headers.
    fn stmt_bare(&mut self, node: &Ast) {
        match node {
            Ast::VarDecl(decl) => {
                self.push("let ");
                if decl.is_const {
                    self.push("imm ");
                }
                self.push(&decl.name);
                if let Some(init) = &decl.init {
                    self.push(" = ");
                    self.expr(init);
                }
                self.push(";");
            }
            Ast::If(stmt) => {
                self.push("if ");
                if let Some(init) = &stmt.init {
                    self.stmt_bare(init);
                    self.push(" ");
                }
                self.expr(&stmt.cond);
                self.push(" ");
                self.stmt_bare(&stmt.then_branch);
                if let Some(else_branch) = &stmt.else_branch {
                    self.push(" else ");
                    self.stmt_bare(else_branch);
                }
            }
            Ast::While(stmt) => {
                self.push("while ");
                if let Some(init) = &stmt.init {
                    self.stmt_bare(init);
                    self.push(" ");
                }
                self.expr(&stmt.cond);
                self.push(" ");
                self.stmt_bare(&stmt.body);
            }
            Ast::For(stmt) => {
                self.push("for ");
                self.stmt_bare(&stmt.init);
                self.push(" ");
                self.expr(&stmt.cond);
                self.push("; ");
                self.expr(&stmt.step);
                self.push(" ");
                self.stmt_bare(&stmt.body);
            }
            Ast::Return(value) => {
                self.push("return");
                if let Some(value) = value {
                    self.push(" ");
                    self.expr(value);
                }
                self.push(";");
            }
            Ast::Break => self.push("break;"),
            Ast::Continue => self.push("continue;"),
            Ast::Block(stmts) => self.braced(stmts),
            Ast::Function(decl) => {
                self.push("fnc ");
                self.push(&decl.name);
                self.push("(");
                for (i, param) in decl.params.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.push(&param.name);
                    if let Some(default) = &param.default {
                        self.push(" = ");
                        self.expr(default);
                    }
                }
                self.push(") ");
                self.braced(&decl.body);
            }
            Ast::Class(decl) => {
                self.push("class ");
                self.push(&decl.name);
                self.push(" ");
                self.braced(&decl.members);
            }
            expr => {
                self.expr(expr);
                self.push(";");
            }
        }
    }

    /// `{ ... }` with its contents indented one level.
    fn braced(&mut self, stmts: &[Ast]) {
        self.push("{\n");
        self.indent += 1;
        for stmt in stmts {
            self.stmt(stmt);
        }
        self.indent -= 1;
        self.pad();
        self.push("}");
    }

    fn expr(&mut self, node: &Ast) {
        match node {
            Ast::Integer(n) => self.push(&n.to_string()),
            // Debug formatting keeps the dot (`4.0`, not `4`), which the
            // lexer needs to classify the literal as a float again.
            Ast::Float(f) => self.push(&format!("{f:?}")),
            Ast::Str(raw) => {
                self.push("\"");
                self.push(raw);
                self.push("\"");
            }
            Ast::Bool(true) => self.push("true"),
            Ast::Bool(false) => self.push("false"),
            Ast::Null => self.push("null"),
            Ast::Ident(name) => self.push(name),
            Ast::SelfExpr => self.push("self"),
            Ast::Break => self.push("break"),
            Ast::Continue => self.push("continue"),
            Ast::Array(elements) => {
                self.push("[");
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.expr(element);
                }
                self.push("]");
            }
            Ast::Binary(b) => {
                self.push("(");
                self.expr(&b.lhs);
                self.push(" ");
                self.push(op_text(b.op));
                self.push(" ");
                self.expr(&b.rhs);
                self.push(")");
            }
            Ast::Logical(l) => {
                self.push("(");
                self.expr(&l.lhs);
                self.push(match l.op {
                    LogicalOp::And => " and ",
                    LogicalOp::Or => " or ",
                });
                self.expr(&l.rhs);
                self.push(")");
            }
            Ast::Unary(u) => {
                self.push("(");
                self.push(match u.op {
                    UnaryOp::Neg => "-",
                    UnaryOp::Pos => "+",
                    UnaryOp::Not => "!",
                });
                self.expr(&u.operand);
                self.push(")");
            }
            Ast::Assign(a) => {
                self.push("(");
                self.expr(&a.target);
                self.push(" = ");
                self.expr(&a.value);
                self.push(")");
            }
            Ast::Call(call) => {
                self.postfix_operand(&call.callee);
                self.push("(");
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.expr(arg);
                }
                self.push(")");
            }
            Ast::Subscript(sub) => {
                self.postfix_operand(&sub.object);
                self.push("[");
                self.expr(&sub.index);
                self.push("]");
            }
            Ast::Access(access) => {
                self.postfix_operand(&access.object);
                self.push(".");
                self.expr(&access.member);
            }
            // Statement-only forms never appear in expression position in a
            // parsed tree; render them statement-style for completeness.
            other => self.stmt_bare(other),
        }
    }

    /// Operands of the postfix forms: already-postfix and atomic nodes can
    /// stand bare, everything else needs grouping to keep its precedence.
    fn postfix_operand(&mut self, node: &Ast) {
        match node {
            Ast::Binary(_) | Ast::Logical(_) | Ast::Unary(_) | Ast::Assign(_) => {
                self.push("(");
                self.expr(node);
                self.push(")");
            }
            _ => self.expr(node),
        }
    }
}

/// Source text of a binary operator token. Also used by the evaluator to
/// name operators in type-error messages.
pub fn op_text(op: TokenKind) -> &'static str {
    match op {
        TokenKind::Plus => "+",
        TokenKind::PlusEq => "+=",
        TokenKind::Minus => "-",
        TokenKind::MinusEq => "-=",
        TokenKind::Star => "*",
        TokenKind::StarEq => "*=",
        TokenKind::Slash => "/",
        TokenKind::SlashEq => "/=",
        TokenKind::Percent => "%",
        TokenKind::PercentEq => "%=",
        TokenKind::Amp => "&",
        TokenKind::AmpEq => "&=",
        TokenKind::Pipe => "|",
        TokenKind::PipeEq => "|=",
        TokenKind::Caret => "^",
        TokenKind::CaretEq => "^=",
        TokenKind::Shl => "<<",
        TokenKind::Shr => ">>",
        TokenKind::EqEq => "==",
        TokenKind::BangEq => "!=",
        TokenKind::Lt => "<",
        TokenKind::LtEq => "<=",
        TokenKind::Gt => ">",
        TokenKind::GtEq => ">=",
        _ => "<?>",
    }
}
