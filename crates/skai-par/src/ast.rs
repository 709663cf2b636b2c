//! AST node definitions for the skai language.
//!
//! The whole program shape is one closed sum type, [`Ast`]: skai conflates
//! expressions and statements (a `while` can appear wherever a statement
//! can, an expression followed by `;` is a statement), so a single variant
//! family keeps the parser and evaluator honest about what can nest where.
//!
//! Binary nodes keep the operator *token kind* rather than a separate
//! operator enum: the evaluator dispatches on it and rejects any token that
//! is not a recognized binary operator, which is exactly the invariant the
//! language defines.

use std::rc::Rc;

use skai_lex::TokenKind;

/// A parsed program: the ordered list of top-level declarations.
pub type Program = Vec<Ast>;

/// One node of the syntax tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Ast {
    /// Integer literal.
    Integer(i64),

    /// Float literal.
    Float(f64),

    /// String literal, raw (escape sequences not expanded).
    Str(String),

    /// Boolean literal.
    Bool(bool),

    /// `null`.
    Null,

    /// Identifier reference.
    Ident(String),

    /// Array literal `[a, b, c]`.
    Array(Vec<Ast>),

    /// Binary operation, including the compound-assign operator forms.
    Binary(BinaryExpr),

    /// `and` / `or`.
    Logical(LogicalExpr),

    /// Prefix `!`, `-`, `+`.
    Unary(UnaryExpr),

    /// Assignment `target = value`.
    Assign(AssignExpr),

    /// Call `callee(args...)`.
    Call(CallExpr),

    /// Subscript `object[index]`.
    Subscript(SubscriptExpr),

    /// Member access `object.member`.
    Access(AccessExpr),

    /// `let [imm] name [= init];`
    VarDecl(VarDecl),

    /// `if [let init;] cond stmt [else stmt]`
    If(IfStmt),

    /// `while [let init;] cond stmt`
    While(WhileStmt),

    /// `for let init; cond; step stmt`
    For(ForStmt),

    /// `fnc name(params) { body }`
    ///
    /// The declaration is reference-counted so function values can share it
    /// with the tree instead of cloning the body per closure.
    Function(Rc<FnDecl>),

    /// `return [expr];`
    Return(Option<Box<Ast>>),

    /// `break`
    Break,

    /// `continue`
    Continue,

    /// `{ declarations... }`
    Block(Vec<Ast>),

    /// `class Name { members }`
    Class(Rc<ClassDecl>),

    /// `self`
    SelfExpr,
}

/// Binary operation payload.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryExpr {
    pub lhs: Box<Ast>,
    /// Operator token kind; must be one of the recognized binary operators
    /// or the evaluator fails.
    pub op: TokenKind,
    pub rhs: Box<Ast>,
}

/// Logical operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// Logical operation payload.
#[derive(Clone, Debug, PartialEq)]
pub struct LogicalExpr {
    pub lhs: Box<Ast>,
    pub op: LogicalOp,
    pub rhs: Box<Ast>,
}

/// Prefix operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `+`
    Pos,
    /// `!`
    Not,
}

/// Unary operation payload.
#[derive(Clone, Debug, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Ast>,
}

/// Assignment payload. The target must evaluate to a variable cell; the
/// evaluator rejects anything else.
#[derive(Clone, Debug, PartialEq)]
pub struct AssignExpr {
    pub target: Box<Ast>,
    pub value: Box<Ast>,
}

/// Call payload.
#[derive(Clone, Debug, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Ast>,
    pub args: Vec<Ast>,
}

/// Subscript payload.
#[derive(Clone, Debug, PartialEq)]
pub struct SubscriptExpr {
    pub object: Box<Ast>,
    pub index: Box<Ast>,
}

/// Member access payload.
#[derive(Clone, Debug, PartialEq)]
pub struct AccessExpr {
    pub object: Box<Ast>,
    pub member: Box<Ast>,
}

/// Variable declaration payload.
#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub name: String,
    /// Missing initializer yields a Null-initialized cell.
    pub init: Option<Box<Ast>>,
    /// Set by the `imm` marker.
    pub is_const: bool,
}

/// If statement payload.
#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    /// Optional `let` initializer, run once before the condition.
    pub init: Option<Box<Ast>>,
    pub cond: Box<Ast>,
    pub then_branch: Box<Ast>,
    pub else_branch: Option<Box<Ast>>,
}

/// While statement payload.
#[derive(Clone, Debug, PartialEq)]
pub struct WhileStmt {
    /// Optional `let` initializer, run once before the first condition check.
    pub init: Option<Box<Ast>>,
    pub cond: Box<Ast>,
    pub body: Box<Ast>,
}

/// For statement payload.
#[derive(Clone, Debug, PartialEq)]
pub struct ForStmt {
    pub init: Box<Ast>,
    pub cond: Box<Ast>,
    pub step: Box<Ast>,
    pub body: Box<Ast>,
}

/// One declared parameter: a name with an optional default expression.
///
/// Defaults are re-evaluated per call, inside the call frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub default: Option<Ast>,
}

/// Function declaration payload.
#[derive(Clone, Debug, PartialEq)]
pub struct FnDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<Ast>,
}

impl FnDecl {
    /// Number of parameters without a default - the minimum argument count.
    pub fn required_params(&self) -> usize {
        self.params.iter().filter(|p| p.default.is_none()).count()
    }
}

/// Class declaration payload: a named bag of member declarations.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub members: Vec<Ast>,
}
