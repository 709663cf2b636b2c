//! The tree-walking evaluator.
//!
//! Statement execution returns a [`Flow`] instead of threading mutable
//! flags through the evaluator: statement lists stop at the first
//! non-normal flow, loops absorb `Break`/`Continue`, and calls turn
//! `Return(v)` back into a plain value. Expression evaluation returns
//! values directly; identifiers evaluate to their variable *cell* so
//! assignment and the compound operators can mutate in place.
//!
//! Scoping uses the frame arena in [`crate::env`]: a call switches the
//! current frame id to a fresh child of the callee's captured frame and
//! switches back afterwards. Plain blocks run in the current frame - a
//! `let` inside one binds into the enclosing scope, and redeclaring a name
//! there is an error.

use std::io::{self, BufRead, BufReader, Write};
use std::rc::Rc;

use skai_par::{
    AccessExpr, AssignExpr, Ast, BinaryExpr, CallExpr, ForStmt, IfStmt, LogicalOp, UnaryExpr,
    UnaryOp, WhileStmt,
};
use skai_util::{Fatal, Result};

use crate::builtins;
use crate::env::{EnvId, Environments};
use crate::value::{
    self, base_op, Builtin, ClassValue, Function, InstanceValue, Value, VarCell,
};

/// Result of executing one statement.
pub enum Flow {
    /// Execution continues with the next statement.
    Normal(Value),
    /// A `return` fired; the enclosing call unwraps the value.
    Return(Value),
    /// A `break` fired; the innermost loop stops.
    Break,
    /// A `continue` fired; the innermost loop moves to its next iteration.
    Continue,
}

/// The interpreter: frame arena, current scope, and the I/O the built-ins
/// talk to.
pub struct Interpreter {
    envs: Environments,
    /// Frame statements currently execute in.
    env: EnvId,
    /// Call nesting depth; `return` outside depth > 0 is an error.
    fn_depth: usize,
    /// Loop nesting depth within the current call; reset across calls so a
    /// `break` cannot escape a function boundary.
    loop_depth: usize,
    out: Box<dyn Write>,
    input: Box<dyn BufRead>,
}

impl Interpreter {
    /// An interpreter wired to the process's standard streams.
    pub fn new() -> Self {
        Self::with_io(Box::new(io::stdout()), Box::new(BufReader::new(io::stdin())))
    }

    /// An interpreter with explicit output and input, for embedding and
    /// tests.
    pub fn with_io(out: Box<dyn Write>, input: Box<dyn BufRead>) -> Self {
        let mut interp = Self {
            envs: Environments::new(),
            env: EnvId::GLOBAL,
            fn_depth: 0,
            loop_depth: 0,
            out,
            input,
        };
        builtins::install(&mut interp);
        interp
    }

    /// Run a program in the global scope.
    pub fn interpret(&mut self, program: &[Ast]) -> Result<()> {
        for stmt in program {
            self.exec(stmt)?;
        }
        Ok(())
    }

    /// Define a binding in the global frame. Used by the built-in
    /// installer; exposed for embedders that want to pre-seed names.
    pub fn define_global(&mut self, name: &str, value: Value) -> Result<()> {
        self.envs
            .define(EnvId::GLOBAL, name, VarCell::new(name, value))
    }

    // =========================================================================
    // STATEMENTS
    // =========================================================================

    /// Execute one statement.
    fn exec(&mut self, node: &Ast) -> Result<Flow> {
        match node {
            Ast::VarDecl(decl) => {
                let value = match &decl.init {
                    Some(init) => self.eval_unwrapped(init)?,
                    None => Value::Null,
                };
                let cell = VarCell::with_const(decl.name.clone(), value, decl.is_const);
                self.envs.define(self.env, &decl.name, cell)?;
                Ok(Flow::Normal(Value::Null))
            }
            Ast::If(stmt) => self.exec_if(stmt),
            Ast::While(stmt) => {
                if let Some(init) = &stmt.init {
                    self.exec(init)?;
                }
                self.loop_depth += 1;
                let flow = self.run_while(stmt);
                self.loop_depth -= 1;
                flow
            }
            Ast::For(stmt) => {
                self.exec(&stmt.init)?;
                self.loop_depth += 1;
                let flow = self.run_for(stmt);
                self.loop_depth -= 1;
                flow
            }
            Ast::Block(stmts) => self.exec_block(stmts),
            Ast::Function(decl) => {
                // The captured frame is the one the binding lands in, so
                // the function can see itself and recursion works.
                let function = Value::Function(Rc::new(Function {
                    decl: decl.clone(),
                    env: self.env,
                    is_init: false,
                }));
                self.envs
                    .define(self.env, &decl.name, VarCell::new(decl.name.clone(), function))?;
                Ok(Flow::Normal(Value::Null))
            }
            Ast::Class(decl) => {
                let class = Value::Class(Rc::new(ClassValue {
                    decl: decl.clone(),
                    env: self.env,
                }));
                self.envs
                    .define(self.env, &decl.name, VarCell::new(decl.name.clone(), class))?;
                Ok(Flow::Normal(Value::Null))
            }
            Ast::Return(value) => {
                if self.fn_depth == 0 {
                    return Err(Fatal::control("'return' used outside of a function"));
                }
                let value = match value {
                    Some(expr) => self.eval_unwrapped(expr)?,
                    None => Value::Null,
                };
                Ok(Flow::Return(value))
            }
            Ast::Break => {
                if self.loop_depth == 0 {
                    return Err(Fatal::control("'break' used outside of a loop"));
                }
                Ok(Flow::Break)
            }
            Ast::Continue => {
                if self.loop_depth == 0 {
                    return Err(Fatal::control("'continue' used outside of a loop"));
                }
                Ok(Flow::Continue)
            }
            expr => Ok(Flow::Normal(self.eval(expr)?)),
        }
    }

    fn exec_if(&mut self, stmt: &IfStmt) -> Result<Flow> {
        if let Some(init) = &stmt.init {
            self.exec(init)?;
        }
        if self.eval(&stmt.cond)?.truthy()? {
            self.exec(&stmt.then_branch)
        } else if let Some(else_branch) = &stmt.else_branch {
            self.exec(else_branch)
        } else {
            Ok(Flow::Normal(Value::Null))
        }
    }

    fn run_while(&mut self, stmt: &WhileStmt) -> Result<Flow> {
        loop {
            if !self.eval(&stmt.cond)?.truthy()? {
                return Ok(Flow::Normal(Value::Null));
            }
            match self.exec(&stmt.body)? {
                Flow::Break => return Ok(Flow::Normal(Value::Null)),
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal(_) | Flow::Continue => {}
            }
        }
    }

    fn run_for(&mut self, stmt: &ForStmt) -> Result<Flow> {
        loop {
            if !self.eval(&stmt.cond)?.truthy()? {
                return Ok(Flow::Normal(Value::Null));
            }
            match self.exec(&stmt.body)? {
                Flow::Break => return Ok(Flow::Normal(Value::Null)),
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal(_) | Flow::Continue => {}
            }
            self.eval(&stmt.step)?;
        }
    }

    /// Run a statement list, stopping at the first non-normal flow.
    fn exec_block(&mut self, stmts: &[Ast]) -> Result<Flow> {
        for stmt in stmts {
            match self.exec(stmt)? {
                Flow::Normal(_) => {}
                other => return Ok(other),
            }
        }
        Ok(Flow::Normal(Value::Null))
    }

    // =========================================================================
    // EXPRESSIONS
    // =========================================================================

    /// Evaluate an expression. Identifiers yield their cell.
    fn eval(&mut self, node: &Ast) -> Result<Value> {
        match node {
            Ast::Integer(n) => Ok(Value::Integer(*n)),
            Ast::Float(x) => Ok(Value::Float(*x)),
            Ast::Str(raw) => Ok(Value::Str(Rc::from(raw.as_str()))),
            Ast::Bool(b) => Ok(Value::Bool(*b)),
            Ast::Null => Ok(Value::Null),
            Ast::Ident(name) => Ok(Value::Cell(self.envs.lookup(self.env, name)?)),
            Ast::SelfExpr => Ok(Value::Cell(self.envs.lookup(self.env, "self")?)),
            Ast::Array(elements) => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(self.eval_unwrapped(element)?);
                }
                Ok(Value::Array(Rc::new(std::cell::RefCell::new(items))))
            }
            Ast::Assign(assign) => self.eval_assign(assign),
            Ast::Binary(binary) => self.eval_binary(binary),
            Ast::Logical(logical) => {
                // Both sides evaluate, eagerly; no short-circuit.
                let lhs = self.eval(&logical.lhs)?.truthy()?;
                let rhs = self.eval(&logical.rhs)?.truthy()?;
                Ok(Value::Bool(match logical.op {
                    LogicalOp::And => lhs && rhs,
                    LogicalOp::Or => lhs || rhs,
                }))
            }
            Ast::Unary(unary) => self.eval_unary(unary),
            Ast::Call(call) => self.eval_call(call),
            Ast::Subscript(subscript) => {
                let object = self.eval_unwrapped(&subscript.object)?;
                let index = self.eval_unwrapped(&subscript.index)?;
                value::index_value(&object, &index)
            }
            Ast::Access(access) => self.eval_access(access),
            Ast::Break | Ast::Continue => Err(Fatal::control(
                "loop control cannot be used as an expression",
            )),
            other => Err(Fatal::type_error(format!(
                "statement form in expression position: {other:?}"
            ))),
        }
    }

    /// Evaluate and unwrap any variable cell to its content.
    fn eval_unwrapped(&mut self, node: &Ast) -> Result<Value> {
        Ok(self.eval(node)?.unwrap_cell())
    }

    fn eval_assign(&mut self, assign: &AssignExpr) -> Result<Value> {
        match self.eval(&assign.target)? {
            Value::Cell(cell) => {
                if cell.is_const {
                    return Err(Fatal::constant(format!(
                        "cannot assign to const variable '{}'",
                        cell.name
                    )));
                }
                let value = self.eval_unwrapped(&assign.value)?;
                *cell.value.borrow_mut() = value.clone();
                Ok(value)
            }
            _ => Err(Fatal::type_error("invalid assignment target")),
        }
    }

    fn eval_binary(&mut self, binary: &BinaryExpr) -> Result<Value> {
        if binary.op.is_compound_assign() {
            // Compound forms mutate through the lhs cell in place.
            let target = self.eval(&binary.lhs)?;
            let Value::Cell(cell) = target else {
                return Err(Fatal::type_error(format!(
                    "invalid assignment target for operator '{}'",
                    skai_par::op_text(binary.op)
                )));
            };
            if cell.is_const {
                return Err(Fatal::constant(format!(
                    "cannot assign to const variable '{}'",
                    cell.name
                )));
            }
            let rhs = self.eval_unwrapped(&binary.rhs)?;
            let current = cell.value.borrow().clone();
            let result = value::binary_op(base_op(binary.op), &current, &rhs)?;
            *cell.value.borrow_mut() = result.clone();
            Ok(result)
        } else {
            let lhs = self.eval_unwrapped(&binary.lhs)?;
            let rhs = self.eval_unwrapped(&binary.rhs)?;
            value::binary_op(binary.op, &lhs, &rhs)
        }
    }

    fn eval_unary(&mut self, unary: &UnaryExpr) -> Result<Value> {
        let operand = self.eval_unwrapped(&unary.operand)?;
        match (unary.op, operand) {
            (UnaryOp::Neg, Value::Integer(n)) => Ok(Value::Integer(n.wrapping_neg())),
            (UnaryOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
            (UnaryOp::Pos, Value::Integer(n)) => Ok(Value::Integer(n)),
            (UnaryOp::Pos, Value::Float(x)) => Ok(Value::Float(x)),
            (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
            (op, operand) => {
                let symbol = match op {
                    UnaryOp::Neg => "-",
                    UnaryOp::Pos => "+",
                    UnaryOp::Not => "!",
                };
                Err(Fatal::type_error(format!(
                    "invalid operand for unary operator '{}' on type '{}'",
                    symbol,
                    operand.type_name()
                )))
            }
        }
    }

    fn eval_access(&mut self, access: &AccessExpr) -> Result<Value> {
        let object = self.eval_unwrapped(&access.object)?;
        let instance = match &object {
            Value::Instance(instance) => instance.clone(),
            other => {
                return Err(Fatal::type_error(format!(
                    "type '{}' has no members",
                    other.type_name()
                )))
            }
        };
        let Ast::Ident(name) = access.member.as_ref() else {
            return Err(Fatal::type_error("expected member name after '.'"));
        };
        let cell = self
            .envs
            .lookup_local(instance.frame, name)
            .ok_or_else(|| {
                Fatal::name(format!("'{}' has no member '{}'", instance.class, name))
            })?;
        Ok(Value::Cell(cell))
    }

    // =========================================================================
    // CALLS
    // =========================================================================

    fn eval_call(&mut self, call: &CallExpr) -> Result<Value> {
        let callee = self.eval_unwrapped(&call.callee)?;
        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.eval_unwrapped(arg)?);
        }
        match callee {
            Value::Function(function) => self.call_function(&function, args),
            Value::Builtin(builtin) => self.call_builtin(&builtin, args),
            Value::Class(class) => self.instantiate(&class, args),
            other => Err(Fatal::type_error(format!(
                "type '{}' is not callable",
                other.type_name()
            ))),
        }
    }

    /// Invoke a user function in a fresh child frame of its captured
    /// environment.
    fn call_function(&mut self, function: &Function, args: Vec<Value>) -> Result<Value> {
        let decl = &function.decl;
        let required = decl.required_params();
        if args.len() < required || args.len() > decl.params.len() {
            return Err(arity_error(
                &decl.name,
                required,
                decl.params.len(),
                false,
                args.len(),
            ));
        }

        let frame = self.envs.push_frame(function.env);
        let caller_env = std::mem::replace(&mut self.env, frame);
        let caller_loops = std::mem::take(&mut self.loop_depth);
        self.fn_depth += 1;

        let result = self.run_function_body(decl, args);

        self.fn_depth -= 1;
        self.loop_depth = caller_loops;
        self.env = caller_env;

        let value = result?;
        if function.is_init {
            if !matches!(value, Value::Null) {
                return Err(Fatal::constructor("'init' cannot return a value"));
            }
            let cell = self.envs.lookup(frame, "self")?;
            return Ok(cell.value.borrow().clone());
        }
        Ok(value)
    }

    /// Bind parameters and run the body in the already-switched frame.
    fn run_function_body(&mut self, decl: &skai_par::FnDecl, args: Vec<Value>) -> Result<Value> {
        for (i, param) in decl.params.iter().enumerate() {
            let value = if i < args.len() {
                args[i].clone()
            } else if let Some(default) = &param.default {
                // Defaults are re-evaluated per call, in the call frame, so
                // they can see earlier parameters.
                self.eval_unwrapped(default)?
            } else {
                return Err(Fatal::arity(format!(
                    "missing argument '{}' in call to '{}'",
                    param.name, decl.name
                )));
            };
            self.envs
                .define(self.env, &param.name, VarCell::new(param.name.clone(), value))?;
        }

        for stmt in &decl.body {
            match self.exec(stmt)? {
                Flow::Normal(_) => {}
                Flow::Return(value) => return Ok(value),
                // Loops absorb these and loop_depth is zeroed per call, so
                // they cannot surface here.
                Flow::Break | Flow::Continue => break,
            }
        }
        Ok(Value::Null)
    }

    fn call_builtin(&mut self, builtin: &Builtin, args: Vec<Value>) -> Result<Value> {
        let count = args.len();
        let ok = if builtin.variadic {
            count >= builtin.min_arity
        } else {
            (builtin.min_arity..=builtin.max_arity).contains(&count)
        };
        if !ok {
            return Err(arity_error(
                builtin.name,
                builtin.min_arity,
                builtin.max_arity,
                builtin.variadic,
                count,
            ));
        }
        (builtin.func)(self, args)
    }

    /// Instantiate a class: run its members in a fresh frame with `self`
    /// bound, then call `init` if declared.
    fn instantiate(&mut self, class: &ClassValue, args: Vec<Value>) -> Result<Value> {
        let frame = self.envs.push_frame(class.env);
        let instance = Value::Instance(Rc::new(InstanceValue {
            class: class.decl.name.clone(),
            frame,
        }));
        self.envs.define(
            frame,
            "self",
            VarCell::with_const("self", instance.clone(), true),
        )?;

        let caller_env = std::mem::replace(&mut self.env, frame);
        let caller_loops = std::mem::take(&mut self.loop_depth);
        let members = self.run_class_members(&class.decl.members);
        self.loop_depth = caller_loops;
        self.env = caller_env;
        members?;

        match self.envs.lookup_local(frame, "init") {
            Some(cell) => {
                let init = cell.value.borrow().clone();
                let Value::Function(function) = init else {
                    return Err(Fatal::type_error(format!(
                        "'init' of class '{}' is not a function",
                        class.decl.name
                    )));
                };
                let constructor = Function {
                    decl: function.decl.clone(),
                    env: function.env,
                    is_init: true,
                };
                self.call_function(&constructor, args)
            }
            None if args.is_empty() => Ok(instance),
            None => Err(arity_error(&class.decl.name, 0, 0, false, args.len())),
        }
    }

    fn run_class_members(&mut self, members: &[Ast]) -> Result<()> {
        for member in members {
            self.exec(member)?;
        }
        Ok(())
    }

    // =========================================================================
    // BUILT-IN I/O PLUMBING
    // =========================================================================

    /// Write a full output line (used by `print`).
    pub(crate) fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{line}").map_err(|e| Fatal::io(format!("write failed: {e}")))
    }

    /// Write without a newline and flush (used by `prompt`).
    pub(crate) fn write_flush(&mut self, text: &str) -> Result<()> {
        write!(self.out, "{text}")
            .and_then(|()| self.out.flush())
            .map_err(|e| Fatal::io(format!("write failed: {e}")))
    }

    /// Read one line from the input, without its trailing newline.
    pub(crate) fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .map_err(|e| Fatal::io(format!("read failed: {e}")))?;
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format an argument-count error.
fn arity_error(name: &str, min: usize, max: usize, variadic: bool, got: usize) -> Fatal {
    let expectation = if variadic {
        format!("at least {min} argument(s)")
    } else if min == max {
        format!("{min} argument(s)")
    } else {
        format!("between {min} and {max} arguments")
    };
    Fatal::arity(format!("'{name}' expects {expectation}, got {got}"))
}
