//! Runtime value model.
//!
//! [`Value`] is the closed family of everything a skai expression can
//! produce. Two of the variants need a word:
//!
//! - [`Value::Cell`] is a *named mutable cell*. Environment bindings point
//!   at cells, and evaluating an identifier yields the cell itself, not its
//!   content - that is what lets assignment and the compound-assign
//!   operators mutate in place, and what `imm` constness is enforced on.
//!   Operations that need the underlying value call [`Value::unwrap_cell`].
//! - [`Value::Array`] shares its storage (`Rc<RefCell<...>>`): copies of an
//!   array value alias the same elements.
//!
//! Operator dispatch is a match over (lhs, rhs) type pairs with Integer →
//! Float promotion; every combination not listed is a type error. String
//! content is stored raw and escape sequences are decoded only when a value
//! is stringified.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use skai_lex::TokenKind;
use skai_par::{op_text, ClassDecl, FnDecl};
use skai_util::{Fatal, Result};

use crate::env::EnvId;
use crate::interp::Interpreter;

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    /// The absent value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit float.
    Float(f64),
    /// Immutable string; raw text, escapes decoded on stringification.
    Str(Rc<str>),
    /// Ordered sequence with shared reference semantics.
    Array(Rc<RefCell<Vec<Value>>>),
    /// A named mutable cell - what environment bindings hold.
    Cell(Rc<VarCell>),
    /// User function with its captured environment.
    Function(Rc<Function>),
    /// Native built-in function.
    Builtin(Rc<Builtin>),
    /// Class value; calling it instantiates.
    Class(Rc<ClassValue>),
    /// Instance of a class, holding its member frame.
    Instance(Rc<InstanceValue>),
}

/// A named, optionally-const holder of a value.
#[derive(Debug)]
pub struct VarCell {
    /// Binding name, used in error messages.
    pub name: String,
    /// Set for `imm` declarations; mutation through the cell then fails.
    pub is_const: bool,
    /// The current content.
    pub value: RefCell<Value>,
}

impl VarCell {
    /// A fresh mutable cell.
    pub fn new(name: impl Into<String>, value: Value) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            is_const: false,
            value: RefCell::new(value),
        })
    }

    /// A fresh cell with the given constness.
    pub fn with_const(name: impl Into<String>, value: Value, is_const: bool) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            is_const,
            value: RefCell::new(value),
        })
    }
}

/// A user function: its declaration, the frame it captured, and whether it
/// is an `init` constructor.
pub struct Function {
    /// Shared declaration (name, parameters, body).
    pub decl: Rc<FnDecl>,
    /// Frame captured at declaration time.
    pub env: EnvId,
    /// Constructor flag: calling returns the `self` binding and a non-null
    /// `return` is an error.
    pub is_init: bool,
}

/// A class value: the declaration plus the frame it captured.
pub struct ClassValue {
    pub decl: Rc<ClassDecl>,
    pub env: EnvId,
}

/// An instance: its class name and the frame holding its members.
pub struct InstanceValue {
    pub class: String,
    pub frame: EnvId,
}

/// Signature of a native built-in.
pub type NativeFn = fn(&mut Interpreter, Vec<Value>) -> Result<Value>;

/// A native built-in function.
pub struct Builtin {
    pub name: &'static str,
    pub min_arity: usize,
    pub max_arity: usize,
    /// Variadic callables accept any count >= `min_arity`.
    pub variadic: bool,
    pub func: NativeFn,
}

impl Value {
    /// Runtime type name, as reported by `type_of`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Cell(cell) => cell.value.borrow().type_name(),
            Value::Function(_) | Value::Builtin(_) => "function",
            Value::Class(_) => "class",
            Value::Instance(_) => "instance",
        }
    }

    /// The underlying value: cells yield their content, everything else
    /// itself.
    pub fn unwrap_cell(&self) -> Value {
        match self {
            Value::Cell(cell) => cell.value.borrow().clone(),
            other => other.clone(),
        }
    }

    /// Boolean coercion for conditionals: only Null (false) and Bool
    /// convert; everything else is a type error.
    pub fn truthy(&self) -> Result<bool> {
        match self.unwrap_cell() {
            Value::Null => Ok(false),
            Value::Bool(b) => Ok(b),
            _ => Err(Fatal::type_error(
                "implicit conversions to booleans are disallowed",
            )),
        }
    }
}

/// Map a compound-assign operator to its base operator (`+=` → `+`).
pub fn base_op(op: TokenKind) -> TokenKind {
    match op {
        TokenKind::PlusEq => TokenKind::Plus,
        TokenKind::MinusEq => TokenKind::Minus,
        TokenKind::StarEq => TokenKind::Star,
        TokenKind::SlashEq => TokenKind::Slash,
        TokenKind::PercentEq => TokenKind::Percent,
        TokenKind::AmpEq => TokenKind::Amp,
        TokenKind::PipeEq => TokenKind::Pipe,
        TokenKind::CaretEq => TokenKind::Caret,
        other => other,
    }
}

/// Dispatch a binary operator over two (already unwrapped) values.
///
/// Integer operands promote to Float when paired with a Float. Any
/// combination without a row here - including an operator token that is not
/// a binary operator at all - is a type error.
pub fn binary_op(op: TokenKind, lhs: &Value, rhs: &Value) -> Result<Value> {
    match (lhs, rhs) {
        (Value::Integer(a), Value::Integer(b)) => integer_op(op, *a, *b),
        (Value::Float(a), Value::Float(b)) => float_op(op, *a, *b),
        (Value::Integer(a), Value::Float(b)) => float_op(op, *a as f64, *b),
        (Value::Float(a), Value::Integer(b)) => float_op(op, *a, *b as f64),
        (Value::Str(a), Value::Str(b)) => string_op(op, a, b),
        (Value::Bool(a), Value::Bool(b)) => bool_op(op, *a, *b),
        _ => Err(invalid_operands(op, lhs, rhs)),
    }
}

fn integer_op(op: TokenKind, a: i64, b: i64) -> Result<Value> {
    let value = match op {
        TokenKind::Plus => Value::Integer(a.wrapping_add(b)),
        TokenKind::Minus => Value::Integer(a.wrapping_sub(b)),
        TokenKind::Star => Value::Integer(a.wrapping_mul(b)),
        TokenKind::Percent => {
            if b == 0 {
                return Err(Fatal::type_error("division by zero in operator '%'"));
            }
            Value::Integer(a.wrapping_rem(b))
        }
        // Integer division always produces a Float, exact or not.
        TokenKind::Slash => Value::Float(a as f64 / b as f64),
        TokenKind::Amp => Value::Integer(a & b),
        TokenKind::Pipe => Value::Integer(a | b),
        TokenKind::Caret => Value::Integer(a ^ b),
        TokenKind::Shl => Value::Integer(a.wrapping_shl(shift_amount(b, op)?)),
        TokenKind::Shr => Value::Integer(a.wrapping_shr(shift_amount(b, op)?)),
        TokenKind::EqEq => Value::Bool(a == b),
        TokenKind::BangEq => Value::Bool(a != b),
        TokenKind::Lt => Value::Bool(a < b),
        TokenKind::LtEq => Value::Bool(a <= b),
        TokenKind::Gt => Value::Bool(a > b),
        TokenKind::GtEq => Value::Bool(a >= b),
        _ => return Err(invalid_operands(op, &Value::Integer(a), &Value::Integer(b))),
    };
    Ok(value)
}

/// Shift amounts must lie in `0..64`.
fn shift_amount(b: i64, op: TokenKind) -> Result<u32> {
    if !(0..64).contains(&b) {
        return Err(Fatal::type_error(format!(
            "shift amount {b} out of range for operator '{}'",
            op_text(op)
        )));
    }
    Ok(b as u32)
}

fn float_op(op: TokenKind, a: f64, b: f64) -> Result<Value> {
    let value = match op {
        TokenKind::Plus => Value::Float(a + b),
        TokenKind::Minus => Value::Float(a - b),
        TokenKind::Star => Value::Float(a * b),
        TokenKind::Slash => Value::Float(a / b),
        // Floating remainder, as in the original.
        TokenKind::Percent => Value::Float(a % b),
        TokenKind::EqEq => Value::Bool(a == b),
        TokenKind::BangEq => Value::Bool(a != b),
        TokenKind::Lt => Value::Bool(a < b),
        TokenKind::LtEq => Value::Bool(a <= b),
        TokenKind::Gt => Value::Bool(a > b),
        TokenKind::GtEq => Value::Bool(a >= b),
        _ => return Err(invalid_operands(op, &Value::Float(a), &Value::Float(b))),
    };
    Ok(value)
}

fn string_op(op: TokenKind, a: &Rc<str>, b: &Rc<str>) -> Result<Value> {
    let value = match op {
        TokenKind::Plus => Value::Str(Rc::from(format!("{a}{b}"))),
        TokenKind::EqEq => Value::Bool(a == b),
        TokenKind::BangEq => Value::Bool(a != b),
        TokenKind::Lt => Value::Bool(a.as_ref() < b.as_ref()),
        TokenKind::LtEq => Value::Bool(a.as_ref() <= b.as_ref()),
        TokenKind::Gt => Value::Bool(a.as_ref() > b.as_ref()),
        TokenKind::GtEq => Value::Bool(a.as_ref() >= b.as_ref()),
        _ => {
            return Err(invalid_operands(
                op,
                &Value::Str(a.clone()),
                &Value::Str(b.clone()),
            ))
        }
    };
    Ok(value)
}

// `and`/`or` never reach this table: the parser turns them into Logical
// nodes, which the evaluator combines itself.
fn bool_op(op: TokenKind, a: bool, b: bool) -> Result<Value> {
    let value = match op {
        TokenKind::EqEq => Value::Bool(a == b),
        TokenKind::BangEq => Value::Bool(a != b),
        _ => return Err(invalid_operands(op, &Value::Bool(a), &Value::Bool(b))),
    };
    Ok(value)
}

fn invalid_operands(op: TokenKind, lhs: &Value, rhs: &Value) -> Fatal {
    Fatal::type_error(format!(
        "invalid operands for operator '{}' between types '{}' and '{}'",
        op_text(op),
        lhs.type_name(),
        rhs.type_name()
    ))
}

/// Subscript dispatch: arrays yield the element, strings a one-character
/// string. Negative indices count from the end; out of range is fatal.
pub fn index_value(object: &Value, index: &Value) -> Result<Value> {
    let Value::Integer(raw) = index else {
        return Err(Fatal::index(format!(
            "subscript index must be an integer, got '{}'",
            index.type_name()
        )));
    };
    match object {
        Value::Array(items) => {
            let items = items.borrow();
            let at = resolve_index(*raw, items.len())?;
            Ok(items[at].clone())
        }
        Value::Str(text) => {
            let chars: Vec<char> = text.chars().collect();
            let at = resolve_index(*raw, chars.len())?;
            Ok(Value::Str(Rc::from(chars[at].to_string())))
        }
        other => Err(Fatal::type_error(format!(
            "type '{}' does not support subscripting",
            other.type_name()
        ))),
    }
}

fn resolve_index(index: i64, len: usize) -> Result<usize> {
    let n = len as i64;
    let at = if index < 0 { index + n } else { index };
    if at < 0 || at >= n {
        return Err(Fatal::index(format!(
            "index {index} out of range for length {len}"
        )));
    }
    Ok(at as usize)
}

/// Expand the escape sequences of a raw string for display:
/// `\n \t \r \\ \" \b \v \f \0`. Unknown escapes pass through verbatim.
pub fn decode_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('b') => out.push('\u{0008}'),
            Some('v') => out.push('\u{000B}'),
            Some('f') => out.push('\u{000C}'),
            Some('0') => out.push('\0'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(raw) => write!(f, "{}", decode_escapes(raw)),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Cell(cell) => write!(f, "{}", cell.value.borrow()),
            Value::Function(func) => write!(f, "{{function '{}'}}", func.decl.name),
            Value::Builtin(_) => write!(f, "[pure function]"),
            Value::Class(class) => write!(f, "{{class '{}'}}", class.decl.name),
            Value::Instance(instance) => write!(f, "{{instance of '{}'}}", instance.class),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.type_name(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skai_util::ErrorKind;

    fn int(n: i64) -> Value {
        Value::Integer(n)
    }

    fn float(x: f64) -> Value {
        Value::Float(x)
    }

    fn string(s: &str) -> Value {
        Value::Str(Rc::from(s))
    }

    fn expect_int(result: Result<Value>) -> i64 {
        match result.unwrap() {
            Value::Integer(n) => n,
            other => panic!("expected Integer, got {other:?}"),
        }
    }

    fn expect_float(result: Result<Value>) -> f64 {
        match result.unwrap() {
            Value::Float(x) => x,
            other => panic!("expected Float, got {other:?}"),
        }
    }

    fn expect_bool(result: Result<Value>) -> bool {
        match result.unwrap() {
            Value::Bool(b) => b,
            other => panic!("expected Bool, got {other:?}"),
        }
    }

    #[test]
    fn integer_arithmetic_wraps() {
        assert_eq!(expect_int(binary_op(TokenKind::Plus, &int(2), &int(3))), 5);
        assert_eq!(
            expect_int(binary_op(TokenKind::Plus, &int(i64::MAX), &int(1))),
            i64::MIN
        );
        assert_eq!(
            expect_int(binary_op(TokenKind::Star, &int(i64::MIN), &int(-1))),
            i64::MIN
        );
        assert_eq!(expect_int(binary_op(TokenKind::Percent, &int(7), &int(3))), 1);
    }

    #[test]
    fn integer_division_yields_float() {
        assert_eq!(expect_float(binary_op(TokenKind::Slash, &int(5), &int(2))), 2.5);
        assert_eq!(expect_float(binary_op(TokenKind::Slash, &int(6), &int(2))), 3.0);
    }

    #[test]
    fn modulo_by_zero_fails() {
        let err = binary_op(TokenKind::Percent, &int(1), &int(0)).unwrap_err();
        assert!(err.message.contains("division by zero"));
    }

    #[test]
    fn bitwise_and_shift_operators() {
        assert_eq!(expect_int(binary_op(TokenKind::Amp, &int(6), &int(3))), 2);
        assert_eq!(expect_int(binary_op(TokenKind::Pipe, &int(6), &int(3))), 7);
        assert_eq!(expect_int(binary_op(TokenKind::Caret, &int(6), &int(3))), 5);
        assert_eq!(expect_int(binary_op(TokenKind::Shl, &int(1), &int(4))), 16);
        assert_eq!(expect_int(binary_op(TokenKind::Shr, &int(-8), &int(1))), -4);
    }

    #[test]
    fn out_of_range_shift_fails() {
        assert!(binary_op(TokenKind::Shl, &int(1), &int(64)).is_err());
        assert!(binary_op(TokenKind::Shr, &int(1), &int(-1)).is_err());
    }

    #[test]
    fn mixed_numerics_promote() {
        assert_eq!(expect_float(binary_op(TokenKind::Plus, &int(1), &float(0.5))), 1.5);
        assert_eq!(expect_float(binary_op(TokenKind::Star, &float(2.0), &int(3))), 6.0);
        assert!(expect_bool(binary_op(TokenKind::Lt, &int(1), &float(1.5))));
    }

    #[test]
    fn float_remainder() {
        assert_eq!(
            expect_float(binary_op(TokenKind::Percent, &float(5.5), &float(2.0))),
            1.5
        );
    }

    #[test]
    fn string_concatenation_and_comparison() {
        match binary_op(TokenKind::Plus, &string("he"), &string("llo")).unwrap() {
            Value::Str(s) => assert_eq!(&*s, "hello"),
            other => panic!("expected Str, got {other:?}"),
        }
        assert!(expect_bool(binary_op(TokenKind::Lt, &string("abc"), &string("abd"))));
        assert!(expect_bool(binary_op(
            TokenKind::EqEq,
            &string("x"),
            &string("x")
        )));
    }

    #[test]
    fn unsupported_combinations_fail() {
        let err = binary_op(TokenKind::Plus, &string("a"), &int(1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
        assert!(err.message.contains("'string' and 'int'"));
        assert!(binary_op(TokenKind::Minus, &string("a"), &string("b")).is_err());
        assert!(binary_op(TokenKind::Plus, &Value::Bool(true), &Value::Bool(false)).is_err());
        assert!(binary_op(TokenKind::Plus, &Value::Null, &Value::Null).is_err());
    }

    #[test]
    fn non_operator_token_is_rejected() {
        // An Arrow token can never be dispatched, even between integers.
        let err = binary_op(TokenKind::Arrow, &int(1), &int(2)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
    }

    #[test]
    fn array_subscripts_with_negative_indices() {
        let array = Value::Array(Rc::new(RefCell::new(vec![int(10), int(20), int(30)])));
        assert_eq!(expect_int(index_value(&array, &int(0))), 10);
        assert_eq!(expect_int(index_value(&array, &int(-1))), 30);
        assert_eq!(expect_int(index_value(&array, &int(-3))), 10);
        let err = index_value(&array, &int(3)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Index);
        assert!(index_value(&array, &int(-4)).is_err());
    }

    #[test]
    fn string_subscripts_yield_single_characters() {
        let s = string("hello");
        match index_value(&s, &int(1)).unwrap() {
            Value::Str(c) => assert_eq!(&*c, "e"),
            other => panic!("expected Str, got {other:?}"),
        }
        match index_value(&s, &int(-1)).unwrap() {
            Value::Str(c) => assert_eq!(&*c, "o"),
            other => panic!("expected Str, got {other:?}"),
        }
    }

    #[test]
    fn non_integer_index_fails() {
        let array = Value::Array(Rc::new(RefCell::new(vec![int(1)])));
        let err = index_value(&array, &string("0")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Index);
    }

    #[test]
    fn truthiness_is_strict() {
        assert!(!Value::Null.truthy().unwrap());
        assert!(Value::Bool(true).truthy().unwrap());
        assert!(!Value::Bool(false).truthy().unwrap());
        let err = int(1).truthy().unwrap_err();
        assert!(err.message.contains("implicit conversions to booleans"));
        assert!(string("").truthy().is_err());
    }

    #[test]
    fn cells_delegate_to_content() {
        let cell = Value::Cell(VarCell::new("x", int(41)));
        assert_eq!(cell.type_name(), "int");
        assert!(matches!(cell.unwrap_cell(), Value::Integer(41)));
        assert_eq!(
            expect_int(binary_op(TokenKind::Plus, &cell.unwrap_cell(), &int(1))),
            42
        );
    }

    #[test]
    fn escape_decoding() {
        assert_eq!(decode_escapes(r"a\nb"), "a\nb");
        assert_eq!(decode_escapes(r"t\ta\\b"), "t\ta\\b");
        assert_eq!(decode_escapes(r#"say \"hi\""#), "say \"hi\"");
        assert_eq!(decode_escapes(r"\q"), "\\q");
        assert_eq!(decode_escapes("nothing"), "nothing");
    }

    #[test]
    fn display_forms() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(int(-3).to_string(), "-3");
        assert_eq!(float(2.5).to_string(), "2.5");
        assert_eq!(string(r"a\tb").to_string(), "a\tb");
        let array = Value::Array(Rc::new(RefCell::new(vec![int(1), string("x")])));
        assert_eq!(array.to_string(), "[1, x]");
    }

    #[test]
    fn base_op_strips_assignment() {
        assert_eq!(base_op(TokenKind::PlusEq), TokenKind::Plus);
        assert_eq!(base_op(TokenKind::SlashEq), TokenKind::Slash);
        assert_eq!(base_op(TokenKind::Star), TokenKind::Star);
    }
}
