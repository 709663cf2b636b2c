//! The built-in functions: `print`, `prompt`, `time`, `sleep`, `random`,
//! `type_of`, `pow`, `abs`.
//!
//! Each one is a [`Builtin`] value bound in the global frame before the
//! program runs. Arity is checked generically by the call machinery; the
//! natives themselves only validate argument *types*.

use std::rc::Rc;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::Rng;
use skai_util::{Fatal, Result};

use crate::interp::Interpreter;
use crate::value::{Builtin, NativeFn, Value};

/// Bind every built-in in the interpreter's global frame.
pub(crate) fn install(interp: &mut Interpreter) {
    let table: &[(&'static str, usize, usize, bool, NativeFn)] = &[
        ("print", 1, usize::MAX, true, native_print),
        ("prompt", 1, 1, false, native_prompt),
        ("time", 0, 0, false, native_time),
        ("sleep", 1, 1, false, native_sleep),
        ("random", 2, 2, false, native_random),
        ("type_of", 1, 1, false, native_type_of),
        ("pow", 2, 2, false, native_pow),
        ("abs", 1, 1, false, native_abs),
    ];
    for &(name, min_arity, max_arity, variadic, func) in table {
        let value = Value::Builtin(Rc::new(Builtin {
            name,
            min_arity,
            max_arity,
            variadic,
            func,
        }));
        // The global frame is empty of user names at install time, so
        // definition cannot collide.
        interp
            .define_global(name, value)
            .expect("built-in name collision");
    }
}

/// Stringify each argument, join with single spaces, write one line.
fn native_print(interp: &mut Interpreter, args: Vec<Value>) -> Result<Value> {
    let line = args
        .iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    interp.write_line(&line)?;
    Ok(Value::Null)
}

/// Write the prompt text, then read one line back as a String.
fn native_prompt(interp: &mut Interpreter, args: Vec<Value>) -> Result<Value> {
    let Value::Str(_) = &args[0] else {
        return Err(Fatal::type_error("'prompt' expected string as a first argument"));
    };
    interp.write_flush(&args[0].to_string())?;
    let line = interp.read_line()?;
    Ok(Value::Str(Rc::from(line)))
}

/// Wall-clock seconds since the Unix epoch, as a Float.
fn native_time(_interp: &mut Interpreter, _args: Vec<Value>) -> Result<Value> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| Fatal::io("system clock is before the unix epoch"))?;
    Ok(Value::Float(now.as_secs_f64()))
}

/// Block the calling thread for the given number of milliseconds.
fn native_sleep(_interp: &mut Interpreter, args: Vec<Value>) -> Result<Value> {
    let &Value::Integer(ms) = &args[0] else {
        return Err(Fatal::type_error("'sleep' expected integer as a first argument"));
    };
    if ms < 0 {
        return Err(Fatal::type_error("'sleep' expected a non-negative duration"));
    }
    thread::sleep(Duration::from_millis(ms as u64));
    Ok(Value::Null)
}

/// Uniform integer in `[lo, hi]`; fails when `hi < lo`.
fn native_random(_interp: &mut Interpreter, args: Vec<Value>) -> Result<Value> {
    let (Value::Integer(lo), Value::Integer(hi)) = (&args[0], &args[1]) else {
        return Err(Fatal::type_error("'random' expected integer types"));
    };
    if hi < lo {
        return Err(Fatal::type_error("'random' invalid range provided"));
    }
    let value = rand::thread_rng().gen_range(*lo..=*hi);
    Ok(Value::Integer(value))
}

/// The argument's runtime type name as a String.
fn native_type_of(_interp: &mut Interpreter, args: Vec<Value>) -> Result<Value> {
    Ok(Value::Str(Rc::from(args[0].type_name())))
}

/// Integer exponentiation.
fn native_pow(_interp: &mut Interpreter, args: Vec<Value>) -> Result<Value> {
    let (Value::Integer(base), Value::Integer(exp)) = (&args[0], &args[1]) else {
        return Err(Fatal::type_error("'pow' expected integer arguments"));
    };
    if *exp < 0 {
        return Err(Fatal::type_error("'pow' expected a non-negative exponent"));
    }
    let exp = u32::try_from(*exp).map_err(|_| Fatal::type_error("'pow' exponent out of range"))?;
    Ok(Value::Integer(base.wrapping_pow(exp)))
}

/// Absolute value, preserving Integer/Float.
fn native_abs(_interp: &mut Interpreter, args: Vec<Value>) -> Result<Value> {
    match &args[0] {
        Value::Integer(n) => Ok(Value::Integer(n.wrapping_abs())),
        Value::Float(x) => Ok(Value::Float(x.abs())),
        other => Err(Fatal::type_error(format!(
            "'abs' expected a numeric argument, got '{}'",
            other.type_name()
        ))),
    }
}
