//! Builtin types.
//!
//! Each submodule exposes a `descriptor()` building its type; the registry
//! calls these once. Handlers share the argument helpers below.

pub mod array;
pub mod boolean;
pub mod complex;
pub mod defaults;
pub mod float;
mod format;
pub mod function;
pub mod integer;
pub mod module;
pub mod null;
mod numeric;
pub mod string;
pub mod structs;
pub mod wrapper;

use crate::{errors, AilResult, Value};

/// Check that a method received exactly `expected` arguments.
#[inline]
pub(crate) fn require_args(method: &str, expected: usize, args: &[Value]) -> AilResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(errors::wrong_arg_count(method, expected, args.len()))
    }
}

/// The single argument of a one-argument method.
#[inline]
pub(crate) fn single_arg<'a>(method: &str, args: &'a [Value]) -> AilResult<&'a Value> {
    require_args(method, 1, args)?;
    Ok(&args[0])
}

/// Extract a text argument (raw or boxed).
pub(crate) fn require_str_arg(method: &str, arg: &Value) -> AilResult<String> {
    match arg.unwrapped() {
        Value::Str(s) => Ok(s),
        other => Err(errors::wrong_arg_type(method, "a string", other.type_name())),
    }
}

/// Extract an integer argument (raw or boxed).
pub(crate) fn require_int_arg(method: &str, arg: &Value) -> AilResult<i64> {
    match arg.unwrapped() {
        Value::Int(n) => Ok(n),
        other => Err(errors::wrong_arg_type(method, "an integer", other.type_name())),
    }
}

/// Quote text the way representations print it: single quotes unless the
/// text contains a single quote and no double quote.
pub(crate) fn quote(text: &str) -> String {
    let delimiter = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(delimiter);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}
