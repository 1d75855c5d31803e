//! The integer type.

use super::numeric::{arith, numeric_eq, Op};
use crate::{
    errors, AilResult, ObjRef, Slot, TypeCategory, TypeDescriptor, TypeRef, TypeRegistry, Value,
    VALUE,
};

pub(crate) fn descriptor() -> TypeRef {
    TypeDescriptor::builder("integer", TypeCategory::Integer)
        .slot(Slot::Init, int_init)
        .slot(Slot::Str, int_str)
        .slot(Slot::Repr, int_str)
        .slot(Slot::Eq, numeric_eq)
        .slot(Slot::Add, |reg, this, args| arith(reg, Op::Add, this, args))
        .slot(Slot::Sub, |reg, this, args| arith(reg, Op::Sub, this, args))
        .slot(Slot::Mul, |reg, this, args| arith(reg, Op::Mul, this, args))
        .slot(Slot::Div, |reg, this, args| arith(reg, Op::Div, this, args))
        .build()
}

/// Accepts an integer, a bool, a float (truncated) or decimal text.
#[allow(clippy::cast_possible_truncation, reason = "float to int truncates")]
fn int_init(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    let n = match args.first().map(Value::unwrapped) {
        None => 0,
        Some(Value::Int(n)) => n,
        Some(Value::Bool(b)) => i64::from(b),
        Some(Value::Float(x)) if x.is_finite() => x.trunc() as i64,
        Some(Value::Float(x)) => {
            return Err(errors::value_error(format!(
                "cannot convert float {x} to integer"
            )))
        }
        Some(Value::Str(text)) => text.trim().parse().map_err(|_| {
            errors::value_error(format!("invalid literal for integer: '{text}'"))
        })?,
        Some(other) => {
            return Err(errors::type_error(format!(
                "integer() argument must be a number or string, not {}",
                other.type_name()
            )))
        }
    };
    this.set_property(VALUE, Value::Int(n));
    Ok(Value::Null)
}

fn int_str(_: &TypeRegistry, this: &ObjRef, _: &[Value]) -> AilResult<Value> {
    match this.value() {
        Some(Value::Int(n)) => Ok(Value::Str(n.to_string())),
        _ => Ok(Value::string("0")),
    }
}
