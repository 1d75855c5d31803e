//! The float type.

use super::numeric::{arith, numeric_eq, Op};
use crate::value::format_float;
use crate::{
    errors, AilResult, ObjRef, Slot, TypeCategory, TypeDescriptor, TypeRef, TypeRegistry, Value,
    VALUE,
};

pub(crate) fn descriptor() -> TypeRef {
    TypeDescriptor::builder("float", TypeCategory::Float)
        .slot(Slot::Init, float_init)
        .slot(Slot::Str, float_str)
        .slot(Slot::Repr, float_str)
        .slot(Slot::Eq, numeric_eq)
        .slot(Slot::Add, |reg, this, args| arith(reg, Op::Add, this, args))
        .slot(Slot::Sub, |reg, this, args| arith(reg, Op::Sub, this, args))
        .slot(Slot::Mul, |reg, this, args| arith(reg, Op::Mul, this, args))
        .slot(Slot::Div, |reg, this, args| arith(reg, Op::Div, this, args))
        .build()
}

#[allow(clippy::cast_precision_loss, reason = "integer to float promotion")]
fn float_init(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    let x = match args.first().map(Value::unwrapped) {
        None => 0.0,
        Some(Value::Float(x)) => x,
        Some(Value::Int(n)) => n as f64,
        Some(Value::Bool(b)) => f64::from(u8::from(b)),
        Some(Value::Str(text)) => text
            .trim()
            .parse()
            .map_err(|_| {
                errors::value_error(format!("could not convert string to float: '{text}'"))
            })?,
        Some(other) => {
            return Err(errors::type_error(format!(
                "float() argument must be a number or string, not {}",
                other.type_name()
            )))
        }
    };
    this.set_property(VALUE, Value::Float(x));
    Ok(Value::Null)
}

fn float_str(_: &TypeRegistry, this: &ObjRef, _: &[Value]) -> AilResult<Value> {
    let x = match this.value() {
        Some(Value::Float(x)) => x,
        _ => 0.0,
    };
    Ok(Value::Str(format_float(x)))
}
