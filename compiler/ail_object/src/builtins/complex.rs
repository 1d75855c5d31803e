//! The complex type.

use super::numeric::{arith, numeric_eq, Op};
use crate::value::format_complex;
use crate::{
    errors, AilResult, Complex, ObjRef, Slot, TypeCategory, TypeDescriptor, TypeRef, TypeRegistry,
    Value, VALUE,
};

pub(crate) fn descriptor() -> TypeRef {
    TypeDescriptor::builder("complex", TypeCategory::Complex)
        .slot(Slot::Init, complex_init)
        .slot(Slot::Str, complex_str)
        .slot(Slot::Repr, complex_str)
        .slot(Slot::Eq, numeric_eq)
        .slot(Slot::Add, |reg, this, args| arith(reg, Op::Add, this, args))
        .slot(Slot::Sub, |reg, this, args| arith(reg, Op::Sub, this, args))
        .slot(Slot::Mul, |reg, this, args| arith(reg, Op::Mul, this, args))
        .slot(Slot::Div, |reg, this, args| arith(reg, Op::Div, this, args))
        .build()
}

/// Accepts a complex payload, or real and imaginary parts.
fn complex_init(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    let c = match args {
        [] => Complex::default(),
        [single] => match single.unwrapped() {
            Value::Complex(c) => c,
            other => Complex::new(real_part(&other)?, 0.0),
        },
        [re, im] => Complex::new(real_part(&re.unwrapped())?, real_part(&im.unwrapped())?),
        _ => {
            return Err(errors::type_error(format!(
                "complex() takes at most 2 arguments ({} given)",
                args.len()
            )))
        }
    };
    this.set_property(VALUE, Value::Complex(c));
    Ok(Value::Null)
}

#[allow(clippy::cast_precision_loss, reason = "integer to float promotion")]
fn real_part(value: &Value) -> AilResult<f64> {
    match value {
        Value::Int(n) => Ok(*n as f64),
        Value::Float(x) => Ok(*x),
        Value::Bool(b) => Ok(f64::from(u8::from(*b))),
        other => Err(errors::type_error(format!(
            "complex() argument must be a number, not {}",
            other.type_name()
        ))),
    }
}

fn complex_str(_: &TypeRegistry, this: &ObjRef, _: &[Value]) -> AilResult<Value> {
    let c = match this.value() {
        Some(Value::Complex(c)) => c,
        _ => Complex::default(),
    };
    Ok(Value::Str(format_complex(c)))
}
