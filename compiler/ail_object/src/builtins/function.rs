//! The function type: a host callable behind the `call` slot.
//!
//! Bound methods are function objects too; the construction protocol makes
//! one per native method of a new object.

use crate::{
    errors, AilResult, ObjRef, Slot, TypeCategory, TypeDescriptor, TypeRef, TypeRegistry, Value,
    VALUE,
};

pub(crate) fn descriptor() -> TypeRef {
    TypeDescriptor::builder("function", TypeCategory::Function)
        .slot(Slot::Init, function_init)
        .slot(Slot::Call, function_call)
        .slot(Slot::Str, function_str)
        .slot(Slot::Repr, function_str)
        .build()
}

fn function_init(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    super::require_args("function", 1, args)?;
    match args[0].unwrapped() {
        callable @ Value::Function(_) => {
            this.set_property(VALUE, callable);
            Ok(Value::Null)
        }
        other => Err(errors::wrong_arg_type(
            "function",
            "a host callable",
            other.type_name(),
        )),
    }
}

fn function_call(reg: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    match this.value() {
        Some(Value::Function(f)) => f.call(reg, args),
        _ => Err(errors::not_callable(this.type_name())),
    }
}

fn function_str(_: &TypeRegistry, this: &ObjRef, _: &[Value]) -> AilResult<Value> {
    let name = match this.value() {
        Some(Value::Function(f)) => f.name().to_string(),
        _ => "?".to_string(),
    };
    Ok(Value::Str(format!("<function '{name}'>")))
}
