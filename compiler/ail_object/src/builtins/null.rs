//! The null type. Its only value is the registry's null singleton.

use crate::{
    AilResult, ObjRef, Slot, TypeCategory, TypeDescriptor, TypeRef, TypeRegistry, Value, VALUE,
};

pub(crate) fn descriptor() -> TypeRef {
    TypeDescriptor::builder("null", TypeCategory::Null)
        .slot(Slot::Init, null_init)
        .slot(Slot::Str, null_str)
        .slot(Slot::Repr, null_str)
        .slot(Slot::Eq, null_eq)
        .build()
}

fn null_init(_: &TypeRegistry, this: &ObjRef, _: &[Value]) -> AilResult<Value> {
    this.set_property(VALUE, Value::Null);
    Ok(Value::Null)
}

fn null_str(_: &TypeRegistry, _: &ObjRef, _: &[Value]) -> AilResult<Value> {
    Ok(Value::string("null"))
}

fn null_eq(reg: &TypeRegistry, _: &ObjRef, args: &[Value]) -> AilResult<Value> {
    super::require_args("__eq__", 1, args)?;
    let is_null = matches!(args[0].unwrapped(), Value::Null);
    Ok(Value::Object(reg.boolean(is_null)))
}
