//! The wrapper type: carries host values that have no dedicated type
//! (mappings and opaque values) as an object payload.

use crate::{
    AilResult, ObjRef, Slot, TypeCategory, TypeDescriptor, TypeRef, TypeRegistry, Value, VALUE,
};

pub(crate) fn descriptor() -> TypeRef {
    TypeDescriptor::builder("wrapper", TypeCategory::Wrapper)
        .slot(Slot::Init, wrapper_init)
        .slot(Slot::Str, wrapper_str)
        .build()
}

fn wrapper_init(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    super::require_args("wrapper", 1, args)?;
    this.set_property(VALUE, args[0].clone());
    Ok(Value::Null)
}

fn wrapper_str(_: &TypeRegistry, this: &ObjRef, _: &[Value]) -> AilResult<Value> {
    let wrapped = this
        .value()
        .map_or_else(|| "null".to_string(), |v| v.type_name().to_string());
    Ok(Value::Str(format!("<AIL wrapper of '{wrapped}'>")))
}
