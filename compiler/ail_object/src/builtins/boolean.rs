//! The bool type. Conversion always yields the registry's true/false
//! singletons; constructing a bool directly is still allowed.

use crate::{
    AilResult, ObjRef, Slot, TypeCategory, TypeDescriptor, TypeRef, TypeRegistry, Value, VALUE,
};

pub(crate) fn descriptor() -> TypeRef {
    TypeDescriptor::builder("bool", TypeCategory::Bool)
        .slot(Slot::Init, bool_init)
        .slot(Slot::Str, bool_str)
        .slot(Slot::Repr, bool_str)
        .slot(Slot::Eq, bool_eq)
        .build()
}

fn bool_init(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    let truth = args.first().is_some_and(Value::is_truthy);
    this.set_property(VALUE, Value::Bool(truth));
    Ok(Value::Null)
}

fn bool_str(_: &TypeRegistry, this: &ObjRef, _: &[Value]) -> AilResult<Value> {
    let truth = this.value().is_some_and(|v| v.is_truthy());
    Ok(Value::string(if truth { "true" } else { "false" }))
}

fn bool_eq(reg: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    super::require_args("__eq__", 1, args)?;
    let equal = Value::Object(this.clone()).raw_eq(&args[0]);
    Ok(Value::Object(reg.boolean(equal)))
}
