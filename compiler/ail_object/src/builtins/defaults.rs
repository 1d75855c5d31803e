//! Canonical default slot handlers.
//!
//! Merged into every type descriptor that does not supply its own handler.

use crate::builtins::require_args;
use crate::{errors, AilResult, ObjRef, TypeRegistry, Value};

/// Default initializer: accepts and ignores any arguments.
pub fn object_init(_: &TypeRegistry, _: &ObjRef, _: &[Value]) -> AilResult<Value> {
    Ok(Value::Null)
}

/// Default text: `<AIL TYPE object at 0xID>`.
pub fn object_str(_: &TypeRegistry, this: &ObjRef, _: &[Value]) -> AilResult<Value> {
    Ok(Value::Str(format!(
        "<AIL {} object at {:#x}>",
        this.type_name(),
        this.id().raw()
    )))
}

/// Default equality: identity.
pub fn object_eq(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    require_args("__eq__", 1, args)?;
    Ok(Value::Bool(
        matches!(&args[0], Value::Object(other) if this.is(other)),
    ))
}

/// Default `equals`: identity, as a boxed boolean.
pub fn object_equals(reg: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    require_args("__equals__", 1, args)?;
    let same = matches!(&args[0], Value::Object(other) if this.is(other));
    Ok(Value::Object(reg.boolean(same)))
}

/// Default attribute read from the property bag.
pub fn object_getattr(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    require_args("__getattr__", 1, args)?;
    let name = attr_name(&args[0])?;
    this.property(name)
        .ok_or_else(|| errors::no_attribute(this.type_name(), name))
}

/// Default attribute write into the property bag.
pub fn object_setattr(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    require_args("__setattr__", 2, args)?;
    let name = attr_name(&args[0])?;
    this.set_property(name, args[1].clone());
    Ok(Value::Null)
}

/// The attribute name argument of `getattr`/`setattr`.
pub(crate) fn attr_name(arg: &Value) -> AilResult<&str> {
    arg.as_str().ok_or_else(|| {
        errors::type_error(format!(
            "attribute name must be string, not {}",
            arg.type_name()
        ))
    })
}
