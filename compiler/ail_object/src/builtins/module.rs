//! The module type: a named, mutable attribute namespace.

use rustc_hash::FxHashMap;

use super::defaults::attr_name;
use super::{require_args, require_str_arg};
use crate::{
    errors, AilResult, ObjRef, Slot, TypeCategory, TypeDescriptor, TypeRef, TypeRegistry, Value,
    NAME, NAMESPACE,
};

pub(crate) fn descriptor() -> TypeRef {
    TypeDescriptor::builder("module", TypeCategory::Module)
        .slot(Slot::Init, module_init)
        .slot(Slot::GetAttr, module_getattr)
        .slot(Slot::SetAttr, module_setattr)
        .slot(Slot::Str, module_str)
        .slot(Slot::Repr, module_str)
        .build()
}

/// Construct a module object named `name` over `namespace`.
pub fn new_module_object(
    reg: &TypeRegistry,
    name: &str,
    namespace: FxHashMap<String, Value>,
) -> AilResult<ObjRef> {
    reg.new_object(
        &reg.types().module,
        &[Value::string(name), Value::Dict(namespace)],
    )
}

/// The module's declared name.
pub fn module_name(this: &ObjRef) -> String {
    match this.property(NAME) {
        Some(Value::Str(name)) => name,
        _ => String::new(),
    }
}

/// Attribute names bound in the module, sorted.
pub fn module_attributes(this: &ObjRef) -> Vec<String> {
    let mut names: Vec<String> = match this.property(NAMESPACE) {
        Some(Value::Dict(namespace)) => namespace.into_keys().collect(),
        _ => Vec::new(),
    };
    names.sort_unstable();
    names
}

/// `module(name, namespace)`. Every bound value is converted to an object.
fn module_init(reg: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    let (name, namespace) = match args {
        [name] => (name, None),
        [name, namespace] => (name, Some(namespace)),
        _ => return Err(errors::wrong_arg_count("module", 2, args.len())),
    };
    let name = require_str_arg("module", name)?;

    let mut converted = FxHashMap::default();
    match namespace.map(Value::unwrapped) {
        None => {}
        Some(Value::Dict(bindings)) => {
            for (key, value) in &bindings {
                converted.insert(key.clone(), reg.to_value(value)?);
            }
        }
        Some(other) => {
            return Err(errors::wrong_arg_type("module", "a namespace mapping", other.type_name()))
        }
    }

    this.set_property(NAME, Value::Str(name));
    this.set_property(NAMESPACE, Value::Dict(converted));
    Ok(Value::Null)
}

/// Look the name up in the namespace; there is no fallback.
fn module_getattr(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    require_args("__getattr__", 1, args)?;
    let name = attr_name(&args[0])?;
    let found = this
        .with_property(NAMESPACE, |namespace| match namespace {
            Value::Dict(bindings) => bindings.get(name).cloned(),
            _ => None,
        })
        .flatten();
    found.ok_or_else(|| {
        errors::attribute_error(format!(
            "module '{}' has no attribute '{name}'",
            module_name(this)
        ))
    })
}

/// Bind the name in the namespace.
fn module_setattr(reg: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    require_args("__setattr__", 2, args)?;
    let name = attr_name(&args[0])?.to_string();
    let value = reg.to_value(&args[1])?;
    let bound = this
        .with_property_mut(NAMESPACE, |namespace| match namespace {
            Value::Dict(bindings) => {
                bindings.insert(name, value);
                true
            }
            _ => false,
        })
        .unwrap_or(false);
    if bound {
        Ok(Value::Null)
    } else {
        Err(errors::runtime_error(format!(
            "module '{}' has no namespace",
            module_name(this)
        )))
    }
}

fn module_str(_: &TypeRegistry, this: &ObjRef, _: &[Value]) -> AilResult<Value> {
    Ok(Value::Str(format!("<module '{}'>", module_name(this))))
}
