//! User-declared structs.
//!
//! [`make_struct`] declares a shape: it builds a per-shape type and returns
//! that type's prototype object. [`new_struct_object`] clones a prototype
//! through the construction protocol and, given member data, assigns the
//! members inside a construction window.
//!
//! Member data is validated and converted in full before anything is
//! written, so a failed assignment leaves the instance untouched. The window
//! flag is cleared by a guard on every exit path.

use rustc_hash::FxHashSet;

use super::defaults::attr_name;
use super::require_args;
use crate::{
    errors, AilResult, ObjRef, ObjectFlags, Slot, StructShape, TypeCategory, TypeDescriptor,
    TypeRegistry, Value, NAME,
};

/// Declare a struct shape and return its prototype.
#[tracing::instrument(level = "debug", skip_all)]
pub fn make_struct(
    reg: &TypeRegistry,
    name: &Value,
    members: &Value,
    protected: &Value,
) -> AilResult<ObjRef> {
    let Value::Str(name) = name.unwrapped() else {
        return Err(errors::type_error("struct name must be string"));
    };
    let members = member_names(members)?;
    let protected: FxHashSet<String> = member_names(protected)?.into_iter().collect();

    tracing::debug!(name = %name, members = ?members, "declaring struct");

    let shape = StructShape::new(name.clone(), members, protected);
    let ty = TypeDescriptor::builder(name, TypeCategory::Struct)
        .slot(Slot::Init, struct_init)
        .slot(Slot::GetAttr, struct_getattr)
        .slot(Slot::SetAttr, struct_setattr)
        .slot(Slot::Str, struct_str)
        .slot(Slot::Repr, struct_str)
        .shape(shape)
        .build();
    reg.register_type(ty.clone());
    reg.new_object(&ty, &[])
}

fn member_names(list: &Value) -> AilResult<Vec<String>> {
    let Value::List(items) = list.unwrapped() else {
        return Err(errors::type_error("struct members or protecteds must be list"));
    };
    items
        .iter()
        .map(|item| match item.unwrapped() {
            Value::Str(s) => Ok(s),
            other => Err(errors::type_error(format!(
                "struct member name must be string, not {}",
                other.type_name()
            ))),
        })
        .collect()
}

/// Clone a struct and optionally assign its members.
///
/// Without member data (or with null) the result is a bare prototype
/// clone. A mapping assigns the named members; a list assigns every member
/// in declaration order and must match the member count exactly.
pub fn new_struct_object(
    reg: &TypeRegistry,
    descriptor: &Value,
    attrs: Option<&Value>,
) -> AilResult<ObjRef> {
    let Value::Object(prototype) = descriptor else {
        return Err(errors::type_error("new() requires a struct"));
    };
    if prototype.type_descriptor().shape().is_none() {
        return Err(errors::type_error("new() requires a struct"));
    }

    let clone = reg.new_object(prototype.type_descriptor(), std::slice::from_ref(descriptor))?;
    match attrs.map(Value::unwrapped) {
        None | Some(Value::Null) => Ok(clone),
        Some(attrs) => {
            assign_struct_members(reg, &clone, &attrs)?;
            Ok(clone)
        }
    }
}

/// Assign member data to a struct object and flag it as an instance.
///
/// All-or-nothing: every name is checked and every value converted before
/// the first write.
pub fn assign_struct_members(reg: &TypeRegistry, obj: &ObjRef, attrs: &Value) -> AilResult<()> {
    let shape = shape_of(obj)?;
    let staged: Vec<(String, Value)> = match attrs.unwrapped() {
        Value::Dict(bindings) => bindings.into_iter().collect(),
        Value::List(values) => {
            if values.len() != shape.members().len() {
                return Err(errors::value_error(format!(
                    "struct '{}' initializing needs {} value(s)",
                    shape.name(),
                    shape.members().len()
                )));
            }
            shape.members().iter().cloned().zip(values).collect()
        }
        _ => {
            return Err(errors::value_error(format!(
                "struct '{}' initializing needs a list",
                shape.name()
            )))
        }
    };

    let window = ConstructionWindow::open(obj);
    let mut prepared = Vec::with_capacity(staged.len());
    for (name, value) in staged {
        check_member_write(shape, &name, obj.flags())?;
        prepared.push((name, reg.to_value(&value)?));
    }
    for (name, value) in prepared {
        obj.set_property(name, value);
    }
    drop(window);

    obj.insert_flags(ObjectFlags::INSTANCE);
    Ok(())
}

/// Holds `UNDER_CONSTRUCTION` on an object until dropped.
struct ConstructionWindow<'a>(&'a ObjRef);

impl<'a> ConstructionWindow<'a> {
    fn open(obj: &'a ObjRef) -> Self {
        obj.insert_flags(ObjectFlags::UNDER_CONSTRUCTION);
        ConstructionWindow(obj)
    }
}

impl Drop for ConstructionWindow<'_> {
    fn drop(&mut self) {
        self.0.remove_flags(ObjectFlags::UNDER_CONSTRUCTION);
    }
}

fn shape_of(obj: &ObjRef) -> AilResult<&StructShape> {
    obj.type_descriptor()
        .shape()
        .ok_or_else(|| errors::type_error(format!("'{}' is not a struct", obj.type_name())))
}

/// Unknown members are never writable; protected members only inside the
/// construction window.
fn check_member_write(shape: &StructShape, name: &str, flags: ObjectFlags) -> AilResult<()> {
    if !shape.has_member(name) {
        return Err(errors::attribute_error(format!(
            "struct '{}' has no member '{name}'",
            shape.name()
        )));
    }
    if shape.is_protected(name) && !flags.contains(ObjectFlags::UNDER_CONSTRUCTION) {
        return Err(errors::attribute_error(format!(
            "member '{name}' of struct '{}' is protected",
            shape.name()
        )));
    }
    Ok(())
}

/// No arguments declares the prototype; a prototype argument clones it.
fn struct_init(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    match args {
        [] => {
            let name = shape_of(this)?.name().to_string();
            this.set_property(NAME, Value::Str(name));
            Ok(Value::Null)
        }
        [Value::Object(prototype)] if prototype.is_instance_of(this.type_descriptor()) => {
            for (key, value) in prototype.properties() {
                this.set_property(key, value);
            }
            Ok(Value::Null)
        }
        _ => Err(errors::type_error(format!(
            "struct '{}' can only be created through new()",
            this.type_name()
        ))),
    }
}

/// Members read their value, or null if unset; other names fall back to
/// the property bag.
fn struct_getattr(reg: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    require_args("__getattr__", 1, args)?;
    let name = attr_name(&args[0])?;
    let shape = shape_of(this)?;
    if shape.has_member(name) {
        return Ok(this
            .property(name)
            .unwrap_or_else(|| Value::Object(reg.null())));
    }
    this.property(name).ok_or_else(|| {
        errors::attribute_error(format!(
            "struct '{}' has no member '{name}'",
            shape.name()
        ))
    })
}

fn struct_setattr(reg: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    require_args("__setattr__", 2, args)?;
    let name = attr_name(&args[0])?;
    check_member_write(shape_of(this)?, name, this.flags())?;
    let value = reg.to_value(&args[1])?;
    this.set_property(name, value);
    Ok(Value::Null)
}

fn struct_str(_: &TypeRegistry, this: &ObjRef, _: &[Value]) -> AilResult<Value> {
    let name = shape_of(this)?.name();
    let text = if this.flags().contains(ObjectFlags::INSTANCE) {
        format!("<struct '{name}' instance>")
    } else {
        format!("<struct '{name}'>")
    };
    Ok(Value::Str(text))
}
