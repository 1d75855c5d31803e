//! Host-value conversion.
//!
//! [`TypeRegistry::to_object`] is the single entry point for turning a raw
//! host value into an object. Null and booleans map to the registry's
//! singletons; every other raw value becomes a fresh object.

use crate::{errors, AilResult, ObjRef, TypeCategory, TypeRef, TypeRegistry, Value};

impl TypeRegistry {
    /// Convert a host value to an object.
    ///
    /// Priority: objects pass through; null and booleans become singletons;
    /// numbers, text and lists become objects of the matching builtin type;
    /// host functions become function objects; anything else is wrapped.
    pub fn to_object(&self, value: &Value) -> AilResult<ObjRef> {
        let types = self.types();
        let ty = match value {
            Value::Object(obj) => return Ok(obj.clone()),
            Value::Null => return Ok(self.null()),
            Value::Bool(b) => return Ok(self.boolean(*b)),
            Value::Int(_) => &types.integer,
            Value::Float(_) => &types.float,
            Value::Complex(_) => &types.complex,
            Value::Str(_) => &types.string,
            Value::List(_) => &types.array,
            Value::Function(_) => &types.function,
            Value::Dict(_) | Value::Opaque(_) => &types.wrapper,
        };
        self.new_object(ty, std::slice::from_ref(value))
    }

    /// Convert a host value, returning it as an object value.
    #[inline]
    pub fn to_value(&self, value: &Value) -> AilResult<Value> {
        self.to_object(value).map(Value::Object)
    }

    /// Convert numeric host values (int, float, complex) to objects.
    /// Any other value is returned unchanged.
    pub fn to_number(&self, value: Value) -> AilResult<Value> {
        match value {
            Value::Int(_) | Value::Float(_) | Value::Complex(_) => self.to_value(&value),
            other => Ok(other),
        }
    }

    /// Build an array object from any iterable host value.
    ///
    /// Lists convert element-wise, text splits into characters, and
    /// mappings yield their keys in sorted order. Returns `None` for a
    /// non-iterable value.
    pub fn convert_to_array(&self, value: &Value) -> AilResult<Option<ObjRef>> {
        let items = match value.unwrapped() {
            Value::List(items) => items,
            Value::Str(text) => text.chars().map(|c| Value::Str(c.to_string())).collect(),
            Value::Dict(map) => {
                let mut keys: Vec<String> = map.into_keys().collect();
                keys.sort_unstable();
                keys.into_iter().map(Value::Str).collect()
            }
            _ => return Ok(None),
        };
        self.new_object(&self.types().array, &[Value::List(items)])
            .map(Some)
    }

    /// Build a string object from any value through its stringifier.
    pub fn convert_to_string(&self, value: &Value) -> AilResult<ObjRef> {
        if let Value::Object(obj) = value {
            if obj.category() == TypeCategory::String {
                return Ok(obj.clone());
            }
        }
        let text = self.stringify_value(value)?;
        self.new_object(&self.types().string, &[Value::Str(text)])
    }
}

/// The raw payload of an object, or the object itself if it has none.
pub fn unwrap(obj: &ObjRef) -> Value {
    obj.value().unwrap_or_else(|| Value::Object(obj.clone()))
}

/// Whether `value` is an object constructed from one of `types`.
pub fn compare_type(value: &Value, types: &[&TypeRef]) -> bool {
    match value {
        Value::Object(obj) => types.iter().any(|ty| obj.is_instance_of(ty)),
        _ => false,
    }
}

/// Whether `value` is an object carrying property `name`.
pub fn has_attr(value: &Value, name: &str) -> bool {
    match value {
        Value::Object(obj) => obj.has_property(name),
        _ => false,
    }
}

/// Extract a raw integer from a raw or boxed integer.
///
/// Used wherever an index argument is accepted.
pub fn as_index(reg: &TypeRegistry, value: &Value, container: &str) -> AilResult<i64> {
    match value {
        Value::Int(n) => Ok(*n),
        Value::Object(obj) if obj.is_instance_of(&reg.types().integer) => match obj.value() {
            Some(Value::Int(n)) => Ok(n),
            _ => Err(errors::subscript_not_integer(container)),
        },
        _ => Err(errors::subscript_not_integer(container)),
    }
}
