//! The dispatch protocol.
//!
//! Operations on objects resolve a [`Slot`] through the receiver's type table
//! and invoke the handler. Typed helpers here wrap the raw dispatch with the
//! result conventions each operation needs (text for `str`, a boolean for
//! equality, a count for `len`).

use crate::{errors, AilResult, ObjRef, Slot, SlotFn, TypeRegistry, Value};

/// Attribute names with this prefix bypass the attribute slots and address
/// the property bag directly.
pub const PROPERTY_PREFIX: &str = "aprop_";

impl TypeRegistry {
    /// Find the handler for `slot` on the receiver's type.
    #[inline]
    pub fn resolve(&self, obj: &ObjRef, slot: Slot) -> Option<SlotFn> {
        obj.type_descriptor().slots().get(slot)
    }

    /// Invoke `slot` on `obj`; a missing slot is a `TypeError`.
    #[tracing::instrument(level = "trace", skip(self, obj, args), fields(ty = obj.type_name()))]
    pub fn dispatch(&self, obj: &ObjRef, slot: Slot, args: &[Value]) -> AilResult<Value> {
        match self.resolve(obj, slot) {
            Some(handler) => handler(self, obj, args),
            None => Err(errors::slot_not_supported(slot, obj.type_name())),
        }
    }

    /// Invoke `slot` on any value, converting raw values to objects first.
    pub fn dispatch_value(&self, target: &Value, slot: Slot, args: &[Value]) -> AilResult<Value> {
        let obj = self.to_object(target)?;
        self.dispatch(&obj, slot, args)
    }

    /// Protocol equality.
    ///
    /// A raw receiver, or one whose type lacks `eq`, compares by identity
    /// (structural equality for two raw values). A failing handler means
    /// "not equal". An object result counts through its payload, and an
    /// object without a payload counts as equal.
    pub fn equals(&self, lhs: &Value, rhs: &Value) -> bool {
        let Value::Object(obj) = lhs else {
            return match rhs {
                Value::Object(_) => false,
                _ => lhs.raw_eq(rhs),
            };
        };
        let Some(handler) = self.resolve(obj, Slot::Eq) else {
            return matches!(rhs, Value::Object(other) if obj.is(other));
        };
        match handler(self, obj, std::slice::from_ref(rhs)) {
            Err(_) => false,
            Ok(Value::Object(result)) => result.value().map_or(true, |v| v.is_truthy()),
            Ok(raw) => raw.is_truthy(),
        }
    }

    /// Text of an object through its `str` slot.
    pub fn stringify(&self, obj: &ObjRef) -> AilResult<String> {
        let result = self.dispatch(obj, Slot::Str, &[])?;
        expect_text(Slot::Str, result)
    }

    /// Text of any value; raw values are converted first.
    pub fn stringify_value(&self, value: &Value) -> AilResult<String> {
        match value {
            Value::Str(s) => Ok(s.clone()),
            Value::Object(obj) => self.stringify(obj),
            raw => self.stringify(&self.to_object(raw)?),
        }
    }

    /// Representation of an object, falling back to `str`.
    pub fn repr(&self, obj: &ObjRef) -> AilResult<String> {
        if self.resolve(obj, Slot::Repr).is_none() {
            return self.stringify(obj);
        }
        let result = self.dispatch(obj, Slot::Repr, &[])?;
        expect_text(Slot::Repr, result)
    }

    /// Representation of any value; raw values are converted first.
    pub fn repr_value(&self, value: &Value) -> AilResult<String> {
        match value {
            Value::Object(obj) => self.repr(obj),
            raw => self.repr(&self.to_object(raw)?),
        }
    }

    pub fn get_item(&self, obj: &ObjRef, index: &Value) -> AilResult<Value> {
        self.dispatch(obj, Slot::GetItem, std::slice::from_ref(index))
    }

    pub fn set_item(&self, obj: &ObjRef, index: &Value, value: Value) -> AilResult<Value> {
        self.dispatch(obj, Slot::SetItem, &[index.clone(), value])
    }

    /// Element count through the `len` slot.
    pub fn len(&self, obj: &ObjRef) -> AilResult<usize> {
        let result = self.dispatch(obj, Slot::Len, &[])?;
        match result.unwrapped() {
            Value::Int(n) => usize::try_from(n)
                .map_err(|_| errors::value_error(format!("__len__ returned negative length {n}"))),
            other => Err(errors::type_error(format!(
                "__len__ returned non-integer (type {})",
                other.type_name()
            ))),
        }
    }

    /// Call a callable object.
    pub fn call(&self, obj: &ObjRef, args: &[Value]) -> AilResult<Value> {
        if self.resolve(obj, Slot::Call).is_none() {
            return Err(errors::not_callable(obj.type_name()));
        }
        self.dispatch(obj, Slot::Call, args)
    }

    /// Apply an arithmetic slot with `lhs` as the receiver.
    pub fn binary_op(&self, lhs: &ObjRef, slot: Slot, rhs: &Value) -> AilResult<Value> {
        self.dispatch(lhs, slot, std::slice::from_ref(rhs))
    }

    /// Read an attribute.
    ///
    /// Names starting with [`PROPERTY_PREFIX`] read the property bag directly;
    /// a missing property reads as null.
    pub fn get_attr(&self, obj: &ObjRef, name: &str) -> AilResult<Value> {
        if let Some(property) = name.strip_prefix(PROPERTY_PREFIX) {
            return Ok(obj
                .property(property)
                .unwrap_or_else(|| Value::Object(self.null())));
        }
        self.dispatch(obj, Slot::GetAttr, &[Value::string(name)])
    }

    /// Write an attribute.
    ///
    /// Names starting with [`PROPERTY_PREFIX`] write the property bag directly.
    pub fn set_attr(&self, obj: &ObjRef, name: &str, value: Value) -> AilResult<()> {
        if let Some(property) = name.strip_prefix(PROPERTY_PREFIX) {
            obj.set_property(property, value);
            return Ok(());
        }
        self.dispatch(obj, Slot::SetAttr, &[Value::string(name), value])
            .map(|_| ())
    }

    /// Call a named method installed on the object.
    pub fn call_method(&self, obj: &ObjRef, name: &str, args: &[Value]) -> AilResult<Value> {
        match self.get_attr(obj, name)? {
            Value::Object(callable) => self.call(&callable, args),
            Value::Function(f) => f.call(self, args),
            other => Err(errors::not_callable(other.type_name())),
        }
    }
}

/// Accept a handler's text result: raw text or a string-payload object.
fn expect_text(slot: Slot, result: Value) -> AilResult<String> {
    match result.unwrapped() {
        Value::Str(s) => Ok(s),
        other => Err(errors::non_text_result(slot, other.type_name())),
    }
}

#[cfg(test)]
mod tests;
