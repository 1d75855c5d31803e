//! Type descriptors.
//!
//! A descriptor names a type, tags its category, and carries the slot table
//! the dispatch protocol resolves against. [`TypeBuilder::build`] merges the
//! canonical defaults into every table, so dispatch of `init`, `str`, `eq`,
//! `equals`, `getattr` and `setattr` always finds a handler.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::builtins::defaults;
use crate::{ObjRef, Slot, SlotFn, SlotTable};

/// Shared handle to a type descriptor.
pub type TypeRef = Arc<TypeDescriptor>;

/// Category tag of a type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    Type,
    Null,
    Bool,
    Integer,
    Float,
    Complex,
    String,
    Array,
    Module,
    Struct,
    Function,
    Wrapper,
}

/// A named method installed on every new object of a type.
#[derive(Clone)]
pub enum Method {
    /// Bound to the receiver when the object is constructed.
    Native(SlotFn),
    /// An existing callable object, installed unbound.
    Shared(ObjRef),
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Native(_) => f.write_str("Native"),
            Method::Shared(obj) => f.debug_tuple("Shared").field(obj).finish(),
        }
    }
}

/// Member layout of a user-declared struct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructShape {
    name: String,
    members: Vec<String>,
    protected: FxHashSet<String>,
}

impl StructShape {
    pub fn new(
        name: impl Into<String>,
        members: Vec<String>,
        protected: FxHashSet<String>,
    ) -> Self {
        StructShape {
            name: name.into(),
            members,
            protected,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared members, in declaration order.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }

    pub fn is_protected(&self, name: &str) -> bool {
        self.protected.contains(name)
    }
}

/// Runtime record describing one type.
#[derive(Debug)]
pub struct TypeDescriptor {
    name: String,
    category: TypeCategory,
    slots: SlotTable,
    /// Slots supplied by the type itself, before defaults were merged.
    overrides: Vec<Slot>,
    methods: Vec<(String, Method)>,
    shape: Option<StructShape>,
}

impl TypeDescriptor {
    pub fn builder(name: impl Into<String>, category: TypeCategory) -> TypeBuilder {
        TypeBuilder::new(name, category)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> TypeCategory {
        self.category
    }

    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    /// Whether the type supplied its own handler for `slot`.
    pub fn overrides(&self, slot: Slot) -> bool {
        self.overrides.contains(&slot)
    }

    pub fn methods(&self) -> &[(String, Method)] {
        &self.methods
    }

    pub fn shape(&self) -> Option<&StructShape> {
        self.shape.as_ref()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<AIL Type '{}'>", self.name)
    }
}

/// Builder for [`TypeDescriptor`].
pub struct TypeBuilder {
    name: String,
    category: TypeCategory,
    slots: SlotTable,
    overrides: Vec<Slot>,
    methods: Vec<(String, Method)>,
    shape: Option<StructShape>,
}

impl TypeBuilder {
    pub fn new(name: impl Into<String>, category: TypeCategory) -> Self {
        TypeBuilder {
            name: name.into(),
            category,
            slots: SlotTable::default(),
            overrides: Vec::new(),
            methods: Vec::new(),
            shape: None,
        }
    }

    /// Supply the handler for a protocol slot.
    #[must_use]
    pub fn slot(mut self, slot: Slot, handler: SlotFn) -> Self {
        self.slots.set(slot, handler);
        if !self.overrides.contains(&slot) {
            self.overrides.push(slot);
        }
        self
    }

    /// Add a native method, bound to each new object.
    #[must_use]
    pub fn method(mut self, name: &str, handler: SlotFn) -> Self {
        self.methods.push((name.to_string(), Method::Native(handler)));
        self
    }

    /// Add a shared callable object, installed unbound on each new object.
    #[must_use]
    pub fn shared_method(mut self, name: &str, callable: ObjRef) -> Self {
        self.methods.push((name.to_string(), Method::Shared(callable)));
        self
    }

    #[must_use]
    pub fn shape(mut self, shape: StructShape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Finish the descriptor, filling every canonical slot the type left
    /// empty with the default behavior.
    pub fn build(mut self) -> TypeRef {
        self.slots.set_default(Slot::Init, defaults::object_init);
        self.slots.set_default(Slot::Str, defaults::object_str);
        self.slots.set_default(Slot::Eq, defaults::object_eq);
        self.slots.set_default(Slot::Equals, defaults::object_equals);
        self.slots.set_default(Slot::GetAttr, defaults::object_getattr);
        self.slots.set_default(Slot::SetAttr, defaults::object_setattr);

        Arc::new(TypeDescriptor {
            name: self.name,
            category: self.category,
            slots: self.slots,
            overrides: self.overrides,
            methods: self.methods,
            shape: self.shape,
        })
    }
}

#[cfg(test)]
mod tests;
