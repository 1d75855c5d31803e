//! The type registry.
//!
//! Owns the builtin type descriptors and the null/true/false singletons, and
//! records user-declared struct types by name. A registry is built once,
//! deterministically, before any conversion is requested, and every handler
//! receives it by reference.
//!
//! Most callers want the process-wide [`TypeRegistry::global`]; tests build
//! private registries with [`TypeRegistry::new`].

use std::sync::OnceLock;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::builtins::{array, boolean, complex, float, function, integer, module, null};
use crate::builtins::{string, wrapper};
use crate::construct::preinitialized;
use crate::{ObjRef, TypeRef, Value};

static GLOBAL: OnceLock<TypeRegistry> = OnceLock::new();

/// Descriptors of every builtin type.
#[derive(Debug)]
pub struct BuiltinTypes {
    pub null: TypeRef,
    pub bool: TypeRef,
    pub integer: TypeRef,
    pub float: TypeRef,
    pub complex: TypeRef,
    pub string: TypeRef,
    pub array: TypeRef,
    pub module: TypeRef,
    pub function: TypeRef,
    pub wrapper: TypeRef,
}

impl BuiltinTypes {
    fn new() -> Self {
        BuiltinTypes {
            null: null::descriptor(),
            bool: boolean::descriptor(),
            integer: integer::descriptor(),
            float: float::descriptor(),
            complex: complex::descriptor(),
            string: string::descriptor(),
            array: array::descriptor(),
            module: module::descriptor(),
            function: function::descriptor(),
            wrapper: wrapper::descriptor(),
        }
    }

    /// Look up a builtin descriptor by type name.
    pub fn by_name(&self, name: &str) -> Option<&TypeRef> {
        [
            &self.null,
            &self.bool,
            &self.integer,
            &self.float,
            &self.complex,
            &self.string,
            &self.array,
            &self.module,
            &self.function,
            &self.wrapper,
        ]
        .into_iter()
        .find(|ty| ty.name() == name)
    }
}

/// Builtin types, singletons, and declared struct types.
pub struct TypeRegistry {
    types: BuiltinTypes,
    null: ObjRef,
    true_: ObjRef,
    false_: ObjRef,
    user_types: RwLock<FxHashMap<String, TypeRef>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        let types = BuiltinTypes::new();
        let null = preinitialized(&types.function, &types.null, Value::Null);
        let true_ = preinitialized(&types.function, &types.bool, Value::Bool(true));
        let false_ = preinitialized(&types.function, &types.bool, Value::Bool(false));

        tracing::debug!(
            builtin_types = 10,
            null = null.id().raw(),
            "type registry initialized"
        );

        TypeRegistry {
            types,
            null,
            true_,
            false_,
            user_types: RwLock::new(FxHashMap::default()),
        }
    }

    /// The process-wide registry, created on first use.
    pub fn global() -> &'static TypeRegistry {
        GLOBAL.get_or_init(TypeRegistry::new)
    }

    #[inline]
    pub fn types(&self) -> &BuiltinTypes {
        &self.types
    }

    /// The null singleton.
    #[inline]
    pub fn null(&self) -> ObjRef {
        self.null.clone()
    }

    /// The true or false singleton.
    #[inline]
    pub fn boolean(&self, value: bool) -> ObjRef {
        if value {
            self.true_.clone()
        } else {
            self.false_.clone()
        }
    }

    /// Record a declared type so it can be found by name.
    ///
    /// A later declaration with the same name replaces the earlier one.
    pub fn register_type(&self, ty: TypeRef) {
        tracing::debug!(name = ty.name(), category = ?ty.category(), "registering type");
        self.user_types.write().insert(ty.name().to_string(), ty);
    }

    /// Find a builtin or declared type by name.
    pub fn type_by_name(&self, name: &str) -> Option<TypeRef> {
        if let Some(ty) = self.types.by_name(name) {
            return Some(ty.clone());
        }
        self.user_types.read().get(name).cloned()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
