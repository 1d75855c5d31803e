//! Objects: an identity token, a fixed type and a bag of named properties.
//!
//! An object's type is stamped once at allocation and has no setter. Its
//! property map is exclusively owned and guarded by a per-object lock; the
//! lock is only held for the duration of a single read or write, never while
//! a slot handler runs.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use bitflags::bitflags;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{TypeCategory, TypeRef, Value};

/// Property holding the unwrapped primitive payload of value-like types.
pub const VALUE: &str = "__value__";

/// Property holding the declared name of modules and struct shapes.
pub const NAME: &str = "__name__";

/// Property holding a module's attribute namespace.
pub const NAMESPACE: &str = "__namespace__";

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity token, independent of any stored value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    fn fresh() -> Self {
        ObjectId(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

bitflags! {
    /// Lifecycle flags of an object.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ObjectFlags: u8 {
        /// A struct instance, as opposed to a struct prototype.
        const INSTANCE = 1 << 0;
        /// Inside the struct member assignment window.
        const UNDER_CONSTRUCTION = 1 << 1;
    }
}

struct ObjectState {
    properties: FxHashMap<String, Value>,
    flags: ObjectFlags,
}

struct ObjectInner {
    id: ObjectId,
    ty: TypeRef,
    state: RwLock<ObjectState>,
}

/// Shared handle to an object.
///
/// Equality and hashing are by identity.
#[derive(Clone)]
pub struct ObjRef(Arc<ObjectInner>);

impl ObjRef {
    /// Allocate a bare object of `ty`. Only the construction protocol calls
    /// this; everything else receives fully initialized objects.
    pub(crate) fn allocate(ty: TypeRef) -> Self {
        ObjRef(Arc::new(ObjectInner {
            id: ObjectId::fresh(),
            ty,
            state: RwLock::new(ObjectState {
                properties: FxHashMap::default(),
                flags: ObjectFlags::empty(),
            }),
        }))
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.0.id
    }

    #[inline]
    pub fn type_descriptor(&self) -> &TypeRef {
        &self.0.ty
    }

    #[inline]
    pub fn type_name(&self) -> &str {
        self.0.ty.name()
    }

    #[inline]
    pub fn category(&self) -> TypeCategory {
        self.0.ty.category()
    }

    /// Whether this object was constructed from exactly `ty`.
    pub fn is_instance_of(&self, ty: &TypeRef) -> bool {
        Arc::ptr_eq(&self.0.ty, ty)
    }

    /// Identity comparison.
    #[inline]
    pub fn is(&self, other: &ObjRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn property(&self, name: &str) -> Option<Value> {
        self.0.state.read().properties.get(name).cloned()
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.0.state.read().properties.contains_key(name)
    }

    pub fn set_property(&self, name: impl Into<String>, value: Value) {
        self.0.state.write().properties.insert(name.into(), value);
    }

    pub fn remove_property(&self, name: &str) -> Option<Value> {
        self.0.state.write().properties.remove(name)
    }

    /// Property names in sorted order.
    pub fn property_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.state.read().properties.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Snapshot of the whole property map.
    pub(crate) fn properties(&self) -> FxHashMap<String, Value> {
        self.0.state.read().properties.clone()
    }

    /// The `__value__` payload, if any.
    #[inline]
    pub fn value(&self) -> Option<Value> {
        self.property(VALUE)
    }

    /// Read a property in place, without cloning it.
    ///
    /// The closure runs under the read lock, so it must not touch this object
    /// (or dispatch through the registry) itself.
    pub(crate) fn with_property<R>(&self, name: &str, f: impl FnOnce(&Value) -> R) -> Option<R> {
        self.0.state.read().properties.get(name).map(f)
    }

    /// Mutate a property in place. Same restriction as
    /// [`ObjRef::with_property`], under the write lock.
    pub(crate) fn with_property_mut<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut Value) -> R,
    ) -> Option<R> {
        self.0.state.write().properties.get_mut(name).map(f)
    }

    #[inline]
    pub(crate) fn with_value<R>(&self, f: impl FnOnce(&Value) -> R) -> Option<R> {
        self.with_property(VALUE, f)
    }

    #[inline]
    pub(crate) fn with_value_mut<R>(&self, f: impl FnOnce(&mut Value) -> R) -> Option<R> {
        self.with_property_mut(VALUE, f)
    }

    pub fn flags(&self) -> ObjectFlags {
        self.0.state.read().flags
    }

    pub(crate) fn insert_flags(&self, flags: ObjectFlags) {
        self.0.state.write().flags.insert(flags);
    }

    pub(crate) fn remove_flags(&self, flags: ObjectFlags) {
        self.0.state.write().flags.remove(flags);
    }

    pub fn downgrade(&self) -> WeakObjRef {
        WeakObjRef(Arc::downgrade(&self.0))
    }
}

impl PartialEq for ObjRef {
    fn eq(&self, other: &Self) -> bool {
        self.is(other)
    }
}

impl Eq for ObjRef {}

impl Hash for ObjRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<object '{}' #{}>", self.type_name(), self.0.id.raw())
    }
}

/// Non-owning handle; does not keep the object alive.
#[derive(Clone, Debug)]
pub struct WeakObjRef(Weak<ObjectInner>);

impl WeakObjRef {
    pub fn upgrade(&self) -> Option<ObjRef> {
        self.0.upgrade().map(ObjRef)
    }
}

#[cfg(test)]
mod tests;
