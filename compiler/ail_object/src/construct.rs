//! The construction protocol.
//!
//! Every object comes out of [`TypeRegistry::new_object`]:
//!
//! 1. allocate a fresh object and stamp its type;
//! 2. install the type's methods, binding native ones to the new object;
//! 3. run the initializer with the construction arguments;
//! 4. on initializer failure, drop the object and return the error.
//!
//! Protocol slots are not copied onto the object; dispatch resolves them
//! through the descriptor's slot table.

use crate::{AilResult, HostFunction, Method, ObjRef, Slot, SlotFn, TypeRef, TypeRegistry, Value};
use crate::{errors, VALUE};

impl TypeRegistry {
    /// Construct a fully initialized object of `ty`.
    #[tracing::instrument(level = "trace", skip_all, fields(ty = ty.name(), argc = args.len()))]
    pub fn new_object(&self, ty: &TypeRef, args: &[Value]) -> AilResult<ObjRef> {
        let obj = allocate(&self.types().function, ty);
        if let Some(init) = ty.slots().get(Slot::Init) {
            if let Err(err) = init(self, &obj, args) {
                tracing::trace!(error = %err, "initializer failed; discarding object");
                return Err(err);
            }
        }
        Ok(obj)
    }
}

/// Allocate an object of `ty` with its methods installed.
///
/// `function_type` is the descriptor used for bound-method objects.
fn allocate(function_type: &TypeRef, ty: &TypeRef) -> ObjRef {
    let obj = ObjRef::allocate(ty.clone());
    for (name, method) in ty.methods() {
        let installed = match method {
            Method::Native(handler) => bind_method(function_type, &obj, name, *handler),
            Method::Shared(callable) => Value::Object(callable.clone()),
        };
        obj.set_property(name.as_str(), installed);
    }
    obj
}

/// Construct an object whose payload is known to be valid, skipping the
/// initializer. Used for the registry's singletons and for bound methods.
pub(crate) fn preinitialized(function_type: &TypeRef, ty: &TypeRef, payload: Value) -> ObjRef {
    let obj = allocate(function_type, ty);
    obj.set_property(VALUE, payload);
    obj
}

/// Wrap `handler` as a callable object with its receiver fixed to `receiver`.
///
/// The receiver is held weakly: an object owns its bound methods, so a strong
/// back-reference would keep both alive forever.
fn bind_method(function_type: &TypeRef, receiver: &ObjRef, name: &str, handler: SlotFn) -> Value {
    let weak = receiver.downgrade();
    let qualified = format!("{}.{name}", receiver.type_name());
    let callable = HostFunction::new(name, move |reg, args| {
        let Some(this) = weak.upgrade() else {
            tracing::warn!(
                method = %qualified,
                "bound method called after its receiver was dropped"
            );
            return Err(errors::receiver_released(&qualified));
        };
        handler(reg, &this, args)
    });
    Value::Object(preinitialized(
        function_type,
        function_type,
        Value::Function(callable),
    ))
}
