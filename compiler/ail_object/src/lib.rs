//! AIL object layer.
//!
//! Runtime values are objects: an identity, a fixed type descriptor, and a
//! bag of named properties. Everything an object can do is resolved through
//! its type's slot table:
//!
//! - **Construction**: [`TypeRegistry::new_object`] allocates, installs
//!   methods, and runs the initializer.
//! - **Dispatch**: [`TypeRegistry::dispatch`] and its typed helpers
//!   (`equals`, `stringify`, `get_item`, `get_attr`, ...).
//! - **Conversion**: [`TypeRegistry::to_object`] turns host values into
//!   objects, reusing the null/true/false singletons.
//!
//! The builtin types (array, string, module, struct and the scalars) live in
//! [`builtins`] and are implemented entirely through those protocols.

pub mod builtins;
mod construct;
mod convert;
mod dispatch;
pub mod errors;
mod object;
mod registry;
mod slot;
mod types;
mod value;

pub use builtins::module::{module_attributes, module_name, new_module_object};
pub use builtins::structs::{assign_struct_members, make_struct, new_struct_object};
pub use convert::{as_index, compare_type, has_attr, unwrap};
pub use dispatch::PROPERTY_PREFIX;
pub use errors::{AilError, AilResult, ErrorKind};
pub use object::{ObjRef, ObjectFlags, ObjectId, WeakObjRef, NAME, NAMESPACE, VALUE};
pub use registry::{BuiltinTypes, TypeRegistry};
pub use slot::{Slot, SlotFn, SlotTable};
pub use types::{Method, StructShape, TypeBuilder, TypeCategory, TypeDescriptor, TypeRef};
pub use value::{format_complex, format_float, Complex, HostFn, HostFunction, Opaque, Value};
