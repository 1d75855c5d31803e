//! AIL IR - Compiled-code records for the AIL runtime.
//!
//! The front end lowers each compiled unit (module body, function, closure)
//! into a [`CodeObject`]; the execution engine walks it. Nothing in this crate
//! interprets bytecode: it is the data contract between the two.
//!
//! # Immutability
//!
//! A `CodeObject` is immutable once built, with one exception: the list of
//! outer closure cells, which the engine fills in at most once after creation
//! and only for code flagged as a closure.

mod code;
mod constant;

pub use code::{ArgCount, ClosureCell, ClosureError, CodeObject, CodeObjectBuilder};
pub use constant::Constant;
