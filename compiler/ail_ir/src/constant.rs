//! Entries of a code record's constants table.

use std::fmt;
use std::sync::Arc;

use crate::CodeObject;

/// A literal stored in a constants table.
///
/// Nested code (function bodies, closures) is stored as a constant of the
/// enclosing unit so the engine can build function objects from it.
#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Code(Arc<CodeObject>),
}

impl Constant {
    /// Short tag naming the constant's kind, for disassembly listings.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Constant::Null => "null",
            Constant::Bool(_) => "bool",
            Constant::Int(_) => "int",
            Constant::Float(_) => "float",
            Constant::Str(_) => "str",
            Constant::Code(_) => "code",
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Null => write!(f, "null"),
            Constant::Bool(b) => write!(f, "{b}"),
            Constant::Int(n) => write!(f, "{n}"),
            Constant::Float(x) => write!(f, "{x:?}"),
            Constant::Str(s) => write!(f, "{s:?}"),
            Constant::Code(code) => write!(f, "{code}"),
        }
    }
}
