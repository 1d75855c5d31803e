//! Error values for the object layer.
//!
//! Every protocol slot and builtin method that can fail returns an
//! [`AilError`] in place of its normal result. Errors carry an open-ended
//! [`ErrorKind`] tag plus a human-readable message, which is all the top-level
//! reporter needs to format a diagnostic.
//!
//! Factory functions below are the public API for building errors; they keep
//! message wording consistent across the builtin types.

use std::fmt;

use crate::Slot;

/// Result of any protocol or method call.
pub type AilResult<T = crate::Value> = Result<T, AilError>;

/// Category tag of an error.
///
/// The set is open: [`ErrorKind::Custom`] carries any other kind name, so
/// scripts and host modules can raise their own kinds.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TypeError,
    IndexError,
    ValueError,
    AttributeError,
    ZeroDivisionError,
    RuntimeError,
    Custom(String),
}

impl ErrorKind {
    /// The kind name as it appears in diagnostics.
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKind::TypeError => "TypeError",
            ErrorKind::IndexError => "IndexError",
            ErrorKind::ValueError => "ValueError",
            ErrorKind::AttributeError => "AttributeError",
            ErrorKind::ZeroDivisionError => "ZeroDivisionError",
            ErrorKind::RuntimeError => "RuntimeError",
            ErrorKind::Custom(name) => name,
        }
    }

    /// Parse a kind name, mapping unknown names to `Custom`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "TypeError" => ErrorKind::TypeError,
            "IndexError" => ErrorKind::IndexError,
            "ValueError" => ErrorKind::ValueError,
            "AttributeError" => ErrorKind::AttributeError,
            "ZeroDivisionError" => ErrorKind::ZeroDivisionError,
            "RuntimeError" => ErrorKind::RuntimeError,
            other => ErrorKind::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A first-class runtime error value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct AilError {
    kind: ErrorKind,
    message: String,
}

impl AilError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check the error's kind.
    #[inline]
    pub fn is(&self, kind: &ErrorKind) -> bool {
        &self.kind == kind
    }
}

// Generic Kinds

#[cold]
pub fn type_error(message: impl Into<String>) -> AilError {
    AilError::new(ErrorKind::TypeError, message)
}

#[cold]
pub fn index_error(message: impl Into<String>) -> AilError {
    AilError::new(ErrorKind::IndexError, message)
}

#[cold]
pub fn value_error(message: impl Into<String>) -> AilError {
    AilError::new(ErrorKind::ValueError, message)
}

#[cold]
pub fn attribute_error(message: impl Into<String>) -> AilError {
    AilError::new(ErrorKind::AttributeError, message)
}

#[cold]
pub fn runtime_error(message: impl Into<String>) -> AilError {
    AilError::new(ErrorKind::RuntimeError, message)
}

// Dispatch Errors

/// The receiver's type does not implement a protocol slot.
#[cold]
pub fn slot_not_supported(slot: Slot, type_name: &str) -> AilError {
    type_error(format!(
        "'{type_name}' object does not support '{}'",
        slot.dunder()
    ))
}

/// A slot handler returned something other than text from `__str__`/`__repr__`.
#[cold]
pub fn non_text_result(slot: Slot, got: &str) -> AilError {
    type_error(format!("{} returned non-string (type {got})", slot.dunder()))
}

/// A bound method was called after its receiver was reclaimed.
#[cold]
pub fn receiver_released(method: &str) -> AilError {
    runtime_error(format!("receiver of bound method '{method}' no longer exists"))
}

#[cold]
pub fn not_callable(type_name: &str) -> AilError {
    type_error(format!("'{type_name}' object is not callable"))
}

// Argument Errors

#[cold]
pub fn wrong_arg_count(method: &str, expected: usize, got: usize) -> AilError {
    let word = if expected == 1 { "argument" } else { "arguments" };
    type_error(format!("{method}() takes {expected} {word} ({got} given)"))
}

#[cold]
pub fn wrong_arg_type(method: &str, expected: &str, got: &str) -> AilError {
    type_error(format!("{method}() requires {expected}, not {got}"))
}

// Index and Attribute Errors

/// Index at or beyond the current length (or negative).
#[cold]
pub fn index_out_of_range(len: usize, index: i64) -> AilError {
    index_error(format!("index out of range (len {len}, index {index})"))
}

/// Subscript was neither a raw nor a boxed integer.
#[cold]
pub fn subscript_not_integer(type_name: &str) -> AilError {
    type_error(format!("{type_name} subscript index must be integer."))
}

#[cold]
pub fn no_attribute(type_name: &str, attr: &str) -> AilError {
    attribute_error(format!("'{type_name}' object has no attribute '{attr}'"))
}

// Arithmetic Errors

#[cold]
pub fn division_by_zero() -> AilError {
    AilError::new(ErrorKind::ZeroDivisionError, "division by zero")
}

#[cold]
pub fn integer_overflow(operation: &str) -> AilError {
    runtime_error(format!("integer overflow in {operation}"))
}

/// A result would be larger than the runtime will allocate.
#[cold]
pub fn memory_error(message: impl Into<String>) -> AilError {
    AilError::new(ErrorKind::Custom("MemoryError".to_string()), message)
}

#[cold]
pub fn unsupported_operand(op: &str, left: &str, right: &str) -> AilError {
    type_error(format!(
        "unsupported operand type(s) for {op}: '{left}' and '{right}'"
    ))
}
