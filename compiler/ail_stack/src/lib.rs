//! Stack growth for recursive object rendering.
//!
//! Stringifying an array walks its elements through the dispatch protocol,
//! and an element may itself be an array. Deeply nested containers would
//! otherwise exhaust the native stack long before the runtime notices.
//!
//! Wrap any protocol call that may recurse into itself with
//! [`ensure_sufficient_stack`]:
//!
//! ```text
//! fn render(reg: &TypeRegistry, obj: &ObjRef) -> AilResult<String> {
//!     ensure_sufficient_stack(|| reg.repr(obj))
//! }
//! ```
//!
//! On wasm targets the closure is called directly.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// Run `f` directly; wasm manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
