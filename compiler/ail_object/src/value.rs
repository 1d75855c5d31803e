//! Values exchanged across the protocol boundary.
//!
//! Slot handlers, methods, constructors and property maps all traffic in
//! [`Value`]: either a host primitive or a handle to a live object. Raw values
//! become objects through the conversion layer (`TypeRegistry::to_object`).

use std::any::Any;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use ail_stack::ensure_sufficient_stack;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{AilResult, ObjRef, ObjectId, TypeRegistry};

/// Signature of a host callable.
pub type HostFn = dyn Fn(&TypeRegistry, &[Value]) -> AilResult<Value> + Send + Sync;

/// A named host callable.
///
/// Cloning shares the underlying closure; equality is identity of the closure.
#[derive(Clone)]
pub struct HostFunction {
    name: Arc<str>,
    func: Arc<HostFn>,
}

impl HostFunction {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&TypeRegistry, &[Value]) -> AilResult<Value> + Send + Sync + 'static,
    {
        HostFunction {
            name: Arc::from(name),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn call(&self, reg: &TypeRegistry, args: &[Value]) -> AilResult<Value> {
        (self.func)(reg, args)
    }

    /// Whether both handles share one closure.
    pub fn ptr_eq(&self, other: &HostFunction) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for HostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<host function {}>", self.name)
    }
}

/// Complex number payload.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const fn new(re: f64, im: f64) -> Self {
        Complex { re, im }
    }

    pub fn is_zero(self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }
}

/// Any host value without a dedicated variant.
#[derive(Clone)]
pub struct Opaque {
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Opaque {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Opaque {
            type_name: std::any::type_name::<T>(),
            inner: Arc::new(value),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &Opaque) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<opaque {}>", self.type_name)
    }
}

/// A host value or an object handle.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Complex(Complex),
    Str(String),
    List(Vec<Value>),
    Dict(FxHashMap<String, Value>),
    Function(HostFunction),
    Opaque(Opaque),
    Object(ObjRef),
}

impl Value {
    /// Create a text value.
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// Short name of the host kind, used in error messages.
    ///
    /// Objects report their type descriptor's name.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Complex(_) => "complex",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
            Value::Function(_) => "function",
            Value::Opaque(o) => o.type_name(),
            Value::Object(obj) => obj.type_name(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// The raw payload: an object's `__value__` if it has one, otherwise
    /// the value itself.
    pub fn unwrapped(&self) -> Value {
        match self {
            Value::Object(obj) => obj.value().unwrap_or_else(|| self.clone()),
            _ => self.clone(),
        }
    }

    /// Like [`Value::unwrapped`], borrowing when there is nothing to unwrap.
    fn payload(&self) -> Cow<'_, Value> {
        match self {
            Value::Object(obj) => obj.value().map_or(Cow::Borrowed(self), Cow::Owned),
            _ => Cow::Borrowed(self),
        }
    }

    /// Host truthiness.
    ///
    /// An object is truthy through its payload; an object without one is
    /// always truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
            Value::Complex(c) => !c.is_zero(),
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Dict(map) => !map.is_empty(),
            Value::Function(_) | Value::Opaque(_) => true,
            Value::Object(obj) => obj.value().map_or(true, |v| v.is_truthy()),
        }
    }

    /// Structural equality on unwrapped payloads.
    ///
    /// Numbers compare across bool, int, float and complex. Lists and dicts
    /// compare element-wise. Objects without a payload, host functions and
    /// opaque values compare by identity; an object always equals itself.
    /// A pair of objects met again while comparing their own contents is
    /// taken as equal, so self-containing arrays compare in finite time.
    pub fn raw_eq(&self, other: &Value) -> bool {
        self.eq_visiting(other, &mut FxHashSet::default())
    }

    fn eq_visiting(&self, other: &Value, seen: &mut FxHashSet<(ObjectId, ObjectId)>) -> bool {
        if let (Value::Object(a), Value::Object(b)) = (self, other) {
            if a.is(b) || !seen.insert((a.id(), b.id())) {
                return true;
            }
        }
        let lhs = self.payload();
        let rhs = other.payload();
        if let (Some(a), Some(b)) = (lhs.as_complex(), rhs.as_complex()) {
            return a == b;
        }
        match (&*lhs, &*rhs) {
            (Value::Null, Value::Null) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| {
                        ensure_sufficient_stack(|| x.eq_visiting(y, seen))
                    })
            }
            (Value::Dict(a), Value::Dict(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| {
                        b.get(k).is_some_and(|other| {
                            ensure_sufficient_stack(|| v.eq_visiting(other, seen))
                        })
                    })
            }
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Opaque(a), Value::Opaque(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.is(b),
            _ => false,
        }
    }

    /// Ordering on unwrapped payloads: numbers numerically, text lexically.
    ///
    /// Returns `None` for mixed or unordered kinds.
    pub fn raw_cmp(&self, other: &Value) -> Option<Ordering> {
        let lhs = self.unwrapped();
        let rhs = other.unwrapped();
        match (&lhs, &rhs) {
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            _ => match (lhs.as_real(), rhs.as_real()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        }
    }

    /// Real-valued view of bool, int and float payloads.
    #[allow(clippy::cast_precision_loss, reason = "numeric tower promotion")]
    pub(crate) fn as_real(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(f64::from(u8::from(*b))),
            Value::Int(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    fn as_complex(&self) -> Option<Complex> {
        match self {
            Value::Complex(c) => Some(*c),
            other => other.as_real().map(|re| Complex::new(re, 0.0)),
        }
    }
}

/// Structural equality, as [`Value::raw_eq`].
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        self.raw_eq(other)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<Complex> for Value {
    fn from(c: Complex) -> Self {
        Value::Complex(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<ObjRef> for Value {
    fn from(obj: ObjRef) -> Self {
        Value::Object(obj)
    }
}

impl From<HostFunction> for Value {
    fn from(f: HostFunction) -> Self {
        Value::Function(f)
    }
}

/// Render a float the way the language prints it: integral values keep a
/// trailing `.0`, non-finite values print as `nan`, `inf` or `-inf`.
pub fn format_float(x: f64) -> String {
    if x.is_nan() {
        "nan".to_string()
    } else if x.is_infinite() {
        let text = if x > 0.0 { "inf" } else { "-inf" };
        text.to_string()
    } else if x.fract() == 0.0 && x.abs() < 1e16 {
        format!("{x:.1}")
    } else {
        format!("{x}")
    }
}

/// Render a complex number in `(re+imj)` form, or `imj` with no real part.
pub fn format_complex(c: Complex) -> String {
    fn component(x: f64) -> String {
        if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 {
            format!("{x:.0}")
        } else {
            format_float(x)
        }
    }

    if c.re == 0.0 && !c.re.is_sign_negative() {
        return format!("{}j", component(c.im));
    }
    let sign = if c.im.is_sign_negative() { '-' } else { '+' };
    format!("({}{sign}{}j)", component(c.re), component(c.im.abs()))
}
