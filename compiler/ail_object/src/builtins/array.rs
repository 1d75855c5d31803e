//! The array type: an ordered, mutable, zero-indexed sequence of objects.
//!
//! Elements are stored as a `Value::List` payload of object values. Searches
//! (`contains`, `count`, `remove`, `index`) compare unwrapped payloads
//! structurally and never dispatch `eq`.

use std::cell::RefCell;
use std::cmp::Ordering;

use ail_stack::ensure_sufficient_stack;
use rustc_hash::FxHashSet;

use super::{require_args, require_int_arg, single_arg};
use crate::convert::as_index;
use crate::{
    errors, AilResult, ObjRef, ObjectId, Slot, TypeCategory, TypeDescriptor, TypeRef,
    TypeRegistry, Value, VALUE,
};

pub(crate) fn descriptor() -> TypeRef {
    TypeDescriptor::builder("array", TypeCategory::Array)
        .slot(Slot::Init, array_init)
        .slot(Slot::Str, array_str)
        .slot(Slot::Repr, array_str)
        .slot(Slot::GetItem, array_getitem)
        .slot(Slot::SetItem, array_setitem)
        .slot(Slot::Len, array_len)
        .method("append", array_append)
        .method("pop", array_pop)
        .method("contains", array_contains)
        .method("count", array_count)
        .method("insert", array_insert)
        .method("remove", array_remove)
        .method("sort", array_sort)
        .method("index", array_index)
        .method("extend", array_extend)
        .method("clear", array_clear)
        .method("reverse", array_reverse)
        .method("copy", array_copy)
        .build()
}

// Element storage

fn with_items<R>(this: &ObjRef, f: impl FnOnce(&[Value]) -> R) -> AilResult<R> {
    this.with_value(|v| match v {
        Value::List(items) => Some(f(items)),
        _ => None,
    })
    .flatten()
    .ok_or_else(missing_storage)
}

fn with_items_mut<R>(this: &ObjRef, f: impl FnOnce(&mut Vec<Value>) -> R) -> AilResult<R> {
    this.with_value_mut(|v| match v {
        Value::List(items) => Some(f(items)),
        _ => None,
    })
    .flatten()
    .ok_or_else(missing_storage)
}

/// Copy of the element handles, for work that must run without the lock.
fn snapshot(this: &ObjRef) -> AilResult<Vec<Value>> {
    with_items(this, <[Value]>::to_vec)
}

#[cold]
fn missing_storage() -> crate::AilError {
    errors::runtime_error("array has no element storage")
}

/// Position of `index` if it addresses an existing element.
fn checked_position(len: usize, index: i64) -> AilResult<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(|| errors::index_out_of_range(len, index))
}

/// Position of the first element structurally equal to `target`.
fn position_of(items: &[Value], target: &Value) -> Option<usize> {
    let target = target.unwrapped();
    items.iter().position(|item| item.raw_eq(&target))
}

// Protocol slots

/// Copies the input sequence, converting each element to an object.
fn array_init(reg: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    let source = match args.first().map(Value::unwrapped) {
        None => Vec::new(),
        Some(Value::List(items)) => items,
        Some(other) => {
            return Err(errors::wrong_arg_type(
                "array",
                "a list",
                other.type_name(),
            ))
        }
    };
    let mut items = Vec::with_capacity(source.len());
    for item in &source {
        items.push(reg.to_value(item)?);
    }
    this.set_property(VALUE, Value::List(items));
    Ok(Value::Null)
}

thread_local! {
    /// Arrays currently being rendered on this thread.
    static RENDERING: RefCell<FxHashSet<ObjectId>> = RefCell::new(FxHashSet::default());
}

/// Marks an array as being rendered until dropped.
struct RenderGuard(ObjectId);

impl RenderGuard {
    /// `None` if the array is already being rendered further up the stack.
    fn enter(id: ObjectId) -> Option<Self> {
        let inserted = RENDERING.with(|set| set.borrow_mut().insert(id));
        if inserted {
            Some(RenderGuard(id))
        } else {
            None
        }
    }
}

impl Drop for RenderGuard {
    fn drop(&mut self) {
        RENDERING.with(|set| set.borrow_mut().remove(&self.0));
    }
}

/// `[a, b, c]` of each element's representation; a self-reference
/// renders as `[...]`.
fn array_str(reg: &TypeRegistry, this: &ObjRef, _: &[Value]) -> AilResult<Value> {
    let Some(_guard) = RenderGuard::enter(this.id()) else {
        return Ok(Value::string("[...]"));
    };
    let items = snapshot(this)?;
    let mut parts = Vec::with_capacity(items.len());
    for item in &items {
        parts.push(ensure_sufficient_stack(|| reg.repr_value(item))?);
    }
    Ok(Value::Str(format!("[{}]", parts.join(", "))))
}

fn array_getitem(reg: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    let index = as_index(reg, single_arg("__getitem__", args)?, "array")?;
    with_items(this, |items| {
        checked_position(items.len(), index).map(|i| items[i].clone())
    })?
}

fn array_setitem(reg: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    require_args("__setitem__", 2, args)?;
    let index = as_index(reg, &args[0], "array")?;
    let value = reg.to_value(&args[1])?;
    with_items_mut(this, |items| {
        checked_position(items.len(), index).map(|i| items[i] = value)
    })??;
    Ok(Value::Null)
}

#[allow(clippy::cast_possible_wrap, reason = "array length fits in i64")]
fn array_len(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    require_args("__len__", 0, args)?;
    with_items(this, |items| Value::Int(items.len() as i64))
}

// Methods

fn array_append(reg: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    let value = reg.to_value(single_arg("append", args)?)?;
    with_items_mut(this, |items| items.push(value))?;
    Ok(Value::Null)
}

fn array_pop(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    require_args("pop", 0, args)?;
    with_items_mut(this, Vec::pop)?
        .ok_or_else(|| errors::index_error("pop from empty array"))
}

fn array_contains(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    let target = single_arg("contains", args)?;
    let items = snapshot(this)?;
    Ok(Value::Bool(position_of(&items, target).is_some()))
}

#[allow(clippy::cast_possible_wrap, reason = "array length fits in i64")]
fn array_count(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    let target = single_arg("count", args)?.unwrapped();
    let items = snapshot(this)?;
    let count = items.iter().filter(|item| item.raw_eq(&target)).count();
    Ok(Value::Int(count as i64))
}

/// Insert before `index`, clamped to the array; negative indices count
/// from the end.
fn array_insert(reg: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    require_args("insert", 2, args)?;
    let index = require_int_arg("insert", &args[0])
        .map_err(|_| errors::type_error("array.insert(x) required an integer"))?;
    let value = reg.to_value(&args[1])?;
    with_items_mut(this, |items| {
        let len = i64::try_from(items.len()).unwrap_or(i64::MAX);
        let at = if index < 0 {
            (len + index).max(0)
        } else {
            index.min(len)
        };
        items.insert(usize::try_from(at).unwrap_or(0), value);
    })?;
    Ok(Value::Null)
}

/// Remove the first structurally equal element.
fn array_remove(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    let target = single_arg("remove", args)?;
    // Elements may alias this array, so search a snapshot rather than under
    // the write lock.
    let Some(position) = position_of(&snapshot(this)?, target) else {
        return Err(errors::value_error("array.remove(x): x not in array"));
    };
    let removed = with_items_mut(this, |items| {
        (position < items.len()).then(|| items.remove(position))
    })?;
    drop(removed);
    Ok(Value::Null)
}

/// Sort in place by raw payload.
///
/// Every element must be text, or every element a real number; anything
/// else fails with a `TypeError` and leaves the array as it was.
fn array_sort(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    require_args("sort", 0, args)?;
    let mut keyed: Vec<(Value, Value)> = snapshot(this)?
        .into_iter()
        .map(|item| (item.unwrapped(), item))
        .collect();
    let keys: Vec<&Value> = keyed.iter().map(|(key, _)| key).collect();
    let order = sort_order(&keys)?;
    keyed.sort_by(|(a, _), (b, _)| order.compare(a, b));
    let items = keyed.into_iter().map(|(_, item)| item).collect();
    this.set_property(VALUE, Value::List(items));
    Ok(Value::Null)
}

/// The ordering shared by all keys of one sort.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum SortOrder {
    Any,
    Text,
    Integer,
    Real,
}

impl SortOrder {
    fn of(key: &Value) -> Option<Self> {
        match key {
            Value::Str(_) => Some(SortOrder::Text),
            Value::Int(_) | Value::Bool(_) => Some(SortOrder::Integer),
            Value::Float(_) => Some(SortOrder::Real),
            _ => None,
        }
    }

    /// A total order over keys already checked by [`sort_order`].
    fn compare(self, a: &Value, b: &Value) -> Ordering {
        match self {
            SortOrder::Any => Ordering::Equal,
            SortOrder::Text => a.as_str().cmp(&b.as_str()),
            SortOrder::Integer => integer_key(a).cmp(&integer_key(b)),
            SortOrder::Real => real_key(a).total_cmp(&real_key(b)),
        }
    }
}

fn integer_key(key: &Value) -> i64 {
    match key {
        Value::Int(n) => *n,
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

fn real_key(key: &Value) -> f64 {
    key.as_real().unwrap_or(f64::NAN)
}

/// Find the one ordering that covers every key.
fn sort_order(keys: &[&Value]) -> AilResult<SortOrder> {
    if keys.len() < 2 {
        return Ok(SortOrder::Any);
    }
    let mut order = SortOrder::Any;
    let mut prev = keys[0];
    for &key in keys {
        let kind = SortOrder::of(key).ok_or_else(|| unorderable(prev, key))?;
        order = match (order, kind) {
            (SortOrder::Any, kind) => kind,
            (order, kind) if order == kind => order,
            (
                SortOrder::Integer | SortOrder::Real,
                SortOrder::Integer | SortOrder::Real,
            ) => SortOrder::Real,
            _ => return Err(unorderable(prev, key)),
        };
        prev = key;
    }
    Ok(order)
}

#[cold]
fn unorderable(left: &Value, right: &Value) -> crate::AilError {
    errors::type_error(format!(
        "'<' not supported between instances of '{}' and '{}'",
        left.type_name(),
        right.type_name()
    ))
}

/// Position of the first structurally equal element, or -1.
#[allow(clippy::cast_possible_wrap, reason = "array length fits in i64")]
fn array_index(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    let target = single_arg("index", args)?;
    let items = snapshot(this)?;
    let found = position_of(&items, target).map_or(-1, |i| i as i64);
    Ok(Value::Int(found))
}

/// Append every element of a list or array.
fn array_extend(reg: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    let source = match single_arg("extend", args)?.unwrapped() {
        Value::List(items) => items,
        _ => return Err(errors::type_error("array.extend(x): x must be an array")),
    };
    let mut converted = Vec::with_capacity(source.len());
    for item in &source {
        converted.push(reg.to_value(item)?);
    }
    with_items_mut(this, |items| items.extend(converted))?;
    Ok(Value::Null)
}

fn array_clear(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    require_args("clear", 0, args)?;
    // Dropped outside the lock.
    let old = with_items_mut(this, std::mem::take)?;
    drop(old);
    Ok(Value::Null)
}

fn array_reverse(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    require_args("reverse", 0, args)?;
    with_items_mut(this, |items| items.reverse())?;
    Ok(Value::Null)
}

/// Shallow copy: a raw list holding the same element objects.
fn array_copy(_: &TypeRegistry, this: &ObjRef, args: &[Value]) -> AilResult<Value> {
    require_args("copy", 0, args)?;
    snapshot(this).map(Value::List)
}

#[cfg(test)]
mod tests;
