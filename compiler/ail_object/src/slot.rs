//! Protocol slots and the per-type slot table.

use std::fmt;

use crate::{AilResult, ObjRef, TypeRegistry, Value};

/// Handler signature shared by protocol slots and native methods.
///
/// Receives the registry, the receiver, and the call arguments.
pub type SlotFn = fn(&TypeRegistry, &ObjRef, &[Value]) -> AilResult<Value>;

/// A reserved protocol behavior a type can implement.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Init,
    Str,
    Repr,
    Eq,
    Equals,
    GetItem,
    SetItem,
    GetAttr,
    SetAttr,
    Len,
    Call,
    Add,
    Sub,
    Mul,
    Div,
}

impl Slot {
    pub const COUNT: usize = 15;

    pub const ALL: [Slot; Slot::COUNT] = [
        Slot::Init,
        Slot::Str,
        Slot::Repr,
        Slot::Eq,
        Slot::Equals,
        Slot::GetItem,
        Slot::SetItem,
        Slot::GetAttr,
        Slot::SetAttr,
        Slot::Len,
        Slot::Call,
        Slot::Add,
        Slot::Sub,
        Slot::Mul,
        Slot::Div,
    ];

    /// The reserved name of the slot.
    pub const fn dunder(self) -> &'static str {
        match self {
            Slot::Init => "__init__",
            Slot::Str => "__str__",
            Slot::Repr => "__repr__",
            Slot::Eq => "__eq__",
            Slot::Equals => "__equals__",
            Slot::GetItem => "__getitem__",
            Slot::SetItem => "__setitem__",
            Slot::GetAttr => "__getattr__",
            Slot::SetAttr => "__setattr__",
            Slot::Len => "__len__",
            Slot::Call => "__call__",
            Slot::Add => "__add__",
            Slot::Sub => "__sub__",
            Slot::Mul => "__mul__",
            Slot::Div => "__div__",
        }
    }

    /// Map a reserved name back to its slot.
    pub fn from_dunder(name: &str) -> Option<Slot> {
        Slot::ALL.into_iter().find(|slot| slot.dunder() == name)
    }

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dunder())
    }
}

/// Type-indexed table of slot handlers.
#[derive(Clone, Default)]
pub struct SlotTable {
    entries: [Option<SlotFn>; Slot::COUNT],
}

impl SlotTable {
    #[inline]
    pub fn get(&self, slot: Slot) -> Option<SlotFn> {
        self.entries[slot.index()]
    }

    #[inline]
    pub fn contains(&self, slot: Slot) -> bool {
        self.entries[slot.index()].is_some()
    }

    pub fn set(&mut self, slot: Slot, handler: SlotFn) {
        self.entries[slot.index()] = Some(handler);
    }

    /// Install `handler` only if the slot is still empty.
    pub fn set_default(&mut self, slot: Slot, handler: SlotFn) {
        self.entries[slot.index()].get_or_insert(handler);
    }

    /// Slots with a handler, in declaration order.
    pub fn filled(&self) -> impl Iterator<Item = Slot> + '_ {
        Slot::ALL.into_iter().filter(|slot| self.contains(*slot))
    }
}

impl fmt::Debug for SlotTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.filled()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn noop(_: &TypeRegistry, _: &ObjRef, _: &[Value]) -> AilResult<Value> {
        Ok(Value::Null)
    }

    #[test]
    fn test_dunder_round_trip() {
        for slot in Slot::ALL {
            assert_eq!(Slot::from_dunder(slot.dunder()), Some(slot));
        }
        assert_eq!(Slot::from_dunder("__hash__"), None);
    }

    #[test]
    fn test_all_matches_declaration_order() {
        for (i, slot) in Slot::ALL.into_iter().enumerate() {
            assert_eq!(slot.index(), i);
        }
    }

    #[test]
    fn test_set_default_keeps_override() {
        let mut table = SlotTable::default();
        assert!(!table.contains(Slot::Str));
        table.set(Slot::Str, noop);
        table.set_default(Slot::Str, noop);
        table.set_default(Slot::Len, noop);
        assert_eq!(table.filled().collect::<Vec<_>>(), vec![Slot::Str, Slot::Len]);
    }
}
