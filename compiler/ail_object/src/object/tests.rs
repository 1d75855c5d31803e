use super::*;
use crate::TypeRegistry;
use pretty_assertions::assert_eq;

fn wrapper(reg: &TypeRegistry) -> ObjRef {
    ObjRef::allocate(reg.types().wrapper.clone())
}

#[test]
fn test_identity_is_independent_of_value() {
    let reg = TypeRegistry::new();
    let a = wrapper(&reg);
    let b = wrapper(&reg);
    a.set_property(VALUE, Value::Int(1));
    b.set_property(VALUE, Value::Int(1));
    assert_ne!(a.id(), b.id());
    assert!(!a.is(&b));
    assert_ne!(a, b);
    assert_eq!(a.clone(), a);
}

#[test]
fn test_type_is_fixed_across_property_writes() {
    let reg = TypeRegistry::new();
    let obj = wrapper(&reg);
    obj.set_property("__class__", Value::string("array"));
    obj.set_property(VALUE, Value::Null);
    assert!(obj.is_instance_of(&reg.types().wrapper));
    assert_eq!(obj.type_name(), "wrapper");
}

#[test]
fn test_property_access() {
    let reg = TypeRegistry::new();
    let obj = wrapper(&reg);
    assert!(!obj.has_property("x"));
    obj.set_property("x", Value::Int(3));
    obj.set_property("a", Value::Null);
    assert_eq!(obj.property("x"), Some(Value::Int(3)));
    assert_eq!(obj.property_names(), vec!["a".to_string(), "x".to_string()]);
    assert_eq!(obj.remove_property("x"), Some(Value::Int(3)));
    assert!(!obj.has_property("x"));
}

#[test]
fn test_hash_by_identity() {
    use rustc_hash::FxHashSet;
    let reg = TypeRegistry::new();
    let a = wrapper(&reg);
    let mut set = FxHashSet::default();
    set.insert(a.clone());
    set.insert(a.clone());
    set.insert(wrapper(&reg));
    assert_eq!(set.len(), 2);
}

#[test]
fn test_weak_handle_does_not_keep_alive() {
    let reg = TypeRegistry::new();
    let obj = wrapper(&reg);
    let weak = obj.downgrade();
    assert!(weak.upgrade().is_some());
    drop(obj);
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_flags() {
    let reg = TypeRegistry::new();
    let obj = wrapper(&reg);
    assert_eq!(obj.flags(), ObjectFlags::empty());
    obj.insert_flags(ObjectFlags::INSTANCE | ObjectFlags::UNDER_CONSTRUCTION);
    obj.remove_flags(ObjectFlags::UNDER_CONSTRUCTION);
    assert_eq!(obj.flags(), ObjectFlags::INSTANCE);
}

#[test]
fn test_value_payload_in_place() {
    let reg = TypeRegistry::new();
    let obj = wrapper(&reg);
    assert_eq!(obj.with_value_mut(|_| ()), None);
    obj.set_property(VALUE, Value::List(Vec::new()));
    obj.with_value_mut(|v| {
        if let Value::List(items) = v {
            items.push(Value::Int(1));
        }
    });
    assert_eq!(obj.value(), Some(Value::List(vec![Value::Int(1)])));
}
