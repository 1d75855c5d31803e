use super::*;
use crate::{make_struct, TypeCategory};
use pretty_assertions::assert_eq;

#[test]
fn test_singletons_are_identity_stable() {
    let reg = TypeRegistry::new();
    assert!(reg.null().is(&reg.null()));
    assert!(reg.boolean(true).is(&reg.boolean(true)));
    assert!(reg.boolean(false).is(&reg.boolean(false)));
    assert!(!reg.boolean(true).is(&reg.boolean(false)));
    assert_eq!(reg.boolean(true).value(), Some(Value::Bool(true)));
    assert_eq!(reg.null().value(), Some(Value::Null));
}

#[test]
fn test_global_is_initialized_once() {
    let a = TypeRegistry::global();
    let b = TypeRegistry::global();
    assert!(std::ptr::eq(a, b));
    assert!(a.null().is(&b.null()));
}

#[test]
fn test_builtin_lookup_by_name() {
    let reg = TypeRegistry::new();
    let names = [
        ("null", TypeCategory::Null),
        ("bool", TypeCategory::Bool),
        ("integer", TypeCategory::Integer),
        ("float", TypeCategory::Float),
        ("complex", TypeCategory::Complex),
        ("string", TypeCategory::String),
        ("array", TypeCategory::Array),
        ("module", TypeCategory::Module),
        ("function", TypeCategory::Function),
        ("wrapper", TypeCategory::Wrapper),
    ];
    for (name, category) in names {
        let ty = reg.type_by_name(name);
        assert_eq!(ty.map(|ty| ty.category()), Some(category), "{name}");
    }
    assert!(reg.type_by_name("point").is_none());
}

#[test]
fn test_declared_struct_is_registered() {
    let reg = TypeRegistry::new();
    let proto = make_struct(
        &reg,
        &Value::string("Point"),
        &Value::List(vec![Value::string("x")]),
        &Value::List(Vec::new()),
    );
    assert!(proto.is_ok());
    let ty = reg.type_by_name("Point");
    assert_eq!(ty.map(|ty| ty.category()), Some(TypeCategory::Struct));
}

#[test]
fn test_registries_are_independent() {
    let a = TypeRegistry::new();
    let b = TypeRegistry::new();
    assert!(!a.null().is(&b.null()));
    assert!(!std::sync::Arc::ptr_eq(&a.types().array, &b.types().array));
}
