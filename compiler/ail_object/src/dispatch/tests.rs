use super::*;
use crate::{HostFunction, TypeCategory, TypeDescriptor};
use pretty_assertions::assert_eq;

fn eq_fails(_: &TypeRegistry, _: &ObjRef, _: &[Value]) -> AilResult<Value> {
    Err(errors::runtime_error("boom"))
}

fn eq_payloadless(reg: &TypeRegistry, _: &ObjRef, _: &[Value]) -> AilResult<Value> {
    let ty = TypeDescriptor::builder("marker", TypeCategory::Type).build();
    reg.new_object(&ty, &[]).map(Value::Object)
}

fn eq_false_int(_: &TypeRegistry, _: &ObjRef, _: &[Value]) -> AilResult<Value> {
    Ok(Value::Int(0))
}

fn object_with_eq(reg: &TypeRegistry, handler: SlotFn) -> ObjRef {
    let ty = TypeDescriptor::builder("probe", TypeCategory::Type)
        .slot(Slot::Eq, handler)
        .build();
    match reg.new_object(&ty, &[]) {
        Ok(obj) => obj,
        Err(err) => panic!("construction failed: {err}"),
    }
}

#[test]
fn test_missing_slot_is_type_error() {
    let reg = TypeRegistry::new();
    let null = reg.null();
    let result = reg.dispatch(&null, Slot::GetItem, &[Value::Int(0)]);
    assert_eq!(
        result.err(),
        Some(errors::slot_not_supported(Slot::GetItem, "null"))
    );
}

#[test]
fn test_equals_interpretation() {
    let reg = TypeRegistry::new();
    let failing = Value::Object(object_with_eq(&reg, eq_fails));
    let payloadless = Value::Object(object_with_eq(&reg, eq_payloadless));
    let falsy = Value::Object(object_with_eq(&reg, eq_false_int));

    // A failing handler means "not equal", never an error.
    assert!(!reg.equals(&failing, &failing));
    // An object result without a payload counts as equal.
    assert!(reg.equals(&payloadless, &Value::Int(5)));
    // Raw results count through truthiness.
    assert!(!reg.equals(&falsy, &falsy));
}

#[test]
fn test_equals_default_is_identity() {
    let reg = TypeRegistry::new();
    let ty = TypeDescriptor::builder("plain", TypeCategory::Type).build();
    let (Ok(a), Ok(b)) = (reg.new_object(&ty, &[]), reg.new_object(&ty, &[])) else {
        panic!("construction failed");
    };
    assert!(reg.equals(&Value::Object(a.clone()), &Value::Object(a.clone())));
    assert!(!reg.equals(&Value::Object(a), &Value::Object(b)));
}

#[test]
fn test_equals_raw_values_are_structural() {
    let reg = TypeRegistry::new();
    assert!(reg.equals(&Value::Int(2), &Value::Float(2.0)));
    assert!(!reg.equals(&Value::string("a"), &Value::string("b")));
}

#[test]
fn test_equals_boxed_boolean_result() {
    let reg = TypeRegistry::new();
    let (Ok(a), Ok(b)) = (
        reg.to_value(&Value::string("abc")),
        reg.to_value(&Value::string("abc")),
    ) else {
        panic!("conversion failed");
    };
    assert!(reg.equals(&a, &b));
    assert!(!reg.equals(&a, &Value::Int(1)));
}

#[test]
fn test_repr_falls_back_to_str() {
    let reg = TypeRegistry::new();
    let ty = TypeDescriptor::builder("plain", TypeCategory::Type).build();
    let Ok(obj) = reg.new_object(&ty, &[]) else {
        panic!("construction failed");
    };
    assert_eq!(reg.repr(&obj), reg.stringify(&obj));
    let text = reg.stringify(&obj).unwrap_or_default();
    assert!(text.starts_with("<AIL plain object at 0x"), "{text}");
}

#[test]
fn test_property_prefix_bypasses_slots() {
    let reg = TypeRegistry::new();
    let Ok(module) = crate::new_module_object(&reg, "m", Default::default()) else {
        panic!("construction failed");
    };
    assert_eq!(reg.set_attr(&module, "aprop_secret", Value::Int(7)), Ok(()));
    assert_eq!(module.property("secret"), Some(Value::Int(7)));
    assert_eq!(reg.get_attr(&module, "aprop_secret"), Ok(Value::Int(7)));
    // The namespace is untouched.
    assert!(reg.get_attr(&module, "secret").is_err());
    // Missing properties read as null.
    let missing = reg.get_attr(&module, "aprop_nothing");
    assert!(matches!(missing, Ok(Value::Object(o)) if o.is(&reg.null())));
}

#[test]
fn test_len_and_call() {
    let reg = TypeRegistry::new();
    let Ok(array) = reg.to_object(&Value::List(vec![Value::Int(1), Value::Int(2)])) else {
        panic!("conversion failed");
    };
    assert_eq!(reg.len(&array), Ok(2));
    assert_eq!(
        reg.call(&array, &[]).err(),
        Some(errors::not_callable("array"))
    );

    let double = HostFunction::new("double", |_, args| match args {
        [Value::Int(n)] => Ok(Value::Int(n * 2)),
        _ => Err(errors::type_error("double() takes an int")),
    });
    let Ok(callable) = reg.to_object(&Value::Function(double)) else {
        panic!("conversion failed");
    };
    assert_eq!(reg.call(&callable, &[Value::Int(21)]), Ok(Value::Int(42)));
}

#[test]
fn test_binary_op() {
    let reg = TypeRegistry::new();
    let Ok(three) = reg.to_object(&Value::Int(3)) else {
        panic!("conversion failed");
    };
    let sum = reg.binary_op(&three, Slot::Add, &Value::Int(4));
    assert_eq!(sum.map(|v| v.unwrapped()), Ok(Value::Int(7)));
    let quotient = reg.binary_op(&three, Slot::Div, &Value::Int(0));
    assert_eq!(quotient.err(), Some(errors::division_by_zero()));
}

#[test]
fn test_dispatch_value_converts_raw_receivers() {
    let reg = TypeRegistry::new();
    let text = reg.dispatch_value(&Value::Float(2.5), Slot::Str, &[]);
    assert_eq!(text, Ok(Value::string("2.5")));
    let product = reg
        .dispatch_value(&Value::string("ab"), Slot::Mul, &[Value::Int(2)])
        .map(|v| v.unwrapped());
    assert_eq!(product, Ok(Value::string("abab")));
    assert_eq!(
        reg.dispatch_value(&Value::Int(1), Slot::GetItem, &[Value::Int(0)]).err(),
        Some(errors::slot_not_supported(Slot::GetItem, "integer"))
    );
}
