use super::*;
use crate::{AilResult, TypeRegistry, Value};
use pretty_assertions::assert_eq;

fn custom_str(_: &TypeRegistry, _: &ObjRef, _: &[Value]) -> AilResult<Value> {
    Ok(Value::string("custom"))
}

#[test]
fn test_build_merges_canonical_defaults() {
    let ty = TypeDescriptor::builder("point", TypeCategory::Type).build();
    for slot in [
        Slot::Init,
        Slot::Str,
        Slot::Eq,
        Slot::Equals,
        Slot::GetAttr,
        Slot::SetAttr,
    ] {
        assert!(ty.slots().contains(slot), "missing default {slot}");
        assert!(!ty.overrides(slot));
    }
    assert!(!ty.slots().contains(Slot::GetItem));
    assert!(!ty.slots().contains(Slot::Repr));
}

#[test]
fn test_override_wins_over_default() {
    let ty = TypeDescriptor::builder("point", TypeCategory::Type)
        .slot(Slot::Str, custom_str)
        .build();
    assert!(ty.overrides(Slot::Str));
    let reg = TypeRegistry::new();
    let obj = reg.new_object(&ty, &[]);
    let text = obj.and_then(|obj| reg.stringify(&obj));
    assert_eq!(text, Ok("custom".to_string()));
}

#[test]
fn test_methods_keep_declaration_order() {
    let ty = TypeDescriptor::builder("point", TypeCategory::Type)
        .method("b", custom_str)
        .method("a", custom_str)
        .build();
    let names: Vec<&str> = ty.methods().iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["b", "a"]);
}

#[test]
fn test_display() {
    let ty = TypeDescriptor::builder("point", TypeCategory::Type).build();
    assert_eq!(ty.to_string(), "<AIL Type 'point'>");
}

#[test]
fn test_struct_shape_membership() {
    let shape = StructShape::new(
        "P",
        vec!["x".to_string(), "y".to_string()],
        ["y".to_string()].into_iter().collect(),
    );
    assert!(shape.has_member("x"));
    assert!(!shape.has_member("z"));
    assert!(shape.is_protected("y"));
    assert!(!shape.is_protected("x"));
    assert_eq!(shape.members(), ["x".to_string(), "y".to_string()]);
}
