use super::*;
use crate::ErrorKind;
use pretty_assertions::assert_eq;

fn array(reg: &TypeRegistry, items: Vec<Value>) -> ObjRef {
    let Ok(obj) = reg.new_object(&reg.types().array, &[Value::List(items)]) else {
        panic!("array construction failed");
    };
    obj
}

fn call(reg: &TypeRegistry, obj: &ObjRef, method: &str, args: &[Value]) -> AilResult<Value> {
    reg.call_method(obj, method, args).map(|v| v.unwrapped())
}

fn render(reg: &TypeRegistry, obj: &ObjRef) -> String {
    match reg.stringify(obj) {
        Ok(text) => text,
        Err(err) => panic!("stringify failed: {err}"),
    }
}

#[test]
fn test_elements_are_objects() {
    let reg = TypeRegistry::new();
    let arr = array(&reg, vec![Value::Int(1), Value::Int(2), Value::string("a")]);
    assert_eq!(reg.len(&arr), Ok(3));
    assert_eq!(render(&reg, &arr), "[1, 2, 'a']");

    let Ok(Value::Object(first)) = reg.get_item(&arr, &Value::Int(0)) else {
        panic!("element should be an object");
    };
    assert!(first.is_instance_of(&reg.types().integer));
}

#[test]
fn test_init_requires_list() {
    let reg = TypeRegistry::new();
    let empty = reg.new_object(&reg.types().array, &[]);
    assert!(matches!(empty.as_ref().map(|a| reg.len(a)), Ok(Ok(0))));
    let result = reg.new_object(&reg.types().array, &[Value::Int(3)]);
    assert_eq!(
        result.err(),
        Some(crate::errors::wrong_arg_type("array", "a list", "int"))
    );
}

#[test]
fn test_bounds_checked_indexing() {
    let reg = TypeRegistry::new();
    let arr = array(&reg, vec![Value::Int(10), Value::Int(20)]);
    assert_eq!(
        reg.get_item(&arr, &Value::Int(2)).err(),
        Some(crate::errors::index_out_of_range(2, 2))
    );
    assert_eq!(
        reg.get_item(&arr, &Value::Int(-1)).err(),
        Some(crate::errors::index_out_of_range(2, -1))
    );
    assert_eq!(
        reg.get_item(&arr, &Value::Float(1.0)).err(),
        Some(crate::errors::subscript_not_integer("array"))
    );

    assert!(reg.set_item(&arr, &Value::Int(1), Value::string("b")).is_ok());
    assert_eq!(render(&reg, &arr), "[10, 'b']");
    let result = reg.set_item(&arr, &Value::Int(5), Value::Null);
    assert!(matches!(result, Err(e) if e.is(&ErrorKind::IndexError)));
    assert_eq!(render(&reg, &arr), "[10, 'b']");
}

#[test]
fn test_append_pop() {
    let reg = TypeRegistry::new();
    let arr = array(&reg, Vec::new());
    assert_eq!(
        call(&reg, &arr, "pop", &[]).err(),
        Some(crate::errors::index_error("pop from empty array"))
    );
    assert_eq!(call(&reg, &arr, "append", &[Value::Int(7)]), Ok(Value::Null));
    assert_eq!(call(&reg, &arr, "pop", &[]), Ok(Value::Int(7)));
    assert_eq!(reg.len(&arr), Ok(0));
}

#[test]
fn test_searches() {
    let reg = TypeRegistry::new();
    let arr = array(
        &reg,
        vec![Value::Int(1), Value::string("x"), Value::Int(1), Value::Float(2.0)],
    );
    assert_eq!(call(&reg, &arr, "contains", &[Value::string("x")]), Ok(Value::Bool(true)));
    assert_eq!(call(&reg, &arr, "contains", &[Value::Int(9)]), Ok(Value::Bool(false)));
    assert_eq!(call(&reg, &arr, "count", &[Value::Int(1)]), Ok(Value::Int(2)));
    assert_eq!(call(&reg, &arr, "index", &[Value::Int(2)]), Ok(Value::Int(3)));
    assert_eq!(call(&reg, &arr, "index", &[Value::Int(9)]), Ok(Value::Int(-1)));
}

#[test]
fn test_remove() {
    let reg = TypeRegistry::new();
    let arr = array(&reg, vec![Value::Int(1), Value::Int(2), Value::Int(1)]);
    assert_eq!(call(&reg, &arr, "remove", &[Value::Int(1)]), Ok(Value::Null));
    assert_eq!(render(&reg, &arr), "[2, 1]");
    assert_eq!(
        call(&reg, &arr, "remove", &[Value::Int(5)]).err(),
        Some(crate::errors::value_error("array.remove(x): x not in array"))
    );
    assert_eq!(render(&reg, &arr), "[2, 1]");
}

#[test]
fn test_insert_clamps() {
    let reg = TypeRegistry::new();
    let arr = array(&reg, vec![Value::Int(1), Value::Int(2)]);
    assert!(call(&reg, &arr, "insert", &[Value::Int(0), Value::Int(0)]).is_ok());
    assert!(call(&reg, &arr, "insert", &[Value::Int(99), Value::Int(3)]).is_ok());
    assert!(call(&reg, &arr, "insert", &[Value::Int(-1), Value::string("m")]).is_ok());
    assert_eq!(render(&reg, &arr), "[0, 1, 2, 'm', 3]");
    assert_eq!(
        call(&reg, &arr, "insert", &[Value::string("0"), Value::Int(0)]).err(),
        Some(crate::errors::type_error("array.insert(x) required an integer"))
    );
}

#[test]
fn test_sort_reverse_extend_clear() {
    let reg = TypeRegistry::new();
    let arr = array(&reg, vec![Value::Int(3), Value::Float(1.5), Value::Int(2)]);
    assert!(call(&reg, &arr, "sort", &[]).is_ok());
    assert_eq!(render(&reg, &arr), "[1.5, 2, 3]");
    assert!(call(&reg, &arr, "reverse", &[]).is_ok());
    assert_eq!(render(&reg, &arr), "[3, 2, 1.5]");

    let other = array(&reg, vec![Value::string("z")]);
    assert!(call(&reg, &arr, "extend", &[Value::Object(other)]).is_ok());
    assert_eq!(render(&reg, &arr), "[3, 2, 1.5, 'z']");
    assert_eq!(
        call(&reg, &arr, "extend", &[Value::Int(1)]).err(),
        Some(crate::errors::type_error("array.extend(x): x must be an array"))
    );

    let result = call(&reg, &arr, "sort", &[]);
    assert!(matches!(result, Err(e) if e.is(&ErrorKind::TypeError)));
    assert_eq!(render(&reg, &arr), "[3, 2, 1.5, 'z']");

    assert!(call(&reg, &arr, "clear", &[]).is_ok());
    assert_eq!(reg.len(&arr), Ok(0));
}

#[test]
fn test_copy_is_shallow() {
    let reg = TypeRegistry::new();
    let inner = array(&reg, vec![Value::Int(1)]);
    let arr = array(&reg, vec![Value::Object(inner.clone())]);
    let Ok(Value::List(copied)) = call(&reg, &arr, "copy", &[]) else {
        panic!("copy should return a list");
    };
    assert_eq!(copied.len(), 1);
    assert!(matches!(&copied[0], Value::Object(obj) if obj.is(&inner)));
}

#[test]
fn test_self_reference_renders_ellipsis() {
    let reg = TypeRegistry::new();
    let arr = array(&reg, vec![Value::Int(1)]);
    assert!(call(&reg, &arr, "append", &[Value::Object(arr.clone())]).is_ok());
    assert_eq!(render(&reg, &arr), "[1, [...]]");
    // The guard is released once rendering finishes.
    assert_eq!(render(&reg, &arr), "[1, [...]]");
    assert!(call(&reg, &arr, "contains", &[Value::Object(arr.clone())]).is_ok());
    // Break the cycle so the test does not leak.
    assert!(call(&reg, &arr, "clear", &[]).is_ok());
}

#[test]
fn test_sort_rejects_mixed_kinds_without_reordering() {
    let reg = TypeRegistry::new();
    // A fixed pseudo-random interleaving of ints and strings.
    let mut state: u32 = 0x2545_f491;
    let items: Vec<Value> = (0..64_i64)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            if state % 3 == 0 {
                Value::string(format!("s{i}"))
            } else {
                Value::Int(64 - i)
            }
        })
        .collect();
    let arr = array(&reg, items);
    let before = render(&reg, &arr);

    let result = call(&reg, &arr, "sort", &[]);
    assert!(matches!(result, Err(e) if e.is(&ErrorKind::TypeError)));
    assert_eq!(render(&reg, &arr), before);
}

#[test]
fn test_sort_orders_ints_floats_and_nan() {
    let reg = TypeRegistry::new();
    let arr = array(
        &reg,
        vec![
            Value::Float(f64::NAN),
            Value::Int(3),
            Value::Int(1),
            Value::Float(0.5),
            Value::Float(f64::NAN),
            Value::Int(-2),
        ],
    );
    assert!(call(&reg, &arr, "sort", &[]).is_ok());
    assert_eq!(render(&reg, &arr), "[-2, 0.5, 1, 3, nan, nan]");

    let words = array(&reg, vec![Value::string("b"), Value::string("a")]);
    assert!(call(&reg, &words, "sort", &[]).is_ok());
    assert_eq!(render(&reg, &words), "['a', 'b']");

    let single = array(&reg, vec![Value::Null]);
    assert!(call(&reg, &single, "sort", &[]).is_ok());
    let pair = array(&reg, vec![Value::Null, Value::Null]);
    assert_eq!(
        call(&reg, &pair, "sort", &[]).err(),
        Some(crate::errors::type_error(
            "'<' not supported between instances of 'null' and 'null'"
        ))
    );
}

#[test]
fn test_searches_terminate_on_distinct_cycles() {
    let reg = TypeRegistry::new();
    let a = array(&reg, Vec::new());
    let b = array(&reg, Vec::new());
    assert!(call(&reg, &a, "append", &[Value::Object(a.clone())]).is_ok());
    assert!(call(&reg, &b, "append", &[Value::Object(b.clone())]).is_ok());

    assert_eq!(
        call(&reg, &a, "contains", &[Value::Object(b.clone())]),
        Ok(Value::Bool(true))
    );
    assert_eq!(call(&reg, &a, "count", &[Value::Object(b.clone())]), Ok(Value::Int(1)));
    assert_eq!(call(&reg, &a, "index", &[Value::Object(b.clone())]), Ok(Value::Int(0)));
    assert!(call(&reg, &a, "remove", &[Value::Object(b.clone())]).is_ok());
    assert_eq!(reg.len(&a), Ok(0));

    assert!(call(&reg, &b, "clear", &[]).is_ok());
}
