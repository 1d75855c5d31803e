use super::*;
use pretty_assertions::assert_eq;

fn read(reg: &TypeRegistry, obj: &ObjRef, path: &str) -> Value {
    let mut current = Value::Object(obj.clone());
    for attr in path.split('.') {
        let Value::Object(next) = current else {
            panic!("{attr}: not an object");
        };
        current = match reg.get_attr(&next, attr) {
            Ok(value) => value,
            Err(err) => panic!("{path}: {err}"),
        };
    }
    current.unwrapped()
}

#[test]
fn test_builtin_names() {
    assert_eq!(module_names().collect::<Vec<_>>(), vec!["_nezha"]);
}

#[test]
fn test_nezha_namespace() {
    let reg = TypeRegistry::new();
    let Ok(module) = load_module(&reg, "_nezha") else {
        panic!("_nezha should load");
    };
    assert_eq!(
        ail_object::module_attributes(&module),
        vec!["BOX_OFFICE_IN_CHINA", "DATE", "NAME", "NEZHA"]
    );
    assert_eq!(read(&reg, &module, "NAME"), Value::string("Nezha"));
    assert_eq!(read(&reg, &module, "DATE"), Value::string("2019/7/26"));
    assert_eq!(read(&reg, &module, "BOX_OFFICE_IN_CHINA"), Value::string("50.13亿"));
    assert_eq!(read(&reg, &module, "NEZHA.age"), Value::Int(3));
    assert_eq!(read(&reg, &module, "NEZHA.location"), Value::string("陈塘关"));
    assert_eq!(read(&reg, &module, "NEZHA.friend.name"), Value::string("AoBing"));
    assert_eq!(read(&reg, &module, "NEZHA.friend.age"), Value::string("3"));
    assert_eq!(read(&reg, &module, "NEZHA.friend.location"), Value::string("龙宫"));
}

#[test]
fn test_unknown_module() {
    let reg = TypeRegistry::new();
    let Err(err) = load_module(&reg, "_missing") else {
        panic!("unknown module should fail");
    };
    assert_eq!(err.kind(), &ErrorKind::Custom("ModuleNotFoundError".to_string()));
    assert_eq!(
        err.to_string(),
        "ModuleNotFoundError: no builtin module named '_missing'"
    );
}
