//! Builtin modules.
//!
//! Each entry builds a fresh module object through the construction
//! protocol. Resolution of user modules belongs to the engine.

use ail_object::{
    make_struct, new_module_object, new_struct_object, AilError, AilResult, ErrorKind, ObjRef,
    TypeRegistry, Value,
};
use rustc_hash::FxHashMap;

type Loader = fn(&TypeRegistry) -> AilResult<ObjRef>;

const BUILTIN_MODULES: &[(&str, Loader)] = &[("_nezha", load_nezha)];

/// Names of the builtin modules.
pub fn module_names() -> impl Iterator<Item = &'static str> {
    BUILTIN_MODULES.iter().map(|(name, _)| *name)
}

/// Build the builtin module `name`.
#[tracing::instrument(level = "debug", skip(reg))]
pub fn load_module(reg: &TypeRegistry, name: &str) -> AilResult<ObjRef> {
    let Some((_, loader)) = BUILTIN_MODULES.iter().find(|(n, _)| *n == name) else {
        return Err(module_not_found(name));
    };
    loader(reg)
}

#[cold]
fn module_not_found(name: &str) -> AilError {
    AilError::new(
        ErrorKind::Custom("ModuleNotFoundError".to_string()),
        format!("no builtin module named '{name}'"),
    )
}

/// Declare a struct over the names in `members`, none protected, and
/// instantiate it with their values.
fn struct_instance(
    reg: &TypeRegistry,
    name: &str,
    members: &[(&str, Value)],
) -> AilResult<ObjRef> {
    let names = members.iter().map(|(m, _)| Value::string(*m)).collect();
    let prototype = make_struct(
        reg,
        &Value::string(name),
        &Value::List(names),
        &Value::List(Vec::new()),
    )?;
    let values = members.iter().map(|(_, v)| v.clone()).collect();
    new_struct_object(reg, &Value::Object(prototype), Some(&Value::List(values)))
}

/// Facts about the 2019 film *Nezha*.
fn load_nezha(reg: &TypeRegistry) -> AilResult<ObjRef> {
    let aobing = struct_instance(
        reg,
        "Aobing",
        &[
            ("name", Value::string("AoBing")),
            ("age", Value::string("3")),
            ("location", Value::string("龙宫")),
        ],
    )?;
    let nezha = struct_instance(
        reg,
        "NEZHA",
        &[
            ("name", Value::string("Nezha")),
            ("age", Value::Int(3)),
            ("friend", Value::Object(aobing)),
            ("location", Value::string("陈塘关")),
        ],
    )?;

    let mut namespace = FxHashMap::default();
    namespace.insert("NAME".to_string(), Value::string("Nezha"));
    namespace.insert("DATE".to_string(), Value::string("2019/7/26"));
    namespace.insert("BOX_OFFICE_IN_CHINA".to_string(), Value::string("50.13亿"));
    namespace.insert("NEZHA".to_string(), Value::Object(nezha));
    new_module_object(reg, "_nezha", namespace)
}

#[cfg(test)]
mod tests;
