//! End-to-end checks of the runtime over the builtin `_nezha` module.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::sync::Arc;

use ail_ir::CodeObject;
use ail_object::{ObjectFlags, TypeCategory, TypeRegistry, Value};
use ail_runtime::{
    check, exit_status, format_error, load_module, Frame, InterpreterState,
};
use pretty_assertions::assert_eq;

#[test]
fn nezha_struct_through_protocols() {
    let reg = TypeRegistry::new();
    let module = load_module(&reg, "_nezha").unwrap();
    assert_eq!(reg.stringify(&module).unwrap(), "<module '_nezha'>");

    let nezha = reg.get_attr(&module, "NEZHA").unwrap();
    let nezha = nezha.as_object().expect("struct object");
    assert_eq!(nezha.category(), TypeCategory::Struct);
    assert!(nezha.flags().contains(ObjectFlags::INSTANCE));
    assert_eq!(reg.stringify(nezha).unwrap(), "<struct 'NEZHA' instance>");

    let name = reg.get_attr(nezha, "name").unwrap();
    assert!(reg.equals(&name, &reg.get_attr(&module, "NAME").unwrap()));

    // Members are unprotected, so they stay writable after construction.
    reg.set_attr(nezha, "age", Value::Int(4)).unwrap();
    assert_eq!(reg.get_attr(nezha, "age").unwrap().unwrapped(), Value::Int(4));
}

#[test]
fn failed_lookup_is_reported_with_traceback() {
    let reg = TypeRegistry::new();
    let mut state = InterpreterState::default();
    let code = CodeObject::builder("<main>", "nezha.ail")
        .main(true)
        .firstlineno(1)
        .lineno_list(vec![1, 1, 2])
        .build();
    let mut frame = Frame::new(Arc::new(code));
    frame.ip = 2;
    state.push_frame(frame).unwrap();

    let module = check(&mut state, load_module(&reg, "_nezha")).unwrap();
    assert_eq!(exit_status(&state), 0);

    let missing = check(&mut state, reg.get_attr(&module, "SEQUEL"));
    assert!(missing.is_none());
    assert_eq!(exit_status(&state), 1);

    let err = state.last_error().unwrap();
    assert_eq!(
        format_error(err, state.frames()),
        "Traceback (most recent call last):\n  File 'nezha.ail', line 2, in <main>\n\
         AttributeError: module '_nezha' has no attribute 'SEQUEL'"
    );
}
