use std::sync::Arc;

use super::*;
use ail_ir::CodeObject;
use ail_object::errors;
use pretty_assertions::assert_eq;

fn frame(name: &str, lines: Vec<u32>, ip: usize) -> Frame {
    let code = CodeObject::builder(name, "main.ail")
        .firstlineno(1)
        .lineno_list(lines)
        .build();
    let mut frame = Frame::new(Arc::new(code));
    frame.ip = ip;
    frame
}

#[test]
fn test_format_without_frames() {
    let err = errors::value_error("array.remove(x): x not in array");
    assert_eq!(
        format_error(&err, &[]),
        "ValueError: array.remove(x): x not in array"
    );
}

#[test]
fn test_traceback_most_recent_last() {
    let frames = vec![
        frame("<main>", vec![1, 2, 3], 2),
        frame("greet", vec![7, 8], 1),
    ];
    assert_eq!(
        traceback(&frames),
        vec![
            TraceEntry {
                name: "<main>".to_string(),
                filename: "main.ail".to_string(),
                line: 3,
            },
            TraceEntry {
                name: "greet".to_string(),
                filename: "main.ail".to_string(),
                line: 8,
            },
        ]
    );

    let err = errors::attribute_error("module '_nezha' has no attribute 'AGE'");
    assert_eq!(
        format_error(&err, &frames),
        "Traceback (most recent call last):\n\
         \x20 File 'main.ail', line 3, in <main>\n\
         \x20 File 'main.ail', line 8, in greet\n\
         AttributeError: module '_nezha' has no attribute 'AGE'"
    );
}

#[test]
fn test_check_records_failures() {
    let mut state = InterpreterState::default();
    assert_eq!(check(&mut state, Ok::<_, AilError>(5)), Some(5));
    assert_eq!(exit_status(&state), EXIT_SUCCESS);

    let failed: AilResult<i32> = Err(errors::division_by_zero());
    assert_eq!(check(&mut state, failed), None);
    assert_eq!(exit_status(&state), EXIT_FAILURE);
    assert_eq!(
        state.last_error().map(ToString::to_string),
        Some("ZeroDivisionError: division by zero".to_string())
    );
}
