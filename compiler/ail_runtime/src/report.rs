//! Top-level error reporting.
//!
//! An error that reaches the top level is printed as a traceback over the
//! live frames followed by `Kind: message`, and the process exits with
//! [`EXIT_FAILURE`].

use std::fmt::Write as _;

use ail_object::{AilError, AilResult};

use crate::state::{Frame, InterpreterState};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// One traceback line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceEntry {
    pub name: String,
    pub filename: String,
    pub line: u32,
}

impl TraceEntry {
    fn of(frame: &Frame) -> Self {
        TraceEntry {
            name: frame.code.name().to_string(),
            filename: frame.code.filename().to_string(),
            line: frame.line(),
        }
    }
}

/// Traceback entries for the live frames, most recent call last.
pub fn traceback(frames: &[Frame]) -> Vec<TraceEntry> {
    frames.iter().map(TraceEntry::of).collect()
}

/// Render `err` with a traceback over `frames`.
pub fn format_error(err: &AilError, frames: &[Frame]) -> String {
    let mut out = String::new();
    if !frames.is_empty() {
        out.push_str("Traceback (most recent call last):\n");
        for entry in traceback(frames) {
            // Writing to a String cannot fail.
            let _ = writeln!(
                out,
                "  File '{}', line {}, in {}",
                entry.filename, entry.line, entry.name
            );
        }
    }
    let _ = write!(out, "{err}");
    out
}

/// Print `err` to stderr with the state's traceback.
pub fn print_error(state: &InterpreterState, err: &AilError) {
    tracing::error!(kind = %err.kind(), depth = state.depth(), "unrecovered error");
    eprintln!("{}", format_error(err, state.frames()));
}

/// Pass a success through; record and print a failure.
pub fn check<T>(state: &mut InterpreterState, result: AilResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            print_error(state, &err);
            state.push_error(err);
            None
        }
    }
}

/// Exit status for the state: failure while any error is pending.
pub fn exit_status(state: &InterpreterState) -> i32 {
    if state.has_errors() {
        EXIT_FAILURE
    } else {
        EXIT_SUCCESS
    }
}

#[cfg(test)]
mod tests;
