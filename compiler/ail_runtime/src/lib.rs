//! AIL runtime support.
//!
//! Holds the process-wide [`InterpreterState`], the builtin modules, and
//! top-level error reporting. The `ail` binary is a thin driver over these.

pub mod modules;
pub mod report;
pub mod state;

use std::sync::Once;

pub use modules::{load_module, module_names};
pub use report::{check, exit_status, format_error, print_error, traceback, TraceEntry};
pub use state::{
    CollectorHandle, Frame, InterpreterConfig, InterpreterHandle, InterpreterState,
    DEFAULT_RECURSION_LIMIT, MAIN_INTERPRETER_STATE,
};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Nothing is installed unless `RUST_LOG` is
/// set, e.g. `RUST_LOG=ail_object=trace`. With `AIL_LOG_TREE=1` spans are
/// rendered as an indented tree instead of flat lines.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        let tree = std::env::var("AIL_LOG_TREE").is_ok_and(|v| v == "1");
        if tree {
            tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        }
    });
}
