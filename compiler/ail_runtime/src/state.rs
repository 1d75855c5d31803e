//! Process-wide interpreter state.
//!
//! The execution engine owns the contents of the frame stack and the
//! collector; this module only records them:
//!
//! - `frames`: the live call frames, most recent last. Pushing checks the
//!   configured recursion limit.
//! - `errors`: errors raised and not yet handled, most recent last.
//! - `collector` / `interpreter`: opaque handles set by the engine.
//!
//! [`MAIN_INTERPRETER_STATE`] is created on first use and shared behind a
//! mutex. Hold the guard only for short bookkeeping; never across a
//! dispatch that may itself need the state.

use std::any::Any;
use std::sync::{Arc, LazyLock};

use ail_ir::CodeObject;
use ail_object::{errors, AilError, AilResult, Opaque, Value};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

/// The interpreter state driving the process.
pub static MAIN_INTERPRETER_STATE: LazyLock<Mutex<InterpreterState>> =
    LazyLock::new(|| Mutex::new(InterpreterState::new(InterpreterConfig::default())));

/// Default maximum number of live frames.
pub const DEFAULT_RECURSION_LIMIT: usize = 1000;

/// Tunables fixed when the state is created.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Maximum frame depth, or `None` for unlimited.
    pub recursion_limit: Option<usize>,
}

impl InterpreterConfig {
    #[must_use]
    pub fn with_recursion_limit(mut self, limit: Option<usize>) -> Self {
        self.recursion_limit = limit;
        self
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            recursion_limit: Some(DEFAULT_RECURSION_LIMIT),
        }
    }
}

/// One activation of a code record.
#[derive(Clone, Debug)]
pub struct Frame {
    pub code: Arc<CodeObject>,
    /// Offset of the current instruction in `code.bytecode()`.
    pub ip: usize,
    pub locals: FxHashMap<String, Value>,
}

impl Frame {
    pub fn new(code: Arc<CodeObject>) -> Self {
        Frame {
            code,
            ip: 0,
            locals: FxHashMap::default(),
        }
    }

    /// Source line of the current instruction.
    #[inline]
    pub fn line(&self) -> u32 {
        self.code.line_for_offset(self.ip)
    }
}

/// Opaque reference to the engine's garbage collector.
#[derive(Clone, Debug)]
pub struct CollectorHandle(Opaque);

impl CollectorHandle {
    pub fn new<T: Any + Send + Sync>(collector: T) -> Self {
        CollectorHandle(Opaque::new(collector))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

/// Opaque reference to the active interpreter.
#[derive(Clone, Debug)]
pub struct InterpreterHandle(Opaque);

impl InterpreterHandle {
    pub fn new<T: Any + Send + Sync>(interpreter: T) -> Self {
        InterpreterHandle(Opaque::new(interpreter))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

#[derive(Debug)]
pub struct InterpreterState {
    config: InterpreterConfig,
    frames: Vec<Frame>,
    collector: Option<CollectorHandle>,
    errors: Vec<AilError>,
    interpreter: Option<InterpreterHandle>,
}

impl InterpreterState {
    pub fn new(config: InterpreterConfig) -> Self {
        InterpreterState {
            config,
            frames: Vec::new(),
            collector: None,
            errors: Vec::new(),
            interpreter: None,
        }
    }

    pub fn config(&self) -> InterpreterConfig {
        self.config
    }

    // Frame stack

    /// Push a frame, checking the recursion limit.
    ///
    /// The frame is not pushed when the limit would be exceeded.
    pub fn push_frame(&mut self, frame: Frame) -> AilResult<()> {
        if let Some(limit) = self.config.recursion_limit {
            if self.frames.len() >= limit {
                return Err(recursion_limit_exceeded(limit));
            }
        }
        tracing::trace!(code = frame.code.name(), depth = self.frames.len(), "push frame");
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop_frame(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    #[inline]
    pub fn current_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    #[inline]
    pub fn current_frame_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    /// Live frames, outermost first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    // Error stack

    pub fn push_error(&mut self, err: AilError) {
        tracing::debug!(kind = %err.kind(), "error raised");
        self.errors.push(err);
    }

    pub fn pop_error(&mut self) -> Option<AilError> {
        self.errors.pop()
    }

    pub fn last_error(&self) -> Option<&AilError> {
        self.errors.last()
    }

    /// Pending errors, oldest first.
    pub fn errors(&self) -> &[AilError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    // Handles

    pub fn collector(&self) -> Option<&CollectorHandle> {
        self.collector.as_ref()
    }

    pub fn set_collector(&mut self, collector: CollectorHandle) -> Option<CollectorHandle> {
        self.collector.replace(collector)
    }

    pub fn interpreter(&self) -> Option<&InterpreterHandle> {
        self.interpreter.as_ref()
    }

    pub fn set_interpreter(&mut self, interpreter: InterpreterHandle) -> Option<InterpreterHandle> {
        self.interpreter.replace(interpreter)
    }

    /// Drop every frame, error and handle. The configuration is kept.
    pub fn reset(&mut self) {
        self.frames.clear();
        self.errors.clear();
        self.collector = None;
        self.interpreter = None;
    }
}

impl Default for InterpreterState {
    fn default() -> Self {
        Self::new(InterpreterConfig::default())
    }
}

#[cold]
fn recursion_limit_exceeded(limit: usize) -> AilError {
    errors::runtime_error(format!("maximum recursion depth exceeded (limit {limit})"))
}
