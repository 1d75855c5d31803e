//! The compiled-code record.

use std::fmt;
use std::sync::OnceLock;

use rustc_hash::FxHashSet;

use crate::Constant;

/// Parameter count of a code record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ArgCount {
    /// Module bodies and other non-callable units.
    #[default]
    NotFunction,
    /// A function taking exactly this many positional parameters
    /// (the variadic parameter, if any, is not counted).
    Fixed(u16),
}

impl ArgCount {
    /// Whether this record describes a callable unit.
    #[inline]
    pub fn is_function(self) -> bool {
        matches!(self, ArgCount::Fixed(_))
    }
}

/// Reference from a closure body to a variable of an enclosing unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClosureCell {
    /// Variable name in the enclosing unit.
    pub name: String,
    /// How many units outward the variable lives (1 = direct parent).
    pub depth: u32,
}

/// Failure to populate the outer closure cells of a code record.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClosureError {
    /// The record is not flagged as a closure.
    #[error("code object '{name}' is not a closure")]
    NotAClosure { name: String },
    /// The cells were already populated.
    #[error("closure cells of '{name}' are already populated")]
    AlreadyPopulated { name: String },
}

/// Immutable description of one compiled unit.
///
/// Built through [`CodeObjectBuilder`]. All fields are read-only; the only
/// post-construction mutation is [`CodeObject::populate_closure`].
#[derive(Clone, Debug, PartialEq)]
pub struct CodeObject {
    consts: Vec<Constant>,
    varnames: Vec<String>,
    bytecode: Box<[u8]>,
    firstlineno: u32,
    lnotab: Vec<u32>,
    /// Source line of each instruction, indexed by instruction offset.
    lineno_list: Box<[u32]>,
    argcount: ArgCount,
    name: String,
    filename: String,
    closure: bool,
    is_main: bool,
    global_names: FxHashSet<String>,
    nonlocal_names: FxHashSet<String>,
    var_arg: Option<String>,
    closure_outer: OnceLock<Vec<ClosureCell>>,
}

impl CodeObject {
    /// Start building a record with the given declared name and source file.
    pub fn builder(name: impl Into<String>, filename: impl Into<String>) -> CodeObjectBuilder {
        CodeObjectBuilder::new(name, filename)
    }

    pub fn consts(&self) -> &[Constant] {
        &self.consts
    }

    pub fn varnames(&self) -> &[String] {
        &self.varnames
    }

    pub fn bytecode(&self) -> &[u8] {
        &self.bytecode
    }

    pub fn firstlineno(&self) -> u32 {
        self.firstlineno
    }

    pub fn lnotab(&self) -> &[u32] {
        &self.lnotab
    }

    pub fn lineno_list(&self) -> &[u32] {
        &self.lineno_list
    }

    pub fn argcount(&self) -> ArgCount {
        self.argcount
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn is_closure(&self) -> bool {
        self.closure
    }

    pub fn is_main(&self) -> bool {
        self.is_main
    }

    pub fn global_names(&self) -> &FxHashSet<String> {
        &self.global_names
    }

    pub fn nonlocal_names(&self) -> &FxHashSet<String> {
        &self.nonlocal_names
    }

    pub fn var_arg(&self) -> Option<&str> {
        self.var_arg.as_deref()
    }

    /// Source line for the instruction at `offset`.
    ///
    /// Offsets past the end of the line table map to the first line.
    pub fn line_for_offset(&self, offset: usize) -> u32 {
        self.lineno_list
            .get(offset)
            .copied()
            .unwrap_or(self.firstlineno)
    }

    /// Outer closure cells, or an empty slice if not yet populated.
    pub fn closure_outer(&self) -> &[ClosureCell] {
        self.closure_outer.get().map_or(&[], Vec::as_slice)
    }

    /// Whether the outer closure cells have been populated.
    pub fn is_closure_populated(&self) -> bool {
        self.closure_outer.get().is_some()
    }

    /// Populate the outer closure cells.
    ///
    /// Allowed exactly once, and only on records flagged as closures.
    pub fn populate_closure(&self, cells: Vec<ClosureCell>) -> Result<(), ClosureError> {
        if !self.closure {
            return Err(ClosureError::NotAClosure {
                name: self.name.clone(),
            });
        }
        self.closure_outer
            .set(cells)
            .map_err(|_| ClosureError::AlreadyPopulated {
                name: self.name.clone(),
            })
    }
}

impl fmt::Display for CodeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<AIL CodeObject '{}'>", self.name)
    }
}

/// Builder for [`CodeObject`].
///
/// Every field has a neutral default: an empty table, line 1, and
/// `ArgCount::NotFunction`.
#[derive(Debug)]
pub struct CodeObjectBuilder {
    consts: Vec<Constant>,
    varnames: Vec<String>,
    bytecode: Vec<u8>,
    firstlineno: u32,
    lnotab: Vec<u32>,
    lineno_list: Vec<u32>,
    argcount: ArgCount,
    name: String,
    filename: String,
    closure: bool,
    is_main: bool,
    global_names: FxHashSet<String>,
    nonlocal_names: FxHashSet<String>,
    var_arg: Option<String>,
}

impl CodeObjectBuilder {
    pub fn new(name: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            consts: Vec::new(),
            varnames: Vec::new(),
            bytecode: Vec::new(),
            firstlineno: 1,
            lnotab: Vec::new(),
            lineno_list: Vec::new(),
            argcount: ArgCount::NotFunction,
            name: name.into(),
            filename: filename.into(),
            closure: false,
            is_main: false,
            global_names: FxHashSet::default(),
            nonlocal_names: FxHashSet::default(),
            var_arg: None,
        }
    }

    #[must_use]
    pub fn consts(mut self, consts: Vec<Constant>) -> Self {
        self.consts = consts;
        self
    }

    #[must_use]
    pub fn varnames<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.varnames = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn bytecode(mut self, bytecode: Vec<u8>) -> Self {
        self.bytecode = bytecode;
        self
    }

    #[must_use]
    pub fn firstlineno(mut self, line: u32) -> Self {
        self.firstlineno = line;
        self
    }

    #[must_use]
    pub fn lnotab(mut self, lnotab: Vec<u32>) -> Self {
        self.lnotab = lnotab;
        self
    }

    #[must_use]
    pub fn lineno_list(mut self, lines: Vec<u32>) -> Self {
        self.lineno_list = lines;
        self
    }

    #[must_use]
    pub fn argcount(mut self, argcount: ArgCount) -> Self {
        self.argcount = argcount;
        self
    }

    #[must_use]
    pub fn closure(mut self, closure: bool) -> Self {
        self.closure = closure;
        self
    }

    #[must_use]
    pub fn main(mut self, is_main: bool) -> Self {
        self.is_main = is_main;
        self
    }

    #[must_use]
    pub fn global_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.global_names = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn nonlocal_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nonlocal_names = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn var_arg(mut self, name: impl Into<String>) -> Self {
        self.var_arg = Some(name.into());
        self
    }

    pub fn build(self) -> CodeObject {
        CodeObject {
            consts: self.consts,
            varnames: self.varnames,
            bytecode: self.bytecode.into_boxed_slice(),
            firstlineno: self.firstlineno,
            lnotab: self.lnotab,
            lineno_list: self.lineno_list.into_boxed_slice(),
            argcount: self.argcount,
            name: self.name,
            filename: self.filename,
            closure: self.closure,
            is_main: self.is_main,
            global_names: self.global_names,
            nonlocal_names: self.nonlocal_names,
            var_arg: self.var_arg,
            closure_outer: OnceLock::new(),
        }
    }
}
