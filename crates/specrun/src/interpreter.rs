//! The interpreter seam.
//!
//! Specrun never parses or evaluates a specification itself. A host hands it
//! a live interpreter session implementing [`Interpreter`] (and, when coverage
//! is wanted, [`CoverageSource`]). The session is owned by the host and passed
//! by mutable reference; Specrun never creates or disposes one.

use crate::location::LocationHit;
use crate::result::SpecrunResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A runtime contract violation raised while invoking an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Interpreter error number
    pub code: i64,
    /// Interpreter error message
    pub message: String,
}

impl Violation {
    /// Create a new violation
    #[must_use]
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for Violation {}

/// A named operation of a specification module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationInfo {
    /// Operation name
    pub name: String,
    /// Number of parameters
    #[serde(default)]
    pub arity: usize,
}

impl OperationInfo {
    /// Create a zero-argument operation
    #[must_use]
    pub fn nullary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arity: 0,
        }
    }
}

/// A module of the loaded specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// Module name
    pub name: String,
    /// Source files the module was loaded from
    #[serde(default)]
    pub files: Vec<PathBuf>,
    /// Operations defined by the module, in definition order
    #[serde(default)]
    pub operations: Vec<OperationInfo>,
}

/// A live, type-checked interpreter session
pub trait Interpreter {
    /// Modules of the loaded specification, in load order
    fn modules(&self) -> Vec<ModuleInfo>;

    /// Reset all interpreter state. Called once before any test runs.
    fn initialize(&mut self) -> SpecrunResult<()>;

    /// Set the module that unqualified names resolve against
    fn set_default_context(&mut self, module_name: &str);

    /// Invoke a zero-argument operation in the default context
    fn invoke(&mut self, operation_name: &str) -> Result<(), Violation>;
}

/// Per-location execution counts collected by an interpreter.
///
/// `file` is always a path as reported in [`ModuleInfo::files`].
pub trait CoverageSource {
    /// Hit table for one source file
    fn location_hits(&self, file: &Path) -> SpecrunResult<Vec<LocationHit>>;

    /// Raw source text of one file
    fn source_text(&self, file: &Path) -> SpecrunResult<String>;
}

/// Drop `.` components so that `./src/a` and `src/a` compare equal under
/// [`Path::starts_with`]
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
