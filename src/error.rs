//! # Error Handling for the stekk VM
//!
//! This module defines the two error surfaces that can reach Rust code —
//! the `T`/`E` sentinel values are plain `Value`s and never throw.
//!
//! ## Design
//! - [`SyntaxError`] carries a line number, a context snippet and a hint,
//!   produced by the parser and never seen by the evaluator.
//! - [`RuntimeError`] is the fatal category: exceeding `op_limit`, an
//!   unbound name, an invalid lvalue, external I/O failure. These unwind to
//!   the top-level driver; they are never caught by language-level code.
//! - Both implement hand-written [`fmt::Display`] and [`std::error::Error`],
//!   matching `omg_runtime::error`'s style rather than deriving from
//!   `thiserror` — this crate carries no error-formatting dependency.

use std::fmt;

/// Fatal runtime errors. Unwinds the evaluator to the top-level driver;
/// the Environment keeps whatever partial mutations already happened (no
/// torn values, no rollback).
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// `op_count` strictly exceeded `op_limit`.
    OpLimitExceeded,
    /// A `Name` lookup found no binding.
    UndefinedName(String),
    /// An lvalue was structurally invalid (e.g. indexing through a
    /// non-indexable target on assignment).
    InvalidLvalue(String),
    /// External I/O failure (`read`, `import`, file loading).
    IoError(String),
    /// Internal invariant violation — a bug in this crate, not in the
    /// interpreted program (mirrors `omg_runtime::error::RuntimeError::VmInvariant`).
    VmInvariant(String),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::OpLimitExceeded => {
                write!(f, "OpLimitExceeded: too many operations")
            }
            RuntimeError::UndefinedName(name) => {
                write!(f, "UndefinedName: '{}' is not bound", name)
            }
            RuntimeError::InvalidLvalue(msg) => {
                write!(f, "InvalidLvalue: {}", msg)
            }
            RuntimeError::IoError(msg) => {
                write!(f, "IoError: {}", msg)
            }
            RuntimeError::VmInvariant(msg) => {
                write!(f, "VmInvariant: {}", msg)
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

/// A structured parse error: the offending line number, a snippet of
/// context, and a human-readable hint for the common cases (missing `;`,
/// missing `]`, missing `)`).
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub line: usize,
    pub context: String,
    pub hint: String,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SyntaxError: {} at line {}\n{}",
            self.hint, self.line, self.context
        )
    }
}

impl std::error::Error for SyntaxError {}
