//! # stekk
//!
//! A hybrid stack/expression language: a hand-rolled lexer and
//! recursive-descent parser feeding a tree-walking evaluator over a
//! flat, reference-counted value model.
//!
//! This crate exposes the same three-step embedding surface the binary
//! itself uses: [`parser::parse`] a source string into statements, build an
//! [`env::Environment`] to hold names/stack/IO, then [`vm::run`] it.
//!
//! ```no_run
//! use stekk::env::{Environment, StdinReader, StdoutPrinter};
//!
//! let statements = stekk::parser::parse("(1 2 .+);").unwrap();
//! let mut environment = Environment::new(
//!     statements,
//!     Box::new(StdoutPrinter),
//!     Box::new(StdinReader),
//!     100_000_000,
//! );
//! let result = stekk::vm::run(&mut environment).unwrap();
//! assert_eq!(result.to_string(), "3");
//! ```

pub mod ast;
pub mod env;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod value;
pub mod vm;

pub use env::Environment;
pub use error::{RuntimeError, SyntaxError};
pub use value::Value;
