//! # Environment: names, stack, and execution bookkeeping
//!
//! Grounded on `examples/original_source/stekk/vm.py`'s `VM` class
//! (names dict, stack list, op counters) and on `omg_runtime::vm`'s inline
//! VM state, generalized from a flat opcode-index VM into the
//! tree-walking Environment this interpreter runs against.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::io::Write;

use crate::ast::Statement;
use crate::value::Value;

/// Sink for `read`: returns the next line of input, or `None` at EOF.
pub trait Reader {
    fn read_line(&mut self) -> Option<String>;
}

/// Reads from stdin, matching `omg_runtime`'s REPL input handling.
pub struct StdinReader;

impl Reader for StdinReader {
    fn read_line(&mut self) -> Option<String> {
        let mut buf = String::new();
        match std::io::stdin().read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => {
                if buf.ends_with('\n') {
                    buf.pop();
                    if buf.ends_with('\r') {
                        buf.pop();
                    }
                }
                Some(buf)
            }
            Err(_) => None,
        }
    }
}

/// Sink for `print`/`println`.
pub trait Printer {
    fn print(&mut self, s: &str);
    fn println(&mut self, s: &str);
}

/// Writes to stdout, flushing on every call so output interleaves correctly
/// with a REPL prompt.
pub struct StdoutPrinter;

impl Printer for StdoutPrinter {
    fn print(&mut self, s: &str) {
        print!("{}", s);
        let _ = std::io::stdout().flush();
    }

    fn println(&mut self, s: &str) {
        println!("{}", s);
    }
}

const HISTORY_CAP: usize = 32;

/// The interpreter's mutable world: names, the operand stack, resource
/// counters, and the I/O sinks built-in words reach through.
pub struct Environment {
    pub program: Vec<Statement>,
    pub names: HashMap<String, Value>,
    pub stack: Vec<Value>,
    pub op_count: u64,
    pub op_limit: u64,
    pub history: VecDeque<Vec<Value>>,
    pub last_result: Value,
    pub printer: Box<dyn Printer>,
    pub reader: Box<dyn Reader>,
}

impl Environment {
    pub fn new(
        program: Vec<Statement>,
        printer: Box<dyn Printer>,
        reader: Box<dyn Reader>,
        op_limit: u64,
    ) -> Environment {
        Environment {
            program,
            names: crate::vm::builtins::builtin_table(),
            stack: Vec::new(),
            op_count: 0,
            op_limit,
            history: VecDeque::with_capacity(HISTORY_CAP),
            last_result: Value::n(),
            printer,
            reader,
        }
    }

    /// Register one primitive operation: snapshot the stack, bump the
    /// counter, and enforce `op_limit`.
    pub fn register_operation(&mut self) -> Result<(), crate::error::RuntimeError> {
        if self.history.len() == HISTORY_CAP {
            self.history.pop_front();
        }
        self.history.push_back(self.stack.clone());
        self.op_count += 1;
        if self.op_count > self.op_limit {
            return Err(crate::error::RuntimeError::OpLimitExceeded);
        }
        Ok(())
    }

    pub fn assign_name(&mut self, name: &str, value: Value) {
        self.names.insert(name.to_string(), value);
    }

    pub fn get_name(&self, name: &str) -> Option<Value> {
        self.names.get(name).cloned()
    }

    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    pub fn pop(&mut self) -> Value {
        self.stack.pop().unwrap_or_else(Value::n)
    }
}
