//! # Interactive REPL
//!
//! A line editor (prompt history, tab completion, ANSI rendering) is an
//! external collaborator this module doesn't provide; what it does supply
//! is the rest of a runnable interactive session: multi-line brace-
//! balancing input, in-process parse+evaluate against one persistent
//! [`Environment`], and non-fatal error reporting that keeps the session
//! alive.
//!
//! Grounded on `omg_runtime`'s own REPL for the brace-depth buffering
//! shape, adapted from "write a temp file and re-exec the binary" to
//! parsing and running directly in this process, since there is no
//! embedded-bytecode indirection here to route around.

use std::io::{self, Write};

use crate::env::Environment;

pub fn repl_interpret(mut environment: Environment) {
    println!("stekk — interactive. Type `exit` or `quit` to leave.");

    let mut buffer: Vec<String> = Vec::new();
    let mut brace_depth: i32 = 0;

    loop {
        let prompt = if buffer.is_empty() { ">>> " } else { "... " };
        print!("{}", prompt);
        let _ = io::stdout().flush();

        let mut line = String::new();
        if io::stdin().read_line(&mut line).unwrap_or(0) == 0 {
            println!();
            break;
        }

        let trimmed = line.trim();
        if buffer.is_empty() && (trimmed == "exit" || trimmed == "quit") {
            break;
        }

        brace_depth += count_braces(&line);
        buffer.push(line);

        if brace_depth > 0 {
            continue;
        }

        let block = buffer.join("");
        buffer.clear();
        brace_depth = 0;

        if block.trim().is_empty() {
            continue;
        }

        let statements = match crate::parser::parse(&block) {
            Ok(stmts) => stmts,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        environment.program = statements;
        match crate::vm::run(&mut environment) {
            Ok(_) => {
                if !environment.last_result.is_n() {
                    println!("{}", environment.last_result);
                }
            }
            Err(e) => println!("{}", e),
        }
    }
}

/// Counts `{`/`}` in a line as `+1`/`-1`, skipping brace characters inside
/// string literals so a block comment or a stray `"}"` doesn't desync the
/// depth tracker.
fn count_braces(line: &str) -> i32 {
    let mut depth = 0;
    let mut in_string = false;
    let mut escape = false;
    for ch in line.chars() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => depth -= 1,
            _ => {}
        }
    }
    depth
}
