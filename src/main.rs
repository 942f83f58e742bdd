//! stekk CLI entry point.
//!
//! Hand-matched `env::args()`, no CLI-parsing crate — a small single-binary
//! tool, same texture the runtime binary this crate's layout is patterned
//! on uses for its own argument handling.
//!
//! ```text
//! stekk                  start REPL
//! stekk -h | --help      usage
//! stekk -v | --version   version string
//! stekk FILE.stekk ...   load and run each file's statements in order,
//!                        then drop into a REPL sharing that Environment
//! ```

use std::env;
use std::fs;
use std::process::ExitCode;

use stekk::env::{Environment, StdinReader, StdoutPrinter};
use stekk::repl::repl_interpret;

/// Matches the original's top-level `loads()` helper default, not the
/// lower per-constructor default used by the bare `VM()` builder.
const DEFAULT_OP_LIMIT: u64 = 100_000_000;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn usage() -> String {
    format!(
        r#"stekk {0}

Usage:
    stekk
    stekk FILE.stekk ...

Arguments:
    FILE.stekk ...
        One or more source files to load and run, in order, before
        dropping into an interactive REPL sharing their Environment.

Options:
    -h, --help
        Show this help message and exit.
    -v, --version
        Show the runtime version."#,
        VERSION
    )
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    if args.len() == 1 {
        repl_interpret(Environment::new(
            Vec::new(),
            Box::new(StdoutPrinter),
            Box::new(StdinReader),
            DEFAULT_OP_LIMIT,
        ));
        return ExitCode::SUCCESS;
    }

    if args[1] == "-h" || args[1] == "--help" {
        println!("{}", usage());
        return ExitCode::SUCCESS;
    }

    if args[1] == "-v" || args[1] == "--version" {
        println!("stekk {}", VERSION);
        return ExitCode::SUCCESS;
    }

    let mut environment = Environment::new(
        Vec::new(),
        Box::new(StdoutPrinter),
        Box::new(StdinReader),
        DEFAULT_OP_LIMIT,
    );

    for path in &args[1..] {
        let source = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("cannot read {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        };
        let statements = match stekk::parser::parse(&source) {
            Ok(stmts) => stmts,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        };
        environment.program = statements;
        if let Err(e) = stekk::vm::run(&mut environment) {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    }

    repl_interpret(environment);
    ExitCode::SUCCESS
}
