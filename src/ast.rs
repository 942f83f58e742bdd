//! # AST nodes for stekk
//!
//! Closed sum types for `Statement`, `Expression` and `Lvalue`, replacing
//! `omg_runtime::bytecode`'s binary instruction stream: this interpreter
//! walks the tree directly rather than compiling to a linear opcode format.
//! Every node owns its children (`Box`/`Vec`) — an immutable structural
//! representation, not a pointer into a shared arena.
//!
//! Infix operator syntax (`a <= b`, `not a`, unary `-a`) is parser sugar
//! over `Stack` + `Fcall` and therefore never shows up as a distinct node
//! here — the variant set below is closed and exact.

use std::rc::Rc;

/// A statement. Every `Expression` is usable as a statement (`Statement::Expr`);
/// `IfThen` is parser-level sugar for `IfElse` with an empty else-block and
/// therefore isn't a distinct variant either.
#[derive(Clone, Debug)]
pub enum Statement {
    Assign(Lvalue, Expression),
    Expr(Expression),
}

/// An expression: every variant produces a `Value` when evaluated.
#[derive(Clone, Debug)]
pub enum Expression {
    Integer(i64),
    Float(f64),
    Str(Rc<str>),
    Name(String),
    ListExpr(Vec<Expression>),
    TupleExpr(Vec<Expression>),
    Range(Box<Expression>, Box<Expression>),
    Index(Box<Expression>, Box<Expression>),
    At(Box<Expression>),
    IfElse(Box<Expression>, Box<Expression>, Box<Expression>),
    While(Box<Expression>, Box<Expression>),
    Stack(Vec<Expression>),
    Fcall(Box<Expression>),
    Block(Vec<Statement>),
}

/// The closed set of assignable targets.
#[derive(Clone, Debug)]
pub enum Lvalue {
    Name(String),
    Index(Box<Expression>, Box<Expression>),
}

/// Pretty-print an AST fragment back to source text, for the `as_src`
/// built-in and for the §8 round-trip property
/// (`parse(as_src(parse(src)))` ~ `parse(src)`). Grounded on
/// `examples/original_source/stekk/parser.py`'s `str_rec` methods.
pub fn statements_to_src(stmts: &[Statement], depth: usize) -> String {
    let indent = "    ".repeat(depth);
    let mut out = String::new();
    for stmt in stmts {
        out.push_str(&indent);
        out.push_str(&statement_to_src(stmt, depth));
        out.push_str(";\n");
    }
    out
}

fn statement_to_src(stmt: &Statement, depth: usize) -> String {
    match stmt {
        Statement::Assign(lvalue, expr) => {
            format!("{} = {}", lvalue_to_src(lvalue, depth), expr_to_src(expr, depth))
        }
        Statement::Expr(expr) => expr_to_src(expr, depth),
    }
}

fn lvalue_to_src(lvalue: &Lvalue, depth: usize) -> String {
    match lvalue {
        Lvalue::Name(name) => name.clone(),
        Lvalue::Index(target, index) => {
            format!("{}#{}", expr_to_src(target, depth), expr_to_src(index, depth))
        }
    }
}

fn expr_to_src(expr: &Expression, depth: usize) -> String {
    match expr {
        Expression::Integer(i) => i.to_string(),
        Expression::Float(x) => x.to_string(),
        Expression::Str(s) => format!("\"{}\"", s),
        Expression::Name(name) => name.clone(),
        Expression::ListExpr(items) => {
            let inner: Vec<String> = items.iter().map(|e| expr_to_src(e, depth)).collect();
            format!("[{}]", inner.join(", "))
        }
        Expression::TupleExpr(items) => {
            let inner: Vec<String> = items.iter().map(|e| expr_to_src(e, depth)).collect();
            format!("({})", inner.join(", "))
        }
        Expression::Range(l, r) => format!("{}..{}", expr_to_src(l, depth), expr_to_src(r, depth)),
        Expression::Index(target, index) => {
            format!("{}[{}]", expr_to_src(target, depth), expr_to_src(index, depth))
        }
        Expression::At(inner) => format!("@{}", expr_to_src(inner, depth)),
        Expression::IfElse(cond, then_, else_) => format!(
            "{} => {} else {}",
            expr_to_src(cond, depth),
            expr_to_src(then_, depth),
            expr_to_src(else_, depth)
        ),
        Expression::While(cond, body) => {
            format!("while {} => {}", expr_to_src(cond, depth), expr_to_src(body, depth))
        }
        Expression::Stack(items) => {
            let inner: Vec<String> = items.iter().map(|e| expr_to_src(e, depth)).collect();
            format!("({})", inner.join(" "))
        }
        Expression::Fcall(target) => format!(".{}", expr_to_src(target, depth)),
        Expression::Block(stmts) => {
            if stmts.is_empty() {
                "{}".to_string()
            } else {
                format!(
                    "{{\n{}{}}}",
                    statements_to_src(stmts, depth + 1),
                    "    ".repeat(depth)
                )
            }
        }
    }
}
