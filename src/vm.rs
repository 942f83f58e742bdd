//! # Evaluator
//!
//! Tree-walking interpretation of `ast` nodes against an `Environment`.
//! Grounded on `examples/original_source/stekk/vm.py`'s `VM.run`/`eval_*`
//! dispatch, generalized from that class's method-per-node-kind shape into
//! Rust match arms — and on `omg_runtime::vm`'s op-counting/fatal-error
//! discipline, since both trace the same "count every primitive, unwind on
//! a fatal error" policy.

pub mod builtins;
pub mod ops_arith;
pub mod ops_control;
pub mod ops_struct;
#[cfg(test)]
mod tests;

use crate::ast::{Expression, Lvalue, Statement};
use crate::env::Environment;
use crate::error::RuntimeError;
use crate::value::{BuiltinKind, CodeBlockData, Value};

/// Runs `environment.program` to completion, returning the final
/// `last_result`.
pub fn run(environment: &mut Environment) -> Result<Value, RuntimeError> {
    let program = std::mem::take(&mut environment.program);
    let result = execute(environment, &program);
    environment.program = program;
    result
}

/// `execute(statements)`: run each statement in order; each statement step
/// is one primitive operation, and sets `last_result`.
pub fn execute(environment: &mut Environment, statements: &[Statement]) -> Result<Value, RuntimeError> {
    let mut last = Value::n();
    for stmt in statements {
        environment.register_operation()?;
        last = eval_statement(environment, stmt)?;
        environment.last_result = last.clone();
    }
    Ok(last)
}

fn eval_statement(environment: &mut Environment, stmt: &Statement) -> Result<Value, RuntimeError> {
    match stmt {
        Statement::Assign(lvalue, expr) => {
            let mut value = eval_expression(environment, expr)?;
            if value.is_n() {
                value = Value::n();
            }
            assign(environment, lvalue, value)?;
            Ok(Value::n())
        }
        Statement::Expr(expr) => eval_expression(environment, expr),
    }
}

fn assign(environment: &mut Environment, lvalue: &Lvalue, value: Value) -> Result<(), RuntimeError> {
    match lvalue {
        Lvalue::Name(name) => {
            environment.register_operation()?;
            environment.assign_name(name, value);
            Ok(())
        }
        Lvalue::Index(target_expr, index_expr) => {
            let target = eval_expression(environment, target_expr)?;
            let index = eval_expression(environment, index_expr)?;
            environment.register_operation()?;
            set_index(&target, &index, value)
        }
    }
}

fn set_index(target: &Value, index: &Value, value: Value) -> Result<(), RuntimeError> {
    match target {
        Value::List(list) => {
            let i = match index {
                Value::Integer(i) => *i,
                _ => {
                    return Err(RuntimeError::InvalidLvalue(
                        "list index must be an integer".to_string(),
                    ))
                }
            };
            let mut borrowed = list.borrow_mut();
            let len = borrowed.len() as i64;
            let real = if i < 0 { i + len } else { i };
            if real < 0 || real >= len {
                return Err(RuntimeError::InvalidLvalue(format!(
                    "list index {} out of bounds",
                    i
                )));
            }
            borrowed[real as usize] = value;
            Ok(())
        }
        _ => Err(RuntimeError::InvalidLvalue(format!(
            "cannot assign through index into a {}",
            target.type_name()
        ))),
    }
}

fn eval_expression(environment: &mut Environment, expr: &Expression) -> Result<Value, RuntimeError> {
    match expr {
        Expression::Integer(i) => Ok(Value::Integer(*i)),
        Expression::Float(f) => Ok(Value::Float(*f)),
        Expression::Str(s) => Ok(Value::Str(s.clone())),
        Expression::Name(id) => eval_name(environment, id),
        Expression::ListExpr(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(eval_expression(environment, item)?);
            }
            Ok(Value::list(values))
        }
        Expression::TupleExpr(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(eval_expression(environment, item)?);
            }
            Ok(Value::tuple(values))
        }
        Expression::Range(l, r) => {
            let left = eval_expression(environment, l)?;
            let right = eval_expression(environment, r)?;
            match (as_int(&left), as_int(&right)) {
                (Some(l), Some(r)) => Ok(Value::Range(l, r)),
                _ => Ok(Value::t()),
            }
        }
        Expression::Index(target, index) => {
            let target = eval_expression(environment, target)?;
            let index = eval_expression(environment, index)?;
            ops_struct::index_value(environment, &target, &index)
        }
        Expression::At(region) => {
            let region = eval_expression(environment, region)?;
            ops_struct::expand_region(&region)
        }
        Expression::IfElse(cond, then_, else_) => {
            let cond_value = eval_expression(environment, cond)?;
            if cond_value.truthy() {
                eval_body(environment, then_)
            } else {
                eval_body(environment, else_)
            }
        }
        Expression::While(cond, body) => {
            let mut last = Value::n();
            loop {
                let cond_value = eval_expression(environment, cond)?;
                let is_one = matches!(cond_value, Value::Integer(1));
                if !is_one {
                    break;
                }
                last = eval_body(environment, body)?;
            }
            Ok(last)
        }
        Expression::Stack(items) => eval_stack(environment, items),
        Expression::Fcall(target) => {
            let callee = eval_expression(environment, target)?;
            invoke(environment, &callee)
        }
        Expression::Block(stmts) => Ok(Value::code_block(stmts.clone())),
    }
}

/// Evaluates an `if`/`while` branch. A literal `{ ... }` written directly in
/// a branch position runs its statements in place (so a loop body like
/// `{ acc = ...; i = ... }` actually advances each iteration); a `{ ... }`
/// reached any other way (bound to a name, pushed on the stack, `.++`'d
/// together) stays a lazy first-class `CodeBlock` value, since
/// `eval_expression`'s `Block` arm never executes it on its own.
fn eval_body(environment: &mut Environment, expr: &Expression) -> Result<Value, RuntimeError> {
    match expr {
        Expression::Block(stmts) => execute(environment, stmts),
        _ => eval_expression(environment, expr),
    }
}

fn eval_name(environment: &mut Environment, id: &str) -> Result<Value, RuntimeError> {
    if let Some(rest) = id.strip_prefix('$') {
        return Ok(Value::const_(rest));
    }
    environment.register_operation()?;
    environment
        .get_name(id)
        .ok_or_else(|| RuntimeError::UndefinedName(id.to_string()))
}

/// The Stack form: evaluate each sub-expression, pushing everything except
/// `N`/no-value; then pop-or-`N`. Push and pop each count as one primitive
/// operation.
fn eval_stack(environment: &mut Environment, items: &[Expression]) -> Result<Value, RuntimeError> {
    for item in items {
        let value = eval_expression(environment, item)?;
        if !value.is_n() {
            environment.register_operation()?;
            environment.push(value);
        }
    }
    if environment.stack.is_empty() {
        Ok(Value::n())
    } else {
        environment.register_operation()?;
        Ok(environment.pop())
    }
}

/// `Fcall(target)`: invoke a callable value. Counts as exactly one
/// operation beyond whatever its body incurs.
pub fn invoke(environment: &mut Environment, callee: &Value) -> Result<Value, RuntimeError> {
    environment.register_operation()?;
    match callee {
        Value::CodeBlock(block) => {
            let stmts = block.borrow().stmts.clone();
            execute(environment, &stmts)
        }
        Value::BuiltinWord(kind) => invoke_builtin(environment, *kind),
        _ => Ok(Value::t()),
    }
}

fn invoke_builtin(environment: &mut Environment, kind: BuiltinKind) -> Result<Value, RuntimeError> {
    match kind {
        BuiltinKind::Fixed(word) => {
            environment.register_operation()?;
            let mut args = Vec::with_capacity(word.arity);
            for _ in 0..word.arity {
                environment.register_operation()?;
                args.push(environment.pop());
            }
            args.reverse();
            match (word.func)(environment, args) {
                Ok(results) => {
                    if results.is_empty() {
                        if word.on_empty == crate::value::OnEmpty::PushN {
                            environment.register_operation()?;
                            environment.push(Value::n());
                        }
                    } else {
                        for v in results {
                            environment.register_operation()?;
                            environment.push(v);
                        }
                    }
                    Ok(Value::n())
                }
                Err(_) => {
                    environment.register_operation()?;
                    environment.push(Value::t());
                    Ok(Value::n())
                }
            }
        }
        BuiltinKind::Variadic(word) => {
            (word.func)(environment)?;
            Ok(Value::n())
        }
    }
}

pub type CodeBlock = CodeBlockData;

pub fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(i) => Some(*i),
        Value::Float(f) => Some(*f as i64),
        _ => None,
    }
}
