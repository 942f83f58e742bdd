//! Indexing, ranges/regions, stack words, and collection-building words.
//! Grounded on `examples/original_source/stekk/vm.py`'s
//! `getitem`/`points_from_region` and the `grab`/`bloat`/`push`/`rev`/...
//! methods.

use crate::ast::Statement;
use crate::env::Environment;
use crate::error::RuntimeError;
use crate::value::Value;

fn normalize_index(i: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let real = if i < 0 { i + len } else { i };
    if real < 0 || real >= len {
        None
    } else {
        Some(real as usize)
    }
}

/// `Index(target, index)`. CodeBlock indexing evaluates in the caller's
/// own `Environment` — the same flat lexical scope a direct invocation of
/// that block would use.
pub fn index_value(
    environment: &mut Environment,
    target: &Value,
    index: &Value,
) -> Result<Value, RuntimeError> {
    match target {
        Value::List(list) => index_sequence(&list.borrow(), index),
        Value::Tuple(items) => index_sequence(items, index),
        Value::Str(s) => match index {
            Value::Integer(i) => {
                let chars: Vec<char> = s.chars().collect();
                match normalize_index(*i, chars.len()) {
                    Some(idx) => Ok(Value::str_(chars[idx].to_string())),
                    None => Ok(Value::t()),
                }
            }
            _ => Ok(Value::t()),
        },
        Value::CodeBlock(block) => {
            let stmts = block.borrow().stmts.clone();
            match index {
                Value::Integer(i) => match normalize_index(*i, stmts.len()) {
                    Some(idx) => {
                        crate::vm::execute(environment, std::slice::from_ref(&stmts[idx]))
                    }
                    None => Ok(Value::t()),
                },
                Value::Const(name) => find_assign(environment, &stmts, name),
                _ => Ok(Value::t()),
            }
        }
        _ => Ok(Value::t()),
    }
}

fn index_sequence(items: &[Value], index: &Value) -> Result<Value, RuntimeError> {
    match index {
        Value::Integer(i) => match normalize_index(*i, items.len()) {
            Some(idx) => Ok(items[idx].clone()),
            None => Ok(Value::t()),
        },
        Value::Tuple(bounds) if bounds.len() == 2 => {
            match (&bounds[0], &bounds[1]) {
                (Value::Integer(lo), Value::Integer(hi)) => {
                    let len = items.len() as i64;
                    let lo = if *lo < 0 { lo + len } else { *lo }.clamp(0, len) as usize;
                    let hi = if *hi < 0 { hi + len } else { *hi }.clamp(0, len) as usize;
                    if lo > hi {
                        Ok(Value::list(Vec::new()))
                    } else {
                        Ok(Value::list(items[lo..hi].to_vec()))
                    }
                }
                _ => Ok(Value::t()),
            }
        }
        _ => Ok(Value::t()),
    }
}

fn find_assign(
    environment: &mut Environment,
    stmts: &[Statement],
    name: &str,
) -> Result<Value, RuntimeError> {
    for stmt in stmts.iter().rev() {
        if let Statement::Assign(crate::ast::Lvalue::Name(n), expr) = stmt {
            if n == name {
                return crate::vm::execute(environment, &[Statement::Expr(expr.clone())]);
            }
        }
    }
    Ok(Value::n())
}

/// `@region` expansion over a Tuple or List of `(x_spec, y_spec)` pairs.
pub fn expand_region(region: &Value) -> Result<Value, RuntimeError> {
    let pairs: Vec<Value> = match region {
        Value::List(l) => l.borrow().clone(),
        Value::Tuple(t) => t.as_ref().clone(),
        _ => return Ok(Value::t()),
    };
    let mut out = Vec::new();
    for pair in pairs {
        let (x_spec, y_spec) = match &pair {
            Value::Tuple(items) if items.len() == 2 => (items[0].clone(), items[1].clone()),
            _ => return Ok(Value::t()),
        };
        let xs = expand_spec(&x_spec);
        let ys = expand_spec(&y_spec);
        for x in &xs {
            for y in &ys {
                out.push(Value::tuple(vec![Value::Integer(*x), Value::Integer(*y)]));
            }
        }
    }
    Ok(Value::list(out))
}

fn expand_spec(spec: &Value) -> Vec<i64> {
    match spec {
        Value::Integer(i) => vec![*i],
        Value::Range(l, r) => {
            let (lo, hi) = if l <= r { (*l, *r) } else { (*r, *l) };
            (lo..=hi).collect()
        }
        Value::List(items) => items.borrow().iter().flat_map(expand_spec).collect(),
        _ => Vec::new(),
    }
}

// ---- Stack words ----

pub fn dup(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [a]: [Value; 1] = args.try_into().unwrap();
    Ok(vec![a.clone(), a])
}

pub fn drop_(_env: &mut Environment, _args: Vec<Value>) -> Result<Vec<Value>, String> {
    Ok(vec![])
}

pub fn swap(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [a, b]: [Value; 2] = args.try_into().unwrap();
    Ok(vec![b, a])
}

pub fn over(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [a, b]: [Value; 2] = args.try_into().unwrap();
    Ok(vec![a.clone(), b, a])
}

pub fn rot(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [a, b, c]: [Value; 3] = args.try_into().unwrap();
    Ok(vec![c, b, a])
}

pub fn drop_if_null(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [a]: [Value; 1] = args.try_into().unwrap();
    if a.is_n() {
        Ok(vec![])
    } else {
        Ok(vec![a])
    }
}

pub fn grab(environment: &mut Environment) -> Result<(), RuntimeError> {
    let mut grabbed = Vec::new();
    loop {
        environment.register_operation()?;
        let top = environment.pop();
        if top.is_n() {
            break;
        }
        grabbed.push(top);
    }
    environment.register_operation()?;
    environment.push(Value::list(grabbed));
    Ok(())
}

/// `bloat`: the inverse of `grab`. `grab`'s result list is earliest-popped
/// (original top) first, so restoring the original push order means
/// pushing `$N` followed by the list in reverse.
pub fn bloat(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [list]: [Value; 1] = args.try_into().unwrap();
    let items = match list {
        Value::List(l) => l.borrow().clone(),
        Value::Tuple(t) => t.as_ref().clone(),
        _ => return Err("bloat target is not a list".to_string()),
    };
    let mut out = vec![Value::n()];
    out.extend(items.into_iter().rev());
    Ok(out)
}

pub fn dump_stack(environment: &mut Environment) -> Result<(), RuntimeError> {
    environment.register_operation()?;
    environment.push(Value::list(environment.stack.clone()));
    Ok(())
}

// ---- Collection-building ----

pub fn push(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [list, x]: [Value; 2] = args.try_into().unwrap();
    match list {
        Value::List(l) => {
            let mut items = l.borrow().clone();
            items.push(x);
            Ok(vec![Value::list(items)])
        }
        _ => Err("push target is not a list".to_string()),
    }
}

pub fn last(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [x]: [Value; 1] = args.try_into().unwrap();
    match &x {
        Value::List(l) => l.borrow().last().cloned().ok_or_else(|| "empty list".to_string()),
        Value::Tuple(t) => t.last().cloned().ok_or_else(|| "empty tuple".to_string()),
        _ => Err("not a sequence".to_string()),
    }
    .map(|v| vec![v])
}

pub fn len_(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [x]: [Value; 1] = args.try_into().unwrap();
    let n = match &x {
        Value::List(l) => l.borrow().len(),
        Value::Tuple(t) => t.len(),
        Value::Str(s) => s.chars().count(),
        _ => return Err("no length".to_string()),
    };
    Ok(vec![Value::Integer(n as i64)])
}

pub fn sum_(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [x]: [Value; 1] = args.try_into().unwrap();
    let items = sequence_of(&x)?;
    let mut acc = Value::Integer(0);
    for item in items {
        acc = match (&acc, &item) {
            (Value::Integer(a), Value::Integer(b)) => Value::Integer(a + b),
            _ => {
                let a = as_f64(&acc).ok_or("non-numeric element")?;
                let b = as_f64(&item).ok_or("non-numeric element")?;
                Value::Float(a + b)
            }
        };
    }
    Ok(vec![acc])
}

fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Integer(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

fn sequence_of(v: &Value) -> Result<Vec<Value>, String> {
    match v {
        Value::List(l) => Ok(l.borrow().clone()),
        Value::Tuple(t) => Ok(t.as_ref().clone()),
        _ => Err("not a sequence".to_string()),
    }
}

pub fn rev(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [x]: [Value; 1] = args.try_into().unwrap();
    match x {
        Value::List(l) => {
            let mut items = l.borrow().clone();
            items.reverse();
            Ok(vec![Value::list(items)])
        }
        Value::Tuple(t) => {
            let mut items = t.as_ref().clone();
            items.reverse();
            Ok(vec![Value::tuple(items)])
        }
        Value::Str(s) => Ok(vec![Value::str_(s.chars().rev().collect::<String>())]),
        _ => Err("cannot reverse".to_string()),
    }
}

pub fn contains(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [container, item]: [Value; 2] = args.try_into().unwrap();
    let found = match &container {
        Value::List(l) => l.borrow().iter().any(|v| v == &item),
        Value::Tuple(t) => t.iter().any(|v| v == &item),
        Value::Str(s) => match &item {
            Value::Str(sub) => s.contains(sub.as_ref()),
            _ => false,
        },
        Value::Range(l, r) => match &item {
            Value::Integer(i) => i >= l && i <= r,
            _ => false,
        },
        _ => return Err("not a container".to_string()),
    };
    Ok(vec![Value::Integer(found as i64)])
}

/// `++`: CodeBlock concatenation, or List/String concatenation.
pub fn concat(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [a, b]: [Value; 2] = args.try_into().unwrap();
    match (&a, &b) {
        (Value::CodeBlock(x), Value::CodeBlock(y)) => {
            let mut stmts = x.borrow().stmts.clone();
            stmts.extend(y.borrow().stmts.clone());
            Ok(vec![Value::code_block(stmts)])
        }
        (Value::List(x), Value::List(y)) => {
            let mut items = x.borrow().clone();
            items.extend(y.borrow().clone());
            Ok(vec![Value::list(items)])
        }
        (Value::Str(x), Value::Str(y)) => Ok(vec![Value::str_(format!("{}{}", x, y))]),
        _ => Err("cannot concatenate".to_string()),
    }
}

/// `--`: split a CodeBlock into singleton CodeBlocks.
pub fn codesplit(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [block]: [Value; 1] = args.try_into().unwrap();
    match block {
        Value::CodeBlock(b) => {
            let singles: Vec<Value> = b
                .borrow()
                .stmts
                .iter()
                .map(|s| Value::code_block(vec![s.clone()]))
                .collect();
            Ok(vec![Value::list(singles)])
        }
        _ => Err("not a code block".to_string()),
    }
}

// ---- Strings ----

pub fn ord_(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [s]: [Value; 1] = args.try_into().unwrap();
    match s {
        Value::Str(s) => Ok(s.chars().map(|c| Value::Integer(c as i64)).collect()),
        _ => Err("not a string".to_string()),
    }
}

pub fn chr_(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [n]: [Value; 1] = args.try_into().unwrap();
    match n {
        Value::Integer(n) => {
            let c = char::from_u32(n as u32).ok_or_else(|| "invalid codepoint".to_string())?;
            Ok(vec![Value::str_(c.to_string())])
        }
        _ => Err("not an integer".to_string()),
    }
}

pub fn str_join(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [sep, list]: [Value; 2] = args.try_into().unwrap();
    let sep = match sep {
        Value::Str(s) => s,
        _ => return Err("separator must be a string".to_string()),
    };
    let items = sequence_of(&list)?;
    let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
    Ok(vec![Value::str_(parts.join(&sep))])
}
