//! I/O and meta words: reading input, printing, source round-tripping,
//! help text, evaluation, module loading, iteration, and defaulting.
//! `import` and `set_default` are additionally grounded on
//! `examples/original_source/stekk/__init__.py`'s `loadf` (read a file,
//! parse, run) and `vm.py`'s `set_default` method respectively.

use std::path::Path;

use crate::ast::statements_to_src;
use crate::env::Environment;
use crate::value::Value;

pub fn read(environment: &mut Environment, _args: Vec<Value>) -> Result<Vec<Value>, String> {
    match environment.reader.read_line() {
        Some(line) => Ok(vec![Value::str_(line)]),
        None => Ok(vec![Value::n()]),
    }
}

pub fn print_(environment: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [a]: [Value; 1] = args.try_into().unwrap();
    environment.printer.print(&a.to_string());
    Ok(vec![])
}

pub fn println_(environment: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [a]: [Value; 1] = args.try_into().unwrap();
    environment.printer.println(&a.to_string());
    Ok(vec![])
}

pub fn as_src(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [block]: [Value; 1] = args.try_into().unwrap();
    match block {
        Value::CodeBlock(b) => Ok(vec![Value::str_(statements_to_src(&b.borrow().stmts, 0))]),
        _ => Err("not a code block".to_string()),
    }
}

pub fn help_(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [callable]: [Value; 1] = args.try_into().unwrap();
    match callable {
        Value::BuiltinWord(kind) => Ok(vec![Value::str_(kind.help())]),
        Value::CodeBlock(b) => Ok(vec![Value::str_(b.borrow().help.clone().unwrap_or_default())]),
        _ => Err("not callable".to_string()),
    }
}

pub fn set_help(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [block, text]: [Value; 2] = args.try_into().unwrap();
    match (&block, &text) {
        (Value::CodeBlock(b), Value::Str(s)) => {
            b.borrow_mut().help = Some(s.to_string());
            Ok(vec![block])
        }
        _ => Err("set_help requires a code block and a string".to_string()),
    }
}

/// `eval value -- value'`. This value model has no first-class
/// "Expression" variant distinct from a bound `CodeBlock`, so there is
/// nothing to evaluate that wasn't already evaluated on its way here;
/// this word is therefore identity.
pub fn eval_(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [value]: [Value; 1] = args.try_into().unwrap();
    Ok(vec![value])
}

pub fn import_(environment: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [name]: [Value; 1] = args.try_into().unwrap();
    let name = match name {
        Value::Str(s) => s,
        _ => return Err("import name must be a string".to_string()),
    };
    let path = format!("{}.stekk", name);
    let source =
        std::fs::read_to_string(&path).map_err(|e| format!("cannot read {}: {}", path, e))?;
    let stmts = crate::parser::parse(&source).map_err(|e| e.to_string())?;
    let block = Value::code_block(stmts);
    let basename = Path::new(name.as_ref())
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name.as_ref())
        .to_string();
    environment.assign_name(&basename, block.clone());
    Ok(vec![block])
}

pub fn foreach(environment: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [iterable, function]: [Value; 2] = args.try_into().unwrap();
    let items = iterable_items(&iterable)?;
    for item in items {
        environment.register_operation().map_err(|e| e.to_string())?;
        environment.push(item);
        crate::vm::invoke(environment, &function).map_err(|e| e.to_string())?;
    }
    Ok(vec![])
}

fn iterable_items(value: &Value) -> Result<Vec<Value>, String> {
    match value {
        Value::List(l) => Ok(l.borrow().clone()),
        Value::Tuple(t) => Ok(t.as_ref().clone()),
        Value::Range(l, r) => Ok((*l..=*r).map(Value::Integer).collect()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::str_(c.to_string())).collect()),
        _ => Err("not iterable".to_string()),
    }
}

pub fn parse_int(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [x]: [Value; 1] = args.try_into().unwrap();
    let text = match &x {
        Value::Str(s) => s.to_string(),
        Value::Integer(i) => return Ok(vec![Value::Integer(*i)]),
        Value::Float(f) => return Ok(vec![Value::Integer(*f as i64)]),
        _ => return Ok(vec![Value::e()]),
    };
    match text.trim().parse::<i64>() {
        Ok(n) => Ok(vec![Value::Integer(n)]),
        Err(_) => Ok(vec![Value::e()]),
    }
}

pub fn set_default(environment: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [name, value]: [Value; 2] = args.try_into().unwrap();
    let name = match name {
        Value::Str(s) => s.to_string(),
        Value::Const(s) => s.to_string(),
        _ => return Err("set_default name must be a string or const".to_string()),
    };
    if environment.get_name(&name).is_none() {
        environment.assign_name(&name, value);
    }
    Ok(vec![])
}
