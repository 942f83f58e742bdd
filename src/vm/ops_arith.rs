//! Arithmetic, comparison, and logical words.
//!
//! Grounded on `examples/original_source/stekk/vm.py`'s `@vm_onstack(2)`
//! arithmetic methods; the adapter here already delivers arguments in
//! left-to-right order (see `vm::invoke_builtin`), so these read as plain
//! `a op b` rather than `stekk/vm.py`'s top-first `(self, b, a)` signatures.

use crate::env::Environment;
use crate::value::Value;

fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Integer(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

fn numeric_binop(
    a: Value,
    b: Value,
    int_op: impl Fn(i64, i64) -> i64,
    float_op: impl Fn(f64, f64) -> f64,
) -> Result<Value, String> {
    match (&a, &b) {
        (Value::Integer(x), Value::Integer(y)) => Ok(Value::Integer(int_op(*x, *y))),
        _ => match (as_f64(&a), as_f64(&b)) {
            (Some(x), Some(y)) => Ok(Value::Float(float_op(x, y))),
            _ => Err(format!(
                "cannot apply arithmetic to {} and {}",
                a.type_name(),
                b.type_name()
            )),
        },
    }
}

pub fn add(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [a, b]: [Value; 2] = args.try_into().unwrap();
    match (&a, &b) {
        (Value::Str(x), Value::Str(y)) => Ok(vec![Value::str_(format!("{}{}", x, y))]),
        _ => Ok(vec![numeric_binop(a, b, |x, y| x + y, |x, y| x + y)?]),
    }
}

pub fn sub(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [a, b]: [Value; 2] = args.try_into().unwrap();
    Ok(vec![numeric_binop(a, b, |x, y| x - y, |x, y| x - y)?])
}

pub fn mul(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [a, b]: [Value; 2] = args.try_into().unwrap();
    Ok(vec![numeric_binop(a, b, |x, y| x * y, |x, y| x * y)?])
}

pub fn fdiv(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [a, b]: [Value; 2] = args.try_into().unwrap();
    let x = as_f64(&a).ok_or_else(|| "left operand not numeric".to_string())?;
    let y = as_f64(&b).ok_or_else(|| "right operand not numeric".to_string())?;
    Ok(vec![Value::Float(x / y)])
}

pub fn idiv(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [a, b]: [Value; 2] = args.try_into().unwrap();
    match (&a, &b) {
        (Value::Integer(x), Value::Integer(y)) => {
            if *y == 0 {
                return Err("division by zero".to_string());
            }
            Ok(vec![Value::Integer(x.div_euclid(*y))])
        }
        _ => {
            let x = as_f64(&a).ok_or_else(|| "left operand not numeric".to_string())?;
            let y = as_f64(&b).ok_or_else(|| "right operand not numeric".to_string())?;
            Ok(vec![Value::Float((x / y).floor())])
        }
    }
}

pub fn eq(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [a, b]: [Value; 2] = args.try_into().unwrap();
    Ok(vec![Value::Integer((a == b) as i64)])
}

pub fn neq(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [a, b]: [Value; 2] = args.try_into().unwrap();
    Ok(vec![Value::Integer((a != b) as i64)])
}

fn cmp(a: &Value, b: &Value) -> Result<std::cmp::Ordering, String> {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Ok(x.cmp(y)),
        (Value::Str(x), Value::Str(y)) => Ok(x.cmp(y)),
        _ => match (as_f64(a), as_f64(b)) {
            (Some(x), Some(y)) => x
                .partial_cmp(&y)
                .ok_or_else(|| "NaN comparison".to_string()),
            _ => Err(format!(
                "cannot compare {} and {}",
                a.type_name(),
                b.type_name()
            )),
        },
    }
}

pub fn lt(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [a, b]: [Value; 2] = args.try_into().unwrap();
    Ok(vec![Value::Integer(cmp(&a, &b)?.is_lt() as i64)])
}

pub fn gt(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [a, b]: [Value; 2] = args.try_into().unwrap();
    Ok(vec![Value::Integer(cmp(&a, &b)?.is_gt() as i64)])
}

pub fn le(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [a, b]: [Value; 2] = args.try_into().unwrap();
    Ok(vec![Value::Integer(cmp(&a, &b)?.is_le() as i64)])
}

pub fn ge(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [a, b]: [Value; 2] = args.try_into().unwrap();
    Ok(vec![Value::Integer(cmp(&a, &b)?.is_ge() as i64)])
}

pub fn and(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [a, b]: [Value; 2] = args.try_into().unwrap();
    Ok(vec![Value::Integer((a.truthy() && b.truthy()) as i64)])
}

pub fn or(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [a, b]: [Value; 2] = args.try_into().unwrap();
    Ok(vec![Value::Integer((a.truthy() || b.truthy()) as i64)])
}

pub fn not_(_env: &mut Environment, args: Vec<Value>) -> Result<Vec<Value>, String> {
    let [a]: [Value; 1] = args.try_into().unwrap();
    Ok(vec![Value::Integer(!a.truthy() as i64)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{Environment, StdinReader, StdoutPrinter};

    fn env() -> Environment {
        Environment::new(Vec::new(), Box::new(StdoutPrinter), Box::new(StdinReader), 1_000_000)
    }

    #[test]
    fn add_promotes_mixed_to_float() {
        let mut e = env();
        let r = add(&mut e, vec![Value::Integer(1), Value::Float(2.5)]).unwrap();
        assert_eq!(r, vec![Value::Float(3.5)]);
    }

    #[test]
    fn idiv_floors_negative() {
        let mut e = env();
        let r = idiv(&mut e, vec![Value::Integer(-7), Value::Integer(2)]).unwrap();
        assert_eq!(r, vec![Value::Integer(-4)]);
    }

    #[test]
    fn comparisons_push_zero_or_one() {
        let mut e = env();
        assert_eq!(
            lt(&mut e, vec![Value::Integer(1), Value::Integer(2)]).unwrap(),
            vec![Value::Integer(1)]
        );
    }
}
