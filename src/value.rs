//! # Value Representation for the stekk VM
//!
//! This module defines [`Value`], the tagged-union runtime type that lives
//! on the operand stack, in the name table, and inside lists/tuples.
//!
//! ## Variants
//! - `Integer(i64)` / `Float(f64)` — the arithmetic domain.
//! - `Str(Rc<str>)` — immutable UTF-8 text, indexable by codepoint.
//! - `List(Rc<RefCell<Vec<Value>>>)` — mutable, reference-counted, shared.
//! - `Tuple(Rc<Vec<Value>>)` — immutable, reference-counted.
//! - `Range(i64, i64)` — inclusive integer range, `(left, right)`.
//! - `CodeBlock(Rc<RefCell<CodeBlockData>>)` — a first-class function value;
//!   mutable because `set_help` attaches a help string after creation.
//! - `BuiltinWord(BuiltinKind)` — a reference into the static built-in table.
//! - `Const(Rc<str>)` — an interned symbolic sentinel (`N`, `E`, `T`, `OK`,
//!   or any other auto-interned name).
//!
//! ## Design
//! - `Rc<RefCell<...>>` gives Lists and CodeBlocks reference semantics:
//!   mutation through one handle is visible through every other handle that
//!   shares it, matching the language's sharing rules.
//! - Strings, Tuples, Ranges, Integers, Floats and Consts are value-typed:
//!   cloning a `Value` of one of these never lets one copy observe mutation
//!   through another.
//! - Truthiness of a `Const` is a pure function of its name (`N`, `E`, `T`
//!   are the only falsy names) so there is no interning table to maintain;
//!   "auto-interned on first use" just means "any other name is truthy".

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::ast::Statement;
use crate::env::Environment;

/// A first-class code block: an ordered statement list plus an optional
/// user-attached help string (`set_help`).
pub struct CodeBlockData {
    pub stmts: Vec<Statement>,
    pub help: Option<String>,
}

pub type CodeBlockRef = Rc<RefCell<CodeBlockData>>;

/// What a fixed-arity built-in should push when its native routine returns
/// no values at all. Per-word policy, fixed at registration.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum OnEmpty {
    /// The routine is self-managing; push nothing (e.g. `print`, `println`).
    PushNothing,
    /// Push `$N` (the strict variant).
    PushN,
}

/// A fixed-arity built-in word, lifted into the uniform stack-consuming
/// adapter every built-in goes through.
pub struct FixedWord {
    pub name: &'static str,
    pub arity: usize,
    pub help: &'static str,
    pub on_empty: OnEmpty,
    pub func: fn(&mut Environment, Vec<Value>) -> Result<Vec<Value>, String>,
}

/// A variable-arity built-in (`grab`, `__stack`) that bypasses the adapter
/// and manipulates the stack directly.
pub struct VariadicWord {
    pub name: &'static str,
    pub help: &'static str,
    pub func: fn(&mut Environment) -> Result<(), crate::error::RuntimeError>,
}

#[derive(Clone, Copy)]
pub enum BuiltinKind {
    Fixed(&'static FixedWord),
    Variadic(&'static VariadicWord),
}

impl BuiltinKind {
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinKind::Fixed(w) => w.name,
            BuiltinKind::Variadic(w) => w.name,
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            BuiltinKind::Fixed(w) => w.help,
            BuiltinKind::Variadic(w) => w.help,
        }
    }
}

/// Runtime value for the stack, the name table, and compound data.
#[derive(Clone)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Str(Rc<str>),
    List(Rc<RefCell<Vec<Value>>>),
    Tuple(Rc<Vec<Value>>),
    Range(i64, i64),
    CodeBlock(CodeBlockRef),
    BuiltinWord(BuiltinKind),
    Const(Rc<str>),
}

/// Names with falsy `Const` truthiness; every other name — including `OK`
/// and any other auto-interned name — is truthy.
const FALSY_CONST_NAMES: [&str; 3] = ["N", "E", "T"];

impl Value {
    pub fn const_(name: &str) -> Value {
        Value::Const(Rc::from(name))
    }

    pub fn n() -> Value {
        Value::const_("N")
    }

    pub fn e() -> Value {
        Value::const_("E")
    }

    pub fn t() -> Value {
        Value::const_("T")
    }

    pub fn ok() -> Value {
        Value::const_("OK")
    }

    pub fn str_(s: impl Into<Rc<str>>) -> Value {
        Value::Str(s.into())
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn tuple(items: Vec<Value>) -> Value {
        Value::Tuple(Rc::new(items))
    }

    pub fn code_block(stmts: Vec<Statement>) -> Value {
        Value::CodeBlock(Rc::new(RefCell::new(CodeBlockData { stmts, help: None })))
    }

    pub fn is_n(&self) -> bool {
        matches!(self, Value::Const(name) if &**name == "N")
    }

    /// Whether a value counts as true in an `if`/`while` condition.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Integer(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(l) => !l.borrow().is_empty(),
            Value::Tuple(t) => !t.is_empty(),
            Value::Range(_, _) => true,
            Value::CodeBlock(c) => !c.borrow().stmts.is_empty(),
            Value::BuiltinWord(_) => true,
            Value::Const(name) => !FALSY_CONST_NAMES.contains(&name.as_ref()),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Integer",
            Value::Float(_) => "Float",
            Value::Str(_) => "String",
            Value::List(_) => "List",
            Value::Tuple(_) => "Tuple",
            Value::Range(_, _) => "Range",
            Value::CodeBlock(_) => "CodeBlock",
            Value::BuiltinWord(_) => "BuiltinWord",
            Value::Const(_) => "Const",
        }
    }
}

impl PartialEq for Value {
    /// Structural, cross-variant-false equality, except that Integer and
    /// Float compare numerically against each other.
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Integer(a), Integer(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Integer(a), Float(b)) | (Float(b), Integer(a)) => (*a as f64) == *b,
            (Str(a), Str(b)) => a == b,
            (List(a), List(b)) => *a.borrow() == *b.borrow(),
            (Tuple(a), Tuple(b)) => a == b,
            (Range(al, ar), Range(bl, br)) => al == bl && ar == br,
            (Const(a), Const(b)) => a == b,
            (CodeBlock(a), CodeBlock(b)) => Rc::ptr_eq(a, b),
            (BuiltinWord(a), BuiltinWord(b)) => a.name() == b.name(),
            _ => false,
        }
    }
}

/// Reuses `Display` rather than deriving: the AST types a `CodeBlock` holds
/// don't carry `Debug` themselves (there's no need for it outside tests),
/// and test assertions only need *some* readable representation to print
/// on failure.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn helper(v: &Value, f: &mut fmt::Formatter<'_>, seen: &mut Vec<usize>) -> fmt::Result {
            match v {
                Value::Integer(i) => write!(f, "{}", i),
                Value::Float(x) => write!(f, "{}", x),
                Value::Str(s) => write!(f, "{}", s),
                Value::List(list) => {
                    let ptr = Rc::as_ptr(list) as usize;
                    if seen.contains(&ptr) {
                        return write!(f, "[...]");
                    }
                    seen.push(ptr);
                    write!(f, "[")?;
                    let borrowed = list.borrow();
                    for (i, item) in borrowed.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        helper(item, f, seen)?;
                    }
                    write!(f, "]")
                }
                Value::Tuple(items) => {
                    write!(f, "(")?;
                    for (i, item) in items.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        helper(item, f, seen)?;
                    }
                    if items.len() == 1 {
                        write!(f, ",")?;
                    }
                    write!(f, ")")
                }
                Value::Range(l, r) => write!(f, "{}..{}", l, r),
                Value::CodeBlock(_) => write!(f, "<code block>"),
                Value::BuiltinWord(w) => write!(f, "<built-in {}>", w.name()),
                Value::Const(name) => write!(f, "${}", name),
            }
        }
        let mut seen = Vec::new();
        helper(self, f, &mut seen)
    }
}
