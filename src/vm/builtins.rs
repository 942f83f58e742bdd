//! # Built-in word table
//!
//! Assembles every native routine in `ops_arith`/`ops_struct`/`ops_control`
//! into `Value::BuiltinWord`s and registers them under their surface names.
//! Grounded on `omg_runtime::vm::builtins`'s table-of-ops
//! shape (a flat name → op lookup built once and cloned into every VM
//! instance) and on `examples/original_source/stekk/vm.py`'s
//! `vm_builtins` dict, populated at import time by the `@vm_onstack`
//! decorators.

use std::collections::HashMap;

use once_cell::unsync::Lazy;

use crate::value::{BuiltinKind, FixedWord, OnEmpty, Value, VariadicWord};

use super::{ops_arith, ops_control, ops_struct};

macro_rules! fixed_word {
    ($static_name:ident, $name:expr, $arity:expr, $help:expr, $on_empty:expr, $func:path) => {
        static $static_name: FixedWord = FixedWord {
            name: $name,
            arity: $arity,
            help: $help,
            on_empty: $on_empty,
            func: $func,
        };
    };
}

fixed_word!(ADD, "+", 2, "a b -- a+b", OnEmpty::PushNothing, ops_arith::add);
fixed_word!(SUB, "-", 2, "a b -- a-b", OnEmpty::PushNothing, ops_arith::sub);
fixed_word!(MUL, "*", 2, "a b -- a*b", OnEmpty::PushNothing, ops_arith::mul);
fixed_word!(FDIV, "/f", 2, "a b -- a/b (float)", OnEmpty::PushNothing, ops_arith::fdiv);
fixed_word!(IDIV, "/i", 2, "a b -- a/b (floor)", OnEmpty::PushNothing, ops_arith::idiv);
fixed_word!(EQ, "=", 2, "a b -- a=b", OnEmpty::PushNothing, ops_arith::eq);
fixed_word!(NEQ, "!=", 2, "a b -- a!=b", OnEmpty::PushNothing, ops_arith::neq);
fixed_word!(LT, "<", 2, "a b -- a<b", OnEmpty::PushNothing, ops_arith::lt);
fixed_word!(GT, ">", 2, "a b -- a>b", OnEmpty::PushNothing, ops_arith::gt);
fixed_word!(LE, "<=", 2, "a b -- a<=b", OnEmpty::PushNothing, ops_arith::le);
fixed_word!(GE, ">=", 2, "a b -- a>=b", OnEmpty::PushNothing, ops_arith::ge);
fixed_word!(AND, "and", 2, "a b -- a and b", OnEmpty::PushNothing, ops_arith::and);
fixed_word!(OR, "or", 2, "a b -- a or b", OnEmpty::PushNothing, ops_arith::or);
fixed_word!(NOT, "not", 1, "a -- not a", OnEmpty::PushNothing, ops_arith::not_);

fixed_word!(DUP, "dup", 1, "a -- a a", OnEmpty::PushNothing, ops_struct::dup);
fixed_word!(DROP, "drop", 1, "a --", OnEmpty::PushNothing, ops_struct::drop_);
fixed_word!(SWAP, "swap", 2, "a b -- b a", OnEmpty::PushNothing, ops_struct::swap);
fixed_word!(OVER, "over", 2, "a b -- a b a", OnEmpty::PushNothing, ops_struct::over);
fixed_word!(ROT, "rot", 3, "a b c -- c b a", OnEmpty::PushNothing, ops_struct::rot);
fixed_word!(
    DROP_IF_NULL,
    "?",
    1,
    "a -- a (drop if $N)",
    OnEmpty::PushNothing,
    ops_struct::drop_if_null
);
fixed_word!(BLOAT, "bloat", 1, "[a,...,c] -- N c ... a", OnEmpty::PushNothing, ops_struct::bloat);

fixed_word!(PUSH, "push", 2, "list x -- list'", OnEmpty::PushNothing, ops_struct::push);
fixed_word!(LAST, "last", 1, "list -- list[-1]", OnEmpty::PushNothing, ops_struct::last);
fixed_word!(LEN, "len", 1, "x -- |x|", OnEmpty::PushNothing, ops_struct::len_);
fixed_word!(SUM, "sum", 1, "list -- sum(list)", OnEmpty::PushNothing, ops_struct::sum_);
fixed_word!(REV, "rev", 1, "x -- reversed(x)", OnEmpty::PushNothing, ops_struct::rev);
fixed_word!(
    CONTAINS,
    "contains",
    2,
    "container item -- 0|1",
    OnEmpty::PushNothing,
    ops_struct::contains
);
fixed_word!(CONCAT, "++", 2, "a b -- a+b", OnEmpty::PushNothing, ops_struct::concat);
fixed_word!(
    CODESPLIT,
    "--",
    1,
    "block -- [singleton blocks]",
    OnEmpty::PushNothing,
    ops_struct::codesplit
);

fixed_word!(ORD, "ord", 1, "s -- c1 c2 ...", OnEmpty::PushNothing, ops_struct::ord_);
fixed_word!(CHR, "chr", 1, "n -- s", OnEmpty::PushNothing, ops_struct::chr_);
fixed_word!(STR_JOIN, "str_join", 2, "sep list -- s", OnEmpty::PushNothing, ops_struct::str_join);

fixed_word!(READ, "read", 0, "-- s", OnEmpty::PushN, ops_control::read);
fixed_word!(PRINT, "print", 1, "x --", OnEmpty::PushNothing, ops_control::print_);
fixed_word!(PRINTLN, "println", 1, "x --", OnEmpty::PushNothing, ops_control::println_);

fixed_word!(AS_SRC, "as_src", 1, "block -- s", OnEmpty::PushNothing, ops_control::as_src);
fixed_word!(HELP, "help", 1, "fn -- s", OnEmpty::PushNothing, ops_control::help_);
fixed_word!(
    SET_HELP,
    "set_help",
    2,
    "block s -- block",
    OnEmpty::PushNothing,
    ops_control::set_help
);
fixed_word!(EVAL, "eval", 1, "value -- value'", OnEmpty::PushNothing, ops_control::eval_);
fixed_word!(IMPORT, "import", 1, "name -- block", OnEmpty::PushNothing, ops_control::import_);
fixed_word!(FOREACH, "foreach", 2, "iterable fn --", OnEmpty::PushNothing, ops_control::foreach);
fixed_word!(PARSE_INT, "parse_int", 1, "x -- n|E", OnEmpty::PushNothing, ops_control::parse_int);
fixed_word!(
    SET_DEFAULT,
    "set_default",
    2,
    "name value --",
    OnEmpty::PushNothing,
    ops_control::set_default
);

static GRAB: VariadicWord = VariadicWord {
    name: "grab",
    help: "... $N -- [list]",
    func: ops_struct::grab,
};

static DUMP_STACK: VariadicWord = VariadicWord {
    name: "__stack",
    help: "-- stack",
    func: ops_struct::dump_stack,
};

static FIXED_WORDS: &[&FixedWord] = &[
    &ADD, &SUB, &MUL, &FDIV, &IDIV, &EQ, &NEQ, &LT, &GT, &LE, &GE, &AND, &OR, &NOT, &DUP, &DROP,
    &SWAP, &OVER, &ROT, &DROP_IF_NULL, &BLOAT, &PUSH, &LAST, &LEN, &SUM, &REV, &CONTAINS, &CONCAT,
    &CODESPLIT, &ORD, &CHR, &STR_JOIN, &READ, &PRINT, &PRINTLN, &AS_SRC, &HELP, &SET_HELP, &EVAL,
    &IMPORT, &FOREACH, &PARSE_INT, &SET_DEFAULT,
];

static VARIADIC_WORDS: &[&VariadicWord] = &[&GRAB, &DUMP_STACK];

thread_local! {
    static BUILTIN_TABLE: Lazy<HashMap<String, Value>> = Lazy::new(|| {
        let mut table = HashMap::new();
        for word in FIXED_WORDS {
            table.insert(
                word.name.to_string(),
                Value::BuiltinWord(BuiltinKind::Fixed(word)),
            );
        }
        for word in VARIADIC_WORDS {
            table.insert(
                word.name.to_string(),
                Value::BuiltinWord(BuiltinKind::Variadic(word)),
            );
        }
        table
    });
}

/// A fresh copy of the built-in word table, used to seed every new
/// `Environment`'s name table.
pub fn builtin_table() -> HashMap<String, Value> {
    BUILTIN_TABLE.with(|t| (**t).clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_arithmetic_words() {
        let table = builtin_table();
        assert!(table.contains_key("+"));
        assert!(table.contains_key("dup"));
        assert!(table.contains_key("grab"));
        assert!(table.contains_key("set_default"));
    }
}
