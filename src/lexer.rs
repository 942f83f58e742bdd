//! # Lexer
//!
//! Hand-rolled tokenizer grounded on `navicore-cem3`'s
//! `compiler::parser::Token` pattern (`text`/`line`/`column` triples fed to
//! a recursive-descent parser).

use std::rc::Rc;

use crate::error::SyntaxError;

#[derive(Clone, Debug, PartialEq)]
pub enum TokKind {
    Integer(i64),
    Float(f64),
    Str(Rc<str>),
    Ident(String),
    Else,
    While,
    Semi,
    Eq,
    Comma,
    Dot,
    Hash,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    DotDot,
    FatArrow,
    At,
    Dollar,
    Op(&'static str),
    Eof,
}

#[derive(Clone, Debug)]
pub struct Token {
    pub kind: TokKind,
    pub line: usize,
    pub column: usize,
}

const OPERATORS: &[&str] = &[
    "!=", "<=", ">=", "++", "--", "+", "-", "*", "<", ">",
];

pub fn lex(src: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = src.chars().collect();
    let mut i = 0usize;
    let mut line = 1usize;
    let mut col = 1usize;

    macro_rules! advance {
        ($n:expr) => {{
            for _ in 0..$n {
                if i < chars.len() {
                    if chars[i] == '\n' {
                        line += 1;
                        col = 1;
                    } else {
                        col += 1;
                    }
                    i += 1;
                }
            }
        }};
    }

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            advance!(1);
            continue;
        }

        if c == '/' && chars.get(i + 1) == Some(&'/') {
            while i < chars.len() && chars[i] != '\n' {
                advance!(1);
            }
            continue;
        }

        let start_line = line;
        let start_col = col;

        if c == '"' {
            advance!(1);
            let mut s = String::new();
            loop {
                if i >= chars.len() {
                    return Err(SyntaxError {
                        line: start_line,
                        context: s,
                        hint: "unterminated string literal".to_string(),
                    });
                }
                let ch = chars[i];
                if ch == '"' {
                    advance!(1);
                    break;
                }
                if ch == '\\' {
                    advance!(1);
                    let esc = chars.get(i).copied().unwrap_or('"');
                    match esc {
                        'n' => s.push('\n'),
                        't' => s.push('\t'),
                        '"' => s.push('"'),
                        '\\' => s.push('\\'),
                        other => s.push(other),
                    }
                    advance!(1);
                } else {
                    s.push(ch);
                    advance!(1);
                }
            }
            tokens.push(Token {
                kind: TokKind::Str(Rc::from(s.as_str())),
                line: start_line,
                column: start_col,
            });
            continue;
        }

        if c.is_ascii_digit() {
            let mut s = String::new();
            while i < chars.len() && chars[i].is_ascii_digit() {
                s.push(chars[i]);
                advance!(1);
            }
            if i < chars.len()
                && chars[i] == '.'
                && chars.get(i + 1).map_or(false, |d| d.is_ascii_digit())
            {
                s.push('.');
                advance!(1);
                while i < chars.len() && chars[i].is_ascii_digit() {
                    s.push(chars[i]);
                    advance!(1);
                }
                let value: f64 = s.parse().map_err(|_| SyntaxError {
                    line: start_line,
                    context: s.clone(),
                    hint: "invalid float literal".to_string(),
                })?;
                tokens.push(Token {
                    kind: TokKind::Float(value),
                    line: start_line,
                    column: start_col,
                });
            } else {
                let value: i64 = s.parse().map_err(|_| SyntaxError {
                    line: start_line,
                    context: s.clone(),
                    hint: "invalid integer literal".to_string(),
                })?;
                tokens.push(Token {
                    kind: TokKind::Integer(value),
                    line: start_line,
                    column: start_col,
                });
            }
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let mut s = String::new();
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                s.push(chars[i]);
                advance!(1);
            }
            let kind = match s.as_str() {
                "else" => TokKind::Else,
                "while" => TokKind::While,
                "and" | "or" | "not" => TokKind::Ident(s),
                _ => TokKind::Ident(s),
            };
            tokens.push(Token {
                kind,
                line: start_line,
                column: start_col,
            });
            continue;
        }

        // multi-char punctuation before single-char
        if c == '.' && chars.get(i + 1) == Some(&'.') {
            advance!(2);
            tokens.push(Token {
                kind: TokKind::DotDot,
                line: start_line,
                column: start_col,
            });
            continue;
        }
        if c == '=' && chars.get(i + 1) == Some(&'>') {
            advance!(2);
            tokens.push(Token {
                kind: TokKind::FatArrow,
                line: start_line,
                column: start_col,
            });
            continue;
        }

        let mut matched_op = None;
        for op in OPERATORS {
            if chars[i..].iter().take(op.len()).collect::<String>() == *op {
                matched_op = Some(*op);
                break;
            }
        }
        if let Some(op) = matched_op {
            advance!(op.len());
            tokens.push(Token {
                kind: TokKind::Op(op),
                line: start_line,
                column: start_col,
            });
            continue;
        }

        let single = match c {
            ';' => Some(TokKind::Semi),
            '=' => Some(TokKind::Eq),
            ',' => Some(TokKind::Comma),
            '.' => Some(TokKind::Dot),
            '#' => Some(TokKind::Hash),
            '(' => Some(TokKind::LParen),
            ')' => Some(TokKind::RParen),
            '[' => Some(TokKind::LBracket),
            ']' => Some(TokKind::RBracket),
            '{' => Some(TokKind::LBrace),
            '}' => Some(TokKind::RBrace),
            '@' => Some(TokKind::At),
            '$' => Some(TokKind::Dollar),
            '?' => Some(TokKind::Op("?")),
            '/' => {
                if chars.get(i + 1) == Some(&'f') {
                    advance!(2);
                    tokens.push(Token {
                        kind: TokKind::Op("/f"),
                        line: start_line,
                        column: start_col,
                    });
                    continue;
                } else if chars.get(i + 1) == Some(&'i') {
                    advance!(2);
                    tokens.push(Token {
                        kind: TokKind::Op("/i"),
                        line: start_line,
                        column: start_col,
                    });
                    continue;
                }
                None
            }
            _ => None,
        };

        match single {
            Some(kind) => {
                advance!(1);
                tokens.push(Token {
                    kind,
                    line: start_line,
                    column: start_col,
                });
            }
            None => {
                return Err(SyntaxError {
                    line: start_line,
                    context: c.to_string(),
                    hint: format!("unexpected character '{}'", c),
                });
            }
        }
    }

    tokens.push(Token {
        kind: TokKind::Eof,
        line,
        column: col,
    });
    Ok(tokens)
}
