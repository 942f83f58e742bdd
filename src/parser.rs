//! # Recursive-descent parser
//!
//! Builds the `ast` node set directly from the token stream; grounded on
//! `examples/navicore-cem3`'s hand-rolled `Parser` shape (owns the token
//! vector and a cursor, `peek`/`advance`/`expect` helpers) since the
//! teacher repo has no native parser of its own.

use crate::ast::{Expression, Lvalue, Statement};
use crate::error::SyntaxError;
use crate::lexer::{lex, TokKind, Token};

pub fn parse(src: &str) -> Result<Vec<Statement>, SyntaxError> {
    let tokens = lex(src)?;
    let mut parser = Parser { tokens, pos: 0, src };
    parser.parse_program()
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    src: &'a str,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, kind: &TokKind) -> bool {
        &self.peek().kind == kind
    }

    fn check_op(&self, op: &str) -> bool {
        matches!(&self.peek().kind, TokKind::Op(o) if *o == op)
    }

    fn check_ident(&self, word: &str) -> bool {
        matches!(&self.peek().kind, TokKind::Ident(s) if s == word)
    }

    fn expect(&mut self, kind: &TokKind, what: &str) -> Result<(), SyntaxError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.err_here(&format!("expected '{}'", what)))
        }
    }

    fn expect_ident(&mut self) -> Result<String, SyntaxError> {
        match self.peek().kind.clone() {
            TokKind::Ident(s) => {
                self.advance();
                Ok(s)
            }
            _ => Err(self.err_here("expected an identifier")),
        }
    }

    /// Reads the name of a word being invoked after a `.`. Most built-ins
    /// are plain identifiers (`.len`, `.grab`), but the operator words
    /// (`.+`, `.++`, `.=`, ...) lex as punctuation rather than `Ident`, so
    /// this also accepts those tokens as the word's surface name.
    fn expect_word_name(&mut self) -> Result<String, SyntaxError> {
        match self.peek().kind.clone() {
            TokKind::Ident(s) => {
                self.advance();
                Ok(s)
            }
            TokKind::Op(s) => {
                self.advance();
                Ok(s.to_string())
            }
            TokKind::Eq => {
                self.advance();
                Ok("=".to_string())
            }
            _ => Err(self.err_here("expected a word name")),
        }
    }

    /// Mirrors `UnexpectedInput.get_context(program)`: the offending source
    /// line with a caret planted under the column where the token starts.
    fn err_here(&self, hint: &str) -> SyntaxError {
        let tok = self.peek();
        let line_text = self.src.lines().nth(tok.line.saturating_sub(1)).unwrap_or("");
        let caret_col = tok.column.saturating_sub(1);
        let caret = format!("{}^", " ".repeat(caret_col));
        SyntaxError {
            line: tok.line,
            context: format!("{}\n{}", line_text, caret),
            hint: hint.to_string(),
        }
    }

    fn parse_program(&mut self) -> Result<Vec<Statement>, SyntaxError> {
        let stmts = self.parse_statement_list()?;
        if !self.check(&TokKind::Eof) {
            return Err(self.err_here("expected ';' or end of input"));
        }
        Ok(stmts)
    }

    fn parse_statement_list(&mut self) -> Result<Vec<Statement>, SyntaxError> {
        let mut stmts = Vec::new();
        while !self.check(&TokKind::Eof) && !self.check(&TokKind::RBrace) {
            let stmt = self.parse_statement()?;
            stmts.push(stmt);
            if self.check(&TokKind::Semi) {
                self.advance();
            } else if self.check(&TokKind::Eof) || self.check(&TokKind::RBrace) {
                break;
            } else {
                return Err(self.err_here("expected ';' to end statement"));
            }
        }
        Ok(stmts)
    }

    fn parse_statement(&mut self) -> Result<Statement, SyntaxError> {
        let save = self.pos;
        if let Some(lvalue) = self.try_parse_lvalue() {
            if self.check(&TokKind::Eq) {
                self.advance();
                let expr = self.parse_expression()?;
                return Ok(Statement::Assign(lvalue, expr));
            }
        }
        self.pos = save;

        let cond = self.parse_or_expr()?;
        if self.check(&TokKind::FatArrow) {
            self.advance();
            let then_ = self.parse_or_expr()?;
            if self.check(&TokKind::Else) {
                self.advance();
                let else_ = self.parse_or_expr()?;
                return Ok(Statement::Expr(Expression::IfElse(
                    Box::new(cond),
                    Box::new(then_),
                    Box::new(else_),
                )));
            }
            return Ok(Statement::Expr(Expression::IfElse(
                Box::new(cond),
                Box::new(then_),
                Box::new(Expression::Block(Vec::new())),
            )));
        }
        Ok(Statement::Expr(cond))
    }

    /// Tentatively parse `IDENT ('#' expression)*` as an lvalue. Does not
    /// roll back on failure — callers must save/restore `self.pos`.
    fn try_parse_lvalue(&mut self) -> Option<Lvalue> {
        let name = match self.peek().kind.clone() {
            TokKind::Ident(s) => s,
            _ => return None,
        };
        self.advance();
        let mut lvalue = Lvalue::Name(name.clone());
        let mut target = Expression::Name(name);
        while self.check(&TokKind::Hash) {
            self.advance();
            let idx = match self.parse_or_expr() {
                Ok(e) => e,
                Err(_) => return None,
            };
            lvalue = Lvalue::Index(Box::new(target.clone()), Box::new(idx.clone()));
            target = Expression::Index(Box::new(target), Box::new(idx));
        }
        Some(lvalue)
    }

    /// `if_else_expr`: the nestable expression-level conditional, mandatory
    /// `else` if `=>` is present (the no-`else` form is statement-only
    /// sugar, handled by `parse_statement`).
    fn parse_expression(&mut self) -> Result<Expression, SyntaxError> {
        let cond = self.parse_or_expr()?;
        if self.check(&TokKind::FatArrow) {
            self.advance();
            let then_ = self.parse_or_expr()?;
            self.expect(&TokKind::Else, "else")?;
            let else_ = self.parse_or_expr()?;
            return Ok(Expression::IfElse(
                Box::new(cond),
                Box::new(then_),
                Box::new(else_),
            ));
        }
        Ok(cond)
    }

    fn parse_or_expr(&mut self) -> Result<Expression, SyntaxError> {
        let mut left = self.parse_and_expr()?;
        while self.check_ident("or") {
            self.advance();
            let right = self.parse_and_expr()?;
            left = desugar_binary(left, "or", right);
        }
        Ok(left)
    }

    fn parse_and_expr(&mut self) -> Result<Expression, SyntaxError> {
        let mut left = self.parse_eq_expr()?;
        while self.check_ident("and") {
            self.advance();
            let right = self.parse_eq_expr()?;
            left = desugar_binary(left, "and", right);
        }
        Ok(left)
    }

    fn parse_eq_expr(&mut self) -> Result<Expression, SyntaxError> {
        let mut left = self.parse_rel_expr()?;
        loop {
            if self.check(&TokKind::Eq) {
                self.advance();
                let right = self.parse_rel_expr()?;
                left = desugar_binary(left, "=", right);
            } else if self.check_op("!=") {
                self.advance();
                let right = self.parse_rel_expr()?;
                left = desugar_binary(left, "!=", right);
            } else {
                break;
            }
        }
        Ok(left)
    }

    fn parse_rel_expr(&mut self) -> Result<Expression, SyntaxError> {
        let mut left = self.parse_add_expr()?;
        loop {
            let op = ["<=", ">=", "<", ">"].into_iter().find(|o| self.check_op(o));
            match op {
                Some(op) => {
                    self.advance();
                    let right = self.parse_add_expr()?;
                    left = desugar_binary(left, op, right);
                }
                None => break,
            }
        }
        Ok(left)
    }

    fn parse_add_expr(&mut self) -> Result<Expression, SyntaxError> {
        let mut left = self.parse_mul_expr()?;
        loop {
            let op = ["+", "-"].into_iter().find(|o| self.check_op(o));
            match op {
                Some(op) => {
                    self.advance();
                    let right = self.parse_mul_expr()?;
                    left = desugar_binary(left, op, right);
                }
                None => break,
            }
        }
        Ok(left)
    }

    fn parse_mul_expr(&mut self) -> Result<Expression, SyntaxError> {
        let mut left = self.parse_range_expr()?;
        loop {
            let op = ["*", "/f", "/i"].into_iter().find(|o| self.check_op(o));
            match op {
                Some(op) => {
                    self.advance();
                    let right = self.parse_range_expr()?;
                    left = desugar_binary(left, op, right);
                }
                None => break,
            }
        }
        Ok(left)
    }

    fn parse_range_expr(&mut self) -> Result<Expression, SyntaxError> {
        let left = self.parse_unary_expr()?;
        if self.check(&TokKind::DotDot) {
            self.advance();
            let right = self.parse_unary_expr()?;
            return Ok(Expression::Range(Box::new(left), Box::new(right)));
        }
        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> Result<Expression, SyntaxError> {
        if self.check_ident("not") {
            self.advance();
            let operand = self.parse_unary_expr()?;
            return Ok(desugar_unary("not", operand));
        }
        if self.check_op("-") {
            self.advance();
            let operand = self.parse_unary_expr()?;
            return Ok(Expression::Stack(vec![
                Expression::Integer(0),
                operand,
                Expression::Fcall(Box::new(Expression::Name("-".to_string()))),
            ]));
        }
        self.parse_postfix_expr()
    }

    fn parse_postfix_expr(&mut self) -> Result<Expression, SyntaxError> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.check(&TokKind::Dot) {
                self.advance();
                let name = self.expect_word_name()?;
                expr = Expression::Stack(vec![
                    expr,
                    Expression::Fcall(Box::new(Expression::Name(name))),
                ]);
            } else if self.check(&TokKind::LBracket) {
                self.advance();
                let idx = self.parse_expression()?;
                self.expect(&TokKind::RBracket, "]")?;
                expr = Expression::Index(Box::new(expr), Box::new(idx));
            } else if self.check(&TokKind::Hash) {
                self.advance();
                let idx = self.parse_or_expr()?;
                expr = Expression::Index(Box::new(expr), Box::new(idx));
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expression, SyntaxError> {
        match self.peek().kind.clone() {
            TokKind::Integer(n) => {
                self.advance();
                Ok(Expression::Integer(n))
            }
            TokKind::Float(x) => {
                self.advance();
                Ok(Expression::Float(x))
            }
            TokKind::Str(s) => {
                self.advance();
                Ok(Expression::Str(s))
            }
            TokKind::Dollar => {
                self.advance();
                let name = self.expect_ident()?;
                Ok(Expression::Name(format!("${}", name)))
            }
            TokKind::Ident(name) => {
                self.advance();
                Ok(Expression::Name(name))
            }
            TokKind::LParen => self.parse_group(),
            TokKind::LBracket => self.parse_list(),
            TokKind::LBrace => self.parse_block(),
            TokKind::At => {
                self.advance();
                let inner = self.parse_primary()?;
                Ok(Expression::At(Box::new(inner)))
            }
            TokKind::Dot => {
                self.advance();
                let name = self.expect_word_name()?;
                Ok(Expression::Fcall(Box::new(Expression::Name(name))))
            }
            TokKind::While => {
                self.advance();
                let cond = self.parse_expression()?;
                self.expect(&TokKind::FatArrow, "=>")?;
                let body = self.parse_expression()?;
                Ok(Expression::While(Box::new(cond), Box::new(body)))
            }
            _ => Err(self.err_here("expected an expression")),
        }
    }

    fn parse_group(&mut self) -> Result<Expression, SyntaxError> {
        self.advance(); // '('
        if self.check(&TokKind::RParen) {
            self.advance();
            return Ok(Expression::Stack(Vec::new()));
        }
        let mut items = vec![self.parse_expression()?];
        let mut is_tuple = false;
        while self.check(&TokKind::Comma) {
            is_tuple = true;
            self.advance();
            if self.check(&TokKind::RParen) {
                break;
            }
            items.push(self.parse_expression()?);
        }
        if !self.check(&TokKind::RParen) {
            // Stack form also accepts bare space-separated items with no comma.
            while !self.check(&TokKind::RParen) && !self.check(&TokKind::Eof) {
                items.push(self.parse_expression()?);
            }
        }
        if !self.check(&TokKind::RParen) {
            return Err(self.err_here("expected ')'"));
        }
        self.advance();
        if is_tuple {
            Ok(Expression::TupleExpr(items))
        } else {
            Ok(Expression::Stack(items))
        }
    }

    fn parse_list(&mut self) -> Result<Expression, SyntaxError> {
        self.advance(); // '['
        let mut items = Vec::new();
        if !self.check(&TokKind::RBracket) {
            items.push(self.parse_expression()?);
            while self.check(&TokKind::Comma) {
                self.advance();
                if self.check(&TokKind::RBracket) {
                    break;
                }
                items.push(self.parse_expression()?);
            }
        }
        if !self.check(&TokKind::RBracket) {
            return Err(self.err_here("expected ']'"));
        }
        self.advance();
        Ok(Expression::ListExpr(items))
    }

    fn parse_block(&mut self) -> Result<Expression, SyntaxError> {
        self.advance(); // '{'
        let stmts = self.parse_statement_list()?;
        if !self.check(&TokKind::RBrace) {
            return Err(self.err_here("expected '}'"));
        }
        self.advance();
        Ok(Expression::Block(stmts))
    }
}

fn desugar_binary(left: Expression, op: &str, right: Expression) -> Expression {
    Expression::Stack(vec![
        left,
        right,
        Expression::Fcall(Box::new(Expression::Name(op.to_string()))),
    ])
}

fn desugar_unary(op: &str, operand: Expression) -> Expression {
    Expression::Stack(vec![
        operand,
        Expression::Fcall(Box::new(Expression::Name(op.to_string()))),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parses(src: &str) -> Vec<Statement> {
        parse(src).unwrap_or_else(|e| panic!("parse failed for {:?}: {}", src, e))
    }

    #[test]
    fn parses_simple_assignment() {
        let stmts = parses("x = 1;");
        assert_eq!(stmts.len(), 1);
        match &stmts[0] {
            Statement::Assign(Lvalue::Name(n), Expression::Integer(1)) => assert_eq!(n, "x"),
            _ => panic!("wrong shape"),
        }
    }

    #[test]
    fn parses_infix_comparison_as_stack_fcall() {
        let stmts = parses("i <= n;");
        match &stmts[0] {
            Statement::Expr(Expression::Stack(items)) => {
                assert_eq!(items.len(), 3);
            }
            _ => panic!("expected desugared stack form"),
        }
    }

    #[test]
    fn distinguishes_tuple_from_stack() {
        let stmts = parses("(1, 2);");
        match &stmts[0] {
            Statement::Expr(Expression::TupleExpr(items)) => assert_eq!(items.len(), 2),
            _ => panic!("expected tuple"),
        }
        let stmts = parses("(1 2);");
        match &stmts[0] {
            Statement::Expr(Expression::Stack(items)) => assert_eq!(items.len(), 2),
            _ => panic!("expected stack"),
        }
    }

    #[test]
    fn parses_if_then_without_else() {
        let stmts = parses("1 => 2;");
        match &stmts[0] {
            Statement::Expr(Expression::IfElse(_, _, else_)) => match &**else_ {
                Expression::Block(b) => assert!(b.is_empty()),
                _ => panic!("expected empty block else"),
            },
            _ => panic!("expected if-then"),
        }
    }

    #[test]
    fn parses_while_loop() {
        let stmts = parses("while i <= n => i;");
        assert!(matches!(
            stmts[0],
            Statement::Expr(Expression::While(_, _))
        ));
    }

    #[test]
    fn parses_const_literal() {
        let stmts = parses("$N;");
        match &stmts[0] {
            Statement::Expr(Expression::Name(n)) => assert_eq!(n, "$N"),
            _ => panic!("expected name node carrying sigil"),
        }
    }

    #[test]
    fn bare_dot_word_is_its_own_primary() {
        let stmts = parses("(2 3 .+);");
        match &stmts[0] {
            Statement::Expr(Expression::Stack(items)) => {
                assert_eq!(items.len(), 3);
                match &items[2] {
                    Expression::Fcall(target) => match &**target {
                        Expression::Name(n) => assert_eq!(n, "+"),
                        _ => panic!("expected a bare name callee"),
                    },
                    _ => panic!("expected the third item to be a bare .word call"),
                }
            }
            _ => panic!("expected a stack form"),
        }
    }

    #[test]
    fn bare_dot_word_accepts_operator_symbol_names() {
        for word in ["++", "?", "<="] {
            let src = format!("(1 .{});", word);
            let stmts = parses(&src);
            match &stmts[0] {
                Statement::Expr(Expression::Stack(items)) => match &items[1] {
                    Expression::Fcall(target) => match &**target {
                        Expression::Name(n) => assert_eq!(n, word),
                        _ => panic!("expected a bare name callee for {:?}", word),
                    },
                    _ => panic!("expected a bare .word call for {:?}", word),
                },
                _ => panic!("expected a stack form for {:?}", word),
            }
        }
    }
}
