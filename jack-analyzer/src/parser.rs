//! Recursive-descent parser for the Jack grammar.
//!
//! One token of lookahead over the materialized token list is enough: the
//! only decision point is after an identifier inside a term, where the next
//! token picks between plain variable, array access, and subroutine call.
//! The parser fails fast; there is no recovery.

use crate::ast::*;
use crate::error::JackError;
use crate::token::{Keyword, Span, SpannedToken, Token};

/// Expression nesting bound, guarding the recursion against pathological
/// input like `((((( ... )))))`.
const MAX_NESTING: usize = 64;

type Result<T> = std::result::Result<T, JackError>;

pub struct Parser<'a> {
    tokens: &'a [SpannedToken],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [SpannedToken]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Parse a complete class and require the input to end there.
    pub fn parse(mut self) -> Result<Class> {
        let class = self.class()?;
        if let Some(t) = self.tokens.get(self.pos) {
            return Err(JackError::syntax(
                t.span,
                format!("expected end of file, got {}", t.token),
            ));
        }
        Ok(class)
    }

    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn peek_symbol(&self) -> Option<char> {
        match self.peek() {
            Some(Token::Symbol(c)) => Some(*c),
            _ => None,
        }
    }

    fn peek_keyword(&self) -> Option<Keyword> {
        match self.peek() {
            Some(Token::Keyword(k)) => Some(*k),
            _ => None,
        }
    }

    fn bump(&mut self) -> Option<&'a SpannedToken> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// Span of the current token, or of the end of input.
    fn here(&self) -> Span {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.span)
            .unwrap_or(Span::new(1, 1))
    }

    fn unexpected(&self, wanted: &str) -> JackError {
        let got = match self.peek() {
            Some(t) => t.to_string(),
            None => "end of file".to_string(),
        };
        JackError::syntax(self.here(), format!("expected {wanted}, got {got}"))
    }

    fn expect_symbol(&mut self, symbol: char) -> Result<()> {
        if self.peek_symbol() == Some(symbol) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{symbol}'")))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<()> {
        if self.peek_keyword() == Some(keyword) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", keyword.as_str())))
        }
    }

    fn expect_identifier(&mut self) -> Result<String> {
        match self.peek() {
            Some(Token::Identifier(name)) => {
                let name = name.clone();
                self.bump();
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn class(&mut self) -> Result<Class> {
        self.expect_keyword(Keyword::Class)?;
        let name = self.expect_identifier()?;
        self.expect_symbol('{')?;

        let mut var_decs = Vec::new();
        while matches!(self.peek_keyword(), Some(Keyword::Static | Keyword::Field)) {
            var_decs.push(self.class_var_dec()?);
        }

        let mut subroutines = Vec::new();
        while matches!(
            self.peek_keyword(),
            Some(Keyword::Constructor | Keyword::Function | Keyword::Method)
        ) {
            subroutines.push(self.subroutine_dec()?);
        }

        self.expect_symbol('}')?;

        Ok(Class {
            name,
            var_decs,
            subroutines,
        })
    }

    fn class_var_dec(&mut self) -> Result<ClassVarDec> {
        let kind = match self.peek_keyword() {
            Some(Keyword::Static) => ClassVarKind::Static,
            Some(Keyword::Field) => ClassVarKind::Field,
            _ => return Err(self.unexpected("'static' or 'field'")),
        };
        self.bump();

        let ty = self.ty()?;
        let names = self.name_list()?;
        self.expect_symbol(';')?;

        Ok(ClassVarDec { kind, ty, names })
    }

    /// type: 'int' | 'char' | 'boolean' | className
    fn ty(&mut self) -> Result<Type> {
        let ty = match self.peek() {
            Some(Token::Keyword(Keyword::Int)) => Type::Int,
            Some(Token::Keyword(Keyword::Char)) => Type::Char,
            Some(Token::Keyword(Keyword::Boolean)) => Type::Boolean,
            Some(Token::Identifier(name)) => Type::Class(name.clone()),
            _ => return Err(self.unexpected("type")),
        };
        self.bump();
        Ok(ty)
    }

    /// ident (',' ident)*
    fn name_list(&mut self) -> Result<Vec<String>> {
        let mut names = vec![self.expect_identifier()?];
        while self.peek_symbol() == Some(',') {
            self.bump();
            names.push(self.expect_identifier()?);
        }
        Ok(names)
    }

    fn subroutine_dec(&mut self) -> Result<SubroutineDec> {
        let kind = match self.peek_keyword() {
            Some(Keyword::Constructor) => SubroutineKind::Constructor,
            Some(Keyword::Function) => SubroutineKind::Function,
            Some(Keyword::Method) => SubroutineKind::Method,
            _ => return Err(self.unexpected("'constructor', 'function', or 'method'")),
        };
        self.bump();

        let return_type = if self.peek_keyword() == Some(Keyword::Void) {
            self.bump();
            None
        } else {
            Some(self.ty()?)
        };

        let name = self.expect_identifier()?;
        self.expect_symbol('(')?;
        let params = self.parameter_list()?;
        self.expect_symbol(')')?;
        let body = self.subroutine_body()?;

        Ok(SubroutineDec {
            kind,
            return_type,
            name,
            params,
            body,
        })
    }

    fn parameter_list(&mut self) -> Result<Vec<Param>> {
        let mut params = Vec::new();
        if self.peek_symbol() == Some(')') {
            return Ok(params);
        }

        loop {
            let ty = self.ty()?;
            let name = self.expect_identifier()?;
            params.push(Param { ty, name });

            if self.peek_symbol() == Some(',') {
                self.bump();
            } else {
                return Ok(params);
            }
        }
    }

    fn subroutine_body(&mut self) -> Result<SubroutineBody> {
        self.expect_symbol('{')?;

        let mut var_decs = Vec::new();
        while self.peek_keyword() == Some(Keyword::Var) {
            self.bump();
            let ty = self.ty()?;
            let names = self.name_list()?;
            self.expect_symbol(';')?;
            var_decs.push(VarDec { ty, names });
        }

        let statements = self.statements()?;
        self.expect_symbol('}')?;

        Ok(SubroutineBody {
            var_decs,
            statements,
        })
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn statements(&mut self) -> Result<Vec<Statement>> {
        let mut statements = Vec::new();
        loop {
            let statement = match self.peek_keyword() {
                Some(Keyword::Let) => self.let_statement()?,
                Some(Keyword::If) => self.if_statement()?,
                Some(Keyword::While) => self.while_statement()?,
                Some(Keyword::Do) => self.do_statement()?,
                Some(Keyword::Return) => self.return_statement()?,
                _ => return Ok(statements),
            };
            statements.push(statement);
        }
    }

    fn let_statement(&mut self) -> Result<Statement> {
        self.expect_keyword(Keyword::Let)?;
        let name = self.expect_identifier()?;

        let index = if self.peek_symbol() == Some('[') {
            self.bump();
            let expr = self.expression()?;
            self.expect_symbol(']')?;
            Some(expr)
        } else {
            None
        };

        self.expect_symbol('=')?;
        let value = self.expression()?;
        self.expect_symbol(';')?;

        Ok(Statement::Let { name, index, value })
    }

    fn if_statement(&mut self) -> Result<Statement> {
        self.expect_keyword(Keyword::If)?;
        self.expect_symbol('(')?;
        let condition = self.expression()?;
        self.expect_symbol(')')?;
        self.expect_symbol('{')?;
        let then_body = self.statements()?;
        self.expect_symbol('}')?;

        let else_body = if self.peek_keyword() == Some(Keyword::Else) {
            self.bump();
            self.expect_symbol('{')?;
            let body = self.statements()?;
            self.expect_symbol('}')?;
            Some(body)
        } else {
            None
        };

        Ok(Statement::If {
            condition,
            then_body,
            else_body,
        })
    }

    fn while_statement(&mut self) -> Result<Statement> {
        self.expect_keyword(Keyword::While)?;
        self.expect_symbol('(')?;
        let condition = self.expression()?;
        self.expect_symbol(')')?;
        self.expect_symbol('{')?;
        let body = self.statements()?;
        self.expect_symbol('}')?;

        Ok(Statement::While { condition, body })
    }

    fn do_statement(&mut self) -> Result<Statement> {
        self.expect_keyword(Keyword::Do)?;
        let first = self.expect_identifier()?;
        let call = self.subroutine_call(first)?;
        self.expect_symbol(';')?;
        Ok(Statement::Do(call))
    }

    fn return_statement(&mut self) -> Result<Statement> {
        self.expect_keyword(Keyword::Return)?;
        let value = if self.peek_symbol() == Some(';') {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect_symbol(';')?;
        Ok(Statement::Return(value))
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn expression(&mut self) -> Result<Expression> {
        self.enter()?;
        let result = self.expression_inner();
        self.depth -= 1;
        result
    }

    fn expression_inner(&mut self) -> Result<Expression> {
        let first = self.term()?;
        let mut rest = Vec::new();

        while let Some(op) = self.peek_symbol().and_then(BinOp::from_char) {
            self.bump();
            rest.push((op, self.term()?));
        }

        Ok(Expression { first, rest })
    }

    fn term(&mut self) -> Result<Term> {
        self.enter()?;
        let result = self.term_inner();
        self.depth -= 1;
        result
    }

    fn term_inner(&mut self) -> Result<Term> {
        match self.peek() {
            Some(Token::IntConst(n)) => {
                let n = *n;
                self.bump();
                Ok(Term::Int(n))
            }
            Some(Token::StrConst(s)) => {
                let s = s.clone();
                self.bump();
                Ok(Term::Str(s))
            }
            Some(Token::Keyword(k)) => {
                let constant = match k {
                    Keyword::True => ConstKeyword::True,
                    Keyword::False => ConstKeyword::False,
                    Keyword::Null => ConstKeyword::Null,
                    Keyword::This => ConstKeyword::This,
                    _ => return Err(self.unexpected("term")),
                };
                self.bump();
                Ok(Term::Const(constant))
            }
            Some(Token::Symbol('(')) => {
                self.bump();
                let expr = self.expression()?;
                self.expect_symbol(')')?;
                Ok(Term::Paren(Box::new(expr)))
            }
            Some(Token::Symbol('-')) => {
                self.bump();
                Ok(Term::Unary(UnaryOp::Neg, Box::new(self.term()?)))
            }
            Some(Token::Symbol('~')) => {
                self.bump();
                Ok(Term::Unary(UnaryOp::Not, Box::new(self.term()?)))
            }
            Some(Token::Identifier(name)) => {
                let name = name.clone();
                self.bump();
                // One token of lookahead picks the production.
                match self.peek_symbol() {
                    Some('[') => {
                        self.bump();
                        let index = self.expression()?;
                        self.expect_symbol(']')?;
                        Ok(Term::Index(name, Box::new(index)))
                    }
                    Some('(') | Some('.') => Ok(Term::Call(self.subroutine_call(name)?)),
                    _ => Ok(Term::Var(name)),
                }
            }
            _ => Err(self.unexpected("term")),
        }
    }

    /// The leading identifier has already been consumed.
    fn subroutine_call(&mut self, first: String) -> Result<SubroutineCall> {
        let (receiver, name) = if self.peek_symbol() == Some('.') {
            self.bump();
            (Some(first), self.expect_identifier()?)
        } else {
            (None, first)
        };

        self.expect_symbol('(')?;
        let mut args = Vec::new();
        if self.peek_symbol() != Some(')') {
            args.push(self.expression()?);
            while self.peek_symbol() == Some(',') {
                self.bump();
                args.push(self.expression()?);
            }
        }
        self.expect_symbol(')')?;

        Ok(SubroutineCall {
            receiver,
            name,
            args,
        })
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            self.depth -= 1;
            return Err(JackError::syntax(self.here(), "expression nesting too deep"));
        }
        Ok(())
    }
}
