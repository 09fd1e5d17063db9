//! Lexical analysis: Jack source text to a materialized token list.

use crate::error::JackError;
use crate::token::{Keyword, Span, SpannedToken, Token, is_symbol};

/// Largest value an integer constant may hold.
const INT_MAX: u32 = 32767;

pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the whole input. Stops at the first lexical error.
    pub fn tokenize(mut self) -> Result<Vec<SpannedToken>, JackError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_trivia()?;
            let span = self.span();
            let Some(c) = self.peek() else { break };

            let token = if is_symbol(c) {
                self.bump();
                Token::Symbol(c)
            } else if c == '"' {
                self.string(span)?
            } else if c.is_ascii_digit() {
                self.integer(span)?
            } else if c.is_alphabetic() || c == '_' {
                self.word()
            } else {
                return Err(JackError::lexical(
                    span,
                    format!("unexpected character '{c}'"),
                ));
            };

            tokens.push(SpannedToken { token, span });
        }

        Ok(tokens)
    }

    fn span(&self) -> Span {
        Span::new(self.line, self.column)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Skip whitespace, `//` line comments, and `/* */` block comments.
    /// `/** */` doc comments are ordinary block comments.
    fn skip_trivia(&mut self) -> Result<(), JackError> {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.bump();
            }

            if self.peek() != Some('/') {
                return Ok(());
            }

            // A lone '/' is the division symbol; look one further.
            let mut ahead = self.chars.clone();
            ahead.next();
            match ahead.peek() {
                Some('/') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                Some('*') => {
                    let open = self.span();
                    self.bump();
                    self.bump();
                    let mut closed = false;
                    while let Some(c) = self.bump() {
                        if c == '*' && self.peek() == Some('/') {
                            self.bump();
                            closed = true;
                            break;
                        }
                    }
                    if !closed {
                        return Err(JackError::lexical(open, "unterminated block comment"));
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn string(&mut self, span: Span) -> Result<Token, JackError> {
        self.bump(); // opening quote

        let mut value = String::new();
        loop {
            match self.peek() {
                Some('"') => {
                    self.bump();
                    return Ok(Token::StrConst(value));
                }
                Some('\n') | None => {
                    return Err(JackError::lexical(span, "unterminated string constant"));
                }
                Some(c) => {
                    value.push(c);
                    self.bump();
                }
            }
        }
    }

    fn integer(&mut self, span: Span) -> Result<Token, JackError> {
        let mut value: u32 = 0;
        while let Some(c) = self.peek() {
            let Some(digit) = c.to_digit(10) else { break };
            self.bump();
            value = value * 10 + digit;
            if value > INT_MAX {
                return Err(JackError::lexical(
                    span,
                    format!("integer constant exceeds {INT_MAX}"),
                ));
            }
        }
        Ok(Token::IntConst(value as u16))
    }

    fn word(&mut self) -> Token {
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                value.push(c);
                self.bump();
            } else {
                break;
            }
        }

        match Keyword::lookup(&value) {
            Some(keyword) => Token::Keyword(keyword),
            None => Token::Identifier(value),
        }
    }
}
