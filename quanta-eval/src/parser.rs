//! Recursive-descent parser
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '//' | '%') unary | <implicit '*'>)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?
//! primary := number | name | name '(' args ')' | '(' expr ')'
//! ```
//!
//! An implicit `*` is inserted when a closing parenthesis is directly
//! followed by a number or a name, so `(1 + 2)3` reads as `(1 + 2) * 3`.

use crate::ast::{BinOp, Expr, UnaryOp};
use crate::lexer::{tokenize, Token};
use crate::EvalError;

/// Maximum nesting of parentheses and unary operators
pub const MAX_DEPTH: usize = 256;

/// Parse an expression into an AST
pub fn parse(input: &str) -> Result<Expr, EvalError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EvalError::Empty);
    }

    let mut parser = Parser { tokens, pos: 0, depth: 0 };
    let expr = parser.expression()?;
    match parser.peek() {
        Some(token) => Err(EvalError::UnexpectedToken(token.to_string())),
        None => Ok(expr),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn previous(&self) -> Option<&Token> {
        self.pos.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), EvalError> {
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(EvalError::UnexpectedToken(token.to_string())),
            None => Err(EvalError::UnexpectedEnd),
        }
    }

    /// Run `f` one nesting level deeper
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, EvalError>,
    ) -> Result<T, EvalError> {
        if self.depth >= MAX_DEPTH {
            return Err(EvalError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn expression(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.term()?;
            left = Expr::BinaryOp(Box::new(left), op, Box::new(right));
        }
    }

    fn term(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.unary()?;
        loop {
            let implicit = matches!(self.previous(), Some(Token::RParen))
                && matches!(self.peek(), Some(Token::Number(_)) | Some(Token::Ident(_)));
            let op = match self.peek() {
                _ if implicit => BinOp::Mul,
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                Some(Token::DoubleSlash) => BinOp::FloorDiv,
                Some(Token::Percent) => BinOp::Rem,
                _ => return Ok(left),
            };
            if !implicit {
                self.pos += 1;
            }
            let right = self.unary()?;
            left = Expr::BinaryOp(Box::new(left), op, Box::new(right));
        }
    }

    fn unary(&mut self) -> Result<Expr, EvalError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                let operand = self.nested(Self::unary)?;
                Ok(Expr::UnaryOp(UnaryOp::Neg, Box::new(operand)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.nested(Self::unary)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr, EvalError> {
        let base = self.primary()?;
        if matches!(self.peek(), Some(Token::Caret)) {
            self.pos += 1;
            // Right-associative: 2^3^2 = 2^9
            let exponent = self.nested(Self::unary)?;
            return Ok(Expr::BinaryOp(Box::new(base), BinOp::Pow, Box::new(exponent)));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, EvalError> {
        match self.advance() {
            Some(Token::Number(text)) => Ok(Expr::Number(text)),
            Some(Token::Ident(name)) => {
                if matches!(self.peek(), Some(Token::LParen)) {
                    self.pos += 1;
                    let args = self.nested(Self::arguments)?;
                    Ok(Expr::FunctionCall(name, args))
                } else {
                    Ok(Expr::Constant(name))
                }
            }
            Some(Token::LParen) => {
                let inner = self.nested(Self::expression)?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(token) => Err(EvalError::UnexpectedToken(token.to_string())),
            None => Err(EvalError::UnexpectedEnd),
        }
    }

    /// Comma separated arguments up to and including the closing paren
    fn arguments(&mut self) -> Result<Vec<Expr>, EvalError> {
        let mut args = Vec::new();
        if matches!(self.peek(), Some(Token::RParen)) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            match self.advance() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => return Ok(args),
                Some(token) => return Err(EvalError::UnexpectedToken(token.to_string())),
                None => return Err(EvalError::UnexpectedEnd),
            }
        }
    }
}
