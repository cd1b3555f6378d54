//! Tokenizer for arithmetic expressions

use crate::EvalError;
use std::fmt;

/// Upper bound on tokens in one expression
pub const MAX_TOKENS: usize = 2048;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Number(String),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    DoubleSlash,
    Percent,
    Caret,
    LParen,
    RParen,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(s) | Token::Ident(s) => write!(f, "{}", s),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::DoubleSlash => write!(f, "//"),
            Token::Percent => write!(f, "%"),
            Token::Caret => write!(f, "^"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
        }
    }
}

/// Split an expression into tokens. `**` is read as `^`.
pub fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        let token = match c {
            _ if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '0'..='9' => {
                let (text, end) = read_number(&chars, i);
                i = end;
                Token::Number(text)
            }
            '.' if next.is_some_and(|n| n.is_ascii_digit()) => {
                let (text, end) = read_number(&chars, i);
                i = end;
                Token::Number(text)
            }
            _ if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                Token::Ident(chars[start..i].iter().collect())
            }
            '*' if next == Some('*') => {
                i += 2;
                Token::Caret
            }
            '/' if next == Some('/') => {
                i += 2;
                Token::DoubleSlash
            }
            _ => {
                i += 1;
                match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '%' => Token::Percent,
                    '^' => Token::Caret,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    ',' => Token::Comma,
                    other => return Err(EvalError::UnexpectedChar(other, i - 1)),
                }
            }
        };

        tokens.push(token);
        if tokens.len() > MAX_TOKENS {
            return Err(EvalError::TooLong(MAX_TOKENS));
        }
    }

    Ok(tokens)
}

/// Read `digits[.digits][e[+-]digits]`, returning the text and end index
fn read_number(chars: &[char], start: usize) -> (String, usize) {
    let digits = |mut i: usize| {
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = digits(start);
    if chars.get(end) == Some(&'.') {
        end = digits(end + 1);
    }

    if matches!(chars.get(end), Some('e') | Some('E')) {
        let mut exp = end + 1;
        if matches!(chars.get(exp), Some('+') | Some('-')) {
            exp += 1;
        }
        if chars.get(exp).is_some_and(|c| c.is_ascii_digit()) {
            end = digits(exp);
        }
    }

    (chars[start..end].iter().collect(), end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(s: &str) -> Token {
        Token::Number(s.to_string())
    }

    #[test]
    fn test_operators() {
        let tokens = tokenize("1 + 2 ** 3 // 4 % 5").unwrap();
        assert_eq!(
            tokens,
            vec![
                num("1"),
                Token::Plus,
                num("2"),
                Token::Caret,
                num("3"),
                Token::DoubleSlash,
                num("4"),
                Token::Percent,
                num("5"),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(tokenize(".5").unwrap(), vec![num(".5")]);
        assert_eq!(tokenize("5.").unwrap(), vec![num("5.")]);
        assert_eq!(tokenize("1.5e-3").unwrap(), vec![num("1.5e-3")]);
        // A bare `e` after digits is the constant, not an exponent
        assert_eq!(
            tokenize("2e").unwrap(),
            vec![num("2"), Token::Ident("e".to_string())]
        );
    }

    #[test]
    fn test_function_call() {
        let tokens = tokenize("log(100, 10)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("log".to_string()),
                Token::LParen,
                num("100"),
                Token::Comma,
                num("10"),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_rejects_foreign_characters() {
        assert!(matches!(
            tokenize("__import__('os')"),
            Err(EvalError::UnexpectedChar('\'', _))
        ));
        assert!(tokenize("a.b").is_err());
    }

    #[test]
    fn test_token_limit() {
        let long = "1+".repeat(MAX_TOKENS) + "1";
        assert_eq!(tokenize(&long), Err(EvalError::TooLong(MAX_TOKENS)));
    }
}
