//! Text repairs applied before tokenizing
//!
//! Each pass is a pure `&str -> String` function so it can be tested on
//! its own and reused by the resolver, which rewrites integer literals
//! before it matches unit patterns.

use num_bigint::BigInt;

/// Characters stripped from the end of a partially typed expression
pub const RIGHT_TRIMMABLE: &[char] = &['/', '+', '*', '-', ' ', '(', '.', '^'];

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'.'
}

/// Length of the run of bytes starting at `start` accepted by `pred`
fn run_len(bytes: &[u8], start: usize, pred: impl Fn(u8) -> bool) -> usize {
    bytes[start..].iter().take_while(|b| pred(**b)).count()
}

/// Rewrite hexadecimal (`0x1f`), binary (`0b101`) and octal (`0o17`, `017`)
/// integer literals to base-10 text. Decimal numbers such as `0.5` or
/// `09` are left alone.
pub fn rewrite_integer_literals(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < bytes.len() {
        let at_boundary = i == 0 || !is_word_byte(bytes[i - 1]);
        if at_boundary && bytes[i] == b'0' {
            if let Some((consumed, value)) = integer_literal(bytes, i) {
                out.push_str(&value.to_string());
                i += consumed;
                continue;
            }
        }

        let Some(ch) = text[i..].chars().next() else {
            break;
        };
        out.push(ch);
        i += ch.len_utf8();
    }

    out
}

/// Parse a prefixed literal starting at a `0`, returning bytes consumed
fn integer_literal(bytes: &[u8], start: usize) -> Option<(usize, BigInt)> {
    let prefix = bytes.get(start + 1).copied()?;
    let (radix, digits_start) = match prefix.to_ascii_lowercase() {
        b'x' => (16, start + 2),
        b'b' => (2, start + 2),
        b'o' => (8, start + 2),
        b'0'..=b'9' => (8, start + 1),
        _ => return None,
    };

    let len = run_len(bytes, digits_start, |b| b.is_ascii_hexdigit());
    if len == 0 {
        return None;
    }
    let end = digits_start + len;
    let digits = &bytes[digits_start..end];

    // Legacy octal must not run into a decimal point or exponent
    if prefix.is_ascii_digit() {
        let next = bytes.get(end).copied();
        if matches!(next, Some(b'.') | Some(b'e') | Some(b'E')) {
            return None;
        }
    }
    // Letters straight after the digits make this a word, not a literal
    if bytes.get(end).is_some_and(|b| b.is_ascii_alphabetic() || *b == b'_') {
        return None;
    }

    let value = BigInt::parse_bytes(digits, radix)?;
    Some((end - start, value))
}

/// Strip dangling operators left by a query that is still being typed
pub fn trim_dangling_operators(text: &str) -> String {
    text.trim_end_matches(RIGHT_TRIMMABLE).to_string()
}

/// Append missing `)` or prepend missing `(` so parentheses balance
pub fn balance_parentheses(text: String) -> String {
    let open = text.matches('(').count();
    let close = text.matches(')').count();
    if open > close {
        text + &")".repeat(open - close)
    } else if close > open {
        "(".repeat(close - open) + &text
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_prefixed_literals() {
        assert_eq!(rewrite_integer_literals("0x1f"), "31");
        assert_eq!(rewrite_integer_literals("0b1010 + 0xA - 050"), "10 + 10 - 40");
        assert_eq!(rewrite_integer_literals("0o17"), "15");
        assert_eq!(rewrite_integer_literals("-0XFF"), "-255");
    }

    #[test]
    fn test_rewrite_leaves_decimals() {
        assert_eq!(rewrite_integer_literals("0.5 + 10"), "0.5 + 10");
        assert_eq!(rewrite_integer_literals("1.05"), "1.05");
        assert_eq!(rewrite_integer_literals("09"), "09");
        assert_eq!(rewrite_integer_literals("007.5"), "007.5");
        assert_eq!(rewrite_integer_literals("100"), "100");
    }

    #[test]
    fn test_rewrite_leaves_words() {
        assert_eq!(rewrite_integer_literals("0byte"), "0byte");
        assert_eq!(rewrite_integer_literals("a0x1"), "a0x1");
        assert_eq!(rewrite_integer_literals("0 b"), "0 b");
        assert_eq!(rewrite_integer_literals("10 µm"), "10 µm");
    }

    #[test]
    fn test_trim_dangling_operators() {
        assert_eq!(trim_dangling_operators("10 + "), "10");
        assert_eq!(trim_dangling_operators("2^"), "2");
        assert_eq!(trim_dangling_operators("sqrt("), "sqrt");
        assert_eq!(trim_dangling_operators("5)"), "5)");
    }

    #[test]
    fn test_balance_parentheses() {
        assert_eq!(balance_parentheses("(1 + 2".to_string()), "(1 + 2)");
        assert_eq!(balance_parentheses("1 + 2)".to_string()), "(1 + 2)");
        assert_eq!(balance_parentheses("((1)".to_string()), "((1))");
        assert_eq!(balance_parentheses("1".to_string()), "1");
    }
}
