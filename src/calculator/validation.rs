//! Structural validation of a finished expression.
//!
//! Runs before evaluation and fails closed: any violation rejects the whole
//! expression, so the evaluator only ever sees well-formed input.

use lazy_static::lazy_static;
use regex::Regex;

use super::evaluation::EvalError;

lazy_static! {
    /// Matches strings made only of the calculator alphabet.
    static ref ALLOWED_CHARS: Regex = Regex::new(r"^[0-9+\-*/().]+$").unwrap();

    /// Two or more of `+`, `*`, `/` in a row.
    static ref REPEATED_OPERATORS: Regex = Regex::new(r"[+*/]{2,}").unwrap();

    /// Two or more minus signs in a row.
    static ref REPEATED_MINUS: Regex = Regex::new(r"-{2,}").unwrap();

    /// Operators that cannot open an expression.
    static ref LEADING_OPERATOR: Regex = Regex::new(r"^[+*/]").unwrap();

    /// Any operator left dangling at the end.
    static ref TRAILING_OPERATOR: Regex = Regex::new(r"[+\-*/]$").unwrap();

    /// `..` or a second decimal point inside one number.
    static ref MALFORMED_DECIMAL: Regex = Regex::new(r"\.\.|\d+\.\d*\.").unwrap();
}

/// Check a normalized expression against every structural rule.
pub fn validate(expression: &str) -> Result<(), EvalError> {
    if expression.is_empty() {
        return Err(EvalError::Empty);
    }

    if !ALLOWED_CHARS.is_match(expression) {
        let bad = expression
            .chars()
            .find(|c| !is_allowed(*c))
            .unwrap_or_default();
        return Err(EvalError::InvalidCharacter(bad));
    }

    if REPEATED_OPERATORS.is_match(expression) || REPEATED_MINUS.is_match(expression) {
        return Err(EvalError::RepeatedOperator);
    }

    if let Some(m) = LEADING_OPERATOR.find(expression) {
        return Err(EvalError::LeadingOperator(first_char(m.as_str())));
    }

    if let Some(m) = TRAILING_OPERATOR.find(expression) {
        return Err(EvalError::TrailingOperator(first_char(m.as_str())));
    }

    check_parentheses(expression)?;

    if MALFORMED_DECIMAL.is_match(expression) {
        return Err(EvalError::MalformedNumber);
    }

    Ok(())
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.')
}

fn first_char(s: &str) -> char {
    s.chars().next().unwrap_or_default()
}

/// Walk the parentheses: the running depth never goes negative, ends at zero,
/// and no group is empty.
fn check_parentheses(expression: &str) -> Result<(), EvalError> {
    let mut depth: usize = 0;
    let mut prev = None;

    for c in expression.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                if prev == Some('(') {
                    return Err(EvalError::EmptyGroup);
                }
                depth = depth.checked_sub(1).ok_or(EvalError::UnbalancedParens)?;
            }
            _ => {}
        }
        prev = Some(c);
    }

    if depth == 0 {
        Ok(())
    } else {
        Err(EvalError::UnbalancedParens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_expressions_accepted() {
        assert_eq!(validate("2+2"), Ok(()));
        assert_eq!(validate("(5+3)*2"), Ok(()));
        assert_eq!(validate("5*-3"), Ok(()));
        assert_eq!(validate("-4/.5"), Ok(()));
        assert_eq!(validate("3.25"), Ok(()));
        assert_eq!(validate("-(2)"), Ok(()));
    }

    #[test]
    fn test_invalid_characters_rejected() {
        assert_eq!(validate("2^3"), Err(EvalError::InvalidCharacter('^')));
        assert_eq!(validate("2 + 2"), Err(EvalError::InvalidCharacter(' ')));
        assert_eq!(validate("abc"), Err(EvalError::InvalidCharacter('a')));
    }

    #[test]
    fn test_repeated_operators_rejected() {
        assert_eq!(validate("3--2"), Err(EvalError::RepeatedOperator));
        assert_eq!(validate("3**2"), Err(EvalError::RepeatedOperator));
        assert_eq!(validate("3+*2"), Err(EvalError::RepeatedOperator));
    }

    #[test]
    fn test_leading_and_trailing_operators_rejected() {
        assert_eq!(validate("*3"), Err(EvalError::LeadingOperator('*')));
        assert_eq!(validate("+3"), Err(EvalError::LeadingOperator('+')));
        assert_eq!(validate("3-"), Err(EvalError::TrailingOperator('-')));
        assert_eq!(validate("3/"), Err(EvalError::TrailingOperator('/')));
    }

    #[test]
    fn test_parentheses_rejected() {
        assert_eq!(validate("(3"), Err(EvalError::UnbalancedParens));
        assert_eq!(validate("3)"), Err(EvalError::UnbalancedParens));
        assert_eq!(validate(")3("), Err(EvalError::UnbalancedParens));
        assert_eq!(validate("2*()"), Err(EvalError::EmptyGroup));
    }

    #[test]
    fn test_malformed_decimals_rejected() {
        assert_eq!(validate("1..2"), Err(EvalError::MalformedNumber));
        assert_eq!(validate("1.2.3"), Err(EvalError::MalformedNumber));
        assert_eq!(validate("1.2+3.4"), Ok(()));
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(validate(""), Err(EvalError::Empty));
    }
}
