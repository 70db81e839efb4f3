//! Input tokens accepted by the calculator.
//!
//! Every mouse click or key press is mapped onto one of these tokens before
//! it reaches the [`Calculator`](super::Calculator).

use std::fmt;
use std::str::FromStr;

/// One of the four binary arithmetic operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Parse an operator character, accepting `×` and `÷` as aliases.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' | '×' => Some(Self::Multiply),
            '/' | '÷' => Some(Self::Divide),
            _ => None,
        }
    }

    /// The character this operator is written as inside an expression.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }

    /// Apply the operator to two operands.
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide => lhs / rhs,
        }
    }
}

/// Check whether a character is one of the normalized operator symbols.
pub fn is_operator_char(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/')
}

/// A discrete unit of calculator input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    /// A digit `0`-`9`.
    Digit(u8),
    /// The decimal point.
    Decimal,
    /// A binary operator (a leading `-` doubles as negation).
    Operator(Operator),
    OpenParen,
    CloseParen,
    /// Reset the expression and the last result.
    Clear,
    /// Remove the last character.
    Backspace,
    /// Evaluate the expression.
    Equal,
}

impl Token {
    /// Build a token from a single character of keypad input.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => c.to_digit(10).map(|d| Self::Digit(d as u8)),
            '.' => Some(Self::Decimal),
            '(' => Some(Self::OpenParen),
            ')' => Some(Self::CloseParen),
            _ => Operator::from_char(c).map(Self::Operator),
        }
    }

    /// Check if this token is one of the control commands.
    pub fn is_control(&self) -> bool {
        matches!(self, Self::Clear | Self::Backspace | Self::Equal)
    }
}

/// Error returned when a string does not name a token.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown calculator token: {0:?}")]
pub struct TokenError(pub String);

impl FromStr for Token {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clear" => return Ok(Self::Clear),
            "backspace" => return Ok(Self::Backspace),
            "equal" => return Ok(Self::Equal),
            _ => {}
        }

        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c).ok_or_else(|| TokenError(s.to_string())),
            _ => Err(TokenError(s.to_string())),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digit(d) => write!(f, "{}", d),
            Self::Decimal => f.write_str("."),
            Self::Operator(op) => write!(f, "{}", op.symbol()),
            Self::OpenParen => f.write_str("("),
            Self::CloseParen => f.write_str(")"),
            Self::Clear => f.write_str("clear"),
            Self::Backspace => f.write_str("backspace"),
            Self::Equal => f.write_str("equal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_digits_and_symbols() {
        assert_eq!("7".parse::<Token>(), Ok(Token::Digit(7)));
        assert_eq!(".".parse::<Token>(), Ok(Token::Decimal));
        assert_eq!("(".parse::<Token>(), Ok(Token::OpenParen));
        assert_eq!(")".parse::<Token>(), Ok(Token::CloseParen));
        assert_eq!("-".parse::<Token>(), Ok(Token::Operator(Operator::Subtract)));
    }

    #[test]
    fn test_parse_normalizes_alias_operators() {
        assert_eq!("×".parse::<Token>(), Ok(Token::Operator(Operator::Multiply)));
        assert_eq!("÷".parse::<Token>(), Ok(Token::Operator(Operator::Divide)));
    }

    #[test]
    fn test_parse_control_commands() {
        assert_eq!("clear".parse::<Token>(), Ok(Token::Clear));
        assert_eq!("backspace".parse::<Token>(), Ok(Token::Backspace));
        assert_eq!("equal".parse::<Token>(), Ok(Token::Equal));
        assert!(Token::Equal.is_control());
        assert!(!Token::Digit(1).is_control());
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("".parse::<Token>().is_err());
        assert!("12".parse::<Token>().is_err());
        assert!("^".parse::<Token>().is_err());
        assert_eq!("x".parse::<Token>(), Err(TokenError("x".to_string())));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for token in [
            Token::Digit(0),
            Token::Decimal,
            Token::Operator(Operator::Divide),
            Token::CloseParen,
            Token::Backspace,
        ] {
            assert_eq!(token.to_string().parse::<Token>(), Ok(token));
        }
    }
}
