//! Expression evaluation.
//!
//! Normalizes and validates a finished expression, then computes it with a
//! small recursive-descent evaluator: `*` and `/` bind tighter than `+` and
//! `-`, both levels associate left to right, and a leading `-` negates the
//! operand that follows it.

use super::token::Operator;
use super::validation::validate;

/// Results smaller than this in magnitude are treated as floating-point noise.
pub const ZERO_THRESHOLD: f64 = 1e-15;

/// Deepest parenthesis or negation nesting the evaluator will descend into.
const MAX_DEPTH: usize = 256;

/// Why an expression could not be turned into a finite value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("expression is empty")]
    Empty,
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),
    #[error("repeated operator")]
    RepeatedOperator,
    #[error("expression cannot start with {0:?}")]
    LeadingOperator(char),
    #[error("expression cannot end with {0:?}")]
    TrailingOperator(char),
    #[error("unbalanced parentheses")]
    UnbalancedParens,
    #[error("empty parentheses")]
    EmptyGroup,
    #[error("malformed number")]
    MalformedNumber,
    #[error("unexpected {found:?} at position {position}")]
    UnexpectedChar { position: usize, found: char },
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("expression is nested too deeply")]
    TooDeep,
    #[error("division by zero")]
    DivisionByZero,
    #[error("result is not a finite number")]
    NonFinite,
}

/// Outcome of evaluating an expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// A finite numeric result.
    Value(f64),
    /// The expression was rejected or produced no finite value.
    Error(EvalError),
}

impl Outcome {
    /// Check if this is a successful result.
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Get the value, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Error(_) => None,
        }
    }

    /// Get the error, if any.
    pub fn error(&self) -> Option<&EvalError> {
        match self {
            Self::Value(_) => None,
            Self::Error(e) => Some(e),
        }
    }
}

impl From<Result<f64, EvalError>> for Outcome {
    fn from(result: Result<f64, EvalError>) -> Self {
        match result {
            Ok(value) => Self::Value(value),
            Err(e) => Self::Error(e),
        }
    }
}

/// Evaluate an arithmetic expression.
///
/// Whitespace is ignored and `×`/`÷` are accepted for `*`/`/`. Never panics
/// and never yields NaN or an infinity as a value.
pub fn evaluate(input: &str) -> Outcome {
    let outcome = Outcome::from(evaluate_inner(input));
    if let Outcome::Error(e) = &outcome {
        tracing::debug!(expression = input, error = %e, "evaluation failed");
    }
    outcome
}

fn evaluate_inner(input: &str) -> Result<f64, EvalError> {
    let expression = normalize(input);
    validate(&expression)?;

    let value = Parser::new(&expression).parse()?;
    classify(value)
}

/// Strip whitespace and map the display operators onto their ASCII forms.
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '×' => '*',
            '÷' => '/',
            other => other,
        })
        .collect()
}

fn classify(value: f64) -> Result<f64, EvalError> {
    if !value.is_finite() {
        return Err(EvalError::NonFinite);
    }
    if value.abs() < ZERO_THRESHOLD {
        return Ok(0.0);
    }
    Ok(value)
}

/// Recursive-descent evaluator over a validated ASCII expression.
struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(expression: &'a str) -> Self {
        Self {
            bytes: expression.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    fn parse(mut self) -> Result<f64, EvalError> {
        let value = self.expression()?;
        match self.peek() {
            None => Ok(value),
            Some(c) => Err(self.unexpected(c)),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn unexpected(&self, c: u8) -> EvalError {
        EvalError::UnexpectedChar {
            position: self.pos,
            found: char::from(c),
        }
    }

    fn peek_operator(&self, allowed: &[Operator]) -> Option<Operator> {
        let op = Operator::from_char(char::from(self.peek()?))?;
        allowed.contains(&op).then_some(op)
    }

    /// expression := term (('+' | '-') term)*
    fn expression(&mut self) -> Result<f64, EvalError> {
        let mut value = self.term()?;
        while let Some(op) = self.peek_operator(&[Operator::Add, Operator::Subtract]) {
            self.pos += 1;
            let rhs = self.term()?;
            value = op.apply(value, rhs);
        }
        Ok(value)
    }

    /// term := unary (('*' | '/') unary)*
    fn term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.unary()?;
        while let Some(op) = self.peek_operator(&[Operator::Multiply, Operator::Divide]) {
            self.pos += 1;
            let rhs = self.unary()?;
            if op == Operator::Divide && rhs == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            value = op.apply(value, rhs);
        }
        Ok(value)
    }

    /// unary := '-' unary | primary
    fn unary(&mut self) -> Result<f64, EvalError> {
        if self.peek() == Some(b'-') {
            self.pos += 1;
            self.descend()?;
            let value = self.unary();
            self.depth -= 1;
            return value.map(|v| -v);
        }
        self.primary()
    }

    /// primary := number | '(' expression ')'
    fn primary(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                self.descend()?;
                let value = self.expression();
                self.depth -= 1;
                let value = value?;
                match self.peek() {
                    Some(b')') => {
                        self.pos += 1;
                        Ok(value)
                    }
                    Some(c) => Err(self.unexpected(c)),
                    None => Err(EvalError::UnexpectedEnd),
                }
            }
            Some(c) if c.is_ascii_digit() || c == b'.' => self.number(),
            Some(c) => Err(self.unexpected(c)),
            None => Err(EvalError::UnexpectedEnd),
        }
    }

    fn descend(&mut self) -> Result<(), EvalError> {
        if self.depth >= MAX_DEPTH {
            return Err(EvalError::TooDeep);
        }
        self.depth += 1;
        Ok(())
    }

    /// number := digits ['.' digits?] | '.' digits
    fn number(&mut self) -> Result<f64, EvalError> {
        let start = self.pos;
        let mut seen_dot = false;
        let mut digits = 0;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                digits += 1;
            } else if c == b'.' && !seen_dot {
                seen_dot = true;
            } else {
                break;
            }
            self.pos += 1;
        }

        if digits == 0 {
            return Err(EvalError::MalformedNumber);
        }

        let literal = std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| EvalError::MalformedNumber)?;
        let mut text = String::with_capacity(literal.len() + 2);
        if literal.starts_with('.') {
            text.push('0');
        }
        text.push_str(literal);
        if literal.ends_with('.') {
            text.push('0');
        }

        text.parse::<f64>().map_err(|_| EvalError::MalformedNumber)
    }
}
