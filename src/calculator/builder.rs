//! The expression builder.
//!
//! [`Calculator`] owns the live expression and the last computed result and
//! applies one [`Token`] at a time. Tokens that would break the expression
//! are dropped without changing anything.

use serde::{Deserialize, Serialize};

use super::evaluation::{Outcome, evaluate};
use super::format::{DisplayFormatter, canonical_number};
use super::token::{Operator, Token, is_operator_char};
use crate::config::DisplayConfig;

/// Snapshot of the calculator state, for persistence.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub expression: String,
    pub last_result: Option<f64>,
}

/// Stateful keypad calculator.
#[derive(Clone, Debug, Default)]
pub struct Calculator {
    expression: String,
    last_result: Option<f64>,
    formatter: DisplayFormatter,
}

impl Calculator {
    /// Create an empty calculator with the default display settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty calculator with custom display settings.
    pub fn with_display_config(config: DisplayConfig) -> Self {
        Self {
            formatter: DisplayFormatter::new(config),
            ..Self::default()
        }
    }

    /// The live expression.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The most recent successfully computed result, if it is still current.
    pub fn last_result(&self) -> Option<f64> {
        self.last_result
    }

    /// Text for the display.
    pub fn display_text(&self) -> String {
        self.formatter.format(&self.expression)
    }

    /// Snapshot the state for persistence.
    pub fn state(&self) -> State {
        State {
            expression: self.expression.clone(),
            last_result: self.last_result,
        }
    }

    /// Restore a previously saved snapshot as-is. Restored state is trusted
    /// and not validated.
    pub fn restore(&mut self, state: State) {
        self.expression = state.expression;
        self.last_result = state.last_result;
    }

    /// Apply one input token.
    pub fn handle_input(&mut self, token: Token) {
        let before = self.expression.clone();
        match token {
            Token::Clear => self.clear(),
            Token::Backspace => self.backspace(),
            Token::Digit(d) => self.push_digit(d),
            Token::Decimal => self.push_decimal(),
            Token::Operator(op) => self.push_operator(op),
            Token::OpenParen => self.open_paren(),
            Token::CloseParen => self.close_paren(),
            Token::Equal => self.compute(),
        }

        if !token.is_control() && self.expression == before {
            tracing::debug!(%token, expression = %self.expression, "input rejected");
        } else {
            tracing::trace!(%token, expression = %self.expression, "input applied");
        }
    }

    fn last_char(&self) -> Option<char> {
        self.expression.chars().last()
    }

    fn clear(&mut self) {
        self.expression.clear();
        self.last_result = None;
    }

    fn backspace(&mut self) {
        self.expression.pop();

        // Continuation check: if what is left is the result minus its last
        // character, the result has been edited and is no longer current.
        if let Some(result) = self.last_result {
            let mut shown = canonical_number(result);
            shown.pop();
            if self.expression == shown {
                self.last_result = None;
            }
        }
    }

    fn push_digit(&mut self, digit: u8) {
        let continues = self
            .last_char()
            .is_some_and(|c| is_operator_char(c) || c == '.');

        if self.last_result.is_some() && !continues {
            self.expression.clear();
            self.last_result = None;
        }

        self.expression.push(char::from(b'0' + digit.min(9)));
    }

    /// The number currently being typed: everything after the last operator
    /// or parenthesis.
    fn trailing_number(&self) -> &str {
        let start = self
            .expression
            .rfind(|c: char| is_operator_char(c) || c == '(' || c == ')')
            .map_or(0, |i| i + 1);
        &self.expression[start..]
    }

    fn push_decimal(&mut self) {
        if self.trailing_number().contains('.') {
            return;
        }

        match self.last_char() {
            None => self.expression.push_str("0."),
            Some(c) if is_operator_char(c) || c == '(' => self.expression.push_str("0."),
            Some(_) => self.expression.push('.'),
        }
    }

    fn push_operator(&mut self, op: Operator) {
        let symbol = op.symbol();

        match self.last_char() {
            None | Some('(') => {
                // Only a negative sign may open the expression or a group.
                if op != Operator::Subtract {
                    return;
                }
                self.expression.push(symbol);
            }
            Some(last) if is_operator_char(last) => {
                if op == Operator::Subtract && last != '-' {
                    // Negated operand, e.g. `5*-3`.
                    self.expression.push(symbol);
                } else {
                    // Collapse the trailing operators into the latest one.
                    let kept = self
                        .expression
                        .trim_end_matches(is_operator_char)
                        .len();
                    let opens_group = self.expression[..kept].is_empty()
                        || self.expression[..kept].ends_with('(');
                    if opens_group && op != Operator::Subtract {
                        return;
                    }
                    self.expression.truncate(kept);
                    self.expression.push(symbol);
                }
            }
            Some(_) => self.expression.push(symbol),
        }

        self.last_result = None;
    }

    fn paren_balance(&self) -> (usize, usize) {
        self.expression.chars().fold((0, 0), |(open, close), c| match c {
            '(' => (open + 1, close),
            ')' => (open, close + 1),
            _ => (open, close),
        })
    }

    fn open_paren(&mut self) {
        if let Some(last) = self.last_char()
            && !is_operator_char(last)
            && last != '('
        {
            self.expression.push('*');
        }
        self.expression.push('(');
        self.last_result = None;
    }

    fn close_paren(&mut self) {
        let (open, close) = self.paren_balance();
        let closable = self
            .last_char()
            .is_some_and(|c| c != '(' && !is_operator_char(c));

        if open > close && closable {
            self.expression.push(')');
            self.last_result = None;
        }
    }

    fn compute(&mut self) {
        if self.expression.is_empty() {
            return;
        }

        match evaluate(&self.expression) {
            Outcome::Value(value) => {
                self.expression = canonical_number(value);
                self.last_result = Some(value);
            }
            Outcome::Error(e) => {
                tracing::debug!(error = %e, "compute failed, resetting");
                self.clear();
            }
        }
    }
}
