//! Calculator module for building and evaluating arithmetic expressions.
//!
//! This module provides functionality to:
//! - Turn keypad input into a live expression, rejecting invalid edits
//! - Validate and evaluate finished expressions
//! - Format expressions and results for the display

mod builder;
mod evaluation;
mod format;
mod token;
mod validation;

pub use builder::{Calculator, State};
pub use evaluation::{EvalError, Outcome, ZERO_THRESHOLD, evaluate, normalize};
pub use format::{DisplayFormatter, canonical_number};
pub use token::{Operator, Token, TokenError};
pub use validation::validate;
