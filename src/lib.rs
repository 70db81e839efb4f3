//! Keypad-style arithmetic calculator.
//!
//! The [`calculator::Calculator`] state object consumes discrete input
//! tokens, keeps the live expression valid, and evaluates it on demand.
//! [`keymap`] translates raw key names into tokens for front ends.

pub mod calculator;
pub mod config;
pub mod keymap;

pub use calculator::{Calculator, Outcome, State, Token, evaluate};
pub use config::Config;
