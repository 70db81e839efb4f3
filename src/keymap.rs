//! Mapping raw key names onto calculator tokens.
//!
//! Front ends report keys by name (`Enter`, `Escape`, `7`, `×`, ...). This
//! module turns those names into [`Token`]s; anything unmapped is ignored.

use crate::calculator::{Operator, Token};

/// Map a single key name to a token.
pub fn token_for_key(key: &str) -> Option<Token> {
    match key {
        "Enter" | "=" => Some(Token::Equal),
        "Escape" | "Delete" | "c" | "C" => Some(Token::Clear),
        "Backspace" => Some(Token::Backspace),
        "x" | "X" => Some(Token::Operator(Operator::Multiply)),
        _ => key.parse().ok(),
    }
}

/// Split a line of input into tokens.
///
/// Words are separated by whitespace. A word that is not itself a key name is
/// read character by character, so `12+3=` works as well as `1 2 + 3 Enter`.
/// Unknown keys are skipped with a warning.
pub fn tokens_for_line(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();

    for word in line.split_whitespace() {
        if let Some(token) = token_for_key(word) {
            tokens.push(token);
            continue;
        }

        for c in word.chars() {
            let mut buf = [0; 4];
            match token_for_key(c.encode_utf8(&mut buf)) {
                Some(token) => tokens.push(token),
                None => tracing::warn!(key = %c, word, "ignoring unknown key"),
            }
        }
    }

    tokens
}
