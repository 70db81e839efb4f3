//! Display formatting for expressions and results.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::DisplayConfig;

lazy_static! {
    /// A bare number: optional leading minus, digits, optional fraction.
    static ref NUMERIC_LITERAL: Regex = Regex::new(r"^-?\d+(\.\d+)?$").unwrap();
}

/// Canonical string form of a computed value.
///
/// This is what replaces the expression after a successful compute, so it
/// must stay inside the calculator alphabet (no exponent, no separators).
pub fn canonical_number(value: f64) -> String {
    format!("{}", value)
}

/// Turns the live expression into the text shown on the display.
#[derive(Clone, Debug, Default)]
pub struct DisplayFormatter {
    config: DisplayConfig,
}

impl DisplayFormatter {
    pub fn new(config: DisplayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Format an expression for display.
    ///
    /// An empty expression shows as `0`. A bare number is reformatted with
    /// [`format_value`](Self::format_value); anything else is shown as typed.
    /// The result is then cut to the display width, keeping the tail.
    pub fn format(&self, text: &str) -> String {
        if text.is_empty() {
            return "0".to_string();
        }

        let formatted = if NUMERIC_LITERAL.is_match(text) {
            text.parse::<f64>()
                .map(|value| self.format_value(value))
                .unwrap_or_else(|_| text.to_string())
        } else {
            text.to_string()
        };

        self.truncate(formatted)
    }

    /// Format a number: exponential notation outside the display range,
    /// otherwise a plain integer or a rounded decimal without trailing zeros.
    pub fn format_value(&self, value: f64) -> String {
        let magnitude = value.abs();
        let config = &self.config;

        if magnitude >= config.scientific_upper
            || (magnitude != 0.0 && magnitude < config.scientific_lower)
        {
            return format_exponential(value, config.exponent_digits);
        }

        if value.fract() == 0.0 {
            return format!("{:.0}", value);
        }

        let formatted = format!("{:.*}", config.max_decimals, value);
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }

    fn truncate(&self, text: String) -> String {
        let max = self.config.max_length;
        let len = text.chars().count();
        if len <= max {
            return text;
        }

        let ellipsis = &self.config.ellipsis;
        let keep = max.saturating_sub(ellipsis.chars().count());
        if keep == 0 {
            return text.chars().skip(len - max).collect();
        }

        let tail: String = text.chars().skip(len - keep).collect();
        format!("{}{}", ellipsis, tail)
    }
}

/// Exponential notation with an explicit exponent sign, e.g. `1.234568e+10`.
fn format_exponential(value: f64, digits: usize) -> String {
    let formatted = format!("{:.*e}", digits, value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter() -> DisplayFormatter {
        DisplayFormatter::default()
    }

    #[test]
    fn test_empty_shows_zero() {
        assert_eq!(formatter().format(""), "0");
    }

    #[test]
    fn test_integers() {
        let f = formatter();
        assert_eq!(f.format("16"), "16");
        assert_eq!(f.format("-15"), "-15");
        assert_eq!(f.format("0"), "0");
        assert_eq!(f.format("9999999999"), "9999999999");
    }

    #[test]
    fn test_decimals_rounded_and_trimmed() {
        let f = formatter();
        assert_eq!(f.format("0.1"), "0.1");
        assert_eq!(f.format("0.30000000000000004"), "0.3");
        assert_eq!(f.format("0.3333333333333333"), "0.3333333333");
        assert_eq!(f.format("2.50"), "2.5");
    }

    #[test]
    fn test_exponential_notation() {
        let f = formatter();
        assert_eq!(f.format("12345678901"), "1.234568e+10");
        assert_eq!(f.format("-10000000000"), "-1.000000e+10");
        assert_eq!(f.format("0.0000001"), "1.000000e-7");
        assert_eq!(f.format_value(0.000001), "0.000001");
    }

    #[test]
    fn test_partial_input_shown_verbatim() {
        let f = formatter();
        assert_eq!(f.format("5."), "5.");
        assert_eq!(f.format("2*(3"), "2*(3");
        assert_eq!(f.format("-"), "-");
    }

    #[test]
    fn test_long_text_truncated_from_the_left() {
        let f = formatter();
        let text = "1+2+3+4+5+6+7+8+9+10+11+12";
        let shown = f.format(text);
        assert_eq!(shown.chars().count(), 25);
        assert!(shown.starts_with("..."));
        assert!(text.ends_with(&shown[3..]));
    }

    #[test]
    fn test_huge_result_fits_display() {
        let f = formatter();
        let text = canonical_number(1e300);
        assert_eq!(f.format(&text), "1.000000e+300");
    }

    #[test]
    fn test_canonical_number() {
        assert_eq!(canonical_number(16.0), "16");
        assert_eq!(canonical_number(-15.0), "-15");
        assert_eq!(canonical_number(0.1), "0.1");
        assert_eq!(canonical_number(2.5), "2.5");
    }

    #[test]
    fn test_custom_width() {
        let f = DisplayFormatter::new(DisplayConfig {
            max_length: 8,
            ellipsis: "…".to_string(),
            ..DisplayConfig::default()
        });
        assert_eq!(f.format("123+456+789"), "…456+789");
    }
}
