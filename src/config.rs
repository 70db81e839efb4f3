//! User configuration loaded from TOML.
//!
//! ```toml
//! [display]
//! max_length = 25
//! scientific_upper = 1e10
//! scientific_lower = 1e-6
//! exponent_digits = 6
//! max_decimals = 10
//! ellipsis = "..."
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Errors that can occur while loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
}

/// Settings for the display formatter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Maximum number of characters shown.
    pub max_length: usize,
    /// Magnitudes at or above this switch to exponential notation.
    pub scientific_upper: f64,
    /// Non-zero magnitudes below this switch to exponential notation.
    pub scientific_lower: f64,
    /// Fractional digits in exponential notation.
    pub exponent_digits: usize,
    /// Decimal places kept for ordinary non-integers.
    pub max_decimals: usize,
    /// Prefix shown when the text is cut to fit.
    pub ellipsis: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_length: 25,
            scientific_upper: 1e10,
            scientific_lower: 1e-6,
            exponent_digits: 6,
            max_decimals: 10,
            ellipsis: "...".to_string(),
        }
    }
}

impl Config {
    /// Default config file location (`~/.config/calcpad/config.toml` on Linux).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("calcpad").join("config.toml"))
    }

    /// Load the configuration from an explicit path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from the default location, falling back to defaults when no
    /// config file exists there.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.display.max_length, 25);
    }

    #[test]
    fn test_partial_display_section() {
        let config: Config = toml::from_str(
            r#"
            [display]
            max_length = 12
            ellipsis = "…"
            "#,
        )
        .unwrap();

        assert_eq!(config.display.max_length, 12);
        assert_eq!(config.display.ellipsis, "…");
        assert_eq!(config.display.max_decimals, 10);
        assert_eq!(config.display.scientific_upper, 1e10);
    }

    #[test]
    fn test_invalid_type_rejected() {
        let result: Result<Config, _> = toml::from_str("[display]\nmax_length = \"wide\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let path = Path::new("/nonexistent/calcpad/config.toml");
        match Config::load(path) {
            Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
