use anyhow::{Context, Result};
use std::env;

/// Environment variable toggling the `at <file>:<line>:<column>` trace lines
pub const TRACE_LOCATIONS_VAR: &str = "STRUCTURED_ERROR_TRACE_LOCATIONS";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be true or false, got {value:?}")]
    InvalidBool { var: &'static str, value: String },
}

/// Formatting knobs for error traces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceOptions {
    /// Render the construction call site under each error
    pub locations: bool,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self { locations: true }
    }
}

impl TraceOptions {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_lookup(|var| env::var(var).ok())
            .context("failed to load trace options from environment")
    }

    /// Build options from any variable source, unset variables keep their defaults
    pub fn from_lookup<F>(lookup: F) -> std::result::Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let locations = match lookup(TRACE_LOCATIONS_VAR) {
            Some(value) => value
                .trim()
                .parse::<bool>()
                .map_err(|_| ConfigError::InvalidBool {
                    var: TRACE_LOCATIONS_VAR,
                    value,
                })?,
            None => defaults.locations,
        };

        Ok(Self { locations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let options = TraceOptions::from_lookup(|_| None).unwrap();
        assert_eq!(options, TraceOptions::default());
        assert!(options.locations);
    }

    #[test]
    fn test_locations_disabled() {
        let options = TraceOptions::from_lookup(|var| {
            (var == TRACE_LOCATIONS_VAR).then(|| " false ".to_string())
        })
        .unwrap();
        assert!(!options.locations);
    }

    #[test]
    fn test_invalid_bool_rejected() {
        let err = TraceOptions::from_lookup(|_| Some("sometimes".to_string())).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidBool {
                var: TRACE_LOCATIONS_VAR,
                value: "sometimes".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "STRUCTURED_ERROR_TRACE_LOCATIONS must be true or false, got \"sometimes\""
        );
    }
}
