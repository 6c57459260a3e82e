//! Configuration management utilities
//!
//! Configuration in this workspace comes from environment variables read
//! once at startup. [`EnvSource`] wraps the lookup so the same code path can
//! be driven by the real process environment or by a fixed map in tests.

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank
    #[error("{0} environment variable not set")]
    Missing(String),

    /// A variable is set but could not be parsed
    #[error("Invalid value for {name}: {detail}")]
    Invalid {
        /// Variable name
        name: String,
        /// Parse failure description
        detail: String,
    },
}

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Source of configuration variables
pub struct EnvSource {
    lookup: Lookup,
}

impl EnvSource {
    /// Read from the process environment
    pub fn process() -> Self {
        Self::from_fn(|name| std::env::var(name).ok())
    }

    /// Read through an arbitrary lookup function
    pub fn from_fn<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
        }
    }

    /// Read from a fixed set of pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::from_fn(move |name| map.get(name).cloned())
    }

    /// Value of `name`, treating blank values as unset
    pub fn get(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Value of a required variable
    pub fn require(&self, name: &str) -> Result<String, ConfigError> {
        self.get(name)
            .ok_or_else(|| ConfigError::Missing(name.to_string()))
    }

    /// Value of an optional variable with a fallback
    pub fn get_or(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_string())
    }

    /// Parsed value of an optional variable with a fallback
    pub fn parse_or<T>(&self, name: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get(name) {
            None => Ok(default),
            Some(raw) => raw.parse::<T>().map_err(|e| ConfigError::Invalid {
                name: name.to_string(),
                detail: format!("'{raw}': {e}"),
            }),
        }
    }
}

impl std::fmt::Debug for EnvSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvSource").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_present_and_missing() {
        let env = EnvSource::from_pairs([("GROQ_API_KEY", "gsk-123")]);

        assert_eq!(env.require("GROQ_API_KEY").unwrap(), "gsk-123");
        assert_eq!(
            env.require("SERPER_API_KEY"),
            Err(ConfigError::Missing("SERPER_API_KEY".to_string()))
        );
    }

    #[test]
    fn test_blank_value_is_unset() {
        let env = EnvSource::from_pairs([("GNEWS_API_KEY", "   ")]);
        assert!(env.get("GNEWS_API_KEY").is_none());
        assert!(env.require("GNEWS_API_KEY").is_err());
    }

    #[test]
    fn test_get_or_default() {
        let env = EnvSource::from_pairs([("GROQ_MODEL", "llama-3.1-8b-instant")]);
        assert_eq!(env.get_or("GROQ_MODEL", "x"), "llama-3.1-8b-instant");
        assert_eq!(env.get_or("GROQ_API_BASE", "https://a"), "https://a");
    }

    #[test]
    fn test_parse_or() {
        let env = EnvSource::from_pairs([("TIMEOUT", "45"), ("BROKEN", "soon")]);

        assert_eq!(env.parse_or("TIMEOUT", 30_u64).unwrap(), 45);
        assert_eq!(env.parse_or("ABSENT", 30_u64).unwrap(), 30);

        let err = env.parse_or("BROKEN", 30_u64).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref name, .. } if name == "BROKEN"));
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::Missing("GROQ_API_KEY".to_string());
        assert_eq!(err.to_string(), "GROQ_API_KEY environment variable not set");
    }
}
