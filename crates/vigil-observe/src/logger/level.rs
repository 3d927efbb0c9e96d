use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer};
use tracing_subscriber::EnvFilter;

use crate::logger::error::LoggerError;

/// An `EnvFilter` directive string known to parse, e.g. `info,vigil_api=debug`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerLevel(String);

impl LoggerLevel {
    pub fn new(directive: &str) -> Result<Self, LoggerError> {
        let directive = directive.trim();
        if directive.is_empty() {
            return Err(LoggerError::InvalidFilter {
                directive: String::new(),
                reason: "empty directive".to_string(),
            });
        }
        parse(directive)?;
        Ok(Self(directive.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn filter(&self) -> Result<EnvFilter, LoggerError> {
        parse(&self.0)
    }
}

fn parse(directive: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::try_new(directive).map_err(|e| LoggerError::InvalidFilter {
        directive: directive.to_string(),
        reason: e.to_string(),
    })
}

impl Default for LoggerLevel {
    fn default() -> Self {
        Self("info".to_string())
    }
}

impl fmt::Display for LoggerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LoggerLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for LoggerLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_levels_and_directives() {
        assert_eq!(LoggerLevel::new(" debug ").unwrap().as_str(), "debug");
        assert!(LoggerLevel::new("warn,vigil_api=trace").is_ok());
        assert_eq!(LoggerLevel::default().to_string(), "info");
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(LoggerLevel::new("  "), Err(LoggerError::InvalidFilter { .. })));
        match LoggerLevel::new("vigil=[[") {
            Err(LoggerError::InvalidFilter { directive, reason }) => {
                assert_eq!(directive, "vigil=[[");
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
