use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer};

use crate::logger::error::LoggerError;

/// Where and how events are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerFormat {
    /// Human-readable lines on stdout.
    Text,
    /// One JSON object per event on stdout.
    Json,
    /// Native journald fields.
    Journald,
}

impl LoggerFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoggerFormat::Text => "text",
            LoggerFormat::Json => "json",
            LoggerFormat::Journald => "journald",
        }
    }

    /// Whether this build can write in this format.
    pub const fn is_available(&self) -> bool {
        match self {
            LoggerFormat::Journald => cfg!(all(target_os = "linux", feature = "journald")),
            LoggerFormat::Text | LoggerFormat::Json => true,
        }
    }
}

impl fmt::Display for LoggerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoggerFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = match s.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" => LoggerFormat::Text,
            "json" => LoggerFormat::Json,
            "journald" | "journal" => LoggerFormat::Journald,
            _ => return Err(LoggerError::UnknownFormat(s.to_string())),
        };
        if !format.is_available() {
            return Err(LoggerError::JournaldUnavailable);
        }
        Ok(format)
    }
}

impl<'de> Deserialize<'de> for LoggerFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(" JSON ".parse::<LoggerFormat>().unwrap(), LoggerFormat::Json);
        assert_eq!("plain".parse::<LoggerFormat>().unwrap(), LoggerFormat::Text);
        assert!(matches!(
            "xml".parse::<LoggerFormat>(),
            Err(LoggerError::UnknownFormat(raw)) if raw == "xml"
        ));
    }

    #[test]
    fn journald_follows_the_build() {
        let parsed = "journal".parse::<LoggerFormat>();
        if LoggerFormat::Journald.is_available() {
            assert_eq!(parsed.unwrap(), LoggerFormat::Journald);
        } else {
            assert!(matches!(parsed, Err(LoggerError::JournaldUnavailable)));
        }
    }

    #[test]
    fn display_matches_parse() {
        for format in [LoggerFormat::Text, LoggerFormat::Json] {
            assert_eq!(format.to_string().parse::<LoggerFormat>().unwrap(), format);
        }
    }
}
