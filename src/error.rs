//! Error types for the grok engine crate.

use std::fmt;

pub type Result<T> = std::result::Result<T, GrokError>;

#[derive(Debug, Clone, PartialEq)]
pub enum GrokError {
    /// A `%{NAME}` reference points at a pattern that is not registered.
    UnknownPattern(String),
    /// Expanding a pattern revisited a name already being expanded.
    CircularReference(String),
    /// The expanded template did not compile as a regular expression.
    InvalidRegex(String),
    /// A pattern source file or directory could not be read.
    IoError(String),
    /// The configuration document could not be parsed or is inconsistent.
    ConfigError(String),
    /// The regex engine reported a failure during a match attempt.
    ///
    /// Recovered by the orchestrator: logged and treated as a non-match for
    /// that single value, never fatal to the filtering pass.
    MatchEngine(String),
}

impl fmt::Display for GrokError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrokError::UnknownPattern(name) => write!(f, "Unknown pattern: {name}"),
            GrokError::CircularReference(name) => {
                write!(f, "Circular pattern reference: {name}")
            }
            GrokError::InvalidRegex(msg) => write!(f, "Invalid regex: {msg}"),
            GrokError::IoError(msg) => write!(f, "IO error: {msg}"),
            GrokError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            GrokError::MatchEngine(msg) => write!(f, "Match engine error: {msg}"),
        }
    }
}

impl std::error::Error for GrokError {}

impl From<std::io::Error> for GrokError {
    fn from(err: std::io::Error) -> Self {
        GrokError::IoError(err.to_string())
    }
}

impl From<regex::Error> for GrokError {
    fn from(err: regex::Error) -> Self {
        GrokError::InvalidRegex(err.to_string())
    }
}
