//! Named pattern definition registry.
//!
//! The registry maps pattern names to regex-fragment bodies that may
//! themselves reference other patterns via `%{NAME}` tokens. Definitions are
//! purely additive: redefining a name replaces the prior body (last write
//! wins), which lets user-supplied pattern sources override the built-in
//! library as long as they are loaded after it.
//!
//! Bodies are not validated here; a broken body only surfaces when a template
//! referencing it is compiled.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::defaults;
use crate::error::{GrokError, Result};

/// Registry of named pattern definitions.
///
/// Loading a source parses lines of the form `NAME pattern-body`. Blank lines
/// and lines whose first non-whitespace character is `#` are skipped, as are
/// lines with no whitespace-separated body.
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    patterns: HashMap<String, String>,
}

impl PatternRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            patterns: HashMap::new(),
        }
    }

    /// Create a registry seeded with the built-in pattern library.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        defaults::register_defaults(&mut registry);
        registry
    }

    /// Define or redefine a single pattern.
    pub fn define(&mut self, name: impl Into<String>, body: impl Into<String>) {
        self.patterns.insert(name.into(), body.into());
    }

    /// Parse pattern definitions out of a text source.
    ///
    /// Returns the number of definitions added or replaced.
    pub fn load_str(&mut self, text: &str) -> usize {
        let mut count = 0;
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some(split_at) = line.find(char::is_whitespace) else {
                continue;
            };
            let (name, body) = line.split_at(split_at);
            if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                continue;
            }
            self.define(name, body.trim_start());
            count += 1;
        }
        count
    }

    /// Load pattern definitions from a file.
    ///
    /// # Errors
    /// Returns [`GrokError::IoError`] if the file cannot be read.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| GrokError::IoError(format!("{}: {e}", path.display())))?;
        let count = self.load_str(&text);
        debug!(path = %path.display(), count, "loaded pattern file");
        Ok(count)
    }

    /// Load every regular file in a directory, in lexicographic name order
    /// so that override behavior is deterministic.
    ///
    /// # Errors
    /// Returns [`GrokError::IoError`] if the directory or any file in it
    /// cannot be read.
    pub fn load_dir(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let entries = fs::read_dir(path)
            .map_err(|e| GrokError::IoError(format!("{}: {e}", path.display())))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| GrokError::IoError(format!("{}: {e}", path.display())))?;
            if entry.path().is_file() {
                files.push(entry.path());
            }
        }
        files.sort();

        let mut count = 0;
        for file in files {
            count += self.load_file(&file)?;
        }
        Ok(count)
    }

    /// Resolve a pattern name to its body.
    ///
    /// # Errors
    /// Returns [`GrokError::UnknownPattern`] if the name is not registered.
    pub fn resolve(&self, name: &str) -> Result<&str> {
        self.patterns
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| GrokError::UnknownPattern(name.to_string()))
    }

    /// Number of registered definitions.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the registry holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_resolve() {
        let mut registry = PatternRegistry::new();
        registry.define("WORD", r"\w+");

        assert_eq!(registry.resolve("WORD").unwrap(), r"\w+");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_resolve_unknown_fails() {
        let registry = PatternRegistry::new();

        assert_eq!(
            registry.resolve("MISSING"),
            Err(GrokError::UnknownPattern("MISSING".to_string()))
        );
    }

    #[test]
    fn test_last_write_wins() {
        let mut registry = PatternRegistry::new();
        registry.define("FOO", "A");
        registry.define("FOO", "B");

        assert_eq!(registry.resolve("FOO").unwrap(), "B");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_load_str_parses_definitions() {
        let mut registry = PatternRegistry::new();
        let count = registry.load_str(
            "# comment line\n\
             \n\
             WORD \\w+\n\
             NUMBER \\d+ and the rest verbatim\n",
        );

        assert_eq!(count, 2);
        assert_eq!(registry.resolve("WORD").unwrap(), "\\w+");
        assert_eq!(
            registry.resolve("NUMBER").unwrap(),
            "\\d+ and the rest verbatim"
        );
    }

    #[test]
    fn test_load_str_skips_malformed_lines() {
        let mut registry = PatternRegistry::new();
        let count = registry.load_str("JUSTANAME\nGOOD body\nbad-name! body\n");

        assert_eq!(count, 1);
        assert!(registry.resolve("GOOD").is_ok());
        assert!(registry.resolve("JUSTANAME").is_err());
    }

    #[test]
    fn test_load_str_overrides_across_loads() {
        let mut registry = PatternRegistry::new();
        registry.load_str("FOO A\n");
        registry.load_str("FOO B\n");

        assert_eq!(registry.resolve("FOO").unwrap(), "B");
    }

    #[test]
    fn test_with_defaults_seeds_library() {
        let registry = PatternRegistry::with_defaults();

        assert!(!registry.is_empty());
        assert!(registry.resolve("IP").is_ok());
        assert!(registry.resolve("NUMBER").is_ok());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let mut registry = PatternRegistry::new();
        let result = registry.load_file("/nonexistent/patterns");

        assert!(matches!(result, Err(GrokError::IoError(_))));
    }
}
