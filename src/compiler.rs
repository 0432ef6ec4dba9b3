//! Recursive macro-expansion pattern compiler.
//!
//! This module turns a template such as `%{IP:client} %{WORD:method}` into a
//! single compiled regular expression. Each `%{…}` token resolves through the
//! registry, its body is expanded recursively (bodies may reference further
//! patterns), and the token is rewritten as a capturing group with a
//! generated name. Text outside tokens is inserted verbatim.
//!
//! Compilation is deterministic and side-effect-free: the compiler holds no
//! state beyond the pre-compiled token scanner, and a given (template,
//! registry) pair always produces the same [`CompiledPattern`].

use regex::Regex;

use crate::error::{GrokError, Result};
use crate::pattern::{CaptureDescriptor, CompiledPattern, TypeTag};
use crate::registry::PatternRegistry;

/// Token shapes: `%{SYNTAX}`, `%{SYNTAX:SEMANTIC}`, `%{SYNTAX:SEMANTIC:TYPE}`.
const TOKEN_PATTERN: &str =
    r"%\{(?P<syntax>[A-Za-z0-9_]+)(?::(?P<semantic>[^:}]+))?(?::(?P<type>[^}]+))?\}";

/// The pattern compiler.
///
/// # Examples
///
/// ```rust
/// use grok_engine::{Compiler, PatternRegistry};
///
/// let registry = PatternRegistry::with_defaults();
/// let compiler = Compiler::new();
///
/// // WORD and INT expand to plain bodies, one capture each. Patterns that
/// // reference further patterns (%{IP}, %{NUMBER}, …) record descriptors
/// // for their inner tokens as well.
/// let pattern = compiler.compile("%{WORD:method} %{INT:code}", &registry)?;
/// assert_eq!(pattern.captures().len(), 2);
/// # Ok::<(), grok_engine::GrokError>(())
/// ```
#[derive(Debug)]
pub struct Compiler {
    token_re: Regex,
}

impl Compiler {
    /// Create a new compiler instance.
    pub fn new() -> Self {
        Self {
            // The token pattern is a fixed literal; it cannot fail to compile.
            token_re: Regex::new(TOKEN_PATTERN).expect("token scanner pattern is valid"),
        }
    }

    /// Compile a template into a [`CompiledPattern`].
    ///
    /// # Errors
    /// * [`GrokError::UnknownPattern`] - a referenced name is not registered
    /// * [`GrokError::CircularReference`] - expansion revisited a name already
    ///   being expanded
    /// * [`GrokError::InvalidRegex`] - the expanded template is not a valid
    ///   regular expression
    pub fn compile(&self, template: &str, registry: &PatternRegistry) -> Result<CompiledPattern> {
        let mut captures = Vec::new();
        let mut expanding = Vec::new();
        let mut next_group = 0usize;

        let source = self.expand(
            template,
            registry,
            &mut expanding,
            &mut captures,
            &mut next_group,
        )?;

        let regex = Regex::new(&source)
            .map_err(|e| GrokError::InvalidRegex(format!("{template}: {e}")))?;

        Ok(CompiledPattern::new(template.to_string(), regex, captures))
    }

    /// Expand every token in `text`, appending capture descriptors in the
    /// order their groups open.
    fn expand(
        &self,
        text: &str,
        registry: &PatternRegistry,
        expanding: &mut Vec<String>,
        captures: &mut Vec<CaptureDescriptor>,
        next_group: &mut usize,
    ) -> Result<String> {
        let mut out = String::with_capacity(text.len());
        let mut tail = 0;

        for caps in self.token_re.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let Some(syntax) = caps.name("syntax").map(|m| m.as_str()) else {
                continue;
            };

            out.push_str(&text[tail..whole.start()]);
            tail = whole.end();

            let body = registry.resolve(syntax)?;
            if expanding.iter().any(|name| name == syntax) {
                return Err(GrokError::CircularReference(syntax.to_string()));
            }

            let semantic = caps.name("semantic").map(|m| m.as_str());
            let type_text = caps.name("type").map(|m| m.as_str());

            let group_name = format!("g{next_group}");
            *next_group += 1;

            // Descriptor goes in before the body expands so the sequence
            // mirrors group-open order in the final regex.
            captures.push(CaptureDescriptor {
                group_name: group_name.clone(),
                syntax: syntax.to_string(),
                semantic: semantic.map(str::to_string),
                type_tag: type_text.and_then(TypeTag::parse),
                raw_key: match (semantic, type_text) {
                    (Some(name), Some(ty)) => format!("{name}:{ty}"),
                    (Some(name), None) => name.to_string(),
                    _ => syntax.to_string(),
                },
                named: semantic.is_some(),
            });

            expanding.push(syntax.to_string());
            let inner = self.expand(body, registry, expanding, captures, next_group)?;
            expanding.pop();

            out.push_str("(?P<");
            out.push_str(&group_name);
            out.push('>');
            out.push_str(&inner);
            out.push(')');
        }

        out.push_str(&text[tail..]);
        Ok(out)
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}
