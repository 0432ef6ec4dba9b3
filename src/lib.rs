//! # Grok Engine
//!
//! A Rust library for extracting structured fields from unstructured text
//! lines with a macro-based pattern language. A template such as
//! `%{IP:client} %{WORD:method}` expands recursively into one compiled
//! regular expression with named extraction points; matching it against
//! event text populates a structured [`Record`].
//!
//!
//! ## Quick Start
//!
//! ### Basic Usage
//!
//! ```rust
//! use grok_engine::{GrokConfig, GrokFilter, Record};
//!
//! // Configure one target field with one template
//! let config = GrokConfig::new().with_match(
//!     "message",
//!     ["%{IP:client} %{WORD:method} %{URIPATHPARAM:request} %{NUMBER:bytes:int} %{NUMBER:duration:float}"],
//! );
//!
//! // All templates compile once, up front
//! let filter = GrokFilter::new(config)?;
//!
//! // Filter events
//! let mut record = Record::from_message("55.3.244.1 GET /index.html 15824 0.043");
//! filter.filter(&mut record);
//!
//! assert_eq!(record.get("client").unwrap(), "55.3.244.1");
//! assert_eq!(record.get("method").unwrap(), "GET");
//! assert_eq!(record.get("bytes").unwrap(), 15824);
//! # Ok::<(), grok_engine::GrokError>(())
//! ```
//!
//! ### Batch Processing
//!
//! ```rust
//! use grok_engine::{GrokConfig, GrokFilter, Record};
//!
//! let config = GrokConfig::new().with_match("message", ["%{LOGLEVEL:level} %{GREEDYDATA:text}"]);
//! let filter = GrokFilter::new(config)?;
//!
//! // Records are independent; large batches are filtered in parallel
//! let mut records: Vec<Record> = vec![
//!     Record::from_message("ERROR disk is full"),
//!     Record::from_message("INFO all is well"),
//! ];
//! filter.filter_batch(&mut records);
//!
//! assert_eq!(records[0].get("level").unwrap(), "ERROR");
//! # Ok::<(), grok_engine::GrokError>(())
//! ```
//!
//! ### Custom Patterns
//!
//! ```rust,ignore
//! use grok_engine::GrokConfig;
//!
//! // Pattern directories load after the built-in library, inline
//! // definitions load last; later definitions override earlier ones.
//! let config = GrokConfig::new()
//!     .with_patterns_dir("/etc/grok/patterns")
//!     .with_pattern_definition("SESSIONID", "[A-F0-9]{16}")
//!     .with_match("message", ["session %{SESSIONID:session} closed"]);
//! ```
//!
//! ## Failure Handling
//!
//! A value that matches none of its configured patterns leaves the record's
//! extracted fields unchanged and adds the configured failure tags, once
//! each. Registration-time problems (unknown pattern names, circular
//! references, invalid expansions) are fatal in [`GrokFilter::new`].

pub mod compiler;
pub mod config;
pub mod defaults;
pub mod error;
pub mod filter;
pub mod matcher;
pub mod merge;
pub mod pattern;
pub mod prefilter;
pub mod record;
pub mod registry;

// Primary engine interface
pub use filter::GrokFilter;

// Configuration
pub use config::{GrokConfig, DEFAULT_FAILURE_TAG};

// Core types and errors
pub use error::{GrokError, Result};
pub use pattern::{CaptureDescriptor, CompiledPattern, TypeTag};
pub use record::{Record, MESSAGE_FIELD};

// Pattern library and compilation
pub use compiler::Compiler;
pub use defaults::DEFAULT_PATTERNS;
pub use registry::PatternRegistry;

// Matching (for advanced use cases)
pub use matcher::{match_value, Capture, MatchOutcome};
pub use prefilter::{PrefilterStats, SetPrefilter};
