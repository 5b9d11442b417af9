//! # import-lint-core
//!
//! Core framework for linting the import declarations of source files.
//!
//! This crate provides the foundational traits and types shared by the
//! language extractors, the rules and the CLI:
//!
//! - [`LanguageExtractor`] turns source text into a [`SourceFile`]
//! - [`ImportDeclaration`] wraps one import with memoized path resolution
//! - [`Rule`] trait for per-file rules
//! - [`Analyzer`] for orchestrating lint execution and automatic fixes
//! - [`Violation`] for representing lint findings
//!
//! ## Example
//!
//! ```ignore
//! use import_lint_core::Analyzer;
//! use import_lint_ts::EcmaScriptExtractor;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./")
//!     .extractor(EcmaScriptExtractor::typescript())
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod debug;
mod declaration;
mod fix;
mod rule;
mod source;
mod types;

/// Lexical path helpers shared by rules.
pub mod paths;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError, MAX_FIX_PASSES};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::FileContext;
pub use debug::RuleDebugger;
pub use declaration::{DeclarationError, ImportDeclaration};
pub use fix::{apply_fixes, FixOutput};
pub use rule::{Rule, RuleBox};
pub use source::{
    ExtractError, ExtractorBox, ImportNode, ImportSource, LanguageExtractor, Position,
    SourceFile, Span,
};
pub use types::{
    LintResult, Location, Replacement, Severity, Suggestion, Violation, ViolationDiagnostic,
};
