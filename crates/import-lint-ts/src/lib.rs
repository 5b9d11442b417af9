//! # import-lint-ts
//!
//! Tree-sitter powered import extraction for TypeScript and JavaScript.
//!
//! This crate implements `import-lint-core`'s [`LanguageExtractor`] for the
//! ECMAScript family:
//!
//! - [`EcmaScriptExtractor`] parses `.ts`-like files with the TypeScript
//!   grammar and `.tsx`/`.jsx` files with the TSX grammar
//! - [`default_extractors`] returns one extractor per dialect

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod ecmascript;

pub use ecmascript::{Dialect, EcmaScriptExtractor};
pub use import_lint_core::LanguageExtractor;

use import_lint_core::ExtractorBox;

/// Returns extractors covering every supported file extension.
#[must_use]
pub fn default_extractors() -> Vec<ExtractorBox> {
    vec![
        Box::new(EcmaScriptExtractor::typescript()),
        Box::new(EcmaScriptExtractor::tsx()),
    ]
}
