//! # import-lint-rules
//!
//! Built-in import lint rules for import-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | IL001 | `relative-import-order` | Orders relative imports by group, depth and name |
//! | IL002 | `import-spaces` | One empty line between import groups, none inside |
//! | IL003 | `siloed-relative-import` | Forbids relative imports across configured boundaries |
//!
//! Every rule needs options, so rules are built from a [`Config`]:
//!
//! ```ignore
//! use import_lint_core::{Analyzer, Config};
//! use import_lint_rules::rules_from_config;
//!
//! let config = Config::from_file("import-lint.toml".as_ref())?;
//! let mut builder = Analyzer::builder().config(config.clone());
//! for rule in rules_from_config(&config)? {
//!     builder = builder.rule_box(rule);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod import_spaces;
pub mod relative_import_order;
mod registry;
pub mod siloed_relative_import;
pub mod sort;

pub use import_spaces::{ImportGroup, ImportSpaces, ImportSpacesOptions};
pub use registry::{all_rules, build_rule, find_rule, rules_from_config, RuleInfo};
pub use relative_import_order::{RelativeImportOrder, RelativeImportOrderOptions};
pub use siloed_relative_import::{SiloDirectory, SiloedRelativeImport, SiloedRelativeImportOptions};
pub use sort::{Side, SortSpec, SortStrategy, Verdict};

/// Re-export core types for convenience.
pub use import_lint_core::{Config, Rule, Severity, Violation};

use import_lint_core::ConfigError;
use regex::Regex;

pub(crate) fn compile_pattern(rule: &str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::Validation {
        rule: rule.to_string(),
        message: format!("invalid pattern '{pattern}': {e}"),
    })
}

pub(crate) fn compile_patterns(rule: &str, patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns.iter().map(|p| compile_pattern(rule, p)).collect()
}
