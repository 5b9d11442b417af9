//! Rule trait for defining lint rules.

use crate::context::FileContext;
use crate::source::SourceFile;
use crate::types::{Severity, Violation};

/// A per-file lint rule over the import declarations of one source file.
///
/// Rules receive the extracted [`SourceFile`] and the [`FileContext`] it was
/// read from. A rule instance only holds immutable configuration; any caches
/// it needs live inside a single `check` call.
///
/// # Example
///
/// ```ignore
/// use import_lint_core::{FileContext, Rule, SourceFile, Violation};
///
/// pub struct NoSideEffectImports;
///
/// impl Rule for NoSideEffectImports {
///     fn name(&self) -> &'static str { "no-side-effect-imports" }
///     fn code(&self) -> &'static str { "IL100" }
///
///     fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
///         Vec::new()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "relative-import-order").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "IL001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether violations from this rule carry automatic fixes.
    fn fixable(&self) -> bool {
        false
    }

    /// Checks a single file and returns any violations found.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Context about the file being checked
    /// * `file` - The import declarations extracted from the file
    ///
    /// # Returns
    ///
    /// A vector of violations found in this file.
    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
