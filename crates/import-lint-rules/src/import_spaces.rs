//! Rule to enforce blank lines between import groups.
//!
//! Consecutive imports of the same group must not be separated by empty
//! lines; imports of different groups must be separated by exactly one.
//! Non-relative imports and relative imports matching no group each count
//! as a group of their own kind.
//!
//! # Configuration
//!
//! - `groups`: regular expressions over the root-relative import path (required)
//! - `debug`: trace intermediate values (default: false)

use std::collections::HashMap;

use import_lint_core::{
    ConfigError, DeclarationError, FileContext, ImportDeclaration, Replacement, Rule, RuleConfig,
    RuleDebugger, SourceFile, Suggestion, Violation,
};
use regex::Regex;
use serde::Deserialize;
use tracing::warn;

/// Rule code for import-spaces.
pub const CODE: &str = "IL002";

/// Rule name for import-spaces.
pub const NAME: &str = "import-spaces";

const NO_EMPTY: &str = "There should be no empty lines in a import group";
const ONE_EMPTY: &str = "There should be one empty line between import groups";

/// Options accepted under `[rules.import-spaces]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportSpacesOptions {
    /// Group patterns, in any order.
    pub groups: Vec<String>,
    /// Trace intermediate values.
    #[serde(default)]
    pub debug: bool,
}

/// Spacing bucket of one import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportGroup {
    /// Not a relative import.
    Absolute,
    /// Relative import matching the group pattern at this index.
    Group(usize),
    /// Relative import matching no group pattern.
    GroupNotFound,
}

/// Classifies declarations, remembering the result per declaration index.
struct GroupClassifier<'r> {
    groups: &'r [Regex],
    cache: HashMap<usize, ImportGroup>,
}

impl<'r> GroupClassifier<'r> {
    fn new(groups: &'r [Regex]) -> Self {
        Self {
            groups,
            cache: HashMap::new(),
        }
    }

    fn classify(
        &mut self,
        index: usize,
        declaration: &ImportDeclaration<'_>,
    ) -> Result<ImportGroup, DeclarationError> {
        if let Some(group) = self.cache.get(&index) {
            return Ok(*group);
        }

        let group = if declaration.is_relative()? {
            let path = declaration.path_from_root()?;
            self.groups
                .iter()
                .position(|pattern| pattern.is_match(path))
                .map_or(ImportGroup::GroupNotFound, ImportGroup::Group)
        } else {
            ImportGroup::Absolute
        };

        self.cache.insert(index, group);
        Ok(group)
    }
}

/// Enforces blank-line spacing between import groups.
#[derive(Debug, Clone)]
pub struct ImportSpaces {
    groups: Vec<Regex>,
    debug: bool,
}

impl ImportSpaces {
    /// Creates the rule from compiled group patterns.
    #[must_use]
    pub fn new(groups: Vec<Regex>) -> Self {
        Self {
            groups,
            debug: false,
        }
    }

    /// Enables debug tracing.
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Builds the rule from options, compiling every pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if `groups` is empty or a pattern
    /// does not compile.
    pub fn from_options(options: ImportSpacesOptions) -> Result<Self, ConfigError> {
        if options.groups.is_empty() {
            return Err(ConfigError::Validation {
                rule: NAME.to_string(),
                message: "`groups` needs at least one pattern".to_string(),
            });
        }
        let groups = crate::compile_patterns(NAME, &options.groups)?;
        Ok(Self::new(groups).debug(options.debug))
    }

    /// Builds the rule from its `[rules.import-spaces]` table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the options are malformed.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        Self::from_options(config.options_as(NAME)?)
    }

    fn check_pair(
        &self,
        classifier: &mut GroupClassifier<'_>,
        declarations: &[ImportDeclaration<'_>],
        index: usize,
        debugger: &RuleDebugger,
    ) -> Result<Option<Violation>, DeclarationError> {
        let previous = &declarations[index - 1];
        let current = &declarations[index];

        let needs_space =
            classifier.classify(index, current)? != classifier.classify(index - 1, previous)?;
        debugger.trace("needsSpace", &needs_space);

        let wanted = if needs_space { 2 } else { 1 };
        // Measured from the end of any comment trailing the previous import.
        let (start, previous_end) = previous.trailing_end();
        let (_, end) = current.range_between(previous, true);
        let actual = current
            .location(true)
            .0
            .line
            .saturating_sub(previous_end.line);
        debugger.trace("actualLines", &actual);

        if wanted == actual {
            return Ok(None);
        }

        let message = if needs_space { ONE_EMPTY } else { NO_EMPTY };
        Ok(Some(
            Violation::new(
                CODE,
                NAME,
                self.default_severity(),
                current.report_location(),
                message,
            )
            .with_suggestion(Suggestion::with_fix(
                if needs_space {
                    "Separate the groups with one empty line"
                } else {
                    "Remove the empty lines"
                },
                vec![Replacement::new(start, end, "\n".repeat(wanted))],
            )),
        ))
    }
}

impl Rule for ImportSpaces {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires one empty line between import groups and none inside a group"
    }

    fn fixable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        let debugger = RuleDebugger::new(NAME, self.debug);
        debugger.trace_all("groups", self.groups.iter().map(Regex::as_str));

        let declarations = ImportDeclaration::wrap_all(&file.imports, ctx);
        let mut classifier = GroupClassifier::new(&self.groups);
        let mut violations = Vec::new();

        for index in 1..declarations.len() {
            if !declarations[index - 1]
                .node()
                .is_directly_followed_by(declarations[index].node())
            {
                continue;
            }

            match self.check_pair(&mut classifier, &declarations, index, &debugger) {
                Ok(Some(violation)) => violations.push(violation),
                Ok(None) => {}
                Err(e) => warn!(rule = NAME, file = %ctx.relative_path, "Skipping pair: {e}"),
            }
        }

        violations
    }
}
