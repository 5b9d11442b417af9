//! Rule to keep relative imports in a configured order.
//!
//! # Rationale
//!
//! Ordering relative imports by layer (utils before domain before UI, say)
//! makes a file's dependencies readable at a glance.
//!
//! # Configuration
//!
//! - `sort`: ordered list of `group`, `depth` and `name` strategies (required)
//! - `debug`: trace intermediate values (default: false)
//!
//! Paths in `group` strategies are relative to the project root, not to the
//! importing file.
//!
//! Only adjacent relative imports are compared; non-relative imports in
//! between are skipped. Each out-of-order pair is reported on the lower
//! declaration with a fix that swaps the two, comments included.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use import_lint_core::{
    ConfigError, DeclarationError, FileContext, ImportDeclaration, Replacement, Rule, RuleConfig,
    RuleDebugger, SourceFile, Suggestion, Violation,
};
use serde::Deserialize;
use tracing::warn;

use crate::sort::{Side, SortSpec, SortStrategy};

/// Rule code for relative-import-order.
pub const CODE: &str = "IL001";

/// Rule name for relative-import-order.
pub const NAME: &str = "relative-import-order";

/// Options accepted under `[rules.relative-import-order]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelativeImportOrderOptions {
    /// Strategies in precedence order.
    pub sort: Vec<SortStrategy>,
    /// Trace intermediate values.
    #[serde(default)]
    pub debug: bool,
}

/// Enforces the configured order of relative imports.
#[derive(Debug, Clone)]
pub struct RelativeImportOrder {
    spec: SortSpec,
    debug: bool,
}

/// A pending diagnostic for one declaration.
#[derive(Debug)]
enum Correction {
    NotListed { path: String },
    Swap { previous: usize, message: String },
}

impl RelativeImportOrder {
    /// Creates the rule from strategies in precedence order.
    #[must_use]
    pub fn new(sort: Vec<SortStrategy>) -> Self {
        Self {
            spec: SortSpec::new(sort),
            debug: false,
        }
    }

    /// Enables debug tracing.
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Builds the rule from validated options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for an empty `sort` list or a
    /// `group` strategy without groups.
    pub fn from_options(options: RelativeImportOrderOptions) -> Result<Self, ConfigError> {
        let invalid = |message: String| ConfigError::Validation {
            rule: NAME.to_string(),
            message,
        };

        if options.sort.is_empty() {
            return Err(invalid("`sort` needs at least one strategy".to_string()));
        }
        for strategy in &options.sort {
            strategy.validate().map_err(invalid)?;
        }

        Ok(Self::new(options.sort).debug(options.debug))
    }

    /// Builds the rule from its `[rules.relative-import-order]` table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the options are malformed.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        Self::from_options(config.options_as(NAME)?)
    }

    /// Walks adjacent relative imports and collects corrections keyed by
    /// declaration index.
    fn corrections(
        &self,
        declarations: &[ImportDeclaration<'_>],
        debugger: &RuleDebugger,
    ) -> Result<BTreeMap<usize, Correction>, DeclarationError> {
        let mut relative = Vec::new();
        for (index, declaration) in declarations.iter().enumerate() {
            if declaration.is_relative()? {
                relative.push(index);
            }
        }
        debugger.trace_all(
            "relativeImports",
            relative.iter().map(|&i| declarations[i].text(false)),
        );

        let mut corrections = BTreeMap::new();
        for pair in relative.windows(2) {
            let (previous, current) = (pair[0], pair[1]);
            let verdict = self
                .spec
                .compare(&declarations[previous], &declarations[current])?;
            debugger.trace("verdict", &verdict);

            for side in &verdict.unresolved {
                let index = match side {
                    Side::First => previous,
                    Side::Second => current,
                };
                let path = declarations[index].path_from_root()?.to_string();
                corrections
                    .entry(index)
                    .or_insert(Correction::NotListed { path });
            }

            if verdict.unresolved.is_empty() && verdict.ordering == Ordering::Greater {
                let message = format!(
                    "Imports from '{}' should be above the import from '{}'",
                    declarations[current].raw_path()?,
                    declarations[previous].raw_path()?,
                );
                corrections.insert(current, Correction::Swap { previous, message });
            }
        }

        Ok(corrections)
    }

    fn violation(
        &self,
        declarations: &[ImportDeclaration<'_>],
        index: usize,
        correction: Correction,
    ) -> Violation {
        let current = &declarations[index];
        let location = current.report_location();

        match correction {
            Correction::NotListed { path } => Violation::new(
                CODE,
                NAME,
                self.default_severity(),
                location,
                format!(
                    "The path '{path}' is not listed.\nAll imported paths need to be included, either in the groups (so they are sorted) or ignored"
                ),
            )
            .with_suggestion(Suggestion::new(format!(
                "Add '{path}' to a group or to the ignore list"
            ))),
            Correction::Swap { previous, message } => {
                let previous = &declarations[previous];
                let (previous_start, previous_end) = previous.range(true);
                let (current_start, current_end) = current.range(true);
                Violation::new(CODE, NAME, self.default_severity(), location, message)
                    .with_suggestion(Suggestion::with_fix(
                        "Swap the two imports",
                        vec![
                            Replacement::new(previous_start, previous_end, current.text(true)),
                            Replacement::new(current_start, current_end, previous.text(true)),
                        ],
                    ))
            }
        }
    }
}

impl Rule for RelativeImportOrder {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Ensures relative imports appear in the configured order"
    }

    fn fixable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        let debugger = RuleDebugger::new(NAME, self.debug);
        let declarations = ImportDeclaration::wrap_all(&file.imports, ctx);
        debugger.trace_all("allImports", declarations.iter().map(|d| d.text(false)));

        let corrections = match self.corrections(&declarations, &debugger) {
            Ok(corrections) => corrections,
            Err(e) => {
                warn!(rule = NAME, file = %ctx.relative_path, "Skipping file: {e}");
                return Vec::new();
            }
        };
        debugger.trace_all("errors", corrections.keys());

        corrections
            .into_iter()
            .map(|(index, correction)| self.violation(&declarations, index, correction))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use import_lint_core::{apply_fixes, LanguageExtractor};
    use import_lint_ts::EcmaScriptExtractor;
    use std::path::Path;

    fn group(groups: &[&str]) -> SortStrategy {
        SortStrategy::Group {
            groups: groups.iter().map(ToString::to_string).collect(),
            ignore: vec![],
        }
    }

    fn check_at(rule: &RelativeImportOrder, file: &str, code: &str) -> Vec<Violation> {
        let source = EcmaScriptExtractor::typescript()
            .analyze(code)
            .expect("Failed to parse");
        let ctx = FileContext::new(Path::new(file), code, Path::new("/project"));
        rule.check(&ctx, &source)
    }

    fn check_code(rule: &RelativeImportOrder, code: &str) -> Vec<Violation> {
        check_at(rule, "file.ts", code)
    }

    #[test]
    fn test_detects_group_order() {
        let rule = RelativeImportOrder::new(vec![group(&["../domain", "../react"])]);
        let code = "import { ReactComponent } from '../react'\nimport { DomainType } from '../domain'";
        let violations = check_code(&rule, code);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, CODE);
        assert_eq!(
            violations[0].message,
            "Imports from '../domain' should be above the import from '../react'"
        );
        assert_eq!(violations[0].location.line, 2);

        let fixed = apply_fixes(code, &violations).output;
        assert_eq!(
            fixed,
            "import { DomainType } from '../domain'\nimport { ReactComponent } from '../react'"
        );
        assert!(check_code(&rule, &fixed).is_empty());
    }

    #[test]
    fn test_allows_sorted_groups() {
        let rule = RelativeImportOrder::new(vec![group(&["../domain", "../react"])]);
        let code = "import { DomainType } from '../domain'\nimport { ReactComponent } from '../react'";
        assert!(check_code(&rule, code).is_empty());
    }

    #[test]
    fn test_ignored_paths_are_not_reported() {
        let rule = RelativeImportOrder::new(vec![SortStrategy::Group {
            groups: vec!["../foo".into(), "../bar".into()],
            ignore: vec!["../domain".into(), "../react".into()],
        }]);
        let code = "import { DomainType } from '../domain'\nimport { ReactComponent } from '../react'";
        assert!(check_code(&rule, code).is_empty());
    }

    #[test]
    fn test_reports_unlisted_path() {
        let rule = RelativeImportOrder::new(vec![group(&["../utils"])]);
        let code = "import { DomainType } from '../domain'\nimport { OtherType } from '../utils'";
        let violations = check_code(&rule, code);
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].message,
            "The path '../domain' is not listed.\nAll imported paths need to be included, either in the groups (so they are sorted) or ignored"
        );
        assert!(violations[0].fix().is_none());
    }

    #[test]
    fn test_name_and_depth_sorting() {
        let desc = RelativeImportOrder::new(vec![SortStrategy::Name { asc: false }]);
        let violations = check_code(&desc, "import { A } from '../domain/a'\nimport { B } from '../domain/b'");
        assert_eq!(
            violations[0].message,
            "Imports from '../domain/b' should be above the import from '../domain/a'"
        );

        let asc = RelativeImportOrder::new(vec![SortStrategy::Name { asc: true }]);
        assert!(check_code(&asc, "import { A } from '../domain/a'\nimport { B } from '../domain/b'").is_empty());

        let depth = RelativeImportOrder::new(vec![SortStrategy::Depth]);
        let violations = check_code(&depth, "import { B } from '../domain/b'\nimport { A } from '../domain'");
        assert_eq!(
            violations[0].message,
            "Imports from '../domain' should be above the import from '../domain/b'"
        );
    }

    #[test]
    fn test_unlisted_pair_gets_no_swap() {
        let rule = RelativeImportOrder::new(vec![group(&["../b"]), SortStrategy::Name { asc: true }]);
        let violations = check_code(&rule, "import z from '../z'\nimport b from '../b'");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.starts_with("The path '../z' is not listed."));
        assert!(violations[0].fix().is_none());
    }

    #[test]
    fn test_non_relative_imports_are_skipped() {
        let rule = RelativeImportOrder::new(vec![group(&["../domain", "../react"])]);
        let code = "import a from '../domain'\nimport fs from 'fs'\nimport b from '../react'\nimport z from 'zod'";
        assert!(check_code(&rule, code).is_empty());
    }

    #[test]
    fn test_single_relative_import_is_fine() {
        let rule = RelativeImportOrder::new(vec![group(&["../x"])]);
        assert!(check_code(&rule, "import a from '../a'").is_empty());
    }

    #[test]
    fn test_malformed_import_skips_file() {
        let rule = RelativeImportOrder::new(vec![SortStrategy::Depth]);
        let file = SourceFile {
            imports: vec![import_lint_core::ImportNode {
                statement_index: 0,
                source: import_lint_core::ImportSource::Expression("`./${x}`".into()),
                span: import_lint_core::Span::new(
                    0,
                    0,
                    import_lint_core::Position::new(1, 1),
                    import_lint_core::Position::new(1, 1),
                ),
                leading_comments: vec![],
                trailing_comments: vec![],
            }],
            statement_count: 1,
        };
        let ctx = FileContext::new(Path::new("file.ts"), "", Path::new("/project"));
        assert!(rule.check(&ctx, &file).is_empty());
    }

    #[test]
    fn test_from_options_validates() {
        let empty = RelativeImportOrderOptions {
            sort: vec![],
            debug: false,
        };
        assert!(matches!(
            RelativeImportOrder::from_options(empty),
            Err(ConfigError::Validation { .. })
        ));

        let empty_group = RelativeImportOrderOptions {
            sort: vec![group(&[])],
            debug: false,
        };
        assert!(RelativeImportOrder::from_options(empty_group).is_err());
    }

    #[test]
    fn test_comments_travel_with_swapped_import() {
        let rule = RelativeImportOrder::new(vec![
            group(&["top-library", "bottom-library"]),
            SortStrategy::Depth,
            SortStrategy::Name { asc: true },
        ]);
        let code = [
            "import { Label } from '../bottom-library'",
            "import { LabelA } from '../bottom-library/a'",
            "/**",
            " * @deprecated",
            " */",
            "import { isBufferValid } from '../top-library'",
        ]
        .join("\n");
        let violations = check_at(&rule, "bottom-library/ExampleImporter.tsx", &code);
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].message,
            "Imports from '../top-library' should be above the import from '../bottom-library/a'"
        );
        assert_eq!(violations[0].location.line, 6);

        let expected = [
            "import { Label } from '../bottom-library'",
            "/**",
            " * @deprecated",
            " */",
            "import { isBufferValid } from '../top-library'",
            "import { LabelA } from '../bottom-library/a'",
        ]
        .join("\n");
        assert_eq!(apply_fixes(&code, &violations).output, expected);
    }
}
