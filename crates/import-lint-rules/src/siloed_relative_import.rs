//! Rule to forbid relative imports across configured directory boundaries.
//!
//! # Configuration
//!
//! - `directories`: list of `{ filter, forbid }` entries. When `filter`
//!   matches the importing file's root-relative path, every relative import
//!   whose root-relative target matches one of the `forbid` patterns is
//!   reported.
//! - `debug`: trace intermediate values (default: false)

use import_lint_core::{
    ConfigError, DeclarationError, FileContext, ImportDeclaration, Rule, RuleConfig, RuleDebugger,
    SourceFile, Violation,
};
use regex::Regex;
use serde::Deserialize;
use tracing::warn;

/// Rule code for siloed-relative-import.
pub const CODE: &str = "IL003";

/// Rule name for siloed-relative-import.
pub const NAME: &str = "siloed-relative-import";

/// One `{ filter, forbid }` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiloDirectory {
    /// Pattern over the importing file's root-relative path.
    pub filter: String,
    /// Patterns over imported root-relative paths.
    pub forbid: Vec<String>,
}

/// Options accepted under `[rules.siloed-relative-import]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiloedRelativeImportOptions {
    /// Silo entries.
    pub directories: Vec<SiloDirectory>,
    /// Trace intermediate values.
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone)]
struct Silo {
    filter: Regex,
    forbid: Vec<Regex>,
}

/// Forbids relative imports of configured paths from configured files.
#[derive(Debug, Clone)]
pub struct SiloedRelativeImport {
    silos: Vec<Silo>,
    debug: bool,
}

impl SiloedRelativeImport {
    /// Builds the rule from options, compiling every pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if a pattern does not compile.
    pub fn from_options(options: SiloedRelativeImportOptions) -> Result<Self, ConfigError> {
        let silos = options
            .directories
            .iter()
            .map(|directory| {
                Ok(Silo {
                    filter: crate::compile_pattern(NAME, &directory.filter)?,
                    forbid: crate::compile_patterns(NAME, &directory.forbid)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self {
            silos,
            debug: options.debug,
        })
    }

    /// Builds the rule from its `[rules.siloed-relative-import]` table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the options are malformed.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        Self::from_options(config.options_as(NAME)?)
    }

    /// Patterns forbidden for a file at the given root-relative path.
    fn forbidden_for(&self, relative_path: &str) -> Vec<&Regex> {
        self.silos
            .iter()
            .filter(|silo| silo.filter.is_match(relative_path))
            .flat_map(|silo| &silo.forbid)
            .collect()
    }
}

/// Raw path of a relative import whose target matches a forbidden pattern.
fn offending_path<'d>(
    declaration: &'d ImportDeclaration<'_>,
    forbidden: &[&Regex],
) -> Result<Option<&'d str>, DeclarationError> {
    if !declaration.is_relative()? {
        return Ok(None);
    }
    let path = declaration.path_from_root()?;
    if forbidden.iter().any(|pattern| pattern.is_match(path)) {
        declaration.raw_path().map(Some)
    } else {
        Ok(None)
    }
}

impl Rule for SiloedRelativeImport {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids relative imports of configured paths from configured directories"
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        let debugger = RuleDebugger::new(NAME, self.debug);
        debugger.trace("relativeFileName", &ctx.relative_path);

        let forbidden = self.forbidden_for(&ctx.relative_path);
        debugger.trace_all("forbidden", forbidden.iter().map(|r| r.as_str()));

        if forbidden.is_empty() {
            return Vec::new();
        }

        let declarations = ImportDeclaration::wrap_all(&file.imports, ctx);
        let mut violations = Vec::new();
        for declaration in &declarations {
            match offending_path(declaration, &forbidden) {
                Ok(Some(raw_path)) => violations.push(Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    declaration.report_location(),
                    format!(
                        "Importing of '{raw_path}' is forbidden on '{}'",
                        ctx.relative_path
                    ),
                )),
                Ok(None) => {}
                Err(e) => warn!(rule = NAME, file = %ctx.relative_path, "Skipping import: {e}"),
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use import_lint_core::LanguageExtractor;
    use import_lint_ts::EcmaScriptExtractor;
    use std::path::Path;

    fn rule(filter: &str, forbid: &[&str]) -> SiloedRelativeImport {
        SiloedRelativeImport::from_options(SiloedRelativeImportOptions {
            directories: vec![SiloDirectory {
                filter: filter.to_string(),
                forbid: forbid.iter().map(ToString::to_string).collect(),
            }],
            debug: false,
        })
        .expect("patterns compile")
    }

    fn check_at(rule: &SiloedRelativeImport, file: &str, code: &str) -> Vec<Violation> {
        let source = EcmaScriptExtractor::typescript()
            .analyze(code)
            .expect("Failed to parse");
        let ctx = FileContext::new(Path::new(file), code, Path::new("/project"));
        rule.check(&ctx, &source)
    }

    #[test]
    fn test_reports_forbidden_import() {
        let rule = rule("^src/importing-folder.*$", &["^src/some-other-folder"]);
        let violations = check_at(
            &rule,
            "src/importing-folder/file.ts",
            "import { getUsers } from '../some-other-folder'",
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, CODE);
        assert_eq!(
            violations[0].message,
            "Importing of '../some-other-folder' is forbidden on 'src/importing-folder/file.ts'"
        );
        assert!(violations[0].fix().is_none());
    }

    #[test]
    fn test_filter_for_another_file() {
        let rule = rule("^src/react", &["^src/http"]);
        assert!(check_at(&rule, "src/http", "import { getUsers } from './http'").is_empty());
    }

    #[test]
    fn test_ignores_non_relative_and_allowed_imports() {
        let rule = rule("^src/react", &["^src/http"]);
        let code = "import { readSync } from 'fs'\nimport { getUsers } from './valid-path'\nimport { DomainType } from './domain'";
        assert!(check_at(&rule, "src/react", code).is_empty());
    }

    #[test]
    fn test_collects_patterns_from_every_matching_filter() {
        let rule = SiloedRelativeImport::from_options(SiloedRelativeImportOptions {
            directories: vec![
                SiloDirectory {
                    filter: "^src/".into(),
                    forbid: vec!["^src/http".into()],
                },
                SiloDirectory {
                    filter: "^src/react".into(),
                    forbid: vec!["^src/db".into()],
                },
            ],
            debug: false,
        })
        .expect("patterns compile");
        assert_eq!(rule.forbidden_for("src/react/App.tsx").len(), 2);
        assert_eq!(rule.forbidden_for("lib/index.ts").len(), 0);

        let code = "import a from '../http/client'\nimport b from '../db'";
        assert_eq!(check_at(&rule, "src/react/App.ts", code).len(), 2);
    }

    #[test]
    fn test_rejects_bad_pattern() {
        let result = SiloedRelativeImport::from_options(SiloedRelativeImportOptions {
            directories: vec![SiloDirectory {
                filter: "[".into(),
                forbid: vec![],
            }],
            debug: false,
        });
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }
}
