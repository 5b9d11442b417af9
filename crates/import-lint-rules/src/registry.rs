//! Rule catalogue and construction from configuration.

use crate::{import_spaces, relative_import_order, siloed_relative_import};
use crate::{ImportSpaces, RelativeImportOrder, SiloedRelativeImport};
use import_lint_core::{Config, ConfigError, RuleBox, RuleConfig};

/// Static description of a built-in rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleInfo {
    /// Rule code (e.g., "IL001").
    pub code: &'static str,
    /// Rule name as used in `[rules.<name>]`.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Whether violations carry automatic fixes.
    pub fixable: bool,
}

const RULES: &[RuleInfo] = &[
    RuleInfo {
        code: relative_import_order::CODE,
        name: relative_import_order::NAME,
        description: "Ensures relative imports appear in the configured order",
        fixable: true,
    },
    RuleInfo {
        code: import_spaces::CODE,
        name: import_spaces::NAME,
        description: "Requires one empty line between import groups and none inside a group",
        fixable: true,
    },
    RuleInfo {
        code: siloed_relative_import::CODE,
        name: siloed_relative_import::NAME,
        description: "Forbids relative imports of configured paths from configured directories",
        fixable: false,
    },
];

/// Returns every built-in rule.
#[must_use]
pub fn all_rules() -> &'static [RuleInfo] {
    RULES
}

/// Looks up a built-in rule by name or code.
#[must_use]
pub fn find_rule(name_or_code: &str) -> Option<&'static RuleInfo> {
    RULES
        .iter()
        .find(|r| r.name == name_or_code || r.code.eq_ignore_ascii_case(name_or_code))
}

/// Builds one rule from its configuration table.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] for unknown rule names or malformed options.
pub fn build_rule(name: &str, config: &RuleConfig) -> Result<RuleBox, ConfigError> {
    let rule: RuleBox = match name {
        relative_import_order::NAME => Box::new(RelativeImportOrder::from_config(config)?),
        import_spaces::NAME => Box::new(ImportSpaces::from_config(config)?),
        siloed_relative_import::NAME => Box::new(SiloedRelativeImport::from_config(config)?),
        other => {
            return Err(ConfigError::Validation {
                rule: other.to_string(),
                message: "unknown rule".to_string(),
            })
        }
    };
    Ok(rule)
}

/// Builds every enabled rule configured under `[rules.*]`.
///
/// Rules without a table are not activated since each needs options.
///
/// # Errors
///
/// Returns the first configuration error encountered.
pub fn rules_from_config(config: &Config) -> Result<Vec<RuleBox>, ConfigError> {
    config
        .rules
        .iter()
        .filter(|(name, _)| config.is_rule_enabled(name))
        .map(|(name, rule_config)| build_rule(name, rule_config))
        .collect()
}
