//! Sort strategies for relative imports and the engine that chains them.
//!
//! A strategy compares the root-relative paths of two declarations. The
//! `group` strategy can also refuse to decide when a path is covered by
//! neither its groups nor its ignore list; such paths are reported as
//! "not listed" and the comparison falls through to the next strategy.

use std::cmp::Ordering;

use import_lint_core::{paths, DeclarationError, ImportDeclaration};
use serde::{Deserialize, Serialize};

/// One entry of the `sort` option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
pub enum SortStrategy {
    /// Orders by the first configured prefix the path starts with.
    Group {
        /// Path prefixes, in the order their imports must appear.
        groups: Vec<String>,
        /// Prefixes that are exempt from grouping.
        #[serde(default)]
        ignore: Vec<String>,
    },
    /// Fewer path segments first.
    Depth,
    /// Lexical order of the path.
    Name {
        /// Ascending when true.
        #[serde(default = "default_asc")]
        asc: bool,
    },
}

fn default_asc() -> bool {
    true
}

/// Which declaration of a compared pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The left-hand declaration (the one earlier in the file).
    First,
    /// The right-hand declaration.
    Second,
}

/// Result of one strategy on one pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    /// The strategy decided (possibly `Equal`).
    Ordered(Ordering),
    /// The strategy could not key the listed sides; an empty list means
    /// both sides were ignored.
    Unresolved(Vec<Side>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupKey {
    Listed(usize),
    Ignored,
    Unlisted,
}

fn group_key(groups: &[String], ignore: &[String], path: &str) -> GroupKey {
    if let Some(position) = groups.iter().position(|g| path.starts_with(g.as_str())) {
        GroupKey::Listed(position)
    } else if ignore.iter().any(|i| path.starts_with(i.as_str())) {
        GroupKey::Ignored
    } else {
        GroupKey::Unlisted
    }
}

/// ASCII punctuation and symbols in root collation order.
const PUNCTUATION: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// Primary collation weight of one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Weight {
    Space(char),
    Punctuation(usize),
    Digit(char),
    Other(char),
}

fn weight(c: char) -> Weight {
    if c.is_whitespace() {
        Weight::Space(c)
    } else if let Some(rank) = PUNCTUATION.find(c) {
        Weight::Punctuation(rank)
    } else if c.is_ascii_digit() {
        Weight::Digit(c)
    } else {
        Weight::Other(c.to_lowercase().next().unwrap_or(c))
    }
}

/// Approximates the root-locale collation of paths: whitespace, then ASCII
/// punctuation in collation order, then digits, then letters ignoring case,
/// with lowercase first on ties. Accented letters compare by code point
/// after lowercasing instead of next to their base letter.
fn locale_compare(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(weight)
        .cmp(b.chars().map(weight))
        .then_with(|| b.cmp(a))
}

impl SortStrategy {
    /// Checks parameters that the option schema cannot express.
    ///
    /// # Errors
    ///
    /// Returns a message if a `group` strategy has no groups.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Group { groups, .. } if groups.is_empty() => {
                Err("a group sort needs at least one group".to_string())
            }
            _ => Ok(()),
        }
    }

    /// Compares two root-relative paths.
    #[must_use]
    pub fn compare_paths(&self, a: &str, b: &str) -> StrategyOutcome {
        match self {
            Self::Group { groups, ignore } => {
                let keys = [group_key(groups, ignore, a), group_key(groups, ignore, b)];
                if let [GroupKey::Listed(x), GroupKey::Listed(y)] = keys {
                    return StrategyOutcome::Ordered(x.cmp(&y));
                }
                let unlisted = [Side::First, Side::Second]
                    .into_iter()
                    .zip(keys)
                    .filter(|(_, key)| *key == GroupKey::Unlisted)
                    .map(|(side, _)| side)
                    .collect();
                StrategyOutcome::Unresolved(unlisted)
            }
            Self::Depth => StrategyOutcome::Ordered(paths::depth(a).cmp(&paths::depth(b))),
            Self::Name { asc } => {
                let ordering = locale_compare(a, b);
                StrategyOutcome::Ordered(if *asc { ordering } else { ordering.reverse() })
            }
        }
    }
}

/// Combined decision of all sort strategies on one pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// `Greater` means the second declaration belongs above the first.
    pub ordering: Ordering,
    /// Sides some evaluated strategy could not key.
    pub unresolved: Vec<Side>,
}

/// Ordered list of strategies; the first non-equal result wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    strategies: Vec<SortStrategy>,
}

impl SortSpec {
    /// Creates a sort order from strategies in precedence order.
    #[must_use]
    pub fn new(strategies: Vec<SortStrategy>) -> Self {
        Self { strategies }
    }

    /// Evaluates strategies left to right on two root-relative paths.
    #[must_use]
    pub fn compare_paths(&self, a: &str, b: &str) -> Verdict {
        let mut unresolved: Vec<Side> = Vec::new();
        for strategy in &self.strategies {
            match strategy.compare_paths(a, b) {
                StrategyOutcome::Ordered(Ordering::Equal) => {}
                StrategyOutcome::Ordered(ordering) => return Verdict { ordering, unresolved },
                StrategyOutcome::Unresolved(sides) => {
                    for side in sides {
                        if !unresolved.contains(&side) {
                            unresolved.push(side);
                        }
                    }
                }
            }
        }
        Verdict {
            ordering: Ordering::Equal,
            unresolved,
        }
    }

    /// Evaluates strategies on two declarations.
    ///
    /// # Errors
    ///
    /// Propagates [`DeclarationError::MalformedImport`] from either side.
    pub fn compare(
        &self,
        first: &ImportDeclaration<'_>,
        second: &ImportDeclaration<'_>,
    ) -> Result<Verdict, DeclarationError> {
        Ok(self.compare_paths(first.path_from_root()?, second.path_from_root()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn group(groups: &[&str], ignore: &[&str]) -> SortStrategy {
        SortStrategy::Group {
            groups: groups.iter().map(ToString::to_string).collect(),
            ignore: ignore.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn group_orders_by_first_matching_prefix() {
        let s = group(&["src/utils", "src/domain"], &[]);
        assert_eq!(
            s.compare_paths("src/domain/a", "src/utils"),
            StrategyOutcome::Ordered(Ordering::Greater)
        );
        assert_eq!(
            s.compare_paths("src/utils/x", "src/utils/y"),
            StrategyOutcome::Ordered(Ordering::Equal)
        );
    }

    #[test]
    fn group_reports_unlisted_sides_only() {
        let s = group(&["top-library"], &["vendor"]);
        assert_eq!(
            s.compare_paths("top-library", "other"),
            StrategyOutcome::Unresolved(vec![Side::Second])
        );
        assert_eq!(
            s.compare_paths("vendor/x", "top-library"),
            StrategyOutcome::Unresolved(vec![])
        );
        assert_eq!(
            s.compare_paths("a", "b"),
            StrategyOutcome::Unresolved(vec![Side::First, Side::Second])
        );
    }

    #[test]
    fn depth_counts_segments() {
        assert_eq!(
            SortStrategy::Depth.compare_paths("../domain/b", "../domain"),
            StrategyOutcome::Ordered(Ordering::Greater)
        );
    }

    #[test]
    fn name_honours_direction() {
        let asc = SortStrategy::Name { asc: true };
        let desc = SortStrategy::Name { asc: false };
        assert_eq!(
            asc.compare_paths("../domain/a", "../domain/b"),
            StrategyOutcome::Ordered(Ordering::Less)
        );
        assert_eq!(
            desc.compare_paths("../domain/a", "../domain/b"),
            StrategyOutcome::Ordered(Ordering::Greater)
        );
    }

    #[test]
    fn name_ignores_case_first() {
        assert_eq!(locale_compare("B", "a"), Ordering::Greater);
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
    }

    #[test]
    fn name_sorts_punctuation_before_letters() {
        assert_eq!(locale_compare("../a_b", "../a/b"), Ordering::Less);
        assert_eq!(locale_compare("a-b", "ab"), Ordering::Less);
        assert_eq!(locale_compare("a/b", "a.b"), Ordering::Greater);
        assert_eq!(locale_compare("a9", "aa"), Ordering::Less);
    }

    #[test]
    fn strategies_fall_through_and_accumulate() {
        let order = SortSpec::new(vec![
            group(&["top-library", "bottom-library"], &[]),
            SortStrategy::Depth,
            SortStrategy::Name { asc: true },
        ]);
        let verdict = order.compare_paths("top-library", "non-listed/import-path");
        assert_eq!(verdict.ordering, Ordering::Less);
        assert_eq!(verdict.unresolved, vec![Side::Second]);

        let verdict = order.compare_paths("bottom-library", "top-library");
        assert_eq!(verdict.ordering, Ordering::Greater);
        assert!(verdict.unresolved.is_empty());
    }

    #[test]
    fn deserializes_tagged_strategies() {
        #[derive(Deserialize)]
        struct Wrapper {
            sort: Vec<SortStrategy>,
        }
        let w: Wrapper = toml::from_str(
            r#"sort = [
                { type = "group", groups = ["a"] },
                { type = "depth" },
                { type = "name", asc = false },
            ]"#,
        )
        .unwrap();
        assert_eq!(
            w.sort,
            vec![
                group(&["a"], &[]),
                SortStrategy::Depth,
                SortStrategy::Name { asc: false }
            ]
        );
        assert!(toml::from_str::<Wrapper>(r#"sort = [{ type = "size" }]"#).is_err());
    }

    #[test]
    fn empty_group_list_is_invalid() {
        assert!(group(&[], &[]).validate().is_err());
        assert!(SortStrategy::Depth.validate().is_ok());
    }

    proptest! {
        #[test]
        fn name_order_is_antisymmetric(a in "[a-zA-Z./]{0,12}", b in "[a-zA-Z./]{0,12}") {
            let s = SortStrategy::Name { asc: true };
            let (StrategyOutcome::Ordered(x), StrategyOutcome::Ordered(y)) =
                (s.compare_paths(&a, &b), s.compare_paths(&b, &a)) else {
                unreachable!("name never leaves pairs unresolved");
            };
            prop_assert_eq!(x, y.reverse());
        }

        #[test]
        fn listed_pairs_are_never_unresolved(i in 0usize..3, j in 0usize..3, tail in "[a-z/]{0,8}") {
            let groups = ["src/utils", "src/domain", "src/react"];
            let order = SortSpec::new(vec![group(&groups, &[])]);
            let a = format!("{}{}", groups[i], tail);
            let verdict = order.compare_paths(&a, groups[j]);
            prop_assert!(verdict.unresolved.is_empty());
            prop_assert_eq!(verdict.ordering, i.cmp(&j));
        }
    }
}
