//! Integration test: configured rules end-to-end via Analyzer.
//!
//! Uses the fixture project under `tests/fixtures/project/` to verify that
//! the TOML → rules → tree-sitter extraction → Analyzer pipeline reports and
//! fixes import problems.

use import_lint_core::{Analyzer, Config};
use import_lint_rules::rules_from_config;
use std::path::{Path, PathBuf};

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/project")
}

fn analyzer_for(root: &Path) -> Analyzer {
    let config = Config::from_file(&root.join("import-lint.toml")).expect("fixture config should load");
    let rules = rules_from_config(&config).expect("fixture rules should build");

    let mut builder = Analyzer::builder().root(root).config(config);
    for rule in rules {
        builder = builder.rule_box(rule);
    }
    for extractor in import_lint_ts::default_extractors() {
        builder = builder.extractor_box(extractor);
    }
    builder.build().expect("analyzer should build")
}

#[test]
fn reports_every_rule() {
    let result = analyzer_for(&fixture_root())
        .analyze()
        .expect("analysis should succeed");

    assert_eq!(result.files_checked, 2);

    let found: Vec<(&str, usize)> = result
        .violations
        .iter()
        .map(|v| (v.code.as_str(), v.location.line))
        .collect();
    assert_eq!(
        found,
        vec![("IL001", 4), ("IL002", 4), ("IL002", 5), ("IL003", 5)],
        "unexpected violations: {:#?}",
        result.violations
    );

    assert!(result
        .violations
        .iter()
        .all(|v| v.location.file == Path::new("src/react/App.tsx")));
    assert_eq!(
        result.violations[3].message,
        "Importing of '../http/users' is forbidden on 'src/react/App.tsx'"
    );
    assert_eq!(result.fixable_count(), 3);
}

#[test]
fn fix_converges_over_several_passes() {
    let tmp = tempfile::TempDir::new().expect("tempdir");
    let fixture = fixture_root();
    std::fs::create_dir_all(tmp.path().join("src/react")).expect("mkdir");
    std::fs::copy(fixture.join("import-lint.toml"), tmp.path().join("import-lint.toml"))
        .expect("copy config");
    std::fs::copy(
        fixture.join("src/react/App.tsx"),
        tmp.path().join("src/react/App.tsx"),
    )
    .expect("copy source");

    let result = analyzer_for(tmp.path()).fix().expect("fix should succeed");

    assert_eq!(result.fixes_applied, 3);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].code, "IL003");

    let fixed = std::fs::read_to_string(tmp.path().join("src/react/App.tsx")).expect("read back");
    let expected = "\
import React from 'react';

import { isValid } from '../top/valid';

import { Label } from '../bottom/label';

import { getUsers } from '../http/users';

export const App = () => <div>{isValid ? Label : getUsers()}</div>;
";
    assert_eq!(fixed, expected);
}

#[test]
fn fix_source_leaves_clean_trailing_block_comment_alone() {
    let root = fixture_root();
    let analyzer = analyzer_for(&root);
    let path = root.join("src/top/comment.ts");
    let source = "import a from 'a'; /* x\n y */\nimport b from 'b';\n";

    let (fixed, remaining, applied) = analyzer
        .fix_source(&path, source)
        .expect("fix should run");
    assert_eq!(applied, 0);
    assert_eq!(fixed, source);
    assert!(remaining.is_empty(), "unexpected violations: {remaining:#?}");
}
