//! Check command implementation.

use anyhow::{Context, Result};
use import_lint_core::{Analyzer, Config, RuleBox};
use import_lint_rules::{find_rule, rules_from_config};
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Arguments of the check command.
pub struct CheckOptions<'a> {
    /// Directory or file to analyze, anywhere inside the project.
    pub path: &'a Path,
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes to keep.
    pub rules_filter: Option<&'a str>,
    /// Extra exclude globs.
    pub exclude: Vec<String>,
    /// Write automatic fixes back to disk.
    pub fix: bool,
    /// Where the configuration comes from.
    pub source: &'a ConfigSource,
}

/// Runs the check command.
pub fn run(options: CheckOptions<'_>) -> Result<()> {
    let analyzer = build_analyzer(&options)?;

    tracing::info!(
        "Analyzing {:?} with {} rules",
        options.path,
        analyzer.rule_count()
    );

    let result = if options.fix {
        analyzer.fix()
    } else {
        analyzer.analyze()
    }
    .context("Analysis failed")?;

    super::output::print(&result, options.format, analyzer.root())?;

    // Exit with error code if there are errors
    if result.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    match source {
        ConfigSource::Default => Ok(Config::default()),
        other => {
            // Invariant: non-Default variants always have a path
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
        }
    }
}

fn build_analyzer(options: &CheckOptions<'_>) -> Result<Analyzer> {
    let config = load_config(options.source)?;

    let mut rules = rules_from_config(&config).context("Invalid rule configuration")?;
    if let Some(filter) = options.rules_filter {
        rules = select_rules(rules, filter);
    }
    if rules.is_empty() {
        tracing::warn!("No rules configured; add [rules.*] tables (see `import-lint init`)");
    }

    let root = project_root(&config, options.source);
    let mut builder = Analyzer::builder()
        .root(root)
        .target(options.path)
        .config(config);

    for pattern in &options.exclude {
        builder = builder.exclude(pattern.clone());
    }
    for rule in rules {
        builder = builder.rule_box(rule);
    }
    for extractor in import_lint_ts::default_extractors() {
        builder = builder.extractor_box(extractor);
    }

    builder.build().context("Failed to build analyzer")
}

/// The directory import paths are expressed against: `[analyzer] root`,
/// relative to the directory of a project or explicit config file, and
/// relative to the current directory otherwise.
fn project_root(config: &Config, source: &ConfigSource) -> PathBuf {
    let base = match source {
        ConfigSource::Explicit(p) | ConfigSource::Project(p) => {
            p.parent().map(Path::to_path_buf).unwrap_or_default()
        }
        ConfigSource::Global(_) | ConfigSource::Default => PathBuf::new(),
    };
    base.join(&config.analyzer.root)
}

/// Keeps the configured rules named (by name or code) in `filter`.
fn select_rules(rules: Vec<RuleBox>, filter: &str) -> Vec<RuleBox> {
    let wanted: Vec<&str> = filter
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|name| match find_rule(name) {
            Some(info) => Some(info.name),
            None => {
                tracing::warn!("Unknown rule: {}", name);
                None
            }
        })
        .collect();

    rules
        .into_iter()
        .filter(|rule| wanted.contains(&rule.name()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
[rules.import-spaces]
groups = ["^src/a.*$"]

[rules.siloed-relative-import]
directories = [{ filter = "^src/b", forbid = ["^src/a"] }]
"#;

    fn options<'a>(path: &'a Path, source: &'a ConfigSource) -> CheckOptions<'a> {
        CheckOptions {
            path,
            format: OutputFormat::Compact,
            rules_filter: None,
            exclude: vec![],
            fix: false,
            source,
        }
    }

    #[test]
    fn select_rules_by_name_or_code() {
        let config = Config::parse(CONFIG).unwrap();
        let rules = rules_from_config(&config).unwrap();
        let kept = select_rules(rules, "IL003, no-such-rule");
        let names: Vec<&str> = kept.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["siloed-relative-import"]);
    }

    #[test]
    fn builds_analyzer_from_project_config() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("import-lint.toml");
        fs::write(&config_path, CONFIG).unwrap();
        fs::create_dir_all(tmp.path().join("src/b")).unwrap();
        fs::write(
            tmp.path().join("src/b/index.ts"),
            "import x from '../a/x';\n",
        )
        .unwrap();

        let source = ConfigSource::Project(config_path);
        let analyzer = build_analyzer(&options(tmp.path(), &source)).unwrap();
        assert_eq!(analyzer.rule_count(), 2);

        let result = analyzer.analyze().unwrap();
        assert_eq!(result.files_checked, 1);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].code, "IL003");
    }

    #[test]
    fn checking_a_subdirectory_keeps_project_paths() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("import-lint.toml");
        fs::write(&config_path, CONFIG).unwrap();
        fs::create_dir_all(tmp.path().join("src/b")).unwrap();
        fs::write(tmp.path().join("src/b/index.ts"), "import x from '../a/x';\n").unwrap();
        fs::write(tmp.path().join("other.ts"), "import x from './src/a/x';\n").unwrap();

        let source = ConfigSource::Project(config_path);
        let subdir = tmp.path().join("src");
        let analyzer = build_analyzer(&options(&subdir, &source)).unwrap();
        assert_eq!(analyzer.root(), tmp.path());

        let result = analyzer.analyze().unwrap();
        assert_eq!(result.files_checked, 1);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(
            result.violations[0].location.file,
            PathBuf::from("src/b/index.ts")
        );
        assert_eq!(
            result.violations[0].message,
            "Importing of '../a/x' is forbidden on 'src/b/index.ts'"
        );
    }

    #[test]
    fn configured_root_is_relative_to_the_config_file() {
        let config = Config::parse("[analyzer]\nroot = \"web\"\n").unwrap();
        let source = ConfigSource::Project(PathBuf::from("/repo/import-lint.toml"));
        assert_eq!(project_root(&config, &source), PathBuf::from("/repo/web"));

        let global = ConfigSource::Global(PathBuf::from("/home/u/.import-lint/config.toml"));
        assert_eq!(project_root(&Config::default(), &global), PathBuf::from("."));
    }

    #[test]
    fn invalid_rule_options_fail_before_analysis() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("import-lint.toml");
        fs::write(&config_path, "[rules.import-spaces]\ngroups = []\n").unwrap();

        let source = ConfigSource::Project(config_path);
        let err = build_analyzer(&options(tmp.path(), &source))
            .err()
            .expect("empty groups should be rejected");
        assert!(format!("{err:#}").contains("import-spaces"));
    }

    #[test]
    fn default_source_has_no_rules() {
        let tmp = TempDir::new().unwrap();
        let analyzer = build_analyzer(&options(tmp.path(), &ConfigSource::Default)).unwrap();
        assert_eq!(analyzer.rule_count(), 0);
    }
}
