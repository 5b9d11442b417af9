//! Core analyzer for orchestrating lint execution.

use crate::config::Config;
use crate::context::FileContext;
use crate::fix::apply_fixes;
use crate::rule::{Rule, RuleBox};
use crate::source::{ExtractError, ExtractorBox, LanguageExtractor};
use crate::types::{LintResult, Violation};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Upper bound on parse → check → fix rounds per file.
pub const MAX_FIX_PASSES: usize = 10;

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading or writing files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error extracting imports from a source file.
    #[error("Extraction error in {path}: {source}")]
    Extract {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Underlying extractor error.
        source: ExtractError,
    },

    /// No extractor handles the file's extension.
    #[error("No extractor handles {0}")]
    Unsupported(PathBuf),

    /// Directory walk error.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    target: Option<PathBuf>,
    rules: Vec<RuleBox>,
    extractors: Vec<ExtractorBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the project root that import paths are expressed against.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the directory or file to walk (default: the root).
    ///
    /// Relative targets are resolved against the current directory.
    #[must_use]
    pub fn target(mut self, path: impl Into<PathBuf>) -> Self {
        self.target = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds a language extractor.
    #[must_use]
    pub fn extractor<E: LanguageExtractor + 'static>(mut self, extractor: E) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Adds a boxed language extractor.
    #[must_use]
    pub fn extractor_box(mut self, extractor: ExtractorBox) -> Self {
        self.extractors.push(extractor);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let root = self
            .root
            .or_else(|| self.config.as_ref().map(|c| c.analyzer.root.clone()))
            .unwrap_or_else(|| PathBuf::from("."));

        let cwd = std::env::current_dir()?;
        let root = crate::paths::normalize(&cwd.join(root));
        let target = self
            .target
            .map_or_else(|| root.clone(), |t| crate::paths::normalize(&cwd.join(t)));

        let mut exclude_patterns = self.exclude_patterns;
        if let Some(ref config) = self.config {
            exclude_patterns.extend(config.analyzer.exclude.clone());
        }

        if exclude_patterns.is_empty() {
            exclude_patterns.extend(["**/node_modules/**".to_string(), "**/dist/**".to_string()]);
        }

        Ok(Analyzer {
            root,
            target,
            rules: self.rules,
            extractors: self.extractors,
            exclude_patterns,
            config: self.config.unwrap_or_default(),
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    target: PathBuf,
    rules: Vec<RuleBox>,
    extractors: Vec<ExtractorBox>,
    exclude_patterns: Vec<String>,
    config: Config,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the directory or file being walked.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Analyzes all files and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery or reading fails. Files that fail to
    /// parse are logged and skipped.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        self.run(false)
    }

    /// Analyzes all files, writes automatic fixes back to disk, and returns
    /// the violations that remain.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery, reading, or writing fails.
    pub fn fix(&self) -> Result<LintResult, AnalyzerError> {
        self.run(true)
    }

    fn run(&self, fix: bool) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis of {:?} (root {:?})", self.target, self.root);

        let mut result = LintResult::new();
        let files = self.discover_files()?;

        info!("Found {} files to analyze", files.len());

        for file_path in &files {
            let outcome = if fix {
                self.fix_file(file_path)
            } else {
                self.analyze_file(file_path).map(|v| (v, 0))
            };

            match outcome {
                Ok((violations, fixes_applied)) => {
                    result.violations.extend(violations);
                    result.files_checked += 1;
                    result.fixes_applied += fixes_applied;
                }
                Err(AnalyzerError::Extract { path, source }) => {
                    warn!("Failed to parse {}: {}", path.display(), source);
                }
                Err(e) => return Err(e),
            }
        }

        result.sort();

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Analyzes a single file on disk and returns violations.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn analyze_file(&self, path: &Path) -> Result<Vec<Violation>, AnalyzerError> {
        debug!("Analyzing: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        self.check_source(path, &content)
    }

    /// Checks in-memory source text as if it were the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if no extractor handles `path` or extraction fails.
    pub fn check_source(&self, path: &Path, content: &str) -> Result<Vec<Violation>, AnalyzerError> {
        let extractor = self
            .extractors
            .iter()
            .find(|e| e.handles(path))
            .ok_or_else(|| AnalyzerError::Unsupported(path.to_path_buf()))?;

        let file = extractor
            .analyze(content)
            .map_err(|source| AnalyzerError::Extract {
                path: path.to_path_buf(),
                source,
            })?;

        let ctx = FileContext::new(path, content, &self.root);
        let mut violations = Vec::new();

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let rule_violations = rule.check(&ctx, &file);
            violations.extend(self.apply_severity_override(rule.name(), rule_violations));
        }

        Ok(violations)
    }

    /// Repeatedly checks and fixes one file until no fix applies, then
    /// writes it back if anything changed.
    ///
    /// Returns the violations left after the last pass and the number of
    /// fixes applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or written.
    pub fn fix_file(&self, path: &Path) -> Result<(Vec<Violation>, usize), AnalyzerError> {
        let original = std::fs::read_to_string(path)?;
        let (content, violations, applied) = self.fix_source(path, &original)?;

        if applied > 0 {
            info!("Applied {} fix(es) to {}", applied, path.display());
            std::fs::write(path, content)?;
        }

        Ok((violations, applied))
    }

    /// In-memory variant of [`Self::fix_file`]: returns the fixed source,
    /// the remaining violations and the number of fixes applied.
    ///
    /// # Errors
    ///
    /// Returns an error if no extractor handles `path` or extraction fails.
    pub fn fix_source(
        &self,
        path: &Path,
        source: &str,
    ) -> Result<(String, Vec<Violation>, usize), AnalyzerError> {
        let mut content = source.to_string();
        let mut total = 0;

        for pass in 0..MAX_FIX_PASSES {
            let violations = self.check_source(path, &content)?;
            let output = apply_fixes(&content, &violations);
            debug!(
                "Fix pass {} on {}: {} applied, {} deferred",
                pass + 1,
                path.display(),
                output.applied,
                output.skipped
            );
            if output.applied == 0 {
                return Ok((content, violations, total));
            }
            total += output.applied;
            content = output.output;
        }

        let violations = self.check_source(path, &content)?;
        Ok((content, violations, total))
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        rule_name: &str,
        mut violations: Vec<Violation>,
    ) -> Vec<Violation> {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            for v in &mut violations {
                v.severity = severity;
            }
        }
        violations
    }

    /// Discovers all source files handled by a registered extractor.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut builder = ignore::WalkBuilder::new(&self.target);
        builder
            .hidden(false)
            .git_ignore(self.config.analyzer.respect_gitignore);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() || !self.extractors.iter().any(|e| e.handles(path)) {
                continue;
            }

            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.exclude_patterns {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
            }

            // Also check as substring for patterns like "**/node_modules/**"
            let normalized_pattern = pattern.replace("**", "");
            if !normalized_pattern.is_empty()
                && normalized_pattern != "/"
                && path_str.contains(&normalized_pattern)
            {
                return true;
            }
        }

        false
    }
}
