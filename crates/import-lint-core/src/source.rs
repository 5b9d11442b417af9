//! Language-agnostic source model handed to rules.
//!
//! A [`LanguageExtractor`] turns raw source text into a [`SourceFile`]: the
//! ordered top-level import declarations of one file together with the spans
//! and attached comments the rules need to report and fix.

use serde::Serialize;

/// A (line, column) pair. Both are 1-indexed; columns count bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, bytes).
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A contiguous region of the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Position of the first byte.
    pub start_pos: Position,
    /// Position just past the last byte.
    pub end_pos: Position,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize, start_pos: Position, end_pos: Position) -> Self {
        Self {
            start,
            end,
            start_pos,
            end_pos,
        }
    }

    /// Length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the span covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The source expression of an import declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ImportSource {
    /// A plain string literal; holds the unquoted value.
    Literal(String),
    /// Anything else; holds the raw source text of the expression.
    Expression(String),
}

/// One top-level import declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportNode {
    /// Ordinal of the enclosing statement among the file's top-level statements.
    pub statement_index: usize,
    /// The module specifier.
    pub source: ImportSource,
    /// Span of the whole declaration, trailing semicolon included.
    pub span: Span,
    /// Comments directly attached above the declaration, in source order.
    pub leading_comments: Vec<Span>,
    /// Comments that start on the declaration's last line, possibly running
    /// onto later lines, in source order.
    pub trailing_comments: Vec<Span>,
}

impl ImportNode {
    /// Returns true if `other` is the statement that immediately follows this one.
    #[must_use]
    pub fn is_directly_followed_by(&self, other: &Self) -> bool {
        self.statement_index + 1 == other.statement_index
    }
}

/// Result of extracting one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    /// Top-level import declarations in source order.
    pub imports: Vec<ImportNode>,
    /// Number of top-level statements in the file.
    pub statement_count: usize,
}

/// Errors raised while extracting a source file.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The grammar could not be loaded into the parser.
    #[error("failed to load {language} grammar: {message}")]
    Language {
        /// Language identifier.
        language: &'static str,
        /// Underlying error message.
        message: String,
    },
    /// The parser produced no syntax tree.
    #[error("failed to parse {language} source")]
    Parse {
        /// Language identifier.
        language: &'static str,
    },
}

/// Trait for language-specific import extraction.
///
/// Implement this to add support for a new language or dialect.
pub trait LanguageExtractor: Send + Sync {
    /// Language identifier (e.g., `"typescript"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this extractor handles (e.g., `&[".ts", ".mts"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Extracts the top-level import declarations from source code.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded or parsing yields no tree.
    fn analyze(&self, source: &str) -> Result<SourceFile, ExtractError>;

    /// Returns true if this extractor handles the given path.
    fn handles(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| known.strip_prefix('.') == Some(ext))
            })
    }
}

/// Type alias for boxed [`LanguageExtractor`] trait objects.
pub type ExtractorBox = Box<dyn LanguageExtractor>;
