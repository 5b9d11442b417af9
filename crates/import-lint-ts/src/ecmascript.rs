//! TypeScript and JavaScript import extractor using Tree-sitter.

use import_lint_core::{
    ExtractError, ImportNode, ImportSource, LanguageExtractor, Position, SourceFile, Span,
};
use tree_sitter::{Language, Node, Parser};

/// Grammar flavour used to parse a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Plain TypeScript; also parses ES module JavaScript.
    TypeScript,
    /// TypeScript with JSX; also parses `.jsx`.
    Tsx,
}

impl Dialect {
    const fn language_id(self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
        }
    }

    const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::TypeScript => &[".ts", ".mts", ".cts", ".js", ".mjs", ".cjs"],
            Self::Tsx => &[".tsx", ".jsx"],
        }
    }

    fn language(self) -> Language {
        match self {
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Extracts top-level import declarations from TypeScript/JavaScript source.
pub struct EcmaScriptExtractor {
    dialect: Dialect,
    language: Language,
}

impl EcmaScriptExtractor {
    /// Creates an extractor for the given dialect.
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            language: dialect.language(),
        }
    }

    /// Extractor for `.ts`-like files.
    #[must_use]
    pub fn typescript() -> Self {
        Self::new(Dialect::TypeScript)
    }

    /// Extractor for `.tsx`/`.jsx` files.
    #[must_use]
    pub fn tsx() -> Self {
        Self::new(Dialect::Tsx)
    }

    fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
        src.get(node.start_byte()..node.end_byte())
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
            .unwrap_or("")
    }

    fn span(node: &Node<'_>) -> Span {
        let start = node.start_position();
        let end = node.end_position();
        Span::new(
            node.start_byte(),
            node.end_byte(),
            Position::new(start.row + 1, start.column + 1),
            Position::new(end.row + 1, end.column + 1),
        )
    }

    /// Reads the `source` field of an `import_statement`.
    ///
    /// `import x = require("...")` keeps its string inside the require
    /// clause and yields `None`.
    fn extract_source(node: &Node<'_>, src: &[u8]) -> Option<ImportSource> {
        let source = node.child_by_field_name("source")?;
        if source.kind() != "string" || source.has_error() {
            return Some(ImportSource::Expression(Self::text(&source, src).to_owned()));
        }

        let mut value = String::new();
        let mut cursor = source.walk();
        for part in source.named_children(&mut cursor) {
            match part.kind() {
                "string_fragment" => value.push_str(Self::text(&part, src)),
                "escape_sequence" => value.push_str(&unescape(Self::text(&part, src))),
                _ => {}
            }
        }
        Some(ImportSource::Literal(value))
    }
}

/// Decodes a single JavaScript escape sequence such as `\n` or `\'`.
fn unescape(sequence: &str) -> String {
    let body = sequence.strip_prefix('\\').unwrap_or(sequence);
    match body {
        // Line continuation
        "\n" | "\r\n" | "\r" | "\u{2028}" | "\u{2029}" => String::new(),
        "n" => "\n".to_owned(),
        "t" => "\t".to_owned(),
        "r" => "\r".to_owned(),
        "0" => "\0".to_owned(),
        _ => {
            let hex = body
                .strip_prefix("u{")
                .and_then(|h| h.strip_suffix('}'))
                .or_else(|| body.strip_prefix('u'))
                .or_else(|| body.strip_prefix('x'));
            hex.and_then(|h| u32::from_str_radix(h, 16).ok())
                .and_then(char::from_u32)
                .map_or_else(|| body.to_owned(), String::from)
        }
    }
}

impl Default for EcmaScriptExtractor {
    fn default() -> Self {
        Self::typescript()
    }
}

impl LanguageExtractor for EcmaScriptExtractor {
    fn language_id(&self) -> &'static str {
        self.dialect.language_id()
    }

    fn extensions(&self) -> &'static [&'static str] {
        self.dialect.extensions()
    }

    fn analyze(&self, source: &str) -> Result<SourceFile, ExtractError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ExtractError::Language {
                language: self.language_id(),
                message: e.to_string(),
            })?;

        let src = source.as_bytes();
        let tree = parser.parse(src, None).ok_or(ExtractError::Parse {
            language: self.language_id(),
        })?;
        let root = tree.root_node();

        let mut result = SourceFile::default();
        let mut pending_comments: Vec<Span> = Vec::new();
        let mut previous_end_row: Option<usize> = None;
        // Import that the previous statement produced, if any.
        let mut trailing_owner: Option<usize> = None;

        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            match node.kind() {
                "hash_bang_line" => {}
                "comment" => {
                    // Same-line comments trail the previous statement.
                    if previous_end_row == Some(node.start_position().row) {
                        previous_end_row = Some(node.end_position().row);
                        if let Some(import) =
                            trailing_owner.and_then(|i| result.imports.get_mut(i))
                        {
                            import.trailing_comments.push(Self::span(&node));
                        }
                    } else {
                        pending_comments.push(Self::span(&node));
                    }
                }
                kind => {
                    let statement_index = result.statement_count;
                    result.statement_count += 1;
                    let leading_comments = std::mem::take(&mut pending_comments);
                    previous_end_row = Some(node.end_position().row);
                    trailing_owner = None;

                    if kind != "import_statement" {
                        continue;
                    }
                    if let Some(source) = Self::extract_source(&node, src) {
                        trailing_owner = Some(result.imports.len());
                        result.imports.push(ImportNode {
                            statement_index,
                            source,
                            span: Self::span(&node),
                            leading_comments,
                            trailing_comments: Vec::new(),
                        });
                    }
                }
            }
        }

        Ok(result)
    }
}
