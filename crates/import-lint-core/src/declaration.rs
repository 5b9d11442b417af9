//! Derived, memoized view over one import declaration.

use std::cell::OnceCell;

use crate::context::FileContext;
use crate::source::{ImportNode, ImportSource, Position, Span};
use crate::types::Location;

/// Errors raised while deriving facts about a declaration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeclarationError {
    /// The import source is not a plain string literal.
    #[error("Import path '{source_text}' should be a string (line {line})")]
    MalformedImport {
        /// Raw text of the offending source expression.
        source_text: String,
        /// Line of the declaration.
        line: usize,
    },
}

/// An import declaration together with lazily computed path and span facts.
///
/// Every derived value is computed on first access and cached for the
/// lifetime of the wrapper, errors included.
#[derive(Debug)]
pub struct ImportDeclaration<'a> {
    node: &'a ImportNode,
    ctx: &'a FileContext<'a>,
    raw_path: OnceCell<Result<String, DeclarationError>>,
    path_from_root: OnceCell<Result<String, DeclarationError>>,
}

impl<'a> ImportDeclaration<'a> {
    /// Wraps an import node of the file described by `ctx`.
    #[must_use]
    pub fn new(node: &'a ImportNode, ctx: &'a FileContext<'a>) -> Self {
        Self {
            node,
            ctx,
            raw_path: OnceCell::new(),
            path_from_root: OnceCell::new(),
        }
    }

    /// Wraps every import of a file, in source order.
    #[must_use]
    pub fn wrap_all(nodes: &'a [ImportNode], ctx: &'a FileContext<'a>) -> Vec<Self> {
        nodes.iter().map(|node| Self::new(node, ctx)).collect()
    }

    /// The underlying node.
    #[must_use]
    pub fn node(&self) -> &'a ImportNode {
        self.node
    }

    /// The literal module specifier of the declaration.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::MalformedImport`] if the source is not a string literal.
    pub fn raw_path(&self) -> Result<&str, DeclarationError> {
        self.raw_path
            .get_or_init(|| match &self.node.source {
                ImportSource::Literal(value) => Ok(value.clone()),
                ImportSource::Expression(text) => Err(DeclarationError::MalformedImport {
                    source_text: text.clone(),
                    line: self.node.span.start_pos.line,
                }),
            })
            .as_deref()
            .map_err(Clone::clone)
    }

    /// The imported path resolved against the file's directory and made
    /// relative to the project root.
    ///
    /// # Errors
    ///
    /// Propagates [`DeclarationError::MalformedImport`] from [`Self::raw_path`].
    pub fn path_from_root(&self) -> Result<&str, DeclarationError> {
        self.path_from_root
            .get_or_init(|| {
                self.raw_path()
                    .map(|raw| self.ctx.path_from_root(raw))
            })
            .as_deref()
            .map_err(Clone::clone)
    }

    /// Returns true if the declaration imports a relative path.
    ///
    /// # Errors
    ///
    /// Propagates [`DeclarationError::MalformedImport`] from [`Self::raw_path`].
    pub fn is_relative(&self) -> Result<bool, DeclarationError> {
        self.raw_path().map(crate::paths::is_relative)
    }

    fn first_comment(&self, with_comments: bool) -> Option<&'a Span> {
        if with_comments {
            self.node.leading_comments.first()
        } else {
            None
        }
    }

    /// Start and end positions, optionally widened to the attached comment block.
    #[must_use]
    pub fn location(&self, with_comments: bool) -> (Position, Position) {
        let span = &self.node.span;
        let start = self
            .first_comment(with_comments)
            .map_or(span.start_pos, |comment| comment.start_pos.min(span.start_pos));
        (start, span.end_pos)
    }

    /// Byte range, optionally widened to the attached comment block.
    #[must_use]
    pub fn range(&self, with_comments: bool) -> (usize, usize) {
        let span = &self.node.span;
        let start = self
            .first_comment(with_comments)
            .map_or(span.start, |comment| comment.start.min(span.start));
        (start, span.end)
    }

    /// Byte range strictly between this declaration and `other`, whichever
    /// comes first in the source.
    #[must_use]
    pub fn range_between(&self, other: &Self, with_comments: bool) -> (usize, usize) {
        let (first, second) = if self.location(with_comments).0 <= other.location(with_comments).0 {
            (self, other)
        } else {
            (other, self)
        };
        (first.range(with_comments).1, second.range(with_comments).0)
    }

    /// Byte offset and position where the declaration ends, including
    /// comments that trail it on its last line.
    #[must_use]
    pub fn trailing_end(&self) -> (usize, Position) {
        let span = &self.node.span;
        self.node
            .trailing_comments
            .last()
            .filter(|comment| comment.end > span.end)
            .map_or((span.end, span.end_pos), |comment| (comment.end, comment.end_pos))
    }

    /// Where diagnostics about this declaration are reported: the
    /// declaration itself, without its comments.
    #[must_use]
    pub fn report_location(&self) -> Location {
        let span = &self.node.span;
        Location::new(
            self.ctx.relative_path.clone().into(),
            span.start_pos.line,
            span.start_pos.column,
        )
        .with_span(span.start, span.len())
    }

    /// Exact source text of the declaration, optionally with its comments.
    #[must_use]
    pub fn text(&self, with_comments: bool) -> &'a str {
        let (start, end) = self.range(with_comments);
        self.ctx.slice(start, end)
    }
}

impl std::fmt::Display for ImportDeclaration<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const SOURCE: &str = "import a from '../a';\n/** doc */\nimport b from './b';\n";

    fn nodes() -> Vec<ImportNode> {
        vec![
            ImportNode {
                statement_index: 0,
                source: ImportSource::Literal("../a".into()),
                span: Span::new(0, 21, Position::new(1, 1), Position::new(1, 22)),
                leading_comments: vec![],
                trailing_comments: vec![],
            },
            ImportNode {
                statement_index: 1,
                source: ImportSource::Literal("./b".into()),
                span: Span::new(33, 53, Position::new(3, 1), Position::new(3, 21)),
                leading_comments: vec![Span::new(
                    22,
                    32,
                    Position::new(2, 1),
                    Position::new(2, 11),
                )],
                trailing_comments: vec![],
            },
        ]
    }

    fn ctx() -> FileContext<'static> {
        FileContext::new(Path::new("/p/src/index.ts"), SOURCE, Path::new("/p"))
    }

    #[test]
    fn paths_are_derived() {
        let ctx = ctx();
        let nodes = nodes();
        let decls = ImportDeclaration::wrap_all(&nodes, &ctx);
        assert_eq!(decls[0].raw_path(), Ok("../a"));
        assert_eq!(decls[0].path_from_root(), Ok("a"));
        assert_eq!(decls[1].path_from_root(), Ok("src/b"));
        assert_eq!(decls[1].is_relative(), Ok(true));
    }

    #[test]
    fn comment_extends_location_and_text() {
        let ctx = ctx();
        let nodes = nodes();
        let decl = ImportDeclaration::new(&nodes[1], &ctx);
        assert_eq!(decl.location(false).0, Position::new(3, 1));
        assert_eq!(decl.location(true).0, Position::new(2, 1));
        assert_eq!(decl.text(false), "import b from './b';");
        assert_eq!(decl.text(true), "/** doc */\nimport b from './b';");
    }

    #[test]
    fn report_location_skips_comments() {
        let ctx = ctx();
        let nodes = nodes();
        let loc = ImportDeclaration::new(&nodes[1], &ctx).report_location();
        assert_eq!(loc.file, std::path::PathBuf::from("src/index.ts"));
        assert_eq!((loc.line, loc.column), (3, 1));
        assert_eq!(loc.offset, 33);
        assert_eq!(loc.length, 20);
    }

    #[test]
    fn range_between_is_symmetric() {
        let ctx = ctx();
        let nodes = nodes();
        let decls = ImportDeclaration::wrap_all(&nodes, &ctx);
        assert_eq!(decls[1].range_between(&decls[0], true), (21, 22));
        assert_eq!(decls[0].range_between(&decls[1], true), (21, 22));
        assert_eq!(decls[0].range_between(&decls[1], false), (21, 33));
    }

    #[test]
    fn trailing_end_covers_multiline_trailing_comment() {
        let source = "import a from 'a'; /* x\n y */\nimport b from 'b';\n";
        let ctx = FileContext::new(Path::new("/p/index.ts"), source, Path::new("/p"));
        let node = ImportNode {
            statement_index: 0,
            source: ImportSource::Literal("a".into()),
            span: Span::new(0, 18, Position::new(1, 1), Position::new(1, 19)),
            leading_comments: vec![],
            trailing_comments: vec![Span::new(
                19,
                29,
                Position::new(1, 20),
                Position::new(2, 5),
            )],
        };
        let decl = ImportDeclaration::new(&node, &ctx);
        assert_eq!(decl.trailing_end(), (29, Position::new(2, 5)));
        assert_eq!(decl.text(true), "import a from 'a';");
    }

    #[test]
    fn malformed_source_fails_and_stays_failed() {
        let ctx = ctx();
        let node = ImportNode {
            statement_index: 0,
            source: ImportSource::Expression("`./${name}`".into()),
            span: Span::new(0, 5, Position::new(4, 1), Position::new(4, 6)),
            leading_comments: vec![],
            trailing_comments: vec![],
        };
        let decl = ImportDeclaration::new(&node, &ctx);
        let err = decl.raw_path().unwrap_err();
        assert!(matches!(err, DeclarationError::MalformedImport { line: 4, .. }));
        assert_eq!(decl.path_from_root().unwrap_err(), err);
    }
}
