//! Diagnostics attributed to the file they were found in.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lumen_diagnostic::span_utils::span_to_line_col;
use lumen_diagnostic::{Diagnostic, ErrorCode, Severity};

/// A diagnostic with its file and 1-based position.
///
/// `line` and `column` are 0 when the diagnostic has no location, for
/// example a configuration error.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildDiagnostic {
    pub path: Option<PathBuf>,
    pub line: u32,
    pub column: u32,
    pub diagnostic: Diagnostic,
    /// Text of the file the spans refer to, for rendering snippets.
    pub source: Option<Arc<str>>,
}

impl BuildDiagnostic {
    pub fn new(path: Option<&Path>, source: Option<Arc<str>>, diagnostic: Diagnostic) -> Self {
        let (line, column) = match (&source, diagnostic.primary_span()) {
            (Some(text), Some(span)) => span_to_line_col(text, span),
            _ => (0, 0),
        };
        BuildDiagnostic {
            path: path.map(Path::to_path_buf),
            line,
            column,
            diagnostic,
            source,
        }
    }

    /// A diagnostic not tied to any file.
    pub fn detached(diagnostic: Diagnostic) -> Self {
        BuildDiagnostic::new(None, None, diagnostic)
    }

    pub fn code(&self) -> ErrorCode {
        self.diagnostic.code
    }

    pub fn message(&self) -> &str {
        &self.diagnostic.message
    }

    pub fn is_error(&self) -> bool {
        self.diagnostic.is_error()
    }

    pub fn is_warning(&self) -> bool {
        self.diagnostic.severity == Severity::Warning
    }
}

impl fmt::Display for BuildDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self
            .path
            .as_deref()
            .map_or_else(|| "<source>".into(), Path::to_string_lossy);
        if self.line == 0 {
            write!(f, "{path}: ")?;
        } else {
            write!(f, "{path}:{}:{}: ", self.line, self.column)?;
        }
        write!(
            f,
            "{}[{}]: {}",
            self.diagnostic.severity, self.diagnostic.code, self.diagnostic.message
        )
    }
}

/// Ordered list of [`BuildDiagnostic`]s from one build.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuildDiagnostics {
    items: Vec<BuildDiagnostic>,
}

impl BuildDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: BuildDiagnostic) {
        self.items.push(diagnostic);
    }

    /// Attribute raw diagnostics to `path` and append them.
    pub fn extend_from(
        &mut self,
        path: Option<&Path>,
        source: &Arc<str>,
        diagnostics: impl IntoIterator<Item = Diagnostic>,
    ) {
        self.items.extend(
            diagnostics
                .into_iter()
                .map(|d| BuildDiagnostic::new(path, Some(Arc::clone(source)), d)),
        );
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(BuildDiagnostic::is_error)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BuildDiagnostic> {
        self.items.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &BuildDiagnostic> {
        self.items.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &BuildDiagnostic> {
        self.items.iter().filter(|d| d.is_warning())
    }

    pub fn into_vec(self) -> Vec<BuildDiagnostic> {
        self.items
    }
}

impl IntoIterator for BuildDiagnostics {
    type Item = BuildDiagnostic;
    type IntoIter = std::vec::IntoIter<BuildDiagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a BuildDiagnostics {
    type Item = &'a BuildDiagnostic;
    type IntoIter = std::slice::Iter<'a, BuildDiagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_ir::Span;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_position_from_primary_span() {
        let source: Arc<str> = Arc::from("a\nbc d");
        let diagnostic = Diagnostic::error(ErrorCode::E2003)
            .with_message("unknown identifier `d`")
            .with_label(Span::new(5, 6), "here");
        let built = BuildDiagnostic::new(Some(Path::new("main.lumen")), Some(source), diagnostic);
        assert_eq!((built.line, built.column), (2, 4));
        assert_eq!(
            built.to_string(),
            "main.lumen:2:4: error[E2003]: unknown identifier `d`"
        );
    }

    #[test]
    fn test_detached_has_no_position() {
        let built = BuildDiagnostic::detached(
            Diagnostic::error(ErrorCode::E3001).with_message("unknown style `x`"),
        );
        assert_eq!(built.line, 0);
        assert_eq!(built.to_string(), "<source>: error[E3001]: unknown style `x`");
    }

    #[test]
    fn test_errors_and_warnings_split() {
        let mut diagnostics = BuildDiagnostics::new();
        diagnostics.push(BuildDiagnostic::detached(Diagnostic::warning(ErrorCode::W2001)));
        assert!(!diagnostics.has_errors());
        diagnostics.push(BuildDiagnostic::detached(Diagnostic::error(ErrorCode::E2007)));
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.errors().count(), 1);
        assert_eq!(diagnostics.warnings().count(), 1);
    }
}
