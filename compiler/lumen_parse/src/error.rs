//! Parse error type.
//!
//! Grammar rules return `ParseError`; the parser converts them into
//! diagnostics when it recovers.

use lumen_diagnostic::{Diagnostic, ErrorCode};
use lumen_ir::Span;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// Error code for searchability.
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
    /// Label text at the primary span.
    pub context: Option<String>,
    /// A span related to the error, such as the opening delimiter.
    pub related: Option<(Span, String)>,
    pub help: Vec<String>,
}

impl ParseError {
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
            context: None,
            related: None,
            help: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn with_related(mut self, span: Span, message: impl Into<String>) -> Self {
        self.related = Some((span, message.into()));
        self
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    /// A delimiter opened at `open` was never closed.
    #[cold]
    pub fn unclosed(open: Span, found_at: Span, delimiter: char) -> Self {
        let close = match delimiter {
            '(' => ')',
            '<' => '>',
            _ => '}',
        };
        ParseError::new(
            ErrorCode::E1003,
            format!("unclosed delimiter `{delimiter}`"),
            found_at,
        )
        .with_context(format!("expected `{close}`"))
        .with_related(open, "unclosed delimiter opened here")
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code)
            .with_message(&self.message)
            .with_label(self.span, self.context.as_deref().unwrap_or("here"));

        if let Some((span, message)) = &self.related {
            diag = diag.with_secondary_label(*span, message);
        }
        for help in &self.help {
            diag = diag.with_suggestion(help);
        }

        diag
    }
}
