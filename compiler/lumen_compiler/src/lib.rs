//! Lumen Compiler - semantic analysis of component documents.
//!
//! Turns source text into a [`CompiledComponent`]: an element table with
//! resolved properties, callbacks, bindings, and handlers, ready to be
//! instantiated by the interpreter.
//!
//! # Pipeline
//!
//! ```text
//! source ──► lumen_lexer::lex ──► lumen_parse ──► Document
//!                                                   │
//!                       type_loader (imports) ─────►│
//!                                                   ▼
//!                                      lower ──► CompiledComponent
//! ```
//!
//! # Module Organization
//!
//! - `builtins`: the native element types
//! - `lower`: name resolution and type checking
//! - `type_loader`: import resolution and the `std-widgets.lumen` library
//! - `style`: widget styles and palettes

pub mod builtins;
pub mod config;
pub mod diagnostics;
pub mod expr;
mod lower;
pub mod object_tree;
pub mod std_widgets;
pub mod style;
mod type_loader;

use std::path::Path;
use std::sync::Arc;

use lumen_diagnostic::{Diagnostic, ErrorCode};
use tracing::debug;

pub use config::{CompilerConfiguration, FileLoader, STYLE_ENV_VAR};
pub use diagnostics::{BuildDiagnostic, BuildDiagnostics};
pub use object_tree::{CompiledComponent, ElementKind, Origin};
pub use style::{Style, UnknownStyle};

use type_loader::TypeLoader;

/// Result of compiling one document.
#[derive(Debug)]
pub struct CompileOutput {
    /// The document's main component, if compilation succeeded.
    pub component: Option<Arc<CompiledComponent>>,
    /// The style the document was compiled with.
    pub style: Style,
    pub diagnostics: BuildDiagnostics,
}

impl CompileOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// Compile `source` and select its main component.
///
/// `path` is used for diagnostics and import cycle detection; imports are
/// resolved against `base_dir` first, then the configured include paths.
///
/// The main component is the last exported component of the document, or
/// the last component with a warning when none is exported. `component` is
/// `None` whenever an error was reported.
pub fn compile(
    source: &str,
    path: Option<&Path>,
    base_dir: &Path,
    config: &CompilerConfiguration,
) -> CompileOutput {
    let mut diagnostics = BuildDiagnostics::new();
    let style = match config.resolve_style() {
        Ok(style) => style,
        Err(diagnostic) => {
            diagnostics.push(BuildDiagnostic::detached(diagnostic));
            Style::default()
        }
    };

    let mut loader = TypeLoader::new(config, style);
    let components = loader.load_root(source, path, base_dir);
    for diagnostic in loader.diagnostics {
        diagnostics.push(diagnostic);
    }

    let main = select_main(&components, path, source, &mut diagnostics);
    let component = if diagnostics.has_errors() { None } else { main };

    debug!(
        main = component.as_ref().map(|c| c.name.as_str()),
        diagnostics = diagnostics.len(),
        "compiled document"
    );

    CompileOutput {
        component,
        style,
        diagnostics,
    }
}

fn select_main(
    components: &[Arc<CompiledComponent>],
    path: Option<&Path>,
    source: &str,
    diagnostics: &mut BuildDiagnostics,
) -> Option<Arc<CompiledComponent>> {
    if let Some(exported) = components.iter().rev().find(|c| c.exported) {
        return Some(Arc::clone(exported));
    }
    let source: Arc<str> = Arc::from(source);
    match components.last() {
        Some(last) => {
            diagnostics.push(BuildDiagnostic::new(
                path,
                Some(source),
                Diagnostic::warning(ErrorCode::W2001)
                    .with_message(format!(
                        "component `{}` is used as main but is not exported",
                        last.name
                    ))
                    .with_suggestion(format!("add `export`: `export component {}`", last.name)),
            ));
            Some(Arc::clone(last))
        }
        None => {
            diagnostics.push(BuildDiagnostic::new(
                path,
                Some(source),
                Diagnostic::error(ErrorCode::E2007)
                    .with_message("the document does not declare any component"),
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests;
