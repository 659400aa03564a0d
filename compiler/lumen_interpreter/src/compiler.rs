//! The compiler facade.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lumen_compiler::{compile, BuildDiagnostic, CompilerConfiguration, FileLoader};
use lumen_diagnostic::{Diagnostic, ErrorCode};
use tracing::debug;

use crate::ComponentDefinition;

/// A successful build.
#[derive(Debug)]
pub struct Compiled {
    pub definition: ComponentDefinition,
    /// Warnings reported while compiling.
    pub warnings: Vec<BuildDiagnostic>,
}

/// A build that reported at least one error.
#[derive(Debug, thiserror::Error)]
#[error("compilation failed with {count} diagnostic(s)", count = .diagnostics.len())]
pub struct CompileFailure {
    /// Every diagnostic of the build, errors and warnings, in report order.
    pub diagnostics: Vec<BuildDiagnostic>,
}

impl CompileFailure {
    pub fn errors(&self) -> impl Iterator<Item = &BuildDiagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }
}

pub type CompileResult = Result<Compiled, CompileFailure>;

/// Compiles Lumen source into [`ComponentDefinition`]s.
///
/// Each compiler owns its configuration. Changing it affects later builds
/// only; definitions already returned are unaffected.
///
/// ```no_run
/// use std::path::Path;
/// use lumen_interpreter::ComponentCompiler;
///
/// let mut compiler = ComponentCompiler::new();
/// let compiled = compiler.build_from_source("export component Hello {}", Path::new(""))?;
/// let instance = compiled.definition.create()?;
/// instance.run()?;
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
pub struct ComponentCompiler {
    include_paths: Vec<PathBuf>,
    style: Option<String>,
    /// `LUMEN_STYLE` at creation time; used when no style was set.
    env_style: Option<String>,
    file_loader: Option<FileLoader>,
    diagnostics: Vec<BuildDiagnostic>,
}

impl Default for ComponentCompiler {
    fn default() -> Self {
        ComponentCompiler::new()
    }
}

impl std::fmt::Debug for ComponentCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentCompiler")
            .field("include_paths", &self.include_paths)
            .field("style", &self.style)
            .field("env_style", &self.env_style)
            .finish_non_exhaustive()
    }
}

impl ComponentCompiler {
    pub fn new() -> Self {
        ComponentCompiler {
            include_paths: Vec::new(),
            style: None,
            env_style: CompilerConfiguration::from_env().style,
            file_loader: None,
            diagnostics: Vec::new(),
        }
    }

    /// Replace the include path list. Paths are kept exactly as given.
    pub fn set_include_paths(&mut self, include_paths: Vec<PathBuf>) {
        self.include_paths = include_paths;
    }

    pub fn include_paths(&self) -> &[PathBuf] {
        &self.include_paths
    }

    /// Set the widget style. The name is checked when a build starts.
    pub fn set_style(&mut self, style: impl Into<String>) {
        self.style = Some(style.into());
    }

    /// The style passed to [`set_style`](Self::set_style), if any.
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    /// Serve file reads from `loader` before falling back to the disk.
    pub fn set_file_loader(
        &mut self,
        loader: impl Fn(&Path) -> Option<std::io::Result<String>> + Send + Sync + 'static,
    ) {
        self.file_loader = Some(Arc::new(loader));
    }

    /// Diagnostics of the most recent build.
    pub fn diagnostics(&self) -> &[BuildDiagnostic] {
        &self.diagnostics
    }

    fn configuration(&self) -> CompilerConfiguration {
        CompilerConfiguration {
            include_paths: self.include_paths.clone(),
            style: self.style.clone().or_else(|| self.env_style.clone()),
            file_loader: self.file_loader.clone(),
        }
    }

    /// Compile `source`, resolving relative imports against `base_path`.
    pub fn build_from_source(&mut self, source: &str, base_path: &Path) -> CompileResult {
        self.build(source, None, base_path)
    }

    /// Read and compile the file at `path`; imports resolve against its
    /// directory.
    pub fn build_from_path(&mut self, path: impl AsRef<Path>) -> CompileResult {
        let path = path.as_ref();
        let config = self.configuration();
        let source = match config.read_file(path) {
            Ok(source) => source,
            Err(err) => {
                let diagnostic = Diagnostic::error(ErrorCode::E4001)
                    .with_message(format!("cannot read `{}`: {err}", path.display()));
                self.diagnostics = vec![BuildDiagnostic::new(Some(path), None, diagnostic)];
                return Err(CompileFailure {
                    diagnostics: self.diagnostics.clone(),
                });
            }
        };
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        self.build(&source, Some(path), base)
    }

    fn build(&mut self, source: &str, path: Option<&Path>, base_dir: &Path) -> CompileResult {
        let config = self.configuration();
        let output = compile(source, path, base_dir, &config);
        let has_errors = output.has_errors();
        self.diagnostics = output.diagnostics.into_vec();

        debug!(
            path = path.map(|p| p.display().to_string()),
            diagnostics = self.diagnostics.len(),
            "build finished"
        );

        match output.component {
            Some(component) if !has_errors => Ok(Compiled {
                definition: ComponentDefinition::new(component, output.style),
                warnings: self.diagnostics.clone(),
            }),
            _ => Err(CompileFailure {
                diagnostics: self.diagnostics.clone(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use lumen_compiler::Style;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_style_is_unset_by_default() {
        assert_eq!(ComponentCompiler::new().style(), None);
    }

    #[test]
    fn test_unknown_style_fails_at_build() {
        let mut compiler = ComponentCompiler::new();
        compiler.set_style("glossy");
        assert_eq!(compiler.style(), Some("glossy"));
        let failure = compiler
            .build_from_source("export component Test {}", Path::new(""))
            .unwrap_err();
        assert_eq!(failure.diagnostics[0].code(), ErrorCode::E3001);
        assert_eq!(compiler.diagnostics().len(), failure.diagnostics.len());
    }

    #[test]
    fn test_configured_style_reaches_definition() {
        let mut compiler = ComponentCompiler::new();
        compiler.set_style("fluent-dark");
        let compiled = compiler
            .build_from_source("export component Test {}", Path::new(""))
            .unwrap();
        assert_eq!(compiled.definition.style(), "fluent-dark".parse::<Style>().unwrap());
    }

    #[test]
    fn test_file_loader_serves_imports() {
        let mut compiler = ComponentCompiler::new();
        compiler.set_file_loader(|path| {
            (path == Path::new("virtual/lib.lumen"))
                .then(|| Ok("export component Badge { in property <string> label; }".to_string()))
        });
        let compiled = compiler
            .build_from_source(
                r#"import { Badge } from "lib.lumen";
export component App { Badge { label: "new"; } }"#,
                Path::new("virtual"),
            )
            .unwrap();
        assert_eq!(compiled.definition.name(), "App");
    }

    #[test]
    fn test_warnings_are_returned_on_success() {
        let mut compiler = ComponentCompiler::new();
        let compiled = compiler
            .build_from_source("component Test {}", Path::new(""))
            .unwrap();
        assert_eq!(compiled.warnings.len(), 1);
        assert_eq!(compiled.warnings[0].code(), ErrorCode::W2001);
    }

    #[test]
    fn test_unreadable_file_reports_path() {
        let mut compiler = ComponentCompiler::new();
        let failure = compiler.build_from_path("does/not/exist.lumen").unwrap_err();
        assert_eq!(failure.diagnostics.len(), 1);
        let diagnostic = &failure.diagnostics[0];
        assert_eq!(diagnostic.code(), ErrorCode::E4001);
        assert_eq!(diagnostic.path.as_deref(), Some(Path::new("does/not/exist.lumen")));
        assert_eq!(failure.to_string(), "compilation failed with 1 diagnostic(s)");
    }

    proptest! {
        #[test]
        fn include_paths_are_stored_verbatim(
            paths in proptest::collection::vec("[a-z./]{0,12}", 0..6)
        ) {
            let paths: Vec<PathBuf> = paths.into_iter().map(PathBuf::from).collect();
            let mut compiler = ComponentCompiler::new();
            compiler.set_include_paths(paths.clone());
            prop_assert_eq!(compiler.include_paths(), paths.as_slice());
        }

        #[test]
        fn style_is_stored_verbatim(style in ".*") {
            let mut compiler = ComponentCompiler::new();
            compiler.set_style(style.clone());
            prop_assert_eq!(compiler.style(), Some(style.as_str()));
        }
    }
}
