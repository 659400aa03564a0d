//! Compiler configuration.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lumen_diagnostic::{Diagnostic, ErrorCode};

use crate::style::{Style, STYLE_NAMES};

/// Environment variable supplying the default style.
pub const STYLE_ENV_VAR: &str = "LUMEN_STYLE";

/// Replaces disk reads during import resolution.
///
/// Returning `None` falls back to the filesystem for that path.
pub type FileLoader = Arc<dyn Fn(&Path) -> Option<io::Result<String>> + Send + Sync>;

/// Settings a build runs with.
#[derive(Clone, Default)]
pub struct CompilerConfiguration {
    /// Directories searched for imports after the importing file's own
    /// directory, in order.
    pub include_paths: Vec<PathBuf>,
    /// Style name as given by the user; validated when a build starts.
    pub style: Option<String>,
    pub file_loader: Option<FileLoader>,
}

impl fmt::Debug for CompilerConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompilerConfiguration")
            .field("include_paths", &self.include_paths)
            .field("style", &self.style)
            .field("file_loader", &self.file_loader.as_ref().map(|_| "<loader>"))
            .finish()
    }
}

impl CompilerConfiguration {
    /// Default configuration, taking the style from `LUMEN_STYLE` if set.
    pub fn from_env() -> Self {
        CompilerConfiguration {
            style: std::env::var(STYLE_ENV_VAR).ok().filter(|s| !s.is_empty()),
            ..CompilerConfiguration::default()
        }
    }

    /// Resolve the configured style name.
    pub fn resolve_style(&self) -> Result<Style, Diagnostic> {
        let Some(name) = self.style.as_deref() else {
            return Ok(Style::default());
        };
        name.parse::<Style>().map_err(|err| {
            Diagnostic::error(ErrorCode::E3001)
                .with_message(err.to_string())
                .with_note(format!("available styles: {}", STYLE_NAMES.join(", ")))
                .with_did_you_mean(err.suggestion)
        })
    }

    /// Read a file through the loader hook, or from disk.
    pub fn read_file(&self, path: &Path) -> io::Result<String> {
        if let Some(result) = self.file_loader.as_ref().and_then(|loader| loader(path)) {
            return result;
        }
        std::fs::read_to_string(path)
    }

    /// Whether `path` can be read, through the loader hook or on disk.
    pub fn file_exists(&self, path: &Path) -> bool {
        if let Some(result) = self.file_loader.as_ref().and_then(|loader| loader(path)) {
            return result.is_ok();
        }
        path.is_file()
    }
}
