//! Import Resolution.
//!
//! Loads the files a document imports, compiles them, and hands the
//! lowering pass the components they export.
//!
//! ```text
//! load_root(source)
//!   ├── parse
//!   ├── for each import: find file → load_document (recursive, cached)
//!   └── lower with the imported components
//! ```
//!
//! Import paths are tried relative to the importing file's directory, then
//! against each include path in order. `std-widgets.lumen` is built in and
//! never read from disk. Errors are collected rather than failing fast, and
//! each is attributed to the file it was found in.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lumen_diagnostic::suggest::suggest_similar;
use lumen_diagnostic::{Diagnostic, ErrorCode};
use lumen_ir::ast::{Document, Import};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::CompilerConfiguration;
use crate::diagnostics::{BuildDiagnostic, BuildDiagnostics};
use crate::lower::{DocumentLowering, ImportedType};
use crate::object_tree::CompiledComponent;
use crate::std_widgets::{self, STD_WIDGETS_PATH};
use crate::style::Style;

/// A compiled imported file.
struct LoadedFile {
    exports: FxHashMap<String, Arc<CompiledComponent>>,
}

impl LoadedFile {
    fn new(components: Vec<Arc<CompiledComponent>>) -> Self {
        let mut exports = FxHashMap::default();
        for component in components.into_iter().filter(|c| c.exported) {
            // Duplicates were reported while lowering; the first wins
            exports.entry(component.name.clone()).or_insert(component);
        }
        LoadedFile { exports }
    }
}

/// Where an import is made from.
struct Importer<'s> {
    path: Option<&'s Path>,
    source: &'s Arc<str>,
    base_dir: &'s Path,
}

pub(crate) struct TypeLoader<'c> {
    config: &'c CompilerConfiguration,
    style: Style,
    /// Session cache of loaded files, keyed by canonical path.
    cache: FxHashMap<PathBuf, Arc<LoadedFile>>,
    /// Files currently being loaded, outermost first.
    loading: Vec<PathBuf>,
    pub(crate) diagnostics: BuildDiagnostics,
}

impl<'c> TypeLoader<'c> {
    pub(crate) fn new(config: &'c CompilerConfiguration, style: Style) -> Self {
        TypeLoader {
            config,
            style,
            cache: FxHashMap::default(),
            loading: Vec::new(),
            diagnostics: BuildDiagnostics::new(),
        }
    }

    /// Compile the document being built, returning its components in
    /// declaration order.
    pub(crate) fn load_root(
        &mut self,
        source: &str,
        path: Option<&Path>,
        base_dir: &Path,
    ) -> Vec<Arc<CompiledComponent>> {
        if let Some(path) = path {
            self.loading.push(cache_key(path));
        }
        let source: Arc<str> = Arc::from(source);
        let components = self.load_document(&source, path, base_dir);
        self.loading.clear();
        components
    }

    fn load_document(
        &mut self,
        source: &Arc<str>,
        path: Option<&Path>,
        base_dir: &Path,
    ) -> Vec<Arc<CompiledComponent>> {
        let parsed = lumen_parse::parse_source(source);
        self.diagnostics
            .extend_from(path, source, parsed.diagnostics);

        let importer = Importer {
            path,
            source,
            base_dir,
        };
        let imports = self.resolve_imports(&parsed.document, &importer);

        let lowered = DocumentLowering::new(&parsed.document, imports).lower_all();
        self.diagnostics
            .extend_from(path, source, lowered.diagnostics);
        lowered.components
    }

    fn report(&mut self, importer: &Importer<'_>, diagnostic: Diagnostic) {
        self.diagnostics.push(BuildDiagnostic::new(
            importer.path,
            Some(Arc::clone(importer.source)),
            diagnostic,
        ));
    }

    fn resolve_imports(
        &mut self,
        document: &Document,
        importer: &Importer<'_>,
    ) -> FxHashMap<String, ImportedType> {
        let mut imports: FxHashMap<String, ImportedType> = FxHashMap::default();

        for import in &document.imports {
            let Some(file) = self.load_import(import, importer) else {
                continue;
            };
            for imported in &import.names {
                let name = &imported.name;
                let Some(component) = file.exports.get(&name.name) else {
                    let suggestion =
                        suggest_similar(&name.name, file.exports.keys().map(String::as_str))
                            .map(str::to_string);
                    self.report(
                        importer,
                        Diagnostic::error(ErrorCode::E2009)
                            .with_message(format!("`{}` does not export `{name}`", import.path))
                            .with_label(name.span, "not exported")
                            .with_did_you_mean(suggestion.as_deref()),
                    );
                    continue;
                };

                let local = imported.local_name();
                if let Some(previous) = imports.get(&local.name) {
                    let previous_span = previous.span;
                    self.report(
                        importer,
                        Diagnostic::error(ErrorCode::E2017)
                            .with_message(format!("`{local}` is imported more than once"))
                            .with_label(local.span, "imported again here")
                            .with_secondary_label(previous_span, "first imported here"),
                    );
                    continue;
                }
                imports.insert(
                    local.name.clone(),
                    ImportedType {
                        component: Arc::clone(component),
                        span: local.span,
                    },
                );
            }
        }

        imports
    }

    fn load_import(&mut self, import: &Import, importer: &Importer<'_>) -> Option<Arc<LoadedFile>> {
        if import.path == STD_WIDGETS_PATH {
            return Some(self.std_widgets());
        }

        let Some(resolved) = self.find_file(&import.path, importer.base_dir) else {
            let searched = self.search_paths(&import.path, importer.base_dir);
            let searched: Vec<_> = searched.iter().map(|p| p.display().to_string()).collect();
            self.report(
                importer,
                Diagnostic::error(ErrorCode::E2008)
                    .with_message(format!("cannot find imported file `{}`", import.path))
                    .with_label(import.path_span, "file not found")
                    .with_note(format!("searched: {}", searched.join(", "))),
            );
            return None;
        };

        let key = cache_key(&resolved);
        if let Some(start) = self.loading.iter().position(|p| *p == key) {
            let mut cycle: Vec<_> = self.loading[start..]
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            cycle.push(key.display().to_string());
            self.report(
                importer,
                Diagnostic::error(ErrorCode::E2010)
                    .with_message(format!("import cycle: {}", cycle.join(" -> ")))
                    .with_label(import.path_span, "imported here"),
            );
            return None;
        }
        if let Some(file) = self.cache.get(&key) {
            return Some(Arc::clone(file));
        }

        let text = match self.config.read_file(&resolved) {
            Ok(text) => text,
            Err(err) => {
                self.report(
                    importer,
                    Diagnostic::error(ErrorCode::E2008)
                        .with_message(format!("cannot read `{}`: {err}", resolved.display()))
                        .with_label(import.path_span, "imported here"),
                );
                return None;
            }
        };

        debug!(path = %resolved.display(), "loading import");
        self.loading.push(key.clone());
        let base_dir = resolved.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
        let source: Arc<str> = Arc::from(text);
        let components = self.load_document(&source, Some(&resolved), &base_dir);
        self.loading.pop();

        let file = Arc::new(LoadedFile::new(components));
        self.cache.insert(key, Arc::clone(&file));
        Some(file)
    }

    fn std_widgets(&mut self) -> Arc<LoadedFile> {
        let key = PathBuf::from(STD_WIDGETS_PATH);
        if let Some(file) = self.cache.get(&key) {
            return Arc::clone(file);
        }
        debug!(style = %self.style, "generating standard widgets");
        let source: Arc<str> = Arc::from(std_widgets::source(self.style));
        let components = self.load_document(&source, Some(&key), Path::new(""));
        let file = Arc::new(LoadedFile::new(components));
        self.cache.insert(key, Arc::clone(&file));
        file
    }

    fn search_paths(&self, import: &str, base_dir: &Path) -> Vec<PathBuf> {
        std::iter::once(base_dir.join(import))
            .chain(self.config.include_paths.iter().map(|dir| dir.join(import)))
            .collect()
    }

    fn find_file(&self, import: &str, base_dir: &Path) -> Option<PathBuf> {
        self.search_paths(import, base_dir)
            .into_iter()
            .find(|candidate| self.config.file_exists(candidate))
    }
}

/// Canonical form of `path`, or the path itself for files that only exist
/// through a file loader.
fn cache_key(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
