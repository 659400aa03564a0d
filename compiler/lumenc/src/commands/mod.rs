//! Command handlers for the Lumen CLI.
//!
//! Argument parsing and diagnostic rendering shared by `check` and `run`
//! live here in the module root.

mod check;
mod explain;
mod run;

use std::io::Write;
use std::path::PathBuf;

use lumen_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use lumen_interpreter::{BuildDiagnostic, CompileResult, ComponentCompiler};

pub use check::check_file;
pub use explain::explain_error;
pub use run::run_file;

/// Arguments of `check` and `run`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildArgs {
    pub file: PathBuf,
    pub include_paths: Vec<PathBuf>,
    pub style: Option<String>,
}

/// Parse `<file> [-I <dir>]... [--style <name>]` in any order.
///
/// `-I<dir>` and `--style=<name>` forms are accepted too.
pub fn parse_build_args(args: &[String]) -> Result<BuildArgs, String> {
    let mut file = None;
    let mut include_paths = Vec::new();
    let mut style = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "-I" {
            let dir = iter.next().ok_or("`-I` needs a directory")?;
            include_paths.push(PathBuf::from(dir));
        } else if let Some(dir) = arg.strip_prefix("-I") {
            include_paths.push(PathBuf::from(dir));
        } else if arg == "--style" {
            let name = iter.next().ok_or("`--style` needs a style name")?;
            style = Some(name.clone());
        } else if let Some(name) = arg.strip_prefix("--style=") {
            style = Some(name.to_string());
        } else if arg.starts_with('-') {
            return Err(format!("unknown option `{arg}`"));
        } else if file.is_none() {
            file = Some(PathBuf::from(arg));
        } else {
            return Err(format!("unexpected argument `{arg}`"));
        }
    }

    let file = file.ok_or("missing file path")?;
    Ok(BuildArgs {
        file,
        include_paths,
        style,
    })
}

/// Compile the file named by `args`.
fn build(args: &BuildArgs) -> CompileResult {
    let mut compiler = ComponentCompiler::new();
    compiler.set_include_paths(args.include_paths.clone());
    if let Some(style) = &args.style {
        compiler.set_style(style.clone());
    }
    compiler.build_from_path(&args.file)
}

/// Render diagnostics to stderr with source snippets, followed by a summary.
fn report(diagnostics: &[BuildDiagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    let is_tty = std::io::IsTerminal::is_terminal(&std::io::stderr());
    let mut emitter = TerminalEmitter::<std::io::Stderr>::stderr(ColorMode::Auto, is_tty);
    render(&mut emitter, diagnostics);
}

/// Emit each diagnostic against the file it belongs to.
///
/// Returns the error and warning counts.
fn render<W: Write>(
    emitter: &mut TerminalEmitter<W>,
    diagnostics: &[BuildDiagnostic],
) -> (usize, usize) {
    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    let warnings = diagnostics.iter().filter(|d| d.is_warning()).count();
    for diagnostic in diagnostics {
        let path = diagnostic.path.as_deref().map(|p| p.display().to_string());
        emitter.set_source(path.as_deref(), diagnostic.source.as_deref());
        emitter.emit(&diagnostic.diagnostic);
    }
    emitter.emit_summary(errors, warnings);
    emitter.flush();
    (errors, warnings)
}
