//! The `check` command: compile a file and report its diagnostics.

use super::{build, report, BuildArgs};

/// Compile `args.file` without running it. Returns whether it compiled.
pub fn check_file(args: &BuildArgs) -> bool {
    match build(args) {
        Ok(compiled) => {
            report(&compiled.warnings);
            let definition = &compiled.definition;
            println!(
                "OK: {} (component {}, {} properties, {} callbacks, style {})",
                args.file.display(),
                definition.name(),
                definition.properties().count(),
                definition.callbacks().count(),
                definition.style(),
            );
            true
        }
        Err(failure) => {
            report(&failure.diagnostics);
            false
        }
    }
}
