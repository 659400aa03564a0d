//! The `run` command: compile a file and run its main component.

use super::{build, report, BuildArgs};

/// Compile `args.file`, create an instance and run the event loop until
/// its window closes. Returns whether everything succeeded.
pub fn run_file(args: &BuildArgs) -> bool {
    let definition = match build(args) {
        Ok(compiled) => {
            report(&compiled.warnings);
            compiled.definition
        }
        Err(failure) => {
            report(&failure.diagnostics);
            return false;
        }
    };

    let instance = match definition.create() {
        Ok(instance) => instance,
        Err(err) => {
            eprintln!("error: cannot create `{}`: {err}", definition.name());
            return false;
        }
    };
    tracing::debug!(component = definition.name(), "running");
    match instance.run() {
        Ok(()) => true,
        Err(err) => {
            eprintln!("error: `{}` stopped: {err}", definition.name());
            false
        }
    }
}
