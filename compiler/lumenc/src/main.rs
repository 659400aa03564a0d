//! Lumen CLI
//!
//! Checks and runs `.lumen` component files with the interpreter.

mod commands;

use std::process::ExitCode;
use std::sync::Once;

use commands::{check_file, explain_error, parse_build_args, run_file};

static TRACING_INIT: Once = Once::new();

/// Enable with `RUST_LOG=lumen_compiler=debug` and similar.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}

fn main() -> ExitCode {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let command = &args[1];
    let ok = match command.as_str() {
        "check" | "run" => {
            let args = match parse_build_args(&args[2..]) {
                Ok(args) => args,
                Err(message) => {
                    eprintln!("error: {message}");
                    eprintln!("Usage: lumen {command} <file.lumen> [-I <dir>]... [--style <name>]");
                    return ExitCode::FAILURE;
                }
            };
            if command == "check" {
                check_file(&args)
            } else {
                run_file(&args)
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
            true
        }
        "version" | "--version" | "-V" => {
            println!("Lumen {}", env!("CARGO_PKG_VERSION"));
            true
        }
        "--explain" | "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: lumen --explain <ERROR_CODE>");
                eprintln!("Example: lumen --explain E2003");
                return ExitCode::FAILURE;
            }
            explain_error(&args[2])
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            false
        }
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_usage() {
    println!("Lumen component interpreter");
    println!();
    println!("Usage: lumen <command> [options]");
    println!();
    println!("Commands:");
    println!("  check <file.lumen>   Compile a file and report diagnostics");
    println!("  run <file.lumen>     Compile a file and show its main component");
    println!("  --explain <code>     Explain an error code (e.g., E2003)");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Options for check and run:");
    println!("  -I <dir>             Add an import search directory (repeatable)");
    println!("  --style <name>       Widget style (default: $LUMEN_STYLE or native)");
    println!();
    println!("Examples:");
    println!("  lumen check app.lumen");
    println!("  lumen run app.lumen -I ui/ --style fluent-dark");
    println!("  lumen --explain E2002             # Explain unknown element type");
}
