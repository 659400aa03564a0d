//! Diagnostic system for rich error reporting.
//!
//! Every diagnostic carries:
//! - An error code for searchability (`lumen --explain E2003`)
//! - A clear message (what went wrong)
//! - A primary span (where it went wrong)
//! - Context labels, notes and suggestions (how to fix it)
//!
//! Diagnostics are values. Compiler phases collect them and hand them back
//! to the caller instead of panicking or printing.

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod span_utils;
pub mod suggest;

pub use diagnostic::{
    expected_expression, expected_identifier, type_mismatch, unclosed_delimiter,
    unexpected_token, unknown_identifier, Diagnostic, Label, Severity,
};
pub use error_code::ErrorCode;
