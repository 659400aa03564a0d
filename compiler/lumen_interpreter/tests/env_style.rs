//! The `LUMEN_STYLE` fallback. Kept in its own test binary so the variable
//! does not leak into other tests.

#![allow(clippy::unwrap_used)]

use std::path::Path;

use lumen_interpreter::{ComponentCompiler, Style};
use pretty_assertions::assert_eq;

#[test]
fn test_environment_style_applies_when_unset() {
    std::env::set_var("LUMEN_STYLE", "material-dark");
    let mut compiler = ComponentCompiler::new();
    assert_eq!(compiler.style(), None);

    let definition = compiler
        .build_from_source("export component App {}", Path::new(""))
        .unwrap()
        .definition;
    assert_eq!(definition.style(), "material-dark".parse::<Style>().unwrap());

    compiler.set_style("cupertino");
    let definition = compiler
        .build_from_source("export component App {}", Path::new(""))
        .unwrap()
        .definition;
    assert_eq!(definition.style(), "cupertino".parse::<Style>().unwrap());
}
