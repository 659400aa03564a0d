use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::*;
use pretty_assertions::assert_eq;

fn compile_str(source: &str) -> CompileOutput {
    compile(source, None, Path::new(""), &CompilerConfiguration::default())
}

fn codes(output: &CompileOutput) -> Vec<ErrorCode> {
    output.diagnostics.iter().map(BuildDiagnostic::code).collect()
}

#[test]
fn test_last_exported_component_is_main() {
    let output = compile_str("export component A {} export component B {} component C {}");
    assert!(output.diagnostics.is_empty());
    assert_eq!(output.component.map(|c| c.name.clone()).as_deref(), Some("B"));
}

#[test]
fn test_unexported_main_warns() {
    let output = compile_str("component A {} component B {}");
    assert_eq!(codes(&output), [ErrorCode::W2001]);
    assert!(!output.has_errors());
    assert_eq!(output.component.map(|c| c.name.clone()).as_deref(), Some("B"));
}

#[test]
fn test_empty_document_is_an_error() {
    let output = compile_str("// nothing here\n");
    assert_eq!(codes(&output), [ErrorCode::E2007]);
    assert!(output.component.is_none());
}

#[test]
fn test_errors_withhold_the_component() {
    let output = compile_str("export component A { Text { txt: 1; } }");
    assert!(output.has_errors());
    assert!(output.component.is_none());
    let first = output.diagnostics.iter().next();
    assert_eq!(first.map(|d| (d.line, d.column)), Some((1, 29)));
}

#[test]
fn test_parse_errors_are_reported_with_lowering_errors() {
    let output = compile_str("export component A { Text { text: ; } Rectangel {} }");
    assert_eq!(codes(&output), [ErrorCode::E1002, ErrorCode::E2002]);
}

#[test]
fn test_unknown_style_fails_but_still_checks() {
    let config = CompilerConfiguration {
        style: Some("materail".to_string()),
        ..CompilerConfiguration::default()
    };
    let output = compile("export component A { Text { txt: 1; } }", None, Path::new(""), &config);
    assert_eq!(codes(&output), [ErrorCode::E3001, ErrorCode::E2003]);
    assert_eq!(output.style, Style::default());
    assert!(output.component.is_none());
}

#[test]
fn test_std_widgets_import() {
    let output = compile_str(
        r#"import { Button, Slider as Range } from "std-widgets.lumen";
        export component App {
            in-out property <int> clicks;
            Button { text: "Go"; clicked => { root.clicks += 1; } }
            Range { value: 30; }
        }"#,
    );
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let app = output.component.as_deref().map(|c| c.elements.len());
    // App root, Button and Slider
    assert_eq!(app, Some(3));
}

#[test]
fn test_std_widgets_follow_style() {
    let source = r#"import { Button } from "std-widgets.lumen";
        export component App { Button {} }"#;
    let config = CompilerConfiguration {
        style: Some("cupertino-dark".to_string()),
        ..CompilerConfiguration::default()
    };
    let output = compile(source, None, Path::new(""), &config);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    assert_eq!(output.style.to_string(), "cupertino-dark");
}

#[test]
fn test_unused_import_warns() {
    let output = compile_str(
        r#"import { Button, CheckBox } from "std-widgets.lumen";
        export component App { Button {} }"#,
    );
    assert_eq!(codes(&output), [ErrorCode::W2002]);
    assert!(output.component.is_some());
}

#[test]
fn test_name_not_exported() {
    let output = compile_str(
        r#"import { Buton } from "std-widgets.lumen"; export component App {}"#,
    );
    assert_eq!(codes(&output), [ErrorCode::E2009]);
    let help = output
        .diagnostics
        .iter()
        .next()
        .and_then(|d| d.diagnostic.suggestions.first().cloned());
    assert_eq!(help.as_deref(), Some("did you mean `Button`?"));
}

fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap_or_else(|e| panic!("write {name}: {e}"));
    path
}

#[test]
fn test_import_from_sibling_file() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    write(
        dir.path(),
        "card.lumen",
        "export component Card inherits Rectangle {
            in property <string> title;
            Text { text: root.title; }
        }",
    );
    let main = write(
        dir.path(),
        "main.lumen",
        r#"import { Card } from "card.lumen"; export component App { Card { title: "Hi"; } }"#,
    );
    let source = fs::read_to_string(&main).unwrap_or_default();
    let output = compile(&source, Some(&main), dir.path(), &CompilerConfiguration::default());
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
}

#[test]
fn test_include_paths_are_searched_in_order() {
    let base = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let first = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let second = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    write(first.path(), "lib.lumen", "export component One {}");
    write(second.path(), "lib.lumen", "export component Two {}");

    let config = CompilerConfiguration {
        include_paths: vec![first.path().to_path_buf(), second.path().to_path_buf()],
        ..CompilerConfiguration::default()
    };
    let output = compile(
        r#"import { One } from "lib.lumen"; export component App { One {} }"#,
        None,
        base.path(),
        &config,
    );
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
}

#[test]
fn test_missing_import_lists_searched_paths() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let output = compile(
        r#"import { X } from "missing.lumen"; export component App {}"#,
        None,
        dir.path(),
        &CompilerConfiguration::default(),
    );
    assert_eq!(codes(&output), [ErrorCode::E2008]);
    let note = output
        .diagnostics
        .iter()
        .next()
        .and_then(|d| d.diagnostic.notes.first().cloned())
        .unwrap_or_default();
    assert!(note.contains("missing.lumen"), "{note}");
}

#[test]
fn test_errors_in_imported_file_name_that_file() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let lib = write(dir.path(), "lib.lumen", "export component Lib {\n  Text { txt: 1; }\n}");
    let output = compile(
        r#"import { Lib } from "lib.lumen"; export component App { Lib {} }"#,
        None,
        dir.path(),
        &CompilerConfiguration::default(),
    );
    assert_eq!(codes(&output), [ErrorCode::E2003]);
    let first = output.diagnostics.iter().next();
    assert_eq!(first.and_then(|d| d.path.clone()), Some(lib));
    assert_eq!(first.map(|d| d.line), Some(2));
}

#[test]
fn test_import_cycle_is_reported() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    write(
        dir.path(),
        "a.lumen",
        r#"import { B } from "b.lumen"; export component A { B {} }"#,
    );
    write(
        dir.path(),
        "b.lumen",
        r#"import { A } from "a.lumen"; export component B {}"#,
    );
    let main = dir.path().join("a.lumen");
    let source = fs::read_to_string(&main).unwrap_or_default();
    let output = compile(&source, Some(&main), dir.path(), &CompilerConfiguration::default());
    assert!(codes(&output).contains(&ErrorCode::E2010), "{:?}", codes(&output));
    assert!(output.component.is_none());
}

#[test]
fn test_file_loader_provides_virtual_files() {
    let loader: FileLoader = Arc::new(|path: &Path| {
        let text = "export component Virtual { in property <int> n; }";
        (path.file_name()? == "virtual.lumen").then(|| Ok::<_, std::io::Error>(text.to_string()))
    });
    let config = CompilerConfiguration {
        file_loader: Some(loader),
        ..CompilerConfiguration::default()
    };
    let output = compile(
        r#"import { Virtual } from "virtual.lumen"; export component App { Virtual { n: 2; } }"#,
        None,
        Path::new("/nonexistent"),
        &config,
    );
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
}

#[test]
fn test_deeply_nested_binding_is_rejected_without_overflow() {
    let source = format!(
        "export component App {{ out property <int> v: {}1{}; }}",
        "(".repeat(100_000),
        ")".repeat(100_000)
    );
    let output = compile_str(&source);
    assert_eq!(codes(&output), [ErrorCode::E1007]);
    assert!(output.component.is_none());
}

#[test]
fn test_long_negation_chain_lowers() {
    let source = format!(
        "export component App {{ out property <bool> b: {}true; }}",
        "!".repeat(300)
    );
    let output = compile_str(&source);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    assert!(output.component.is_some());
}
