use crate::parse_source;
use lumen_diagnostic::ErrorCode;
use pretty_assertions::assert_eq;

#[test]
fn test_import_with_alias() {
    let output =
        parse_source(r#"import { Button as PushButton, Slider } from "std-widgets.lumen";"#);
    assert!(!output.has_errors(), "{:?}", output.diagnostics);
    let import = &output.document.imports[0];
    assert_eq!(import.path, "std-widgets.lumen");
    let locals: Vec<_> = import
        .names
        .iter()
        .map(|n| n.local_name().name.as_str())
        .collect();
    assert_eq!(locals, vec!["PushButton", "Slider"]);
    assert_eq!(import.names[0].name.name, "Button");
}

#[test]
fn test_import_requires_string_path() {
    let output = parse_source("import { A } from widgets;");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].code, ErrorCode::E1001);
    assert!(output.document.imports.is_empty());
}

#[test]
fn test_component_base() {
    let output = parse_source("component Fancy inherits Rectangle { }");
    let component = &output.document.components[0];
    assert!(!component.exported);
    assert_eq!(
        component.base.as_ref().map(|b| b.name.as_str()),
        Some("Rectangle")
    );
}

#[test]
fn test_component_missing_name() {
    let output = parse_source("export component { }");
    assert_eq!(output.diagnostics[0].code, ErrorCode::E1004);
}
