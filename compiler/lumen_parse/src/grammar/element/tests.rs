use crate::parse_source;
use lumen_diagnostic::ErrorCode;
use lumen_ir::ast::{ElementBody, ExprKind};
use lumen_ir::PropertyVisibility;
use pretty_assertions::assert_eq;

fn body(source: &str) -> ElementBody {
    let output = parse_source(source);
    assert!(!output.has_errors(), "{:?}", output.diagnostics);
    output
        .document
        .components
        .into_iter()
        .next()
        .map(|c| c.body)
        .unwrap_or_default()
}

#[test]
fn test_property_declarations() {
    let body = body(
        "component A {
            property <int> count: 3;
            in property <string> label;
            out property <bool> done;
            in-out property <color> tint: #f00;
            private property <float> ratio;
        }",
    );
    let props: Vec<_> = body
        .properties
        .iter()
        .map(|p| (p.name.name.as_str(), p.ty.name.as_str(), p.visibility))
        .collect();
    assert_eq!(
        props,
        vec![
            ("count", "int", PropertyVisibility::InOut),
            ("label", "string", PropertyVisibility::Input),
            ("done", "bool", PropertyVisibility::Output),
            ("tint", "color", PropertyVisibility::InOut),
            ("ratio", "float", PropertyVisibility::Private),
        ]
    );
    assert!(body.properties[0].default.is_some());
    assert!(body.properties[1].default.is_none());
}

#[test]
fn test_callbacks_and_handlers() {
    let body = body(
        "component A {
            callback clicked;
            callback moved(int, int);
            moved(x, y) => { count += x; }
            clicked => { }
        }",
    );
    assert_eq!(body.callbacks.len(), 2);
    assert!(body.callbacks[0].params.is_empty());
    assert_eq!(body.callbacks[1].params.len(), 2);
    assert_eq!(body.handlers.len(), 2);
    assert_eq!(body.handlers[0].params.len(), 2);
    assert_eq!(body.handlers[0].body.len(), 1);
}

#[test]
fn test_children_with_ids() {
    let body = body(
        "component A {
            label := Text { text: \"hi\"; }
            Rectangle { }
        }",
    );
    assert_eq!(body.children.len(), 2);
    assert_eq!(
        body.children[0].id.as_ref().map(|i| i.name.as_str()),
        Some("label")
    );
    assert_eq!(body.children[0].type_name.name, "Text");
    assert_eq!(body.children[0].body.bindings.len(), 1);
    assert!(body.children[1].id.is_none());
}

#[test]
fn test_binding_expression() {
    let body = body("component A { width: 10px; }");
    assert!(matches!(
        body.bindings[0].expr.kind,
        ExprKind::Number { value, .. } if (value - 10.0).abs() < f64::EPSILON
    ));
}

#[test]
fn test_member_error_recovery() {
    let output = parse_source(
        "component A {
            width 10px;
            height: 5px;
        }",
    );
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].code, ErrorCode::E1001);
    let body = &output.document.components[0].body;
    assert_eq!(body.bindings.len(), 1);
    assert_eq!(body.bindings[0].name.name, "height");
}

#[test]
fn test_missing_property_type() {
    let output = parse_source("component A { property <> x; }");
    assert_eq!(output.diagnostics[0].code, ErrorCode::E1005);
}

#[test]
fn test_unclosed_type_bracket() {
    let output = parse_source("component A { property <int x; }");
    assert_eq!(output.diagnostics[0].code, ErrorCode::E1003);
}
