use super::*;
use crate::expr::{CallbackRef, Expression, PropertyRef, Statement};
use lumen_ir::ast::BinaryOp;
use pretty_assertions::assert_eq;

fn lower(source: &str) -> LoweredDocument {
    let parsed = lumen_parse::parse_source(source);
    assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
    DocumentLowering::new(&parsed.document, FxHashMap::default()).lower_all()
}

fn codes(source: &str) -> Vec<ErrorCode> {
    lower(source).diagnostics.iter().map(|d| d.code).collect()
}

fn first_suggestion(source: &str) -> Option<String> {
    lower(source)
        .diagnostics
        .first()
        .and_then(|d| d.suggestions.first().cloned())
}

fn component<'a>(lowered: &'a LoweredDocument, name: &str) -> &'a CompiledComponent {
    lowered
        .components
        .iter()
        .find(|c| c.name == name)
        .map(|c| &**c)
        .unwrap_or_else(|| panic!("no component {name}"))
}

fn property_ref(component: &CompiledComponent, element: usize, name: &str) -> PropertyRef {
    let property = component.elements[element]
        .property(name)
        .unwrap_or_else(|| panic!("no property {name}"));
    PropertyRef { element, property }
}

#[test]
fn test_element_table_is_preorder() {
    let lowered = lower("component A { Rectangle { Text {} } TouchArea {} }");
    assert!(lowered.diagnostics.is_empty());
    let a = component(&lowered, "A");
    let kinds: Vec<_> = a.elements.iter().map(|e| e.kind.type_name().to_string()).collect();
    assert_eq!(kinds, ["Empty", "Rectangle", "Text", "TouchArea"]);
    let parents: Vec<_> = a.elements.iter().map(|e| e.parent).collect();
    assert_eq!(parents, [None, Some(0), Some(1), Some(0)]);
    assert_eq!(a.root().children, [1, 3]);
}

#[test]
fn test_binding_resolves_to_root_property() {
    let lowered = lower("component A { in property <int> count: 5; Text { text: root.count; } }");
    assert!(lowered.diagnostics.is_empty(), "{:?}", lowered.diagnostics);
    let a = component(&lowered, "A");
    let count = property_ref(a, 0, "count");
    let text = property_ref(a, 1, "text");
    assert_eq!(
        a.elements[1].properties[text.property].binding,
        Some(Expression::Property(count).convert(Type::Int, Type::String))
    );
    assert_eq!(
        a.elements[0].properties[count.property].binding,
        Some(Expression::Literal(Literal::Number(5.0)))
    );
}

#[test]
fn test_unqualified_names_search_ancestors() {
    let lowered = lower(
        "component A { in property <string> label; Rectangle { Text { text: label; } } }",
    );
    assert!(lowered.diagnostics.is_empty(), "{:?}", lowered.diagnostics);
    let a = component(&lowered, "A");
    let text = property_ref(a, 2, "text");
    assert_eq!(
        a.elements[2].properties[text.property].binding,
        Some(Expression::Property(property_ref(a, 0, "label")))
    );
}

#[test]
fn test_underscore_and_dash_are_the_same_name() {
    let lowered = lower("component A { Text { font_size: 10px; } }");
    assert!(lowered.diagnostics.is_empty(), "{:?}", lowered.diagnostics);
    let a = component(&lowered, "A");
    let font_size = property_ref(a, 1, "font-size");
    assert!(a.elements[1].properties[font_size.property].binding.is_some());
}

#[test]
fn test_ids_and_relative_names() {
    let lowered = lower(
        "component A {
            label := Text { text: \"x\"; }
            Rectangle { width: parent.width; height: self.width; }
            Text { text: label.text; }
        }",
    );
    assert!(lowered.diagnostics.is_empty(), "{:?}", lowered.diagnostics);
    let a = component(&lowered, "A");
    let width = property_ref(a, 2, "width");
    assert_eq!(
        a.elements[2].properties[width.property].binding,
        Some(Expression::Property(property_ref(a, 0, "width")))
    );
    let height = property_ref(a, 2, "height");
    assert_eq!(
        a.elements[2].properties[height.property].binding,
        Some(Expression::Property(width))
    );
    let text = property_ref(a, 3, "text");
    assert_eq!(
        a.elements[3].properties[text.property].binding,
        Some(Expression::Property(property_ref(a, 1, "text")))
    );
}

#[test]
fn test_unknown_property_suggests_closest() {
    let source = "component A { Text { txt: \"a\"; } }";
    assert_eq!(codes(source), [ErrorCode::E2003]);
    assert_eq!(first_suggestion(source).as_deref(), Some("did you mean `text`?"));
}

#[test]
fn test_unknown_element_type() {
    let source = "component A { Rectangel {} }";
    assert_eq!(codes(source), [ErrorCode::E2002]);
    assert_eq!(
        first_suggestion(source).as_deref(),
        Some("did you mean `Rectangle`?")
    );
}

#[test]
fn test_unitless_number_for_length_hints_unit() {
    let source = "component A { Rectangle { width: 10; } }";
    assert_eq!(codes(source), [ErrorCode::E2001]);
    assert_eq!(
        first_suggestion(source).as_deref(),
        Some("add a unit, for example `px`")
    );
}

#[test]
fn test_output_property_cannot_be_bound() {
    assert_eq!(
        codes("component A { TouchArea { pressed: true; } }"),
        [ErrorCode::E2011]
    );
}

#[test]
fn test_input_property_is_read_only_inside() {
    assert_eq!(
        codes(
            "component A { in property <int> n; TouchArea { clicked => { root.n = 1; } } }"
        ),
        [ErrorCode::E2011]
    );
    assert!(codes(
        "component A { out property <int> n; TouchArea { clicked => { root.n = 1; } } }"
    )
    .is_empty());
}

#[test]
fn test_compound_assignment_lowering() {
    let lowered = lower(
        "component A { in-out property <int> n; TouchArea { clicked => { root.n += 1; } } }",
    );
    assert!(lowered.diagnostics.is_empty(), "{:?}", lowered.diagnostics);
    let a = component(&lowered, "A");
    let n = property_ref(a, 0, "n");
    let clicked = a.elements[1].callback("clicked").map(|c| &a.elements[1].callbacks[c]);
    let handler = clicked.and_then(|c| c.handler.as_ref());
    assert_eq!(
        handler.map(|h| h.body.clone()),
        Some(vec![Statement::Assign {
            target: n,
            value: Expression::Binary {
                op: BinaryOp::Add,
                lhs: Box::new(Expression::Property(n)),
                rhs: Box::new(Expression::Literal(Literal::Number(1.0))),
            },
        }])
    );
}

#[test]
fn test_callback_call_and_params() {
    let lowered = lower(
        "component A {
            callback submit(string);
            in-out property <string> last;
            submit(value) => { root.last = value; }
            TouchArea { clicked => { root.submit(\"hi\"); } }
        }",
    );
    assert!(lowered.diagnostics.is_empty(), "{:?}", lowered.diagnostics);
    let a = component(&lowered, "A");
    let submit = a.elements[0].callback("submit").map(|c| &a.elements[0].callbacks[c]);
    let handler = submit.and_then(|c| c.handler.as_ref());
    assert_eq!(
        handler.map(|h| h.body.clone()),
        Some(vec![Statement::Assign {
            target: property_ref(a, 0, "last"),
            value: Expression::Param(0),
        }])
    );

    let clicked = a.elements[1].callback("clicked").map(|c| &a.elements[1].callbacks[c]);
    let body = clicked.and_then(|c| c.handler.as_ref()).map(|h| h.body.clone());
    let submit_index = a.elements[0].callback("submit");
    assert_eq!(
        body,
        submit_index.map(|callback| vec![Statement::Expression(Expression::Call {
            callback: CallbackRef {
                element: 0,
                callback,
            },
            args: vec![Expression::Literal(Literal::String("hi".to_string()))],
        })])
    );
}

#[test]
fn test_argument_count_mismatches() {
    assert_eq!(
        codes("component A { callback go(int); TouchArea { clicked => { root.go(); } } }"),
        [ErrorCode::E2012]
    );
    assert_eq!(
        codes("component A { TouchArea { clicked(x) => { } } }"),
        [ErrorCode::E2012]
    );
}

#[test]
fn test_unknown_callback_handler() {
    assert_eq!(
        codes("component A { TouchArea { clickd => { } } }"),
        [ErrorCode::E2006]
    );
}

#[test]
fn test_duplicates() {
    assert_eq!(
        codes("component A { a := Text {} a := Text {} }"),
        [ErrorCode::E2005]
    );
    assert_eq!(
        codes("component A { Text { text: \"a\"; text: \"b\"; } }"),
        [ErrorCode::E2015]
    );
    assert_eq!(
        codes("component A { property <int> n; property <string> n; }"),
        [ErrorCode::E2004]
    );
    assert_eq!(
        codes("component A {} component A {}"),
        [ErrorCode::E2017]
    );
}

#[test]
fn test_unknown_property_type() {
    let source = "component A { property <strng> n; }";
    assert_eq!(codes(source), [ErrorCode::E2014]);
    assert_eq!(first_suggestion(source).as_deref(), Some("did you mean `string`?"));
}

#[test]
fn test_components_can_be_used_before_declaration() {
    let lowered = lower(
        "export component A { B { value: 3; } }
         component B { in property <int> value; private property <int> hidden; }",
    );
    assert!(lowered.diagnostics.is_empty(), "{:?}", lowered.diagnostics);
    let a = component(&lowered, "A");
    let b = component(&lowered, "B");
    let value = a.elements[1].property("value").map(|p| &a.elements[1].properties[p]);
    assert_eq!(
        value.map(|p| p.origin),
        b.root().property("value").map(|target| Origin::Inherited { target })
    );
    assert!(a.elements[1].property("hidden").is_none());
}

#[test]
fn test_private_properties_are_hidden_outside() {
    assert_eq!(
        codes("component B { private property <int> secret; } component A { B { secret: 1; } }"),
        [ErrorCode::E2003]
    );
}

#[test]
fn test_recursive_components_are_rejected() {
    let found = codes("component A { B {} } component B { A {} }");
    assert_eq!(found, [ErrorCode::E2013]);
    assert_eq!(
        codes("component A inherits A {}"),
        [ErrorCode::E2013]
    );
}

#[test]
fn test_operator_and_branch_type_errors() {
    assert_eq!(
        codes("component A { Text { text: true + 1; } }"),
        [ErrorCode::E2016]
    );
    assert_eq!(
        codes("component A { Rectangle { width: true ? 10px : \"x\"; } }"),
        [ErrorCode::E2001]
    );
    assert_eq!(
        codes("component A { Rectangle { visible: 1; } }"),
        [ErrorCode::E2001]
    );
}

#[test]
fn test_seconds_are_stored_as_milliseconds() {
    let lowered = lower("component A { property <duration> d: 1.5s; }");
    let a = component(&lowered, "A");
    let d = property_ref(a, 0, "d");
    assert_eq!(
        a.elements[0].properties[d.property].binding,
        Some(Expression::Literal(Literal::Number(1500.0)))
    );
}

#[test]
fn test_builtin_defaults_are_copied() {
    let lowered = lower("component A { Text {} }");
    let a = component(&lowered, "A");
    let weight = property_ref(a, 1, "font-weight");
    assert_eq!(
        a.elements[1].properties[weight.property].default,
        Literal::Number(400.0)
    );
}
