use crate::parse_source;
use lumen_diagnostic::ErrorCode;
use lumen_ir::ast::{AssignOp, BinaryOp, Expr, ExprKind, StmtKind, UnaryOp};
use pretty_assertions::assert_eq;

fn binding_expr(expr: &str) -> Expr {
    let source = format!("component A {{ value: {expr}; }}");
    let output = parse_source(&source);
    assert!(!output.has_errors(), "{:?}", output.diagnostics);
    output.document.components[0].body.bindings[0].expr.clone()
}

/// Render the tree with explicit parentheses.
fn render(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Number { value, unit, .. } => format!("{value}{}", unit.as_str()),
        ExprKind::String(s) => format!("{s:?}"),
        ExprKind::Bool(b) => b.to_string(),
        ExprKind::Color(c) => c.to_string(),
        ExprKind::Ident(i) => i.name.clone(),
        ExprKind::Member { object, member } => format!("{}.{}", render(object), member.name),
        ExprKind::Call { callee, args } => {
            let args: Vec<_> = args.iter().map(render).collect();
            format!("{}({})", render(callee), args.join(", "))
        }
        ExprKind::Unary { op, operand } => format!("({}{})", op.as_str(), render(operand)),
        ExprKind::Binary { op, lhs, rhs } => {
            format!("({} {} {})", render(lhs), op.as_str(), render(rhs))
        }
        ExprKind::Conditional {
            condition,
            then_branch,
            else_branch,
        } => format!(
            "({} ? {} : {})",
            render(condition),
            render(then_branch),
            render(else_branch)
        ),
        ExprKind::Error => "<error>".to_string(),
    }
}

#[test]
fn test_precedence() {
    assert_eq!(render(&binding_expr("1 + 2 * 3")), "(1 + (2 * 3))");
    assert_eq!(render(&binding_expr("1 - 2 - 3")), "((1 - 2) - 3)");
    assert_eq!(
        render(&binding_expr("a < b && c == d || !e")),
        "(((a < b) && (c == d)) || (!e))"
    );
}

#[test]
fn test_parentheses() {
    assert_eq!(render(&binding_expr("(1 + 2) * 3")), "((1 + 2) * 3)");
}

#[test]
fn test_conditional_is_right_associative() {
    assert_eq!(
        render(&binding_expr("a ? 1 : b ? 2 : 3")),
        "(a ? 1 : (b ? 2 : 3))"
    );
}

#[test]
fn test_member_and_call_chain() {
    assert_eq!(
        render(&binding_expr("root.item.text")),
        "root.item.text"
    );
    assert_eq!(render(&binding_expr("f(1, x + 1)")), "f(1, (x + 1))");
}

#[test]
fn test_literals() {
    assert_eq!(render(&binding_expr("true")), "true");
    assert_eq!(render(&binding_expr("\"hi\"")), "\"hi\"");
    assert_eq!(render(&binding_expr("#102030")), "#102030ff");
    assert_eq!(render(&binding_expr("-1.5s")), "(-1.5s)");
    assert!(matches!(
        binding_expr("2").kind,
        ExprKind::Number { integral: true, .. }
    ));
    assert!(matches!(
        binding_expr("2.0").kind,
        ExprKind::Number { integral: false, .. }
    ));
}

#[test]
fn test_statements() {
    let output = parse_source(
        "component A {
            clicked => {
                count += 1;
                label.text = \"done\";
                root.finished()
            }
        }",
    );
    assert!(!output.has_errors(), "{:?}", output.diagnostics);
    let stmts = &output.document.components[0].body.handlers[0].body;
    assert_eq!(stmts.len(), 3);
    assert!(matches!(
        stmts[0].kind,
        StmtKind::Assign {
            op: AssignOp::Add,
            ..
        }
    ));
    assert!(matches!(
        stmts[1].kind,
        StmtKind::Assign {
            op: AssignOp::Assign,
            ..
        }
    ));
    assert!(matches!(stmts[2].kind, StmtKind::Expr(_)));
}

#[test]
fn test_invalid_assignment_target() {
    let output = parse_source("component A { clicked => { 1 + 2 = 3; count = 1; } }");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].code, ErrorCode::E1006);
    assert_eq!(output.document.components[0].body.handlers[0].body.len(), 1);
}

#[test]
fn test_missing_expression() {
    let output = parse_source("component A { width: ; }");
    assert_eq!(output.diagnostics[0].code, ErrorCode::E1002);
}

#[test]
fn test_lexer_error_token_is_not_reported_twice() {
    let output = parse_source("component A { width: 10em; }");
    let codes: Vec<_> = output.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E0003]);
}

#[test]
fn test_binary_ops_and_unary() {
    let expr = binding_expr("!done");
    assert!(matches!(
        expr.kind,
        ExprKind::Unary {
            op: UnaryOp::Not,
            ..
        }
    ));
    let expr = binding_expr("a >= b");
    assert!(matches!(
        expr.kind,
        ExprKind::Binary {
            op: BinaryOp::GtEq,
            ..
        }
    ));
}
