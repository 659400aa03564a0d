//! Name resolution and type checking of binding and handler expressions.

use lumen_diagnostic::suggest::suggest_similar;
use lumen_diagnostic::{type_mismatch, unknown_identifier, Diagnostic, ErrorCode};
use lumen_ir::ast::{Expr, ExprKind, Ident, Stmt, StmtKind};
use lumen_ir::{normalize_identifier, NumberUnit, Span, Type};
use lumen_stack::ensure_sufficient_stack;

use super::{can_assign, ComponentBuilder, DocumentLowering};
use crate::expr::{
    binary_result, unary_result, unify_numbers, CallbackRef, Expression, Literal, PropertyRef,
    Statement,
};

/// Where an expression is evaluated: the element it belongs to and, inside
/// a handler, the handler's named arguments.
pub(super) struct Scope<'p> {
    element: usize,
    params: &'p [(String, Type)],
}

impl Scope<'static> {
    pub(super) fn new(element: usize) -> Self {
        Scope {
            element,
            params: &[],
        }
    }
}

impl<'p> Scope<'p> {
    pub(super) fn with_params(element: usize, params: &'p [(String, Type)]) -> Self {
        Scope { element, params }
    }
}

/// What a name or member path refers to.
enum Resolved {
    Value(Expression, Type),
    Element(usize),
    Callback(CallbackRef, Vec<Type>),
}

impl DocumentLowering<'_> {
    /// Lower `expr` and convert it to `expected`.
    pub(super) fn lower_typed(
        &mut self,
        builder: &ComponentBuilder<'_>,
        expr: &Expr,
        expected: Type,
        scope: &Scope<'_>,
        context: &str,
    ) -> Option<Expression> {
        let (lowered, ty) = self.lower_expr(builder, expr, scope)?;
        self.coerce(lowered, ty, expected, expr.span, context)
    }

    fn coerce(
        &mut self,
        expr: Expression,
        from: Type,
        to: Type,
        span: Span,
        context: &str,
    ) -> Option<Expression> {
        if from.can_convert_to(to) {
            return Some(expr.convert(from, to));
        }
        let mut diagnostic = type_mismatch(span, to.as_str(), from.as_str(), context);
        if from.is_unitless_number() {
            let unit = match to {
                Type::Length => Some("px"),
                Type::Duration => Some("ms"),
                Type::Percent => Some("%"),
                _ => None,
            };
            if let Some(unit) = unit {
                diagnostic =
                    diagnostic.with_suggestion(format!("add a unit, for example `{unit}`"));
            }
        }
        self.error(diagnostic);
        None
    }

    /// Lower an expression to its value and type.
    ///
    /// Returns `None` after reporting a diagnostic; sub-expressions are still
    /// checked so that independent errors are all reported.
    pub(super) fn lower_expr(
        &mut self,
        builder: &ComponentBuilder<'_>,
        expr: &Expr,
        scope: &Scope<'_>,
    ) -> Option<(Expression, Type)> {
        ensure_sufficient_stack(|| self.lower_expr_kind(builder, expr, scope))
    }

    fn lower_expr_kind(
        &mut self,
        builder: &ComponentBuilder<'_>,
        expr: &Expr,
        scope: &Scope<'_>,
    ) -> Option<(Expression, Type)> {
        match &expr.kind {
            ExprKind::Number {
                value,
                unit,
                integral,
            } => {
                let (value, ty) = match unit {
                    NumberUnit::None if *integral => (*value, Type::Int),
                    NumberUnit::None => (*value, Type::Float),
                    NumberUnit::Px => (*value, Type::Length),
                    NumberUnit::Ms => (*value, Type::Duration),
                    NumberUnit::S => (*value * 1000.0, Type::Duration),
                    NumberUnit::Percent => (*value, Type::Percent),
                };
                Some((Expression::Literal(Literal::Number(value)), ty))
            }
            ExprKind::String(value) => Some((
                Expression::Literal(Literal::String(value.clone())),
                Type::String,
            )),
            ExprKind::Bool(value) => Some((Expression::Literal(Literal::Bool(*value)), Type::Bool)),
            ExprKind::Color(value) => {
                Some((Expression::Literal(Literal::Color(*value)), Type::Color))
            }
            ExprKind::Ident(_) | ExprKind::Member { .. } => {
                let resolved = self.resolve_path(builder, expr, scope)?;
                self.into_value(resolved, expr)
            }
            ExprKind::Call { callee, args } => self.lower_call(builder, callee, args, scope),
            ExprKind::Unary { op, operand } => {
                let (operand, ty) = self.lower_expr(builder, operand, scope)?;
                match unary_result(*op, ty) {
                    Some(result) => Some((
                        Expression::Unary {
                            op: *op,
                            operand: Box::new(operand),
                        },
                        result,
                    )),
                    None => {
                        self.error(
                            Diagnostic::error(ErrorCode::E2016)
                                .with_message(format!("cannot apply `{}` to `{ty}`", op.as_str()))
                                .with_label(expr.span, "unsupported operand type"),
                        );
                        None
                    }
                }
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let lhs = self.lower_expr(builder, lhs, scope);
                let rhs = self.lower_expr(builder, rhs, scope);
                let ((lhs, lhs_ty), (rhs, rhs_ty)) = (lhs?, rhs?);
                match binary_result(*op, lhs_ty, rhs_ty) {
                    Some((result, lhs_target, rhs_target)) => Some((
                        Expression::Binary {
                            op: *op,
                            lhs: Box::new(lhs.convert(lhs_ty, lhs_target)),
                            rhs: Box::new(rhs.convert(rhs_ty, rhs_target)),
                        },
                        result,
                    )),
                    None => {
                        self.error(operator_error(op.as_str(), lhs_ty, rhs_ty, expr.span));
                        None
                    }
                }
            }
            ExprKind::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition =
                    self.lower_typed(builder, condition, Type::Bool, scope, "condition");
                let then_branch = self.lower_expr(builder, then_branch, scope);
                let else_lowered = self.lower_expr(builder, else_branch, scope);
                let (condition, (then_expr, then_ty), (else_expr, else_ty)) =
                    (condition?, then_branch?, else_lowered?);
                let Some(ty) = unify_numbers(then_ty, else_ty) else {
                    self.error(type_mismatch(
                        else_branch.span,
                        then_ty.as_str(),
                        else_ty.as_str(),
                        "both branches must have the same type",
                    ));
                    return None;
                };
                Some((
                    Expression::Conditional {
                        condition: Box::new(condition),
                        then_branch: Box::new(then_expr.convert(then_ty, ty)),
                        else_branch: Box::new(else_expr.convert(else_ty, ty)),
                    },
                    ty,
                ))
            }
            // Reported by the parser
            ExprKind::Error => None,
        }
    }

    fn into_value(&mut self, resolved: Resolved, expr: &Expr) -> Option<(Expression, Type)> {
        match resolved {
            Resolved::Value(value, ty) => Some((value, ty)),
            Resolved::Element(_) => {
                self.error(
                    Diagnostic::error(ErrorCode::E2003)
                        .with_message("an element cannot be used as a value")
                        .with_label(expr.span, "this names an element")
                        .with_suggestion("access one of its properties, for example `.width`"),
                );
                None
            }
            Resolved::Callback(..) => {
                self.error(
                    Diagnostic::error(ErrorCode::E2003)
                        .with_message("a callback cannot be used as a value")
                        .with_label(expr.span, "this names a callback")
                        .with_suggestion("call it with `()`"),
                );
                None
            }
        }
    }

    fn lower_call(
        &mut self,
        builder: &ComponentBuilder<'_>,
        callee: &Expr,
        args: &[Expr],
        scope: &Scope<'_>,
    ) -> Option<(Expression, Type)> {
        let resolved = self.resolve_path(builder, callee, scope)?;
        let Resolved::Callback(callback, params) = resolved else {
            self.error(
                Diagnostic::error(ErrorCode::E2006)
                    .with_message("only callbacks can be called")
                    .with_label(callee.span, "not a callback"),
            );
            return None;
        };
        if args.len() != params.len() {
            self.error(
                Diagnostic::error(ErrorCode::E2012)
                    .with_message(format!(
                        "callback takes {} arguments, but {} were given",
                        params.len(),
                        args.len()
                    ))
                    .with_label(callee.span, "wrong number of arguments"),
            );
            return None;
        }

        let mut lowered = Vec::with_capacity(args.len());
        let mut ok = true;
        for (arg, ty) in args.iter().zip(params) {
            match self.lower_typed(builder, arg, ty, scope, "callback argument") {
                Some(arg) => lowered.push(arg),
                None => ok = false,
            }
        }
        ok.then_some((
            Expression::Call {
                callback,
                args: lowered,
            },
            Type::Void,
        ))
    }

    fn resolve_path(
        &mut self,
        builder: &ComponentBuilder<'_>,
        expr: &Expr,
        scope: &Scope<'_>,
    ) -> Option<Resolved> {
        match &expr.kind {
            ExprKind::Ident(ident) => self.resolve_ident(builder, ident, scope),
            ExprKind::Member { object, member } => {
                let object = self.resolve_path(builder, object, scope)?;
                let Resolved::Element(element) = object else {
                    self.error(
                        Diagnostic::error(ErrorCode::E2003)
                            .with_message(format!("no member `{member}` on a non-element value"))
                            .with_label(member.span, "only elements have members"),
                    );
                    return None;
                };
                self.resolve_member(builder, element, member)
            }
            _ => {
                let (value, ty) = self.lower_expr(builder, expr, scope)?;
                Some(Resolved::Value(value, ty))
            }
        }
    }

    fn resolve_member(
        &mut self,
        builder: &ComponentBuilder<'_>,
        element: usize,
        member: &Ident,
    ) -> Option<Resolved> {
        let name = normalize_identifier(&member.name);
        if let Some(resolved) = lookup_member(builder, element, &name) {
            return Some(resolved);
        }

        let description = &builder.elements[element];
        let candidates = description
            .properties
            .iter()
            .map(|p| p.name.as_str())
            .chain(description.callbacks.iter().map(|c| c.name.as_str()));
        let suggestion = suggest_similar(&name, candidates);
        self.error(
            Diagnostic::error(ErrorCode::E2003)
                .with_message(format!(
                    "element {} has no property or callback `{name}`",
                    builder.describe(element)
                ))
                .with_label(member.span, "unknown member")
                .with_did_you_mean(suggestion),
        );
        None
    }

    /// Resolve a bare name.
    ///
    /// Lookup order: handler arguments, `root`/`self`/`parent`, element ids,
    /// then members of the current element and its ancestors.
    fn resolve_ident(
        &mut self,
        builder: &ComponentBuilder<'_>,
        ident: &Ident,
        scope: &Scope<'_>,
    ) -> Option<Resolved> {
        let name = normalize_identifier(&ident.name);

        if let Some(index) = scope.params.iter().position(|(param, _)| *param == name) {
            return Some(Resolved::Value(
                Expression::Param(index),
                scope.params[index].1,
            ));
        }

        match name.as_str() {
            "root" => return Some(Resolved::Element(0)),
            "self" => return Some(Resolved::Element(scope.element)),
            "parent" => {
                return match builder.elements[scope.element].parent {
                    Some(parent) => Some(Resolved::Element(parent)),
                    None => {
                        self.error(
                            Diagnostic::error(ErrorCode::E2003)
                                .with_message("the root element has no `parent`")
                                .with_label(ident.span, "used on the root element"),
                        );
                        None
                    }
                };
            }
            _ => {}
        }

        if let Some(&element) = builder.ids.get(&name) {
            return Some(Resolved::Element(element));
        }

        let mut current = Some(scope.element);
        while let Some(element) = current {
            if let Some(resolved) = lookup_member(builder, element, &name) {
                return Some(resolved);
            }
            current = builder.elements[element].parent;
        }

        let mut candidates: Vec<&str> = scope.params.iter().map(|(p, _)| p.as_str()).collect();
        candidates.extend(["root", "self"]);
        candidates.extend(builder.ids.keys().map(String::as_str));
        let mut current = Some(scope.element);
        while let Some(element) = current {
            let description = &builder.elements[element];
            candidates.extend(description.properties.iter().map(|p| p.name.as_str()));
            candidates.extend(description.callbacks.iter().map(|c| c.name.as_str()));
            current = description.parent;
        }
        let suggestion = suggest_similar(&name, candidates);
        self.error(unknown_identifier(ident.span, &ident.name).with_did_you_mean(suggestion));
        None
    }

    pub(super) fn lower_statement(
        &mut self,
        builder: &ComponentBuilder<'_>,
        stmt: &Stmt,
        scope: &Scope<'_>,
    ) -> Option<Statement> {
        match &stmt.kind {
            StmtKind::Expr(expr) => self
                .lower_expr(builder, expr, scope)
                .map(|(expr, _)| Statement::Expression(expr)),
            StmtKind::Assign { target, op, value } => {
                let resolved = self.resolve_path(builder, target, scope)?;
                let Resolved::Value(Expression::Property(target_ref), ty) = resolved else {
                    self.error(
                        Diagnostic::error(ErrorCode::E2011)
                            .with_message("only properties can be assigned")
                            .with_label(target.span, "not a property"),
                    );
                    return None;
                };

                let property =
                    &builder.elements[target_ref.element].properties[target_ref.property];
                if !can_assign(property) {
                    self.error(
                        Diagnostic::error(ErrorCode::E2011)
                            .with_message(format!("cannot assign to property `{}`", property.name))
                            .with_label(target.span, "not writable from here")
                            .with_note(super::visibility_note(property.visibility)),
                    );
                    return None;
                }

                let value = match op.binary_op() {
                    None => self.lower_typed(builder, value, ty, scope, "assigned value")?,
                    Some(bin) => {
                        let (rhs, rhs_ty) = self.lower_expr(builder, value, scope)?;
                        let Some((result, lhs_target, rhs_target)) = binary_result(bin, ty, rhs_ty)
                        else {
                            self.error(operator_error(bin.as_str(), ty, rhs_ty, stmt.span));
                            return None;
                        };
                        let combined = Expression::Binary {
                            op: bin,
                            lhs: Box::new(Expression::Property(target_ref).convert(ty, lhs_target)),
                            rhs: Box::new(rhs.convert(rhs_ty, rhs_target)),
                        };
                        self.coerce(combined, result, ty, stmt.span, "compound assignment")?
                    }
                };
                Some(Statement::Assign {
                    target: target_ref,
                    value,
                })
            }
        }
    }
}

fn lookup_member(builder: &ComponentBuilder<'_>, element: usize, name: &str) -> Option<Resolved> {
    let description = &builder.elements[element];
    if let Some(property) = description.property(name) {
        return Some(Resolved::Value(
            Expression::Property(PropertyRef { element, property }),
            description.properties[property].ty,
        ));
    }
    description.callback(name).map(|callback| {
        Resolved::Callback(
            CallbackRef { element, callback },
            description.callbacks[callback].params.clone(),
        )
    })
}

fn operator_error(op: &str, lhs: Type, rhs: Type, span: Span) -> Diagnostic {
    let diagnostic = Diagnostic::error(ErrorCode::E2016)
        .with_message(format!("cannot apply `{op}` to `{lhs}` and `{rhs}`"))
        .with_label(span, "unsupported operand types");
    let mixes_units = |a: Type, b: Type| {
        matches!(a, Type::Length | Type::Duration | Type::Percent) && b.is_unitless_number()
    };
    if matches!(op, "+" | "-") && (mixes_units(lhs, rhs) || mixes_units(rhs, lhs)) {
        diagnostic.with_suggestion("give both operands the same unit")
    } else {
        diagnostic
    }
}
