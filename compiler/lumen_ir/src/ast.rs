//! Syntax tree of a component document.
//!
//! The parser produces one [`Document`] per file. Names are kept exactly as
//! written; normalization happens during lowering.

use std::fmt;

use crate::{Color, NumberUnit, PropertyVisibility, Span};

/// An identifier with its location.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Ident {
            name: name.into(),
            span,
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A parsed source file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub imports: Vec<Import>,
    pub components: Vec<ComponentDecl>,
}

/// `import { A, B as C } from "file.lumen";`
#[derive(Clone, Debug, PartialEq)]
pub struct Import {
    pub names: Vec<ImportedName>,
    pub path: String,
    pub path_span: Span,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportedName {
    pub name: Ident,
    pub alias: Option<Ident>,
}

impl ImportedName {
    /// The name the import is visible as in the importing document.
    pub fn local_name(&self) -> &Ident {
        self.alias.as_ref().unwrap_or(&self.name)
    }
}

/// `export component Name inherits Base { ... }`
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentDecl {
    pub name: Ident,
    pub exported: bool,
    pub base: Option<Ident>,
    pub body: ElementBody,
    pub span: Span,
}

/// A child element: `id := Type { ... }` or `Type { ... }`.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub id: Option<Ident>,
    pub type_name: Ident,
    pub body: ElementBody,
    pub span: Span,
}

/// The members between the braces of a component or element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementBody {
    pub properties: Vec<PropertyDecl>,
    pub callbacks: Vec<CallbackDecl>,
    pub bindings: Vec<Binding>,
    pub handlers: Vec<Handler>,
    pub children: Vec<Element>,
    pub span: Span,
}

/// `in property <int> count: 5;`
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyDecl {
    pub visibility: PropertyVisibility,
    pub ty: Ident,
    pub name: Ident,
    pub default: Option<Expr>,
    pub span: Span,
}

/// `callback clicked(int, string);`
#[derive(Clone, Debug, PartialEq)]
pub struct CallbackDecl {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub span: Span,
}

/// `text: "hello";`
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub name: Ident,
    pub expr: Expr,
    pub span: Span,
}

/// `clicked(x, y) => { ... }`
#[derive(Clone, Debug, PartialEq)]
pub struct Handler {
    pub callback: Ident,
    pub params: Vec<Ident>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// An expression evaluated for its effect: `root.clicked();`
    Expr(Expr),
    /// `target = value;`, `target += value;`, ...
    Assign {
        target: Expr,
        op: AssignOp,
        value: Expr,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
}

impl AssignOp {
    /// The binary operator a compound assignment applies.
    pub fn binary_op(self) -> Option<BinaryOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Add => Some(BinaryOp::Add),
            AssignOp::Sub => Some(BinaryOp::Sub),
            AssignOp::Mul => Some(BinaryOp::Mul),
            AssignOp::Div => Some(BinaryOp::Div),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Number {
        value: f64,
        unit: NumberUnit,
        integral: bool,
    },
    String(String),
    Bool(bool),
    Color(Color),
    Ident(Ident),
    Member {
        object: Box<Expr>,
        member: Ident,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    /// Placeholder produced during error recovery.
    Error,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    /// Binding power; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq | BinaryOp::NotEq => 3,
            BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => 4,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::Mul | BinaryOp::Div => 6,
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}
