//! Expression AST node factory functions

use crate::ast::{Comment, Expr, Function, Stmt, UnaryOp};

/// Creates an identifier reference: `name`
pub fn ident(name: &str) -> Expr {
    Expr::Ident(name.to_owned())
}

/// Creates a string literal: `"value"`
pub fn string_literal(value: &str) -> Expr {
    Expr::Str(value.to_owned())
}

/// Creates a boolean literal: `true` / `false`
pub fn bool_literal(value: bool) -> Expr {
    Expr::Bool(value)
}

/// Creates a member access: `object.property`
pub fn member(object: Expr, property: &str) -> Expr {
    Expr::Member {
        object: Box::new(object),
        property: property.to_owned(),
    }
}

/// Creates a reference to a dotted path: `a.b.c`
///
/// # Example
/// ```rust
/// use bundle_codegen::ast_builder::expressions;
/// // Creates: `globalThis.loader`
/// let expr = expressions::dotted_name("globalThis.loader");
/// ```
pub fn dotted_name(path: &str) -> Expr {
    let mut parts = path.split('.');
    let head = ident(parts.next().unwrap_or_default());
    parts.fold(head, member)
}

/// Creates a call expression: `callee(args...)`
pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call {
        callee: Box::new(callee),
        args,
    }
}

/// Creates an assignment expression: `target = value`
pub fn assign(target: Expr, value: Expr) -> Expr {
    Expr::Assign {
        target: Box::new(target),
        value: Box::new(value),
    }
}

/// Creates a unary expression, e.g. `!arg`
pub fn unary(op: UnaryOp, arg: Expr) -> Expr {
    Expr::Unary {
        op,
        arg: Box::new(arg),
    }
}

/// Creates an anonymous function expression: `function () { body }`
pub fn function(params: &[&str], body: Vec<Stmt>) -> Expr {
    Expr::Function(Box::new(Function {
        name: None,
        params: params.iter().map(|p| (*p).to_owned()).collect(),
        body,
    }))
}

/// Creates an immediately invoked function expression: `(function () { body })()`
pub fn iife(body: Vec<Stmt>) -> Expr {
    call(function(&[], body), vec![])
}

/// Prefixes an expression with an annotation comment: `/*@__PURE__*/ expr`
pub fn annotated(comment: &str, expr: Expr) -> Expr {
    Expr::Annotated {
        comment: Comment::Block(comment.to_owned()),
        expr: Box::new(expr),
    }
}
