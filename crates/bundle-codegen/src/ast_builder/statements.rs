//! Statement AST node factory functions
//!
//! All statements are created through [`Stmt::synthetic`] to indicate that
//! they were generated rather than copied from an asset.

use crate::ast::{Expr, Function, Stmt, StmtKind, VarKind};

/// Creates an expression statement: `expr;`
pub fn expr(expr: Expr) -> Stmt {
    Stmt::synthetic(StmtKind::Expr(expr))
}

/// Creates a `var` declaration: `var name = init;`
///
/// # Example
/// ```rust
/// use bundle_codegen::ast_builder::{expressions, statements};
/// // Creates: `var ready = false;`
/// let stmt = statements::var("ready", Some(expressions::bool_literal(false)));
/// ```
pub fn var(name: &str, init: Option<Expr>) -> Stmt {
    Stmt::synthetic(StmtKind::Var {
        kind: VarKind::Var,
        name: name.to_owned(),
        init,
    })
}

/// Creates a simple assignment statement: `target = value;`
pub fn simple_assign(target: &str, value: Expr) -> Stmt {
    expr(super::expressions::assign(
        super::expressions::ident(target),
        value,
    ))
}

/// Creates a function declaration: `function name(params) { body }`
pub fn function_decl(name: &str, params: &[&str], body: Vec<Stmt>) -> Stmt {
    Stmt::synthetic(StmtKind::Function(Function {
        name: Some(name.to_owned()),
        params: params.iter().map(|p| (*p).to_owned()).collect(),
        body,
    }))
}

/// Creates an if statement: `if (test) { body } else { orelse }`
///
/// An empty `orelse` omits the else branch.
pub fn if_stmt(test: Expr, body: Vec<Stmt>, orelse: Vec<Stmt>) -> Stmt {
    Stmt::synthetic(StmtKind::If {
        test,
        consequent: body,
        alternate: orelse,
    })
}

/// Creates a return statement; `None` produces a bare `return;`
pub fn return_stmt(value: Option<Expr>) -> Stmt {
    Stmt::synthetic(StmtKind::Return(value))
}
