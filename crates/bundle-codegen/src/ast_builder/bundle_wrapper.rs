use crate::{
    ast::Stmt,
    ast_builder::{expressions, statements},
};

/// Name of the wrapper function handed to the loader
pub const WRAPPER_FUNCTION: &str = "$bundle$wrapper";

/// Closed-over execution state of the wrapper
pub const EXECUTED_FLAG: &str = "$bundle$executed";

/// Method on the loader object that accepts `(publicId, wrapper)`
pub const REGISTER_METHOD: &str = "register";

/// Creates the registering wrapper for a lazily executed bundle
///
/// ```js
/// (function () {
///   var $bundle$executed = false;
///   function $bundle$wrapper() {
///     if ($bundle$executed) { return; }
///     $bundle$executed = true;
///     (function () {
///       /* body */
///     })();
///   }
///   loader.register("id", $bundle$wrapper);
/// })();
/// ```
///
/// The flag lives in the IIFE scope, so it survives any number of invocations
/// of the wrapper and is invisible to the rest of the page. The body runs in
/// its own function scope: a body declaration named like the flag or the
/// wrapper is hoisted there and cannot shadow the guard.
pub fn create_register_wrapper(body: Vec<Stmt>, public_ids: &[String], loader: &str) -> Stmt {
    let wrapper_body = vec![
        // if ($bundle$executed) { return; }
        statements::if_stmt(
            expressions::ident(EXECUTED_FLAG),
            vec![statements::return_stmt(None)],
            vec![],
        ),
        // $bundle$executed = true;
        statements::simple_assign(EXECUTED_FLAG, expressions::bool_literal(true)),
        // (function () { body })();
        create_isolation_wrapper(body),
    ];

    let mut scope = Vec::with_capacity(public_ids.len() + 2);
    scope.push(statements::var(
        EXECUTED_FLAG,
        Some(expressions::bool_literal(false)),
    ));
    scope.push(statements::function_decl(
        WRAPPER_FUNCTION,
        &[],
        wrapper_body,
    ));

    // One registration per public id; the loader keeps the first one it sees
    let register = expressions::member(expressions::dotted_name(loader), REGISTER_METHOD);
    for public_id in public_ids {
        scope.push(statements::expr(expressions::call(
            register.clone(),
            vec![
                expressions::string_literal(public_id),
                expressions::ident(WRAPPER_FUNCTION),
            ],
        )));
    }

    statements::expr(expressions::iife(scope))
}

/// Creates a plain isolating wrapper: `(function () { body })();`
pub fn create_isolation_wrapper(body: Vec<Stmt>) -> Stmt {
    statements::expr(expressions::iife(body))
}

