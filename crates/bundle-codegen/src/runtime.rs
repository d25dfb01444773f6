//! Model of the loader runtime that consumes framed bundles
//!
//! A framed bundle does not call into a live loader while it is generated.
//! It carries declarative `register(publicId, wrapper)` instructions, which
//! [`registrations`] reads back out of the tree, and a run-once wrapper whose
//! state is a two-state machine ([`WrapperState`]). [`LoaderRuntime`] follows
//! the same protocol a browser loader does, which keeps the contract testable
//! without executing any JavaScript.

use std::{cell::Cell, fmt, rc::Rc};

use log::trace;

use crate::{
    ast::{Expr, Program, Stmt, StmtKind},
    ast_builder::bundle_wrapper::REGISTER_METHOD,
    types::FxIndexMap,
};

/// One `register(publicId, wrapper)` instruction found in a framed program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub public_id: String,
    /// Name of the wrapper function handed to the loader
    pub wrapper: String,
}

/// Collect the registration instructions addressed to `loader_name`
pub fn registrations(program: &Program, loader_name: &str) -> Vec<Registration> {
    let mut found = Vec::new();
    for stmt in &program.body {
        collect_stmt(stmt, loader_name, &mut found);
    }
    found
}

fn collect_stmt(stmt: &Stmt, loader_name: &str, found: &mut Vec<Registration>) {
    match &stmt.kind {
        StmtKind::Expr(expr) | StmtKind::Return(Some(expr)) => {
            collect_expr(expr, loader_name, found);
        }
        StmtKind::Var {
            init: Some(init), ..
        } => collect_expr(init, loader_name, found),
        StmtKind::Function(function) => {
            for stmt in &function.body {
                collect_stmt(stmt, loader_name, found);
            }
        }
        StmtKind::If {
            consequent,
            alternate,
            ..
        } => {
            for stmt in consequent.iter().chain(alternate) {
                collect_stmt(stmt, loader_name, found);
            }
        }
        StmtKind::Block(body) => {
            for stmt in body {
                collect_stmt(stmt, loader_name, found);
            }
        }
        StmtKind::Var { init: None, .. } | StmtKind::Return(None) | StmtKind::Verbatim(_) => {}
    }
}

fn collect_expr(expr: &Expr, loader_name: &str, found: &mut Vec<Registration>) {
    match expr {
        Expr::Call { callee, args } => {
            if let Some(registration) = as_registration(callee, args, loader_name) {
                found.push(registration);
                return;
            }
            collect_expr(callee, loader_name, found);
            for arg in args {
                collect_expr(arg, loader_name, found);
            }
        }
        Expr::Function(function) => {
            for stmt in &function.body {
                collect_stmt(stmt, loader_name, found);
            }
        }
        Expr::Annotated { expr, .. } | Expr::Unary { arg: expr, .. } => {
            collect_expr(expr, loader_name, found);
        }
        _ => {}
    }
}

fn as_registration(callee: &Expr, args: &[Expr], loader_name: &str) -> Option<Registration> {
    let Expr::Member { object, property } = callee else {
        return None;
    };
    if property != REGISTER_METHOD || dotted_path(object)? != loader_name {
        return None;
    }
    match args {
        [Expr::Str(public_id), Expr::Ident(wrapper)] => Some(Registration {
            public_id: public_id.clone(),
            wrapper: wrapper.clone(),
        }),
        _ => None,
    }
}

fn dotted_path(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(name) => Some(name.clone()),
        Expr::Member { object, property } => Some(format!("{}.{property}", dotted_path(object)?)),
        _ => None,
    }
}

/// Execution state of a bundle wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapperState {
    #[default]
    Pending,
    Executed,
}

/// Run-once wrapper around a bundle body
pub struct BundleWrapper {
    state: Cell<WrapperState>,
    body: Box<dyn Fn()>,
}

impl fmt::Debug for BundleWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleWrapper")
            .field("state", &self.state.get())
            .finish_non_exhaustive()
    }
}

impl BundleWrapper {
    pub fn new(body: impl Fn() + 'static) -> Self {
        Self {
            state: Cell::new(WrapperState::Pending),
            body: Box::new(body),
        }
    }

    pub fn state(&self) -> WrapperState {
        self.state.get()
    }

    /// Run the body unless it already ran; returns whether it ran now
    pub fn invoke(&self) -> bool {
        if self.state.get() == WrapperState::Executed {
            return false;
        }
        // Flip before running so a re-entrant call from the body is a no-op
        self.state.set(WrapperState::Executed);
        (self.body)();
        true
    }
}

/// Loader that sequences registered bundle wrappers
#[derive(Debug, Default)]
pub struct LoaderRuntime {
    wrappers: FxIndexMap<String, Rc<BundleWrapper>>,
}

impl LoaderRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `wrapper` under `public_id`
    ///
    /// The first registration for an id wins; repeated registrations are
    /// ignored. Returns whether this call registered the wrapper.
    pub fn register(&mut self, public_id: &str, wrapper: Rc<BundleWrapper>) -> bool {
        if self.wrappers.contains_key(public_id) {
            trace!("Ignoring repeated registration of '{public_id}'");
            return false;
        }
        self.wrappers.insert(public_id.to_owned(), wrapper);
        true
    }

    pub fn is_registered(&self, public_id: &str) -> bool {
        self.wrappers.contains_key(public_id)
    }

    /// Run the wrapper registered for `public_id`
    ///
    /// Returns `None` for an unknown id, otherwise whether the wrapper body ran
    /// during this call.
    pub fn require(&self, public_id: &str) -> Option<bool> {
        self.wrappers.get(public_id).map(|wrapper| wrapper.invoke())
    }
}
