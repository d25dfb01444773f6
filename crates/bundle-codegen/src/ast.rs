//! Syntax tree for a flattened bundle
//!
//! The concatenation stage hands over one [`Program`] per bundle. The tree only
//! models what framing and printing need: statements produced by the framer are
//! built from these nodes, while arbitrary already-lowered code can travel
//! through as [`StmtKind::Verbatim`].
//!
//! Nodes created by the framer carry no [`SourceLocation`]; nodes copied from
//! assets keep theirs so the printer can emit raw mappings for them.

use crate::types::SourceType;

/// A complete program for one bundle
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Whether the program is parsed as a module or a script
    pub source_type: SourceType,
    /// Interpreter directive without the leading `#!`
    pub interpreter: Option<String>,
    /// Top-level statements in execution order
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Self {
            body,
            ..Self::default()
        }
    }
}

/// Position in an original asset
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// Source path as known to the asset graph
    pub source: String,
    /// Zero-based line
    pub line: u32,
    /// Zero-based column
    pub column: u32,
}

impl SourceLocation {
    pub fn new(source: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            source: source.into(),
            line,
            column,
        }
    }
}

/// Comment attached to a statement or an expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comment {
    /// `// text`
    Line(String),
    /// `/* text */`, used for pass-through annotations such as `@__PURE__`
    Block(String),
}

/// A statement with its attached comments and origin
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub leading_comments: Vec<Comment>,
    pub loc: Option<SourceLocation>,
}

impl Stmt {
    /// Statement without an original location
    pub fn synthetic(kind: StmtKind) -> Self {
        Self {
            kind,
            leading_comments: Vec::new(),
            loc: None,
        }
    }

    /// Attach the original location of this statement
    #[must_use]
    pub fn with_loc(mut self, loc: SourceLocation) -> Self {
        self.loc = Some(loc);
        self
    }

    /// Attach a leading comment
    #[must_use]
    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.leading_comments.push(comment);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `expr;`
    Expr(Expr),
    /// `var name = init;`
    Var {
        kind: VarKind,
        name: String,
        init: Option<Expr>,
    },
    /// `function name(params) { body }`
    Function(Function),
    /// `if (test) { consequent } else { alternate }`
    If {
        test: Expr,
        consequent: Vec<Stmt>,
        alternate: Vec<Stmt>,
    },
    /// `return value;`
    Return(Option<Expr>),
    /// `{ body }`
    Block(Vec<Stmt>),
    /// Already-printed code emitted as is
    Verbatim(String),
}

/// Function declaration or expression
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Function {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Minus,
    Typeof,
    Void,
}

impl UnaryOp {
    pub fn token(self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Minus => "-",
            Self::Typeof => "typeof ",
            Self::Void => "void ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
    Array(Vec<Expr>),
    /// `object.property`
    Member {
        object: Box<Expr>,
        property: String,
    },
    /// `callee(args)`
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `target = value`
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        arg: Box<Expr>,
    },
    Function(Box<Function>),
    /// Expression preceded by an annotation comment, e.g. `/*@__PURE__*/ f()`
    Annotated {
        comment: Comment,
        expr: Box<Expr>,
    },
    /// Already-printed expression emitted as is
    Verbatim(String),
}

impl Expr {
    /// Check whether the expression is a function expression, looking through annotations
    pub fn is_function(&self) -> bool {
        match self {
            Self::Function(_) => true,
            Self::Annotated { expr, .. } => expr.is_function(),
            _ => false,
        }
    }
}
