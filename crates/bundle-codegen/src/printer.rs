//! Printing framed programs to text
//!
//! The [`Printer`] trait is the seam towards the pretty-printer that turns a
//! tree into code plus raw positional mappings. [`JsPrinter`] is the
//! implementation used by default: it emits one raw mapping per statement
//! that carries an original location and always retains comments, since
//! annotations such as `/*@__PURE__*/` are read again by later minification.

use anyhow::Result;

use crate::{
    ast::{Comment, Expr, Function, Program, Stmt, StmtKind},
    source_map::{Position, RawMapping},
};

/// Options handed to a printer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptions {
    pub minify: bool,
    pub source_maps: bool,
    pub comments: bool,
}

/// Printed code and the raw mappings collected while printing it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrintOutput {
    pub code: String,
    /// Empty unless source maps were requested
    pub mappings: Vec<RawMapping>,
}

/// Turns a program into text
pub trait Printer: Send + Sync {
    fn print(&self, program: &Program, options: &PrintOptions) -> Result<PrintOutput>;
}

/// Reference printer for [`Program`] trees
#[derive(Debug, Clone, Copy, Default)]
pub struct JsPrinter;

impl Printer for JsPrinter {
    fn print(&self, program: &Program, options: &PrintOptions) -> Result<PrintOutput> {
        let mut emitter = Emitter::new(options);
        emitter.program(program);
        Ok(emitter.finish())
    }
}

const INDENT: &str = "  ";

struct Emitter<'a> {
    options: &'a PrintOptions,
    out: String,
    line: u32,
    column: u32,
    depth: usize,
    at_line_start: bool,
    mappings: Vec<RawMapping>,
}

impl<'a> Emitter<'a> {
    fn new(options: &'a PrintOptions) -> Self {
        Self {
            options,
            out: String::new(),
            line: 0,
            column: 0,
            depth: 0,
            at_line_start: true,
            mappings: Vec::new(),
        }
    }

    fn finish(self) -> PrintOutput {
        PrintOutput {
            code: self.out,
            mappings: self.mappings,
        }
    }

    fn indent_if_needed(&mut self) {
        if !self.at_line_start {
            return;
        }
        self.at_line_start = false;
        if self.options.minify {
            return;
        }
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.column += (INDENT.len() * self.depth) as u32;
    }

    fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.indent_if_needed();
        self.out.push_str(text);

        // Columns count UTF-16 code units, as source maps do
        match text.rfind('\n') {
            Some(last) => {
                self.line += text.matches('\n').count() as u32;
                self.column = text[last + 1..].encode_utf16().count() as u32;
            }
            None => self.column += text.encode_utf16().count() as u32,
        }
    }

    /// Optional space, dropped when minifying
    fn space(&mut self) {
        if !self.options.minify {
            self.write(" ");
        }
    }

    /// Line break, dropped when minifying
    fn newline(&mut self) {
        if !self.options.minify {
            self.hard_newline();
        }
    }

    fn hard_newline(&mut self) {
        self.out.push('\n');
        self.line += 1;
        self.column = 0;
        self.at_line_start = true;
    }

    fn add_mapping(&mut self, stmt: &Stmt) {
        if !self.options.source_maps {
            return;
        }
        let Some(loc) = &stmt.loc else {
            return;
        };
        self.indent_if_needed();
        self.mappings.push(RawMapping {
            generated: Position::new(self.line, self.column),
            original: Some(Position::new(loc.line, loc.column)),
            source: Some(loc.source.clone()),
            name: None,
        });
    }

    fn program(&mut self, program: &Program) {
        if let Some(interpreter) = &program.interpreter {
            self.write("#!");
            self.write(interpreter);
            self.hard_newline();
        }
        for stmt in &program.body {
            self.stmt(stmt);
            self.newline();
        }
    }

    fn comment(&mut self, comment: &Comment) {
        if !self.options.comments {
            return;
        }
        match comment {
            Comment::Line(text) => {
                self.write("//");
                self.write(text);
                // A line comment always needs its line break, even when minifying
                self.hard_newline();
            }
            Comment::Block(text) => {
                self.write("/*");
                self.write(text);
                self.write("*/");
            }
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        for comment in &stmt.leading_comments {
            self.comment(comment);
            if matches!(comment, Comment::Block(_)) {
                self.newline();
            }
        }
        self.add_mapping(stmt);

        match &stmt.kind {
            StmtKind::Expr(expr) => {
                if expr.is_function() {
                    self.write("(");
                    self.expr(expr);
                    self.write(")");
                } else {
                    self.expr(expr);
                }
                self.write(";");
            }
            StmtKind::Var { kind, name, init } => {
                self.write(kind.keyword());
                self.write(" ");
                self.write(name);
                if let Some(init) = init {
                    self.space();
                    self.write("=");
                    self.space();
                    self.expr(init);
                }
                self.write(";");
            }
            StmtKind::Function(function) => self.function(function),
            StmtKind::If {
                test,
                consequent,
                alternate,
            } => {
                self.write("if");
                self.space();
                self.write("(");
                self.expr(test);
                self.write(")");
                self.space();
                self.block(consequent);
                if !alternate.is_empty() {
                    self.space();
                    self.write("else");
                    self.space();
                    self.block(alternate);
                }
            }
            StmtKind::Return(value) => {
                self.write("return");
                if let Some(value) = value {
                    self.write(" ");
                    self.expr(value);
                }
                self.write(";");
            }
            StmtKind::Block(body) => self.block(body),
            StmtKind::Verbatim(code) => self.write(code),
        }
    }

    fn block(&mut self, body: &[Stmt]) {
        self.write("{");
        if body.is_empty() {
            self.write("}");
            return;
        }
        self.newline();
        self.depth += 1;
        for stmt in body {
            self.stmt(stmt);
            self.newline();
        }
        self.depth -= 1;
        self.write("}");
    }

    fn function(&mut self, function: &Function) {
        self.write("function");
        if let Some(name) = &function.name {
            self.write(" ");
            self.write(name);
        } else {
            self.space();
        }
        self.write("(");
        for (i, param) in function.params.iter().enumerate() {
            if i > 0 {
                self.write(",");
                self.space();
            }
            self.write(param);
        }
        self.write(")");
        self.space();
        self.block(&function.body);
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(name) => self.write(name),
            Expr::Str(value) => self.string_literal(value),
            Expr::Num(value) => self.number(*value),
            Expr::Bool(value) => self.write(if *value { "true" } else { "false" }),
            Expr::Null => self.write("null"),
            Expr::Array(items) => {
                self.write("[");
                self.list(items);
                self.write("]");
            }
            Expr::Member { object, property } => {
                self.callee(object);
                self.write(".");
                self.write(property);
            }
            Expr::Call { callee, args } => {
                self.callee(callee);
                self.write("(");
                self.list(args);
                self.write(")");
            }
            Expr::Assign { target, value } => {
                self.expr(target);
                self.space();
                self.write("=");
                self.space();
                self.expr(value);
            }
            Expr::Unary { op, arg } => {
                self.write(op.token());
                self.callee(arg);
            }
            Expr::Function(function) => self.function(function),
            Expr::Annotated { comment, expr } => {
                self.comment(comment);
                self.expr(expr);
            }
            Expr::Verbatim(code) => self.write(code),
        }
    }

    /// Expression in callee or operand position; wraps forms that would not parse bare
    fn callee(&mut self, expr: &Expr) {
        let needs_parens = expr.is_function()
            || matches!(expr, Expr::Assign { .. } | Expr::Unary { .. } | Expr::Num(_));
        if needs_parens {
            self.write("(");
            self.expr(expr);
            self.write(")");
        } else {
            self.expr(expr);
        }
    }

    fn list(&mut self, items: &[Expr]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(",");
                self.space();
            }
            self.expr(item);
        }
    }

    fn string_literal(&mut self, value: &str) {
        // JSON string syntax is a subset of JavaScript string syntax
        let quoted = serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""));
        self.write(&quoted);
    }

    fn number(&mut self, value: f64) {
        if value.is_nan() {
            self.write("NaN");
        } else if value.is_infinite() {
            self.write(if value > 0.0 { "Infinity" } else { "-Infinity" });
        } else {
            self.write(&value.to_string());
        }
    }
}

#[cfg(test)]
mod tests;
