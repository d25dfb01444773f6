use pretty_assertions::assert_eq;

use super::*;
use crate::{
    ast::{SourceLocation, UnaryOp},
    ast_builder::{bundle_wrapper, expressions, statements},
};

fn options(minify: bool, source_maps: bool) -> PrintOptions {
    PrintOptions {
        minify,
        source_maps,
        comments: true,
    }
}

fn print(program: &Program, options: &PrintOptions) -> PrintOutput {
    JsPrinter.print(program, options).unwrap()
}

fn call_stmt(name: &str) -> Stmt {
    statements::expr(expressions::call(expressions::ident(name), vec![]))
}

fn verbatim(code: &str, source: &str, line: u32, column: u32) -> Stmt {
    Stmt::synthetic(StmtKind::Verbatim(code.to_owned()))
        .with_loc(SourceLocation::new(source, line, column))
}

fn register_program() -> Program {
    Program::new(vec![bundle_wrapper::create_register_wrapper(
        vec![call_stmt("init")],
        &["a".to_owned()],
        "parcelRequire",
    )])
}

#[test]
fn test_prints_register_wrapper() {
    let output = print(&register_program(), &options(false, false));

    insta::assert_snapshot!(output.code.trim_end(), @r#"
    (function () {
      var $bundle$executed = false;
      function $bundle$wrapper() {
        if ($bundle$executed) {
          return;
        }
        $bundle$executed = true;
        (function () {
          init();
        })();
      }
      parcelRequire.register("a", $bundle$wrapper);
    })();
    "#);
    assert!(output.code.ends_with(";\n"));
    assert!(output.mappings.is_empty());
}

#[test]
fn test_prints_minified_register_wrapper() {
    let output = print(&register_program(), &options(true, false));
    assert_eq!(
        output.code,
        "(function(){var $bundle$executed=false;function $bundle$wrapper(){if($bundle$executed){return;}$bundle$executed=true;(function(){init();})();}parcelRequire.register(\"a\",$bundle$wrapper);})();"
    );
}

#[test]
fn test_body_flag_declaration_stays_in_nested_scope() {
    let program = Program::new(vec![bundle_wrapper::create_register_wrapper(
        vec![statements::var(
            bundle_wrapper::EXECUTED_FLAG,
            Some(Expr::Num(0.0)),
        )],
        &["a".to_owned()],
        "parcelRequire",
    )]);

    let code = print(&program, &options(false, false)).code;
    assert!(code.contains("\n  var $bundle$executed = false;\n"), "{code}");
    assert!(
        code.contains("\n    (function () {\n      var $bundle$executed = 0;\n    })();\n"),
        "{code}"
    );
}

#[test]
fn test_prints_interpreter_first() {
    let mut program = Program::new(vec![call_stmt("main")]);
    program.interpreter = Some("/usr/bin/env node".to_owned());

    assert_eq!(
        print(&program, &options(false, false)).code,
        "#!/usr/bin/env node\nmain();\n"
    );
    // The directive keeps its own line even when minifying
    assert_eq!(
        print(&program, &options(true, false)).code,
        "#!/usr/bin/env node\nmain();"
    );
}

#[test]
fn test_retains_comments() {
    let program = Program::new(vec![
        call_stmt("setup").with_comment(Comment::Block("! license".to_owned())),
        call_stmt("run").with_comment(Comment::Line(" start".to_owned())),
        statements::var(
            "value",
            Some(expressions::annotated(
                "@__PURE__",
                expressions::call(expressions::ident("make"), vec![]),
            )),
        ),
    ]);

    assert_eq!(
        print(&program, &options(false, false)).code,
        "/*! license*/\nsetup();\n// start\nrun();\nvar value = /*@__PURE__*/make();\n"
    );
    // Line comments force a line break, block comments stay inline
    assert_eq!(
        print(&program, &options(true, false)).code,
        "/*! license*/setup();// start\nrun();var value=/*@__PURE__*/make();"
    );
}

#[test]
fn test_drops_comments_when_disabled() {
    let program = Program::new(vec![
        call_stmt("run").with_comment(Comment::Line(" start".to_owned())),
    ]);
    let options = PrintOptions {
        minify: false,
        source_maps: false,
        comments: false,
    };
    assert_eq!(print(&program, &options).code, "run();\n");
}

#[test]
fn test_mappings_follow_indentation() {
    let program = Program::new(vec![
        verbatim("let a = 1;", "src/a.js", 0, 0),
        bundle_wrapper::create_isolation_wrapper(vec![verbatim("let b = 2;", "src/b.js", 4, 2)]),
    ]);

    let output = print(&program, &options(false, true));
    assert_eq!(output.code, "let a = 1;\n(function () {\n  let b = 2;\n})();\n");
    assert_eq!(
        output.mappings,
        vec![
            RawMapping {
                generated: Position::new(0, 0),
                original: Some(Position::new(0, 0)),
                source: Some("src/a.js".to_owned()),
                name: None,
            },
            RawMapping {
                generated: Position::new(2, 2),
                original: Some(Position::new(4, 2)),
                source: Some("src/b.js".to_owned()),
                name: None,
            },
        ]
    );

    let minified = print(&program, &options(true, true));
    assert_eq!(minified.code, "let a = 1;(function(){let b = 2;})();");
    let generated: Vec<_> = minified.mappings.iter().map(|m| m.generated).collect();
    assert_eq!(generated, vec![Position::new(0, 0), Position::new(0, 22)]);
}

#[test]
fn test_mapping_columns_count_utf16_units() {
    let program = Program::new(vec![
        verbatim("let s = \"😀\";", "src/a.js", 0, 0),
        verbatim("s;", "src/a.js", 1, 0),
    ]);
    let output = print(&program, &options(true, true));
    assert_eq!(output.mappings[1].generated, Position::new(0, 13));
}

#[test]
fn test_no_mappings_without_source_maps() {
    let program = Program::new(vec![verbatim("let a = 1;", "src/a.js", 0, 0)]);
    assert!(print(&program, &options(false, false)).mappings.is_empty());
}

#[test]
fn test_expressions() {
    let program = Program::new(vec![
        statements::expr(expressions::string_literal("a\"b\n")),
        statements::expr(expressions::unary(
            UnaryOp::Not,
            expressions::call(expressions::ident("f"), vec![]),
        )),
        statements::expr(expressions::unary(UnaryOp::Minus, Expr::Num(1.5))),
        statements::expr(expressions::call(
            expressions::dotted_name("console.log"),
            vec![Expr::Null, Expr::Array(vec![Expr::Bool(true), Expr::Num(f64::NAN)])],
        )),
        statements::expr(expressions::function(&["x"], vec![statements::return_stmt(
            Some(expressions::ident("x")),
        )])),
        statements::if_stmt(
            expressions::ident("ok"),
            vec![call_stmt("yes")],
            vec![call_stmt("no")],
        ),
    ]);

    assert_eq!(
        print(&program, &options(false, false)).code,
        concat!(
            "\"a\\\"b\\n\";\n",
            "!f();\n",
            "-(1.5);\n",
            "console.log(null, [true, NaN]);\n",
            "(function (x) {\n  return x;\n});\n",
            "if (ok) {\n  yes();\n} else {\n  no();\n}\n",
        )
    );
}
