//! Bundle framing
//!
//! Decides how the statements of a flattened bundle are wrapped before they
//! are printed:
//! - entry bundles run at load time and stay unwrapped
//! - lazily loaded bundles are wrapped in a self-invoking function that
//!   registers a run-once wrapper with the shared loader under every public id
//!   other bundles may request
//! - a lazily loaded bundle with nothing to register is still isolated in a
//!   plain self-invoking function so its bindings do not leak into the shared
//!   global scope
//!
//! Module-native formats (`esmodule`, `commonjs`) are never wrapped.

use std::fmt;

use log::debug;
use serde_json::Value;

use crate::{
    ast::Program,
    ast_builder::bundle_wrapper,
    bundle::{AssetId, Bundle},
    types::FxIndexSet,
};

/// Errors that abort framing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// The main entry declares an interpreter directive that is not a string
    InvalidInterpreter {
        asset: String,
        found: &'static str,
    },
    /// A referenced asset is not part of the bundle
    UnknownAsset { id: AssetId },
    /// The loader name is not a dotted JavaScript identifier path
    InvalidLoaderName { name: String },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInterpreter { asset, found } => {
                write!(
                    f,
                    "interpreter directive of asset '{asset}' must be a string, found {found}"
                )
            }
            Self::UnknownAsset { id } => {
                write!(f, "referenced asset '{id}' is not part of the bundle")
            }
            Self::InvalidLoaderName { name } => {
                write!(f, "'{name}' is not a valid loader name")
            }
        }
    }
}

impl std::error::Error for FrameError {}

/// How the statements of a bundle get wrapped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Framing {
    /// Statements are emitted as is
    Unwrapped,
    /// Run-once wrapper registered with the loader under each public id
    Register { public_ids: Vec<String> },
    /// Plain self-invoking function, no registration
    Isolated,
}

/// Decide the framing of a bundle without touching its tree
pub fn plan_framing(bundle: &Bundle, referenced: &[AssetId]) -> Result<Framing, FrameError> {
    if !bundle.output_format().is_global() || bundle.role.is_entry() {
        return Ok(Framing::Unwrapped);
    }

    let mut public_ids = FxIndexSet::default();
    if let Some(entry) = bundle.main_entry() {
        public_ids.insert(entry.public_id.clone());
    }
    for id in referenced {
        let asset = bundle
            .asset(id)
            .ok_or_else(|| FrameError::UnknownAsset { id: id.clone() })?;
        public_ids.insert(asset.public_id.clone());
    }

    if public_ids.is_empty() {
        return Ok(Framing::Isolated);
    }

    Ok(Framing::Register {
        public_ids: public_ids.into_iter().collect(),
    })
}

/// Frame a bundle's program for printing
///
/// Sets the source type from the output format, attaches the interpreter
/// directive where one applies and wraps the body according to
/// [`plan_framing`]. Fails without producing a tree if the interpreter
/// directive is malformed.
pub fn frame(
    bundle: &Bundle,
    mut program: Program,
    referenced: &[AssetId],
    loader_name: &str,
) -> Result<Program, FrameError> {
    validate_loader_name(loader_name)?;

    let interpreter = resolve_interpreter(bundle)?;
    let framing = plan_framing(bundle, referenced)?;

    debug!(
        "Framing bundle '{}' ({}, {}): {:?}",
        bundle.name,
        bundle.role,
        bundle.output_format(),
        framing
    );

    program.source_type = bundle.output_format().source_type();
    program.interpreter = interpreter;
    program.body = match framing {
        Framing::Unwrapped => program.body,
        Framing::Register { public_ids } => vec![bundle_wrapper::create_register_wrapper(
            program.body,
            &public_ids,
            loader_name,
        )],
        Framing::Isolated => vec![bundle_wrapper::create_isolation_wrapper(program.body)],
    };

    Ok(program)
}

/// Interpreter directive to emit, if any
///
/// Only non-browser entry bundles carry one, taken from the main entry. A
/// directive that is neither a string nor absent is an invariant violation.
pub fn resolve_interpreter(bundle: &Bundle) -> Result<Option<String>, FrameError> {
    if !bundle.role.is_entry() || bundle.env.is_browser() {
        return Ok(None);
    }
    let Some(entry) = bundle.main_entry() else {
        return Ok(None);
    };

    match entry.interpreter() {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(interpreter)) => Ok(Some(interpreter.clone())),
        Some(other) => Err(FrameError::InvalidInterpreter {
            asset: entry.public_id.clone(),
            found: json_type_name(other),
        }),
    }
}

/// Check that `name` is a dotted path of JavaScript identifiers
///
/// The first segment is a binding reference and must not be a reserved word.
/// Later segments are property names, where reserved words are allowed
/// (`globalThis.default`).
pub fn validate_loader_name(name: &str) -> Result<(), FrameError> {
    let mut segments = name.split('.');
    let head_valid = segments
        .next()
        .is_some_and(|head| is_identifier(head) && !is_reserved_word(head));
    if head_valid && segments.all(is_identifier) {
        Ok(())
    } else {
        Err(FrameError::InvalidLoaderName {
            name: name.to_owned(),
        })
    }
}

fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// ECMAScript reserved words, including those reserved only in strict mode
/// or module code
const RESERVED_WORDS: &[&str] = &[
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "implements",
    "import",
    "in",
    "instanceof",
    "interface",
    "let",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
