//! Final code generation stage of a JavaScript bundler
//!
//! Takes the flattened program of one bundle, frames it for the way the bundle
//! gets executed, prints it and assembles the bundle's source map from the
//! maps of its assets.

pub mod ast;
pub mod ast_builder;
pub mod bundle;
pub mod code_generator;
pub mod config;
pub mod printer;
pub mod runtime;
pub mod source_map;
pub mod types;

pub use bundle::{Asset, AssetId, Bundle, BundleBuilder, BundleError, Environment, MapSource};
pub use code_generator::{BundleGenerator, FrameError, Framing, GeneratedBundle};
pub use config::CodegenConfig;
pub use printer::{JsPrinter, Printer};
pub use source_map::OutputMap;
