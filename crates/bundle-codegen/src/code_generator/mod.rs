//! Code generation for flattened bundles
//!
//! This module implements the final assembly of a bundle:
//! - Frames the bundle's statements for the way it gets executed
//! - Prints the framed program with comments retained
//! - Assembles the aggregate source map when source maps are enabled

pub mod framer;
pub mod generator;

pub use framer::{FrameError, Framing, frame, plan_framing};
pub use generator::{BundleGenerator, GeneratedBundle};
