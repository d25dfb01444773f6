//! Shared type definitions for the bundle-codegen crate
//!
//! This module contains the small enums and collection aliases used across the
//! framer, the printer and the source map assembler.

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;

/// Insertion-ordered map using the fast Fx hasher
pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Insertion-ordered set using the fast Fx hasher
pub type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// Module format of an emitted bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Flat script sharing the page's global scope, sequenced by the runtime loader
    #[default]
    Global,

    /// Native ECMAScript module
    EsModule,

    /// Script-like CommonJS module
    CommonJs,
}

impl OutputFormat {
    /// Check if this is the flat global form that the framer wraps
    pub fn is_global(self) -> bool {
        matches!(self, Self::Global)
    }

    /// Source type the printed program must be parsed as
    pub fn source_type(self) -> SourceType {
        match self {
            Self::EsModule => SourceType::Module,
            Self::Global | Self::CommonJs => SourceType::Script,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::EsModule => write!(f, "esmodule"),
            Self::CommonJs => write!(f, "commonjs"),
        }
    }
}

/// Whether a program is parsed as a module or as a classic script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SourceType {
    #[default]
    Script,
    Module,
}

/// How a bundle gets executed once it is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExecutionRole {
    /// Runs immediately on load
    #[default]
    Entry,

    /// Loaded on demand and run by the loader once its dependencies are available
    Async,
}

impl ExecutionRole {
    pub fn is_entry(self) -> bool {
        matches!(self, Self::Entry)
    }
}

impl fmt::Display for ExecutionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry => write!(f, "entry"),
            Self::Async => write!(f, "async"),
        }
    }
}
