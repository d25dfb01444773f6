//! AST builder module for creating synthetic AST nodes
//!
//! This module provides factory functions for creating AST nodes that don't
//! originate from source files. All synthetic nodes carry no source location,
//! which keeps them out of the raw mappings the printer emits.

pub mod bundle_wrapper;
pub mod expressions;
pub mod statements;
