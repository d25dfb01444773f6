//! Source map assembly for generated bundles
//!
//! This module merges the raw mappings produced while printing a bundle with
//! the original source contents recorded in each asset's own source map:
//! - `output_map`: the aggregate map container, safe to fill concurrently
//! - `map_loader`: fetching an asset's own map
//! - `assembler`: bounded fan-out over the bundle's assets

mod assembler;
mod map_loader;
mod output_map;

pub use assembler::{MAX_CONCURRENT_MAP_LOADS, SourceMapAssembler, decode_asset_map};
pub use map_loader::{AssetMapLoader, MapLoader};
pub use output_map::OutputMap;

/// Zero-based line and column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// One mapping emitted by the printer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMapping {
    pub generated: Position,
    pub original: Option<Position>,
    /// Path of the original source, as recorded on the tree
    pub source: Option<String>,
    /// Original symbol name
    pub name: Option<String>,
}

/// Sources of a decoded asset map with their contents, index-aligned
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetMapContents {
    pub sources: Vec<String>,
    pub contents: Vec<Option<String>>,
}

impl AssetMapContents {
    /// Pairs of source path and content worth attaching
    ///
    /// Empty content is skipped the same way as missing content.
    pub fn non_empty(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sources
            .iter()
            .zip(&self.contents)
            .filter_map(|(source, content)| match content.as_deref() {
                Some(content) if !content.is_empty() => Some((source.as_str(), content)),
                _ => None,
            })
    }
}
