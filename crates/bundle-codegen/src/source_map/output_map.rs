use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dashmap::DashMap;
use sourcemap::{SourceMap, SourceMapBuilder};

use super::{Position, RawMapping};
use crate::{bundle::relative_slash_path, types::FxIndexSet};

/// Mapping with its source and name interned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IndexedMapping {
    generated: Position,
    original: Option<(Position, u32)>,
    name: Option<u32>,
}

/// Aggregate source map for one generated bundle
///
/// Mappings are inserted up front through `&mut self`; source contents can be
/// attached afterwards through `&self` from any number of concurrent tasks.
/// Attaching content for a source twice keeps the last value, so repeated
/// attachment is harmless.
#[derive(Debug)]
pub struct OutputMap {
    project_root: PathBuf,
    mappings: Vec<IndexedMapping>,
    sources: FxIndexSet<String>,
    names: FxIndexSet<String>,
    contents: DashMap<String, String>,
}

impl OutputMap {
    /// Create an empty map whose source paths are made relative to `project_root`
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            mappings: Vec::new(),
            sources: FxIndexSet::default(),
            names: FxIndexSet::default(),
            contents: DashMap::new(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Insert raw mappings as produced by the printer
    ///
    /// Every mapping is kept; their order does not matter because mappings are
    /// addressed by generated position when the map is serialized.
    pub fn add_indexed_mappings(&mut self, mappings: impl IntoIterator<Item = RawMapping>) {
        for mapping in mappings {
            let original = match (mapping.original, mapping.source) {
                (Some(position), Some(source)) => {
                    let resolved = self.resolve_source(&source);
                    let (index, _) = self.sources.insert_full(resolved);
                    Some((position, index as u32))
                }
                _ => None,
            };
            let name = mapping
                .name
                .map(|name| self.names.insert_full(name).0 as u32);

            self.mappings.push(IndexedMapping {
                generated: mapping.generated,
                original,
                name,
            });
        }
    }

    /// Attach the original content of `source`
    pub fn set_source_content(&self, source: &str, content: &str) {
        self.contents
            .insert(self.resolve_source(source), content.to_owned());
    }

    pub fn source_content(&self, source: &str) -> Option<String> {
        self.contents
            .get(&self.resolve_source(source))
            .map(|content| content.value().clone())
    }

    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }

    /// All sources: those referenced by mappings in first-seen order, then
    /// content-only sources in lexical order
    pub fn sources(&self) -> Vec<String> {
        let mut content_only: Vec<String> = self
            .contents
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|source| !self.sources.contains(source))
            .collect();
        content_only.sort_unstable();

        self.sources.iter().cloned().chain(content_only).collect()
    }

    /// Normalize a source path
    ///
    /// `.` segments are dropped and `..` segments folded, so `./src/a.js` and
    /// `src/lib/../a.js` both key as `src/a.js`. Absolute paths inside the
    /// project root become project-relative. Separators are always `/`. URLs
    /// such as `webpack:///src/a.js` are kept as they are.
    pub fn resolve_source(&self, source: &str) -> String {
        if source.contains("://") {
            return source.to_owned();
        }
        let normalized = normalize_segments(&source.replace('\\', "/"));
        let path = Path::new(&normalized);
        if path.is_absolute() {
            if let Some(relative) = relative_slash_path(&self.project_root, path) {
                return relative;
            }
        }
        normalized
    }

    /// Build the serializable source map
    pub fn to_source_map(&self) -> SourceMap {
        let mut builder = SourceMapBuilder::new(None);

        // Mapping sources come first so their interned indices stay valid
        for source in self.sources() {
            let id = builder.add_source(&source);
            let content = self.contents.get(&source);
            builder.set_source_contents(id, content.as_ref().map(|c| c.value().as_str()));
        }
        for name in &self.names {
            builder.add_name(name);
        }

        let mut ordered = self.mappings.clone();
        ordered.sort_by_key(|mapping| mapping.generated);
        for mapping in ordered {
            match mapping.original {
                Some((original, source)) => builder.add_raw(
                    mapping.generated.line,
                    mapping.generated.column,
                    original.line,
                    original.column,
                    Some(source),
                    mapping.name,
                    false,
                ),
                None => builder.add_raw(
                    mapping.generated.line,
                    mapping.generated.column,
                    0,
                    0,
                    None,
                    None,
                    false,
                ),
            };
        }

        builder.into_sourcemap()
    }

    /// Serialize to source map JSON
    pub fn to_json(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.to_source_map()
            .to_writer(&mut buffer)
            .context("failed to serialize source map")?;
        String::from_utf8(buffer).context("serialized source map is not valid UTF-8")
    }
}

/// Lexically drop `.` and fold `..` segments of a `/`-separated path
///
/// Leading `..` segments of a relative path are kept; on an absolute path they
/// stop at the root.
fn normalize_segments(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            _ => parts.push(part),
        }
    }

    let joined = parts.join("/");
    if absolute { format!("/{joined}") } else { joined }
}
