//! Bundle and asset model consumed by code generation
//!
//! A [`Bundle`] owns the graph of assets that were concatenated into it. The
//! graph is read-only during generation; it is only walked to find each
//! asset's own source map and looked up to resolve public ids.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::debug;
use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::{Dfs, VisitMap},
};
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};

use crate::types::{ExecutionRole, OutputFormat};

/// Internal identifier of an asset in the build graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Where an asset's own source map can be fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapSource {
    /// Map bytes already held in memory
    Inline(Arc<[u8]>),
    /// Map stored on disk next to the build cache
    File(PathBuf),
}

/// One original source file tracked by the build graph
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub id: AssetId,
    /// Identifier that survives minification and is used by the runtime loader
    pub public_id: String,
    pub file_path: PathBuf,
    /// Free-form metadata attached by transformers
    pub meta: Map<String, Value>,
    pub map: Option<MapSource>,
}

impl Asset {
    pub fn new(id: impl Into<String>, public_id: impl Into<String>) -> Self {
        Self {
            id: AssetId::new(id),
            public_id: public_id.into(),
            file_path: PathBuf::new(),
            meta: Map::new(),
            map: None,
        }
    }

    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = path.into();
        self
    }

    #[must_use]
    pub fn with_meta(mut self, key: &str, value: Value) -> Self {
        self.meta.insert(key.to_owned(), value);
        self
    }

    #[must_use]
    pub fn with_map(mut self, map: MapSource) -> Self {
        self.map = Some(map);
        self
    }

    /// Raw interpreter directive as declared by the asset, of any JSON type
    pub fn interpreter(&self) -> Option<&Value> {
        self.meta.get("interpreter")
    }
}

/// Runtime context a bundle targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnvironmentContext {
    #[default]
    Browser,
    WebWorker,
    ServiceWorker,
    ElectronRenderer,
    ElectronMain,
    Node,
}

/// Target environment capabilities of a bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Environment {
    pub context: EnvironmentContext,
    pub output_format: OutputFormat,
    pub minify: bool,
    pub source_maps: bool,
}

impl Environment {
    pub fn is_browser(&self) -> bool {
        matches!(
            self.context,
            EnvironmentContext::Browser
                | EnvironmentContext::WebWorker
                | EnvironmentContext::ServiceWorker
                | EnvironmentContext::ElectronRenderer
        )
    }
}

/// Errors raised while assembling a bundle description
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleError {
    /// Two assets share an internal id
    DuplicateAsset { id: AssetId },
    /// Two assets share a public id
    DuplicatePublicId { public_id: String },
    /// A dependency or the main entry names an asset that was never added
    UnknownAsset { id: AssetId },
}

impl fmt::Display for BundleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateAsset { id } => write!(f, "asset '{id}' was added twice"),
            Self::DuplicatePublicId { public_id } => {
                write!(f, "public id '{public_id}' is used by more than one asset")
            }
            Self::UnknownAsset { id } => write!(f, "asset '{id}' is not part of the bundle"),
        }
    }
}

impl std::error::Error for BundleError {}

/// One emitted output unit and the assets concatenated into it
#[derive(Debug, Clone)]
pub struct Bundle {
    pub name: String,
    pub role: ExecutionRole,
    pub env: Environment,
    main_entry: Option<NodeIndex>,
    graph: DiGraph<Asset, ()>,
    by_id: FxHashMap<AssetId, NodeIndex>,
}

impl Bundle {
    pub fn builder(name: impl Into<String>) -> BundleBuilder {
        BundleBuilder::new(name)
    }

    pub fn output_format(&self) -> OutputFormat {
        self.env.output_format
    }

    pub fn minify(&self) -> bool {
        self.env.minify
    }

    pub fn source_maps(&self) -> bool {
        self.env.source_maps
    }

    pub fn main_entry(&self) -> Option<&Asset> {
        self.main_entry.map(|node| &self.graph[node])
    }

    pub fn asset(&self, id: &AssetId) -> Option<&Asset> {
        self.by_id.get(id).map(|&node| &self.graph[node])
    }

    pub fn asset_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Every asset in the bundle, each exactly once
    ///
    /// Walks depth-first from the main entry, then restarts from any asset the
    /// walk has not reached yet so that disconnected assets are included too.
    pub fn traverse_assets(&self) -> Vec<&Asset> {
        let mut order = Vec::with_capacity(self.graph.node_count());
        let mut dfs = Dfs::empty(&self.graph);

        let starts = self.main_entry.into_iter().chain(self.graph.node_indices());
        for start in starts {
            if dfs.discovered.is_visited(&start) {
                continue;
            }
            dfs.move_to(start);
            while let Some(node) = dfs.next(&self.graph) {
                order.push(&self.graph[node]);
            }
        }

        order
    }
}

/// Builder for [`Bundle`]
#[derive(Debug)]
pub struct BundleBuilder {
    name: String,
    role: ExecutionRole,
    env: Environment,
    main_entry: Option<AssetId>,
    assets: Vec<Asset>,
    dependencies: Vec<(AssetId, AssetId)>,
}

impl BundleBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: ExecutionRole::Entry,
            env: Environment::default(),
            main_entry: None,
            assets: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    #[must_use]
    pub fn role(mut self, role: ExecutionRole) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn environment(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    #[must_use]
    pub fn main_entry(mut self, id: impl Into<AssetId>) -> Self {
        self.main_entry = Some(id.into());
        self
    }

    #[must_use]
    pub fn add_asset(mut self, asset: Asset) -> Self {
        self.assets.push(asset);
        self
    }

    /// Record that `from` imports `to`
    #[must_use]
    pub fn add_dependency(mut self, from: impl Into<AssetId>, to: impl Into<AssetId>) -> Self {
        self.dependencies.push((from.into(), to.into()));
        self
    }

    pub fn build(self) -> Result<Bundle, BundleError> {
        let mut graph = DiGraph::with_capacity(self.assets.len(), self.dependencies.len());
        let mut by_id = FxHashMap::default();
        let mut public_ids = FxHashMap::default();

        for asset in self.assets {
            if by_id.contains_key(&asset.id) {
                return Err(BundleError::DuplicateAsset { id: asset.id });
            }
            if public_ids.contains_key(&asset.public_id) {
                return Err(BundleError::DuplicatePublicId {
                    public_id: asset.public_id,
                });
            }
            let id = asset.id.clone();
            let public_id = asset.public_id.clone();
            let node = graph.add_node(asset);
            by_id.insert(id, node);
            public_ids.insert(public_id, node);
        }

        let lookup = |id: &AssetId| {
            by_id
                .get(id)
                .copied()
                .ok_or_else(|| BundleError::UnknownAsset { id: id.clone() })
        };

        for (from, to) in &self.dependencies {
            graph.add_edge(lookup(from)?, lookup(to)?, ());
        }

        let main_entry = self.main_entry.as_ref().map(lookup).transpose()?;

        debug!(
            "Built bundle '{}' ({}, {}) with {} assets",
            self.name,
            self.role,
            self.env.output_format,
            graph.node_count()
        );

        Ok(Bundle {
            name: self.name,
            role: self.role,
            env: self.env,
            main_entry,
            graph,
            by_id,
        })
    }
}

/// Path of `path` relative to `root` with `/` separators, if it lies inside `root`
pub(crate) fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests;
