use std::path::Path;

use anyhow::{Context, Result};
use futures::{TryStreamExt, stream};
use log::{debug, trace};
use sourcemap::{DecodedMap, SourceMap};

use super::{AssetMapContents, MapLoader, OutputMap, RawMapping};
use crate::bundle::{Asset, Bundle};

/// Upper bound on asset maps being fetched at the same time
pub const MAX_CONCURRENT_MAP_LOADS: usize = 50;

/// Builds the aggregate source map of a bundle
#[derive(Clone, Copy)]
pub struct SourceMapAssembler<'a> {
    loader: &'a dyn MapLoader,
    max_concurrent: usize,
}

impl std::fmt::Debug for SourceMapAssembler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceMapAssembler")
            .field("max_concurrent", &self.max_concurrent)
            .finish_non_exhaustive()
    }
}

impl<'a> SourceMapAssembler<'a> {
    pub fn new(loader: &'a dyn MapLoader) -> Self {
        Self {
            loader,
            max_concurrent: MAX_CONCURRENT_MAP_LOADS,
        }
    }

    /// Override the fetch ceiling; values below one are raised to one
    #[must_use]
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Assemble the output map of `bundle`
    ///
    /// Returns `Ok(None)` without looking at a single asset when the bundle has
    /// source maps disabled. Otherwise every asset of the bundle is visited,
    /// with at most `max_concurrent` map fetches in flight, and the call only
    /// returns once all of them completed. Any fetch or decode failure fails
    /// the whole assembly.
    pub async fn assemble(
        &self,
        raw_mappings: Vec<RawMapping>,
        project_root: &Path,
        bundle: &Bundle,
    ) -> Result<Option<OutputMap>> {
        if !bundle.source_maps() {
            return Ok(None);
        }

        let mut map = OutputMap::new(project_root);
        map.add_indexed_mappings(raw_mappings);

        let assets = bundle.traverse_assets();
        let asset_count = assets.len();
        let output = &map;
        stream::iter(assets.into_iter().map(Ok::<_, anyhow::Error>))
            .try_for_each_concurrent(Some(self.max_concurrent), |asset| {
                self.attach_asset_map(output, asset)
            })
            .await?;

        debug!(
            "Assembled source map for bundle '{}': {} mappings, {} sources from {} assets",
            bundle.name,
            map.mapping_count(),
            map.sources().len(),
            asset_count
        );

        Ok(Some(map))
    }

    async fn attach_asset_map(&self, map: &OutputMap, asset: &Asset) -> Result<()> {
        let loaded = self.loader.load_map(asset).await?;

        // An empty map is treated like a missing one
        let Some(bytes) = loaded.filter(|bytes| !bytes.is_empty()) else {
            trace!("Asset '{}' has no source map", asset.public_id);
            return Ok(());
        };

        let contents = decode_asset_map(&bytes).with_context(|| {
            format!(
                "failed to decode source map of asset '{}'",
                asset.public_id
            )
        })?;

        // A source recorded without a name belongs to the asset's own file
        let own_file = asset.file_path.to_string_lossy();
        for (source, content) in contents.non_empty() {
            let source = if source.is_empty() { own_file.as_ref() } else { source };
            if source.is_empty() {
                trace!(
                    "Dropping unnamed source content of asset '{}'",
                    asset.public_id
                );
                continue;
            }
            map.set_source_content(source, content);
        }
        Ok(())
    }
}

/// Decode an asset's map into its index-aligned sources and contents
///
/// Regular, indexed and Hermes maps are accepted; indexed maps are flattened
/// and Hermes maps are read through their underlying regular map.
pub fn decode_asset_map(bytes: &[u8]) -> Result<AssetMapContents> {
    let contents = match sourcemap::decode_slice(bytes)? {
        DecodedMap::Regular(map) => read_contents(&map),
        DecodedMap::Index(index) => read_contents(&index.flatten()?),
        DecodedMap::Hermes(hermes) => read_contents(&hermes),
    };
    Ok(contents)
}

fn read_contents(map: &SourceMap) -> AssetMapContents {
    let count = map.get_source_count();
    let mut decoded = AssetMapContents {
        sources: Vec::with_capacity(count as usize),
        contents: Vec::with_capacity(count as usize),
    };
    for idx in 0..count {
        decoded
            .sources
            .push(map.get_source(idx).unwrap_or_default().to_owned());
        decoded
            .contents
            .push(map.get_source_contents(idx).map(str::to_owned));
    }
    decoded
}
