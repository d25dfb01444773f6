use anyhow::{Context, Result};
use futures::future::{BoxFuture, FutureExt};

use crate::bundle::{Asset, MapSource};

/// Fetches the source map an asset produced when it was transformed
///
/// `Ok(None)` means the asset has no map, which is expected for many assets.
pub trait MapLoader: Send + Sync {
    fn load_map<'a>(&'a self, asset: &'a Asset) -> BoxFuture<'a, Result<Option<Vec<u8>>>>;
}

/// Loads maps from the location recorded on the asset
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetMapLoader;

impl MapLoader for AssetMapLoader {
    fn load_map<'a>(&'a self, asset: &'a Asset) -> BoxFuture<'a, Result<Option<Vec<u8>>>> {
        async move {
            match &asset.map {
                None => Ok(None),
                Some(MapSource::Inline(bytes)) => Ok(Some(bytes.to_vec())),
                Some(MapSource::File(path)) => {
                    let bytes = tokio::fs::read(path).await.with_context(|| {
                        format!(
                            "failed to read source map {} of asset '{}'",
                            path.display(),
                            asset.public_id
                        )
                    })?;
                    Ok(Some(bytes))
                }
            }
        }
        .boxed()
    }
}
