use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use crate::{
    ast::Program,
    bundle::{AssetId, Bundle},
    code_generator::framer,
    config::CodegenConfig,
    printer::{JsPrinter, PrintOptions, Printer},
    source_map::{AssetMapLoader, MapLoader, OutputMap, SourceMapAssembler},
};

/// Text and source map of one generated bundle
#[derive(Debug)]
pub struct GeneratedBundle {
    pub code: String,
    /// Present only when the bundle has source maps enabled
    pub map: Option<OutputMap>,
}

/// Runs framing, printing and source map assembly for bundles of one build
pub struct BundleGenerator<'a> {
    config: CodegenConfig,
    project_root: PathBuf,
    printer: &'a dyn Printer,
    loader: &'a dyn MapLoader,
}

impl std::fmt::Debug for BundleGenerator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleGenerator")
            .field("config", &self.config)
            .field("project_root", &self.project_root)
            .finish_non_exhaustive()
    }
}

impl<'a> BundleGenerator<'a> {
    pub fn new(
        config: CodegenConfig,
        project_root: impl Into<PathBuf>,
        printer: &'a dyn Printer,
        loader: &'a dyn MapLoader,
    ) -> Self {
        Self {
            config,
            project_root: project_root.into(),
            printer,
            loader,
        }
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Generate one bundle
    ///
    /// Fails as a whole: a malformed interpreter directive stops generation
    /// before anything is printed, and a broken asset map never yields a
    /// partially filled output map.
    pub async fn generate(
        &self,
        bundle: &Bundle,
        program: Program,
        referenced: &[AssetId],
    ) -> Result<GeneratedBundle> {
        let program = framer::frame(bundle, program, referenced, &self.config.loader_name)
            .with_context(|| format!("failed to frame bundle '{}'", bundle.name))?;

        let options = PrintOptions {
            minify: bundle.minify(),
            source_maps: bundle.source_maps(),
            comments: true,
        };
        let output = self
            .printer
            .print(&program, &options)
            .with_context(|| format!("failed to print bundle '{}'", bundle.name))?;

        let map = SourceMapAssembler::new(self.loader)
            .with_max_concurrent(self.config.max_concurrent_map_loads)
            .assemble(output.mappings, &self.project_root, bundle)
            .await
            .with_context(|| format!("failed to assemble source map of bundle '{}'", bundle.name))?;

        debug!(
            "Generated bundle '{}': {} bytes, source map {}",
            bundle.name,
            output.code.len(),
            if map.is_some() { "attached" } else { "disabled" }
        );

        Ok(GeneratedBundle {
            code: output.code,
            map,
        })
    }
}

impl BundleGenerator<'static> {
    /// Generator using [`JsPrinter`] and [`AssetMapLoader`]
    pub fn with_defaults(config: CodegenConfig, project_root: impl Into<PathBuf>) -> Self {
        Self::new(config, project_root, &JsPrinter, &AssetMapLoader)
    }
}
