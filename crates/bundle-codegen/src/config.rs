//! Code generation settings (`codegen.toml`)

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::{code_generator::framer::validate_loader_name, source_map::MAX_CONCURRENT_MAP_LOADS};

/// Settings shared by every bundle of a build
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CodegenConfig {
    /// Global name of the runtime loader that lazily loaded bundles register with
    pub loader_name: String,

    /// Upper bound on asset source maps fetched at the same time
    pub max_concurrent_map_loads: usize,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            loader_name: "parcelRequire".to_owned(),
            max_concurrent_map_loads: MAX_CONCURRENT_MAP_LOADS,
        }
    }
}

impl CodegenConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("failed to parse codegen config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        validate_loader_name(&self.loader_name)?;
        if self.max_concurrent_map_loads == 0 {
            bail!("max-concurrent-map-loads must be at least 1");
        }
        Ok(())
    }
}
