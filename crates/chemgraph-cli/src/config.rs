use crate::cli::RingsArgs;
use crate::error::{CliError, Result};
use chemgraph::core::utils::geometry::SymbolMetrics;
use chemgraph::{PerceptionConfig, RingAlgorithm};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialPerceptionConfig {
    algorithm: Option<RingAlgorithm>,
    max_sssr_atoms: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialRegistryConfig {
    /// TOML file with extra functional-group definitions.
    groups: Option<PathBuf>,
}

/// Contents of the optional `--config` file; every section may be omitted.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialAppConfig {
    perception: Option<PartialPerceptionConfig>,
    metrics: Option<SymbolMetrics>,
    registry: Option<PartialRegistryConfig>,
}

/// Fully resolved settings for one command run.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub perception: PerceptionConfig,
    pub metrics: SymbolMetrics,
    pub groups: Option<PathBuf>,
}

impl PartialAppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads `path` if given, otherwise starts from defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolves the file settings without command-line overrides.
    pub fn resolve(self) -> Result<AppConfig> {
        self.resolve_with(None, None)
    }

    /// Resolves the file settings, letting `rings` arguments win.
    pub fn merge_with_cli(self, args: &RingsArgs) -> Result<AppConfig> {
        self.resolve_with(args.algorithm.map(Into::into), args.max_sssr_atoms)
    }

    fn resolve_with(self, algorithm: Option<RingAlgorithm>, max_sssr_atoms: Option<usize>) -> Result<AppConfig> {
        let perception = self.perception.unwrap_or_default();
        let mut builder = PerceptionConfig::builder()
            .algorithm(algorithm.or(perception.algorithm).unwrap_or_default());
        if let Some(cap) = max_sssr_atoms.or(perception.max_sssr_atoms) {
            builder = builder.max_sssr_atoms(cap);
        }
        let perception = builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        let metrics = self.metrics.unwrap_or_default();
        if metrics.font_size <= 0.0 || metrics.char_aspect <= 0.0 {
            return Err(CliError::Config(
                "'metrics.font-size' and 'metrics.char-aspect' must be positive".to_string(),
            ));
        }

        Ok(AppConfig {
            perception,
            metrics,
            groups: self.registry.and_then(|r| r.groups),
        })
    }
}
