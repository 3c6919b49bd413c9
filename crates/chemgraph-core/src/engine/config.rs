use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Which ring perception algorithm `rebuild_rings` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RingAlgorithm {
    /// Iterative single-ring BFS. Fast; may return a non-minimal set on bridged
    /// or fused polycyclics.
    Figueras,
    /// Path-included distance matrix SSSR. Exact.
    #[default]
    RpPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct PerceptionConfig {
    pub algorithm: RingAlgorithm,
    /// Working-set size above which RP-Path falls back to Figueras.
    pub max_sssr_atoms: Option<usize>,
}

impl PerceptionConfig {
    pub fn builder() -> PerceptionConfigBuilder {
        PerceptionConfigBuilder::new()
    }

    /// The algorithm to run on a working set of `atoms` atoms.
    pub fn algorithm_for(&self, atoms: usize) -> RingAlgorithm {
        match (self.algorithm, self.max_sssr_atoms) {
            (RingAlgorithm::RpPath, Some(cap)) if atoms > cap => RingAlgorithm::Figueras,
            (algorithm, _) => algorithm,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_sssr_atoms == Some(0) {
            return Err(ConfigError::InvalidParameter {
                name: "max_sssr_atoms",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct PerceptionConfigBuilder {
    algorithm: Option<RingAlgorithm>,
    max_sssr_atoms: Option<usize>,
}

impl PerceptionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn algorithm(mut self, algorithm: RingAlgorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }
    pub fn max_sssr_atoms(mut self, cap: usize) -> Self {
        self.max_sssr_atoms = Some(cap);
        self
    }

    pub fn build(self) -> Result<PerceptionConfig, ConfigError> {
        let config = PerceptionConfig {
            algorithm: self.algorithm.unwrap_or_default(),
            max_sssr_atoms: self.max_sssr_atoms,
        };
        config.validate()?;
        Ok(config)
    }
}
