pub mod formula;
pub mod rings;

use crate::cli::InputArgs;
use crate::config::AppConfig;
use crate::error::Result;
use crate::structure;
use chemgraph::{ElementRegistry, Model};
use std::sync::Arc;
use tracing::info;

/// Builds the registry (with any configured groups) and loads the input structure.
fn load_model(input: &InputArgs, config: &AppConfig) -> Result<Model> {
    let mut registry = ElementRegistry::builtin();
    if let Some(groups) = &config.groups {
        info!("Loading functional groups from {:?}", groups);
        registry = registry.load_groups(groups)?;
    }
    structure::load(&input.input, Arc::new(registry), config.metrics)
}
