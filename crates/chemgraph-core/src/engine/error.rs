use super::config::ConfigError;
use crate::core::models::error::GraphError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Graph operation failed: {source}")]
    Graph {
        #[from]
        source: GraphError,
    },

    #[error("Invalid perception configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}
