//! Error types for schema flattening and page generation

use thiserror::Error;

/// Result type for documentation operations
pub type Result<T> = std::result::Result<T, DocError>;

/// Documentation generation errors
#[derive(Error, Debug)]
pub enum DocError {
    #[error("Schema does not define property '{property}' ({context})")]
    MissingProperty { property: String, context: String },

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Recursion depth limit of {limit} exceeded at '{path}'")]
    DepthLimitExceeded { path: String, limit: usize },

    #[error("Free-type page already generated: {0}")]
    DuplicatePage(String),

    #[error("Invalid API description: {0}")]
    InvalidDescription(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl DocError {
    pub(crate) fn missing_property(property: impl Into<String>, context: impl Into<String>) -> Self {
        DocError::MissingProperty {
            property: property.into(),
            context: context.into(),
        }
    }
}
