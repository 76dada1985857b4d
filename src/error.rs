//! Error types.

use thiserror::Error;

/// Errors surfaced by a detection run.
///
/// Attribute absence is never an error: it is carried as data in the
/// [`AttributeBag`](crate::attributes::AttributeBag). Detectors cannot fail
/// either. The only failure channel is attribute collection, which built-in
/// collectors never use but custom [`Collector`](crate::attributes::Collector)
/// implementations may.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("attribute collection failed: {0}")]
    Collection(String),
}

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
