//! Error types for the validation engine.
//!
//! These are usage faults only. Invalid configuration content never produces
//! an `EnvGuardError`; it is reported as diagnostics inside a
//! `ValidationOutcome::Failure`.

use envguard_config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors returned by engine operations.
#[derive(Debug, Error)]
pub enum EnvGuardError {
    /// An env file exists but could not be read.
    #[error("failed to read env file {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The envguard config document could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// The schema cannot be used for validation.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// Validated data could not be decoded into the requested type.
    #[error("failed to decode validated environment: {0}")]
    Decode(#[from] serde_json::Error),
}
