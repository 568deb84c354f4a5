//! Public SDK surface for envguard.
//!
//! This crate re-exports the config and engine crates and provides one-call
//! initialisation that returns an explicit handle to the validated
//! environment.

/// Re-export for convenience.
pub use envguard_config as config;
/// Re-export for convenience.
pub use envguard_core as core;

pub use envguard_config::{ConfigError, EnvGuardConfig, FieldKind, FieldSpec, Tier};
pub use envguard_core::{
    Diagnostic, EnvGuardError, EnvSource, EnvValidator, FieldSchema, ObjectSchema, ProcessEnv,
    Schema, StaticEnv, ValidatedEnv, ValidationOutcome, format_errors, format_success,
};

use log::{debug, info};
use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}

/// Why loading the environment failed.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Config, file access, or schema problem; nothing was validated.
    #[error(transparent)]
    Fatal(#[from] EnvGuardError),
    /// The environment was validated and is invalid.
    #[error("{report}")]
    Invalid {
        diagnostics: Vec<Diagnostic>,
        /// `diagnostics` rendered for display.
        report: String,
    },
}

impl From<ConfigError> for LoadError {
    fn from(err: ConfigError) -> Self {
        LoadError::Fatal(EnvGuardError::Config(err))
    }
}

/// Discover the config document from `cwd`, then validate the environment.
///
/// Env files are resolved against `cwd` and the real process environment is
/// overlaid. Printing the report and exiting are left to the caller.
pub fn load(cwd: impl AsRef<Path>) -> Result<ValidatedEnv, LoadError> {
    let cwd = cwd.as_ref();
    let (config, path) = EnvGuardConfig::discover(cwd)?;
    debug!("using envguard config {}", path.display());
    let schema = ObjectSchema::from_specs(&config.fields)?;
    load_with(&schema, &config, &ProcessEnv, cwd)
}

/// Validate with an explicit schema, config and environment.
pub fn load_with<S>(
    schema: &S,
    config: &EnvGuardConfig,
    env: &dyn EnvSource,
    base_dir: impl AsRef<Path>,
) -> Result<ValidatedEnv, LoadError>
where
    S: Schema<Output = Map<String, Value>>,
{
    let outcome = EnvValidator::new(schema, config)
        .env(env)
        .base_dir(base_dir)
        .validate()?;

    match outcome {
        ValidationOutcome::Success {
            data,
            loaded_from,
            loaded_files,
        } => {
            info!("{}", format_success(&loaded_from, &loaded_files));
            Ok(ValidatedEnv::new(data, loaded_from))
        }
        ValidationOutcome::Failure { diagnostics, .. } => {
            let report = format_errors(&diagnostics);
            Err(LoadError::Invalid {
                diagnostics,
                report,
            })
        }
    }
}
