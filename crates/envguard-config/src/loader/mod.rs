//! Config document loading and discovery.
//!
//! Reads `envguard.json5` documents, validates their structure, and decodes
//! them into an `EnvGuardConfig`. Discovery looks in the working directory,
//! its `.envguard/` directory, and then walks up to the project root.

mod schema;
mod utils;

#[cfg(test)]
mod tests;

use crate::{ConfigError, EnvGuardConfig, FieldKind, is_identifier};
use log::{debug, info};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config filename.
pub const DEFAULT_CONFIG_FILE: &str = "envguard.json5";
/// Default config directory under the working directory or project root.
pub const DEFAULT_CONFIG_DIR: &str = ".envguard";
/// Marker files/dirs that identify a project root.
const DEFAULT_PROJECT_ROOT_MARKERS: &[&str] = &[".git"];

impl EnvGuardConfig {
    /// Load a config document from a path.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("loading envguard config from path: {}", path.display());
        let contents = fs::read_to_string(path)?;
        let value: Value = json5::from_str(&contents)?;
        config_from_value(value, &path.display().to_string())
    }

    /// Load a config document from JSON5 contents.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        config_from_value(value, "config")
    }

    /// Find and load the config document that applies to `cwd`.
    ///
    /// Returns the loaded config together with the path it was read from.
    pub fn discover(cwd: impl AsRef<Path>) -> Result<(Self, PathBuf), ConfigError> {
        let cwd = utils::normalize_path(cwd.as_ref())?;
        let markers: Vec<String> = DEFAULT_PROJECT_ROOT_MARKERS
            .iter()
            .map(|marker| marker.to_string())
            .collect();
        let project_root = utils::find_project_root(&cwd, &markers);

        for candidate in candidate_paths(&cwd, project_root.as_deref()) {
            if candidate.is_file() {
                debug!("discovered config at {}", candidate.display());
                let config = Self::load_from_path(&candidate)?;
                return Ok((config, candidate));
            }
            debug!("no config at {}", candidate.display());
        }

        Err(ConfigError::NotFound(cwd.display().to_string()))
    }
}

/// Candidate config locations, most specific first.
fn candidate_paths(cwd: &Path, project_root: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    let stop = project_root.unwrap_or(cwd);
    for ancestor in cwd.ancestors() {
        candidates.push(ancestor.join(DEFAULT_CONFIG_FILE));
        candidates.push(ancestor.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILE));
        if ancestor == stop {
            break;
        }
    }
    candidates
}

fn config_from_value(value: Value, label: &str) -> Result<EnvGuardConfig, ConfigError> {
    schema::validate_document(&value, label)?;
    let config: EnvGuardConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}

impl EnvGuardConfig {
    /// Validate invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !is_identifier(&field.name) {
                return Err(ConfigError::Invalid(format!(
                    "field name `{}` is not a valid variable name",
                    field.name
                )));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "field `{}` is declared more than once",
                    field.name
                )));
            }
            if field.kind == FieldKind::Enum && field.options.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "enum field `{}` requires options",
                    field.name
                )));
            }
            if let (Some(min), Some(max)) = (field.min, field.max)
                && min > max
            {
                return Err(ConfigError::Invalid(format!(
                    "field `{}` has min greater than max",
                    field.name
                )));
            }
        }
        for name in &self.required_in_production {
            if !is_identifier(name) {
                return Err(ConfigError::Invalid(format!(
                    "required_in_production entry `{name}` is not a valid variable name"
                )));
            }
        }
        if self.tier_var.is_empty() {
            return Err(ConfigError::Invalid("tier_var must not be empty".to_string()));
        }
        Ok(())
    }
}
