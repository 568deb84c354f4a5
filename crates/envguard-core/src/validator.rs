//! The validation pipeline.
//!
//! A run resolves the env file list for the current tier, merges the files,
//! optionally expands placeholders, overlays the process environment and then
//! checks the result in stages: schema shape, strict extras, production
//! requirements. The first stage that reports anything decides the outcome.

use crate::diagnostic::Diagnostic;
use crate::env::{EnvSource, ProcessEnv};
use crate::error::EnvGuardError;
use crate::expand::expand;
use crate::merge::load_files;
use crate::outcome::ValidationOutcome;
use crate::schema::Schema;
use crate::types::{EnvMap, Provenance};
use envguard_config::{EnvGuardConfig, Tier};
use log::{debug, info};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Inputs shared by the policy stages.
struct StageInput<'a> {
    config: &'a EnvGuardConfig,
    tier: &'a Tier,
    declared: BTreeSet<String>,
    /// Keys that came from env files or the caller, before the process overlay.
    file_keys: Vec<String>,
    resolved: &'a EnvMap,
    /// File provenance of values not overridden by the process environment.
    sources: &'a Provenance,
}

type PolicyStage = fn(&StageInput<'_>) -> Vec<Diagnostic>;

/// Checks run after schema validation succeeds, in priority order.
const POLICY_STAGES: &[(&str, PolicyStage)] = &[
    ("strict", strict_extras),
    ("production", production_requirements),
];

/// Builder for a single validation run.
pub struct EnvValidator<'a, S> {
    schema: &'a S,
    config: &'a EnvGuardConfig,
    env: &'a dyn EnvSource,
    base_dir: PathBuf,
    tier: Option<Tier>,
    variables: Option<EnvMap>,
}

impl<S> std::fmt::Debug for EnvValidator<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvValidator")
            .field("config", &self.config)
            .field("base_dir", &self.base_dir)
            .field("tier", &self.tier)
            .field("variables", &self.variables.as_ref().map(EnvMap::len))
            .finish()
    }
}

impl<'a, S: Schema> EnvValidator<'a, S> {
    /// Validate against the real process environment from the current directory.
    pub fn new(schema: &'a S, config: &'a EnvGuardConfig) -> Self {
        Self {
            schema,
            config,
            env: &ProcessEnv,
            base_dir: PathBuf::from("."),
            tier: None,
            variables: None,
        }
    }

    /// Use `env` for the process overlay, placeholder fallback and tier signal.
    pub fn env(mut self, env: &'a dyn EnvSource) -> Self {
        self.env = env;
        self
    }

    /// Directory env file paths are resolved against.
    pub fn base_dir(mut self, base_dir: impl AsRef<Path>) -> Self {
        self.base_dir = base_dir.as_ref().to_path_buf();
        self
    }

    /// Use `tier` instead of reading it from the tier variable.
    pub fn tier(mut self, tier: Tier) -> Self {
        self.tier = Some(tier);
        self
    }

    /// Validate `variables` instead of loading env files.
    pub fn variables(mut self, variables: EnvMap) -> Self {
        self.variables = Some(variables);
        self
    }

    /// Run the pipeline.
    ///
    /// Invalid variables are reported in the returned outcome. An error is
    /// returned only for unusable input: an unreadable env file or a schema
    /// that declares a field twice.
    pub fn validate(self) -> Result<ValidationOutcome<S::Output>, EnvGuardError> {
        let declared = declared_fields(self.schema)?;
        let tier = self.tier.clone().unwrap_or_else(|| {
            Tier::from_signal(self.env.var(&self.config.tier_var).as_deref())
        });
        debug!("validating environment for tier {tier}");

        let (mut file_values, sources, loaded_files) = match self.variables {
            Some(variables) => (variables, Provenance::new(), Vec::new()),
            None => {
                let files = self.config.resolve_env_files(&tier);
                let merged = load_files(&self.base_dir, &files)?;
                (merged.values, merged.sources, merged.loaded_files)
            }
        };
        if self.config.expand {
            file_values = expand(&file_values, self.env);
        }

        let file_keys: Vec<String> = file_values.keys().cloned().collect();
        // Diagnostics only point at files for values that still come from them.
        let mut located = sources.clone();
        let mut resolved = file_values;
        for (name, value) in self.env.vars() {
            if located.remove(&name).is_some() {
                debug!("{name} overridden by process environment");
            }
            resolved.insert(name, value);
        }

        let data = match self.schema.validate(&resolved) {
            Ok(data) => data,
            Err(issues) if issues.is_empty() => {
                return Err(EnvGuardError::InvalidSchema(
                    "schema rejected the environment without reporting issues".to_string(),
                ));
            }
            Err(issues) => {
                info!("schema validation failed with {} issue(s)", issues.len());
                let diagnostics = issues
                    .iter()
                    .map(|issue| Diagnostic::from_issue(issue, &resolved, &located))
                    .collect();
                return Ok(ValidationOutcome::Failure {
                    diagnostics,
                    loaded_from: sources,
                    loaded_files,
                });
            }
        };

        let input = StageInput {
            config: self.config,
            tier: &tier,
            declared,
            file_keys,
            resolved: &resolved,
            sources: &located,
        };
        for (stage, check) in POLICY_STAGES {
            let diagnostics = check(&input);
            if !diagnostics.is_empty() {
                info!("{stage} check failed with {} issue(s)", diagnostics.len());
                return Ok(ValidationOutcome::Failure {
                    diagnostics,
                    loaded_from: sources,
                    loaded_files,
                });
            }
        }

        info!("environment valid ({} vars from files)", sources.len());
        Ok(ValidationOutcome::Success {
            data,
            loaded_from: sources,
            loaded_files,
        })
    }
}

fn declared_fields<S: Schema>(schema: &S) -> Result<BTreeSet<String>, EnvGuardError> {
    let mut declared = BTreeSet::new();
    for field in schema.fields() {
        if !declared.insert(field.name.clone()) {
            return Err(EnvGuardError::InvalidSchema(format!(
                "field {} declared more than once",
                field.name
            )));
        }
    }
    Ok(declared)
}

fn strict_extras(input: &StageInput<'_>) -> Vec<Diagnostic> {
    if !input.config.strict {
        return Vec::new();
    }
    input
        .file_keys
        .iter()
        .filter(|name| !input.declared.contains(name.as_str()))
        .map(|name| Diagnostic::strict_extra(name, input.resolved, input.sources))
        .collect()
}

fn production_requirements(input: &StageInput<'_>) -> Vec<Diagnostic> {
    if !input.tier.is_production() {
        return Vec::new();
    }
    input
        .config
        .required_in_production
        .iter()
        .filter(|name| input.resolved.get(name.as_str()).is_none_or(String::is_empty))
        .map(|name| Diagnostic::production_missing(name, input.resolved, input.sources))
        .collect()
}
