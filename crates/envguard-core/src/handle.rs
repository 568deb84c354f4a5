//! Owned handle to a validated environment.

use crate::error::EnvGuardError;
use crate::outcome::ValidationOutcome;
use crate::types::{Provenance, VarSource};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Typed variables plus where each came from.
///
/// Returned by initialisation and owned by the caller, who decides whether to
/// share it (it is `Clone + Send + Sync`) or reload it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedEnv {
    data: Map<String, Value>,
    sources: Provenance,
}

impl ValidatedEnv {
    pub fn new(data: Map<String, Value>, sources: Provenance) -> Self {
        Self { data, sources }
    }

    /// Handle for a successful outcome, `None` for a failure.
    pub fn from_outcome(outcome: ValidationOutcome<Map<String, Value>>) -> Option<Self> {
        outcome
            .into_result()
            .ok()
            .map(|(data, sources)| Self::new(data, sources))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// String value of `name`, if it is one.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.data.get(name).and_then(Value::as_str)
    }

    /// Decode one variable into `T`. `Ok(None)` when the variable is absent.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, EnvGuardError> {
        self.data
            .get(name)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
            .map_err(EnvGuardError::from)
    }

    /// Decode the whole environment into a typed struct.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, EnvGuardError> {
        Ok(serde_json::from_value(Value::Object(self.data.clone()))?)
    }

    /// File and line that supplied `name`; `None` for process or default values.
    pub fn source_of(&self, name: &str) -> Option<&VarSource> {
        self.sources.get(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn loaded_from(&self) -> &Provenance {
        &self.sources
    }

    pub fn into_data(self) -> Map<String, Value> {
        self.data
    }
}
