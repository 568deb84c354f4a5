//! Shared type aliases and provenance records.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Flat mapping of variable name to raw string value.
pub type EnvMap = BTreeMap<String, String>;

/// Which file supplied a resolved variable.
pub type Provenance = BTreeMap<String, VarSource>;

/// Location a variable's value was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarSource {
    /// Env file path, as configured.
    pub path: PathBuf,
    /// 1-based line of the declaration.
    pub line: usize,
}

impl VarSource {
    pub fn new(path: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }
}
