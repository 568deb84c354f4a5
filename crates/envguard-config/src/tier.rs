//! Deployment tiers.
//!
//! The tier decides which env file list applies (when the config maps file
//! lists per tier) and whether production-only requirements are enforced.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Deployment context the environment is validated for.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tier {
    /// Local development (the default when no tier is signalled).
    #[default]
    Development,
    /// Production deployment; enables `required_in_production` checks.
    Production,
    /// Test runs.
    Test,
    /// Any other label, kept verbatim.
    Other(String),
}

impl Tier {
    /// Parse a tier label. Only the exact names `development`, `production`
    /// and `test` map to known tiers; anything else is kept verbatim.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "" | "development" => Tier::Development,
            "production" => Tier::Production,
            "test" => Tier::Test,
            other => Tier::Other(other.to_string()),
        }
    }

    /// Resolve the tier from an optional signal value; unset means development.
    pub fn from_signal(value: Option<&str>) -> Self {
        value.map(Self::from_label).unwrap_or_default()
    }

    /// Label used as the key into per-tier env file maps.
    pub fn as_str(&self) -> &str {
        match self {
            Tier::Development => "development",
            Tier::Production => "production",
            Tier::Test => "test",
            Tier::Other(label) => label.as_str(),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Tier::Production)
    }
}

impl From<String> for Tier {
    fn from(value: String) -> Self {
        Tier::from_label(&value)
    }
}

impl From<Tier> for String {
    fn from(value: Tier) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
