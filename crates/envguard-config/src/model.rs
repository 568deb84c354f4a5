//! Configuration schema for envguard.

use crate::Tier;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Files loaded when the config does not name any.
pub const DEFAULT_ENV_FILES: &[&str] = &[".env.local", ".env"];
/// Files loaded when a per-tier map has no entry for the current tier.
pub const FALLBACK_TIER_ENV_FILES: &[&str] = &[".env"];
/// Variable consulted for the current tier unless overridden.
///
/// Projects that follow the Node convention set `tier_var` to `NODE_ENV`.
pub const DEFAULT_TIER_VAR: &str = "APP_ENV";

/// Root config describing an application's environment contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvGuardConfig {
    #[serde(default, rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Declared variables, in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    /// Env files in priority order (first wins), or per-tier lists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_files: Option<EnvFiles>,
    /// Variables that must be non-empty when the tier is production.
    #[serde(default)]
    pub required_in_production: Vec<String>,
    /// Reject file variables that are not declared in `fields`.
    #[serde(default)]
    pub strict: bool,
    /// Expand `${NAME}` / `$NAME` placeholders in file values.
    #[serde(default)]
    pub expand: bool,
    /// Environment variable that signals the current tier.
    #[serde(default = "default_tier_var")]
    pub tier_var: String,
}

fn default_tier_var() -> String {
    DEFAULT_TIER_VAR.to_string()
}

impl Default for EnvGuardConfig {
    fn default() -> Self {
        Self {
            schema: None,
            fields: Vec::new(),
            env_files: None,
            required_in_production: Vec::new(),
            strict: false,
            expand: false,
            tier_var: default_tier_var(),
        }
    }
}

impl EnvGuardConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> EnvGuardConfigBuilder {
        EnvGuardConfigBuilder::new()
    }

    /// Env files to load for `tier`, highest priority first.
    pub fn resolve_env_files(&self, tier: &Tier) -> Vec<String> {
        match &self.env_files {
            None => to_owned_list(DEFAULT_ENV_FILES),
            Some(EnvFiles::List(files)) => files.clone(),
            Some(EnvFiles::PerTier(map)) => match map.get(tier.as_str()) {
                Some(files) => files.clone(),
                None => {
                    warn!(
                        "no env files configured for tier {tier}; falling back to {:?}",
                        FALLBACK_TIER_ENV_FILES
                    );
                    to_owned_list(FALLBACK_TIER_ENV_FILES)
                }
            },
        }
    }

    /// Look up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// Builder for assembling an `EnvGuardConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct EnvGuardConfigBuilder {
    config: EnvGuardConfig,
}

impl EnvGuardConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: EnvGuardConfig::default(),
        }
    }

    /// Append a declared field.
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.config.fields.push(field);
        self
    }

    /// Use a single ordered list of env files.
    pub fn env_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.env_files = Some(EnvFiles::List(
            files.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Use an ordered list of env files for one tier.
    pub fn tier_env_files<I, S>(mut self, tier: &Tier, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let files: Vec<String> = files.into_iter().map(Into::into).collect();
        let mut map = match self.config.env_files.take() {
            Some(EnvFiles::PerTier(map)) => map,
            _ => BTreeMap::new(),
        };
        map.insert(tier.as_str().to_string(), files);
        self.config.env_files = Some(EnvFiles::PerTier(map));
        self
    }

    /// Replace the production-only requirement list.
    pub fn required_in_production<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.required_in_production = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.config.strict = strict;
        self
    }

    pub fn expand(mut self, expand: bool) -> Self {
        self.config.expand = expand;
        self
    }

    /// Override the variable that signals the current tier.
    pub fn tier_var(mut self, name: impl Into<String>) -> Self {
        self.config.tier_var = name.into();
        self
    }

    /// Finalize and return the built `EnvGuardConfig`.
    pub fn build(self) -> EnvGuardConfig {
        self.config
    }
}

/// Env file selection: one list, or a list per tier name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvFiles {
    List(Vec<String>),
    PerTier(BTreeMap<String, Vec<String>>),
}

/// Value type of a declared variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    /// Any finite number, coerced from the string value.
    Number,
    /// Whole number, coerced from the string value.
    Integer,
    /// `1/true/yes/on` or `0/false/no/off`.
    Boolean,
    /// One of `options`.
    Enum,
    /// Absolute URL.
    Url,
}

impl FieldKind {
    /// Type name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Enum => "enum",
            FieldKind::Url => "url",
        }
    }
}

/// Declaration of a single environment variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type", default = "default_field_kind")]
    pub kind: FieldKind,
    /// Absent values are accepted (and omitted from the typed result).
    #[serde(default)]
    pub optional: bool,
    /// Typed value used when the variable is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Minimum length (strings, urls) or value (numbers).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Maximum length (strings, urls) or value (numbers).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Allowed values for enum fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_field_kind() -> FieldKind {
    FieldKind::String
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            optional: false,
            default: None,
            min: None,
            max: None,
            options: Vec::new(),
            description: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn url(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Url)
    }

    pub fn enumeration<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spec = Self::new(name, FieldKind::Enum);
        spec.options = options.into_iter().map(Into::into).collect();
        spec
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// A field is optional when explicitly marked or when it has a default.
    pub fn is_optional(&self) -> bool {
        self.optional || self.default.is_some()
    }
}
