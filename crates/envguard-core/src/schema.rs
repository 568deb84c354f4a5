//! The schema capability consumed by the validator.
//!
//! The engine never depends on a concrete validation library. Anything that
//! can describe its fields and validate a flat string mapping can be plugged
//! in; [`crate::ObjectSchema`] is the built-in implementation.

use crate::types::EnvMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Validates a flat mapping of variable names to raw string values.
pub trait Schema {
    /// Typed result produced on success.
    type Output;

    /// Declared fields, in declaration order.
    fn fields(&self) -> Vec<FieldDescriptor>;

    /// Validate `values`. Issues are returned in field declaration order.
    fn validate(&self, values: &EnvMap) -> Result<Self::Output, Vec<Issue>>;
}

impl<S: Schema + ?Sized> Schema for &S {
    type Output = S::Output;

    fn fields(&self) -> Vec<FieldDescriptor> {
        (**self).fields()
    }

    fn validate(&self, values: &EnvMap) -> Result<Self::Output, Vec<Issue>> {
        (**self).validate(values)
    }
}

/// What a schema reports about one declared field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    /// Explicitly optional. Fields with a default are optional too.
    pub optional: bool,
    pub default: Option<Value>,
    pub description: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: false,
            default: None,
            description: None,
        }
    }

    pub fn is_optional(&self) -> bool {
        self.optional || self.default.is_some()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// A single per-field validation failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub field: String,
    pub kind: IssueKind,
    /// Human readable message from the schema.
    pub message: String,
}

impl Issue {
    pub fn new(field: impl Into<String>, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }

    /// A required field with no value.
    pub fn missing(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::new(
            field,
            IssueKind::Missing {
                expected: expected.into(),
            },
            "Required",
        )
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Category of a validation failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// Declared, no default, and absent.
    Missing { expected: String },
    /// Present but not coercible to the declared type.
    InvalidType { expected: String, received: String },
    /// Below a length or value minimum.
    TooSmall { minimum: f64 },
    /// Above a length or value maximum.
    TooBig { maximum: f64 },
    InvalidEnumValue {
        options: Vec<String>,
        received: String,
    },
    /// Failed a string format check such as `url`.
    InvalidString { validation: String },
    Custom,
}
