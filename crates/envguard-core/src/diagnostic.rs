//! Actionable, located diagnostics derived from validation failures.

use crate::redact::{is_secret, redact_if_secret};
use crate::schema::{Issue, IssueKind};
use crate::types::{EnvMap, Provenance};
use serde::Serialize;
use std::path::PathBuf;

pub const STRICT_EXTRA_MESSAGE: &str = "Variable not defined in schema (strict mode)";
pub const STRICT_EXTRA_SUGGESTION: &str = "Remove this variable or add it to your schema";
pub const PRODUCTION_MISSING_MESSAGE: &str = "Required in production but not set";

/// One problem with one variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub variable: String,
    pub message: String,
    /// Env file that supplied the value, when it came from a file.
    pub file: Option<PathBuf>,
    pub line: Option<usize>,
    /// Current value, masked when the name looks sensitive.
    pub display_value: Option<String>,
    /// True when `display_value` is a masked secret.
    pub redacted: bool,
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Locate `variable` and attach its (possibly masked) current value.
    fn located(
        variable: &str,
        message: impl Into<String>,
        values: &EnvMap,
        sources: &Provenance,
    ) -> Self {
        let source = sources.get(variable);
        let display_value = redact_if_secret(variable, values.get(variable).map(String::as_str));
        Self {
            variable: variable.to_string(),
            message: message.into(),
            file: source.map(|source| source.path.clone()),
            line: source.map(|source| source.line),
            redacted: display_value.is_some() && is_secret(variable),
            display_value,
            suggestion: None,
        }
    }

    /// Diagnostic for a schema issue.
    pub fn from_issue(issue: &Issue, values: &EnvMap, sources: &Provenance) -> Self {
        let mut diagnostic = Self::located(&issue.field, issue.message.clone(), values, sources);
        diagnostic.suggestion = Some(suggestion_for(issue));
        diagnostic
    }

    /// Diagnostic for a variable the schema does not declare.
    pub fn strict_extra(variable: &str, values: &EnvMap, sources: &Provenance) -> Self {
        let mut diagnostic = Self::located(variable, STRICT_EXTRA_MESSAGE, values, sources);
        diagnostic.suggestion = Some(STRICT_EXTRA_SUGGESTION.to_string());
        diagnostic
    }

    /// Diagnostic for a production requirement that is absent or empty.
    pub fn production_missing(variable: &str, values: &EnvMap, sources: &Provenance) -> Self {
        let mut diagnostic = Self::located(variable, PRODUCTION_MISSING_MESSAGE, values, sources);
        diagnostic.suggestion = Some(format!("Set {variable} in your production environment"));
        diagnostic
    }
}

/// Suggested fix for a schema issue, by issue kind.
pub fn suggestion_for(issue: &Issue) -> String {
    match &issue.kind {
        IssueKind::Missing { .. } => format!("Add {} to your .env file", issue.field),
        IssueKind::InvalidType { expected, received } => {
            format!("Expected {expected}, received {received}")
        }
        IssueKind::InvalidEnumValue { options, .. } => {
            format!("Must be one of: {}", options.join(", "))
        }
        IssueKind::TooSmall { .. }
        | IssueKind::TooBig { .. }
        | IssueKind::InvalidString { .. }
        | IssueKind::Custom => issue.message.clone(),
    }
}
