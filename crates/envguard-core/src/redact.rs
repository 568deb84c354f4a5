//! Masking of values whose names look sensitive.

use regex::Regex;
use std::sync::LazyLock;

/// Appended to every partially masked value.
pub const REDACTED_SUFFIX: &str = "(redacted)";

static SECRET_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)secret|password|token|key|api[_-]?key").ok());

/// True when `name` matches one of the secret patterns, case-insensitively.
pub fn is_secret(name: &str) -> bool {
    match SECRET_NAME.as_ref() {
        Some(pattern) => pattern.is_match(name),
        // Treat everything as secret if the pattern failed to compile.
        None => true,
    }
}

/// Value suitable for display in a diagnostic.
///
/// Secrets longer than four characters keep their first and last two
/// characters; shorter secrets are never shown.
pub fn redact_if_secret(name: &str, value: Option<&str>) -> Option<String> {
    let value = value.filter(|value| !value.is_empty())?;
    if !is_secret(name) {
        return Some(value.to_string());
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        return None;
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    Some(format!("{head}***{tail} {REDACTED_SUFFIX}"))
}
