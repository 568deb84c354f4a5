//! `${NAME}` / `$NAME` placeholder expansion.
//!
//! Expansion is a single left-to-right pass per value. Every lookup uses the
//! original mapping, so substituted text is never scanned again and cycles
//! cannot occur.

use crate::env::EnvSource;
use crate::types::EnvMap;
use log::warn;
use regex::{Captures, Regex};

const PLACEHOLDER_PATTERN: &str =
    r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)";

/// Expand placeholders in every value of `values`.
///
/// Names resolve against `values` first, then `env`, then the empty string.
pub fn expand(values: &EnvMap, env: &dyn EnvSource) -> EnvMap {
    let Ok(regex) = Regex::new(PLACEHOLDER_PATTERN) else {
        return values.clone();
    };

    values
        .iter()
        .map(|(name, value)| {
            let expanded = regex.replace_all(value, |caps: &Captures<'_>| {
                let reference = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map_or("", |m| m.as_str());
                resolve(reference, values, env)
            });
            (name.clone(), expanded.into_owned())
        })
        .collect()
}

/// Empty values count as unset, so an empty entry falls through to `env`.
fn resolve(reference: &str, values: &EnvMap, env: &dyn EnvSource) -> String {
    if let Some(value) = values.get(reference).filter(|value| !value.is_empty()) {
        return value.clone();
    }
    env.var(reference).filter(|value| !value.is_empty()).unwrap_or_else(|| {
        warn!("unresolved placeholder ${reference}; substituting empty string");
        String::new()
    })
}
