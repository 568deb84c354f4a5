//! Plain-text rendering of validation outcomes.

use crate::diagnostic::Diagnostic;
use crate::outcome::ValidationOutcome;
use crate::types::Provenance;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const FAILURE_HEADER: &str = "Environment validation failed:";
const SUCCESS_HEADER: &str = "Environment validated successfully";
const NOT_FOUND: &str = "Not found in any .env file";
const LOCK: &str = "\u{1f512}";

/// Render a list of diagnostics, one block per variable.
pub fn format_errors(diagnostics: &[Diagnostic]) -> String {
    let blocks: Vec<String> = diagnostics.iter().map(format_diagnostic).collect();
    format!("{FAILURE_HEADER}\n\n{}", blocks.join("\n"))
}

fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    let mut lines = vec![
        format!("  {}", diagnostic.variable),
        format!("    {}", diagnostic.message),
    ];
    lines.push(match (&diagnostic.file, diagnostic.line) {
        (Some(file), Some(line)) => format!("    at {} (line {line})", file.display()),
        (Some(file), None) => format!("    at {}", file.display()),
        (None, _) => format!("    {NOT_FOUND}"),
    });
    if let Some(value) = &diagnostic.display_value {
        lines.push(if diagnostic.redacted {
            format!("    Value: {LOCK} {value}")
        } else {
            format!("    Current value: \"{value}\"")
        });
    }
    if let Some(suggestion) = &diagnostic.suggestion {
        lines.push(format!("    Suggestion: {suggestion}"));
    }
    lines.push(String::new());
    lines.join("\n")
}

/// Render a success confirmation with a per-file variable count.
///
/// Files are listed in `loaded_files` order (highest priority first); files
/// that supplied nothing are left out.
pub fn format_success(loaded_from: &Provenance, loaded_files: &[PathBuf]) -> String {
    if loaded_from.is_empty() {
        return SUCCESS_HEADER.to_string();
    }
    let mut counts: BTreeMap<&Path, usize> = BTreeMap::new();
    for source in loaded_from.values() {
        *counts.entry(source.path.as_path()).or_default() += 1;
    }
    let mut entries = Vec::with_capacity(counts.len());
    for file in loaded_files {
        if let Some(count) = counts.remove(file.as_path()) {
            entries.push(format!("{} ({count} vars)", file.display()));
        }
    }
    entries.extend(
        counts
            .iter()
            .map(|(path, count)| format!("{} ({count} vars)", path.display())),
    );
    format!("{SUCCESS_HEADER}\nLoaded from: {}", entries.join(", "))
}

pub fn format_outcome<T>(outcome: &ValidationOutcome<T>) -> String {
    match outcome {
        ValidationOutcome::Success {
            loaded_from,
            loaded_files,
            ..
        } => format_success(loaded_from, loaded_files),
        ValidationOutcome::Failure { diagnostics, .. } => format_errors(diagnostics),
    }
}
