//! `.env` file parsing.
//!
//! Parsing is permissive: blank lines, `#` comments, and any line that is not
//! `NAME=VALUE` with a valid identifier are skipped without error.

use crate::error::EnvGuardError;
use crate::types::EnvMap;
use envguard_config::is_identifier;
use log::debug;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Variables read from a single env file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    /// Path as configured (not resolved against the base directory).
    pub path: PathBuf,
    /// False when the file does not exist; `variables` is then empty.
    pub exists: bool,
    pub variables: EnvMap,
    /// 1-based line number of each variable's last declaration.
    pub lines: BTreeMap<String, usize>,
}

impl ParsedFile {
    /// An absent file contributes nothing.
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            exists: false,
            variables: EnvMap::new(),
            lines: BTreeMap::new(),
        }
    }

    pub fn line_of(&self, name: &str) -> Option<usize> {
        self.lines.get(name).copied()
    }
}

/// Read and parse `path`, resolved relative to `base_dir`.
///
/// A missing file is not an error. A file that exists but cannot be read is.
pub fn parse_file(base_dir: &Path, path: impl AsRef<Path>) -> Result<ParsedFile, EnvGuardError> {
    let path = path.as_ref();
    let resolved = base_dir.join(path);
    let contents = match fs::read_to_string(&resolved) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("env file not found: {}", resolved.display());
            return Ok(ParsedFile::missing(path));
        }
        Err(source) => {
            return Err(EnvGuardError::ReadFailed {
                path: resolved,
                source,
            });
        }
    };
    let parsed = parse_str(path, &contents);
    debug!(
        "parsed env file {} ({} vars)",
        resolved.display(),
        parsed.variables.len()
    );
    Ok(parsed)
}

/// Parse env file contents. Within one file the last declaration of a key wins.
pub fn parse_str(path: impl Into<PathBuf>, contents: &str) -> ParsedFile {
    let mut variables = EnvMap::new();
    let mut lines = BTreeMap::new();

    let normalized = contents.replace("\r\n", "\n").replace('\r', "\n");
    for (index, line) in normalized.split('\n').enumerate() {
        if let Some((name, value)) = parse_line(line) {
            lines.insert(name.to_string(), index + 1);
            variables.insert(name.to_string(), value.to_string());
        }
    }

    ParsedFile {
        path: path.into(),
        exists: true,
        variables,
        lines,
    }
}

/// Split a single line into `(name, value)`, or `None` if it declares nothing.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let (name, value) = trimmed.split_once('=')?;
    let name = name.trim_end();
    if !is_identifier(name) {
        return None;
    }
    Some((name, strip_quotes(value.trim())))
}

/// Remove one matching pair of surrounding quotes. No escape processing.
fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn parses_simple_pairs() {
        let parsed = parse_str(".env", "KEY=VALUE\nANOTHER=123");
        assert!(parsed.exists);
        assert_eq!(parsed.variables.get("KEY").map(String::as_str), Some("VALUE"));
        assert_eq!(parsed.variables.get("ANOTHER").map(String::as_str), Some("123"));
    }

    #[test]
    fn strips_matching_quotes_only() {
        let parsed = parse_str(
            ".env",
            "\n  SINGLE='single quoted'\n  DOUBLE=\"double quoted\"\nMIXED=\"oops'\nLONE=\"\nRAW=\"a\\nb\"\n",
        );
        assert_eq!(parsed.variables["SINGLE"], "single quoted");
        assert_eq!(parsed.variables["DOUBLE"], "double quoted");
        assert_eq!(parsed.variables["MIXED"], "\"oops'");
        assert_eq!(parsed.variables["LONE"], "\"");
        assert_eq!(parsed.variables["RAW"], "a\\nb");
    }

    #[test]
    fn ignores_comments_and_blank_lines() {
        let parsed = parse_str(
            ".env",
            "\n# This is a comment\n\n   \nVALID=value\n  # ANOTHER=commented\n",
        );
        assert_eq!(parsed.variables.len(), 1);
        assert_eq!(parsed.variables["VALID"], "value");
    }

    #[test]
    fn skips_malformed_lines() {
        let parsed = parse_str(
            ".env",
            "2FAST=no\nMY-VAR=no\nexport NAME=no\nno equals here\n=empty\nGOOD=yes",
        );
        assert_eq!(parsed.variables.keys().collect::<Vec<_>>(), vec!["GOOD"]);
    }

    #[test]
    fn splits_on_first_equals_and_trims() {
        let parsed = parse_str(".env", "  URL =  postgres://u:p@h/db?a=b  ");
        assert_eq!(parsed.variables["URL"], "postgres://u:p@h/db?a=b");
        assert_eq!(parsed.line_of("URL"), Some(1));
    }

    #[test]
    fn tracks_line_numbers_across_line_endings() {
        let parsed = parse_str(".env", "A=1\r\nB=2\n\rC=3\rD=4");
        assert_eq!(parsed.line_of("A"), Some(1));
        assert_eq!(parsed.line_of("B"), Some(2));
        assert_eq!(parsed.line_of("C"), Some(4));
        assert_eq!(parsed.line_of("D"), Some(5));
    }

    #[test]
    fn last_declaration_wins_within_file() {
        let parsed = parse_str(".env", "A=1\nB=2\n\nA=3");
        assert_eq!(parsed.variables["A"], "3");
        assert_eq!(parsed.line_of("A"), Some(4));
    }

    #[test]
    fn empty_value_is_kept() {
        let parsed = parse_str(".env", "EMPTY=\nQUOTED=\"\"");
        assert_eq!(parsed.variables["EMPTY"], "");
        assert_eq!(parsed.variables["QUOTED"], "");
    }

    #[test]
    fn parsing_is_idempotent() {
        let contents = "A=1\n# c\nB='two'\nA=again";
        assert_eq!(parse_str(".env", contents), parse_str(".env", contents));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let temp = TempDir::new().expect("tmp");
        let parsed = parse_file(temp.path(), ".env.missing").expect("parse");
        assert!(!parsed.exists);
        assert!(parsed.variables.is_empty());
        assert!(parsed.lines.is_empty());
        assert_eq!(parsed.path, PathBuf::from(".env.missing"));
    }

    #[test]
    fn reads_file_relative_to_base_dir() {
        let temp = TempDir::new().expect("tmp");
        std::fs::write(temp.path().join(".env"), "HOST=localhost\n").expect("write");
        let parsed = parse_file(temp.path(), ".env").expect("parse");
        assert!(parsed.exists);
        assert_eq!(parsed.path, PathBuf::from(".env"));
        assert_eq!(parsed.variables["HOST"], "localhost");
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let temp = TempDir::new().expect("tmp");
        std::fs::create_dir(temp.path().join(".env")).expect("dir");
        let err = parse_file(temp.path(), ".env").unwrap_err();
        assert!(matches!(err, EnvGuardError::ReadFailed { .. }));
    }
}
