//! Tests for config document loading and discovery.

use super::*;
use crate::{EnvFiles, FieldKind, Tier};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write JSON5 contents to a path, creating parent directories if needed.
fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// An empty document decodes with defaults.
#[test]
fn parse_minimal_config() {
    let config = EnvGuardConfig::load_from_str("{}").expect("config");
    assert_eq!(config, EnvGuardConfig::default());
    assert_eq!(config.tier_var, "APP_ENV");
}

#[test]
fn parse_full_config() {
    let json5 = r#"{
        // server
        fields: [
            { name: "NODE_ENV", type: "enum", options: ["development", "production"], default: "development" },
            { name: "PORT", type: "number", default: 3000 },
            { name: "DATABASE_URL", type: "url" },
            { name: "API_KEY", min: 20, description: "API authentication key" },
            { name: "DB_POOL_SIZE", type: "integer", optional: true },
        ],
        env_files: [".env.local", ".env"],
        required_in_production: ["DATABASE_URL", "API_KEY"],
        strict: true,
        expand: true,
        tier_var: "NODE_ENV",
    }"#;
    let config = EnvGuardConfig::load_from_str(json5).expect("config");

    assert_eq!(config.fields.len(), 5);
    assert_eq!(config.fields[0].kind, FieldKind::Enum);
    assert_eq!(
        config.fields[1]
            .default
            .as_ref()
            .and_then(serde_json::Value::as_f64),
        Some(3000.0)
    );
    assert_eq!(config.fields[3].kind, FieldKind::String);
    assert_eq!(config.fields[3].min, Some(20.0));
    assert!(config.fields[4].is_optional());
    assert_eq!(
        config.env_files,
        Some(EnvFiles::List(vec![
            ".env.local".to_string(),
            ".env".to_string()
        ]))
    );
    assert!(config.strict);
    assert!(config.expand);
    assert_eq!(config.tier_var, "NODE_ENV");
}

#[test]
fn parse_per_tier_env_files() {
    let json5 = r#"{ env_files: { production: [".env.production"], test: [".env.test", ".env"] } }"#;
    let config = EnvGuardConfig::load_from_str(json5).expect("config");
    assert_eq!(
        config.resolve_env_files(&Tier::Production),
        vec![".env.production".to_string()]
    );
    assert_eq!(
        config.resolve_env_files(&Tier::Development),
        vec![".env".to_string()]
    );
}

/// Reject unexpected top-level config keys.
#[test]
fn rejects_unknown_top_level_key() {
    let err = EnvGuardConfig::load_from_str("{ unexpected: true }").unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("unknown key"));
    assert!(msg.contains("unexpected"));
}

#[test]
fn rejects_unknown_field_key() {
    let json5 = r#"{ fields: [{ name: "PORT", kind: "number" }] }"#;
    let err = EnvGuardConfig::load_from_str(json5).unwrap_err();
    assert!(format!("{err}").contains("fields[0].kind"));
}

#[test]
fn rejects_unknown_field_type() {
    let json5 = r#"{ fields: [{ name: "PORT", type: "float" }] }"#;
    let err = EnvGuardConfig::load_from_str(json5).unwrap_err();
    assert!(format!("{err}").contains("fields[0].type"));
}

#[test]
fn rejects_enum_without_options() {
    let json5 = r#"{ fields: [{ name: "MODE", type: "enum" }] }"#;
    let err = EnvGuardConfig::load_from_str(json5).unwrap_err();
    assert!(format!("{err}").contains("requires options"));
}

#[test]
fn rejects_invalid_field_name() {
    let json5 = r#"{ fields: [{ name: "MY-VAR" }] }"#;
    let err = EnvGuardConfig::load_from_str(json5).unwrap_err();
    assert!(format!("{err}").contains("MY-VAR"));
}

#[test]
fn rejects_duplicate_field() {
    let json5 = r#"{ fields: [{ name: "PORT" }, { name: "PORT" }] }"#;
    let err = EnvGuardConfig::load_from_str(json5).unwrap_err();
    assert!(format!("{err}").contains("more than once"));
}

#[test]
fn rejects_non_string_env_file() {
    let json5 = r#"{ env_files: [".env", 3] }"#;
    let err = EnvGuardConfig::load_from_str(json5).unwrap_err();
    assert!(format!("{err}").contains("env_files[1]"));
}

#[test]
fn discover_prefers_cwd_over_project_root() {
    let temp = TempDir::new().expect("tmp");
    let project_root = temp.path().join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");
    let cwd = project_root.join("service");
    fs::create_dir_all(&cwd).expect("cwd");

    write_json5(
        &project_root.join(DEFAULT_CONFIG_FILE),
        r#"{ tier_var: "ROOT_ENV" }"#,
    );
    write_json5(&cwd.join(DEFAULT_CONFIG_FILE), r#"{ tier_var: "CWD_ENV" }"#);

    let (config, path) = EnvGuardConfig::discover(&cwd).expect("discover");
    assert_eq!(config.tier_var, "CWD_ENV");
    assert!(path.ends_with("service/envguard.json5"));
}

#[test]
fn discover_walks_up_to_project_root() {
    let temp = TempDir::new().expect("tmp");
    let project_root = temp.path().join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");
    let cwd = project_root.join("a").join("b");
    fs::create_dir_all(&cwd).expect("cwd");

    write_json5(
        &project_root
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILE),
        r#"{ strict: true }"#,
    );

    let (config, _) = EnvGuardConfig::discover(&cwd).expect("discover");
    assert!(config.strict);
}

#[test]
fn discover_does_not_escape_project_root() {
    let temp = TempDir::new().expect("tmp");
    write_json5(&temp.path().join(DEFAULT_CONFIG_FILE), "{}");
    let project_root = temp.path().join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");

    let err = EnvGuardConfig::discover(&project_root).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
}
