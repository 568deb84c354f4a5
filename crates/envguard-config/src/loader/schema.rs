//! Structural validation for envguard JSON5 documents.

use crate::ConfigError;
use serde_json::{Map, Value};

const FIELD_KINDS: &[&str] = &["string", "number", "integer", "boolean", "enum", "url"];

/// Validate a config document before decoding it.
pub(super) fn validate_document(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    let allowed = [
        "$schema",
        "fields",
        "env_files",
        "required_in_production",
        "strict",
        "expand",
        "tier_var",
    ];
    ensure_allowed_keys(map, &allowed, layer, "")?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("fields") {
        let arr = expect_array(value, layer, "fields")?;
        for (idx, entry) in arr.iter().enumerate() {
            validate_field(entry, layer, &format!("fields[{idx}]"))?;
        }
    }
    if let Some(value) = map.get("env_files") {
        validate_env_files(value, layer, "env_files")?;
    }
    if let Some(value) = map.get("required_in_production") {
        validate_string_array(value, layer, "required_in_production")?;
    }
    for key in ["strict", "expand"] {
        if let Some(value) = map.get(key) {
            expect_bool(value, layer, key)?;
        }
    }
    if let Some(value) = map.get("tier_var") {
        expect_string(value, layer, "tier_var")?;
    }

    Ok(())
}

/// Validate a single field declaration.
fn validate_field(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    let allowed = [
        "name",
        "type",
        "optional",
        "default",
        "min",
        "max",
        "options",
        "description",
    ];
    ensure_allowed_keys(map, &allowed, layer, path)?;

    let name_path = join_path(path, "name");
    let Some(name) = map.get("name") else {
        return Err(invalid_field(layer, &name_path, "missing required field"));
    };
    expect_string(name, layer, &name_path)?;

    if let Some(value) = map.get("type") {
        let type_path = join_path(path, "type");
        let kind = value
            .as_str()
            .ok_or_else(|| invalid_field(layer, &type_path, "expected string"))?;
        if !FIELD_KINDS.contains(&kind) {
            return Err(invalid_field(
                layer,
                &type_path,
                &format!("expected one of {}", FIELD_KINDS.join(", ")),
            ));
        }
    }
    if let Some(value) = map.get("optional") {
        expect_bool(value, layer, &join_path(path, "optional"))?;
    }
    for key in ["min", "max"] {
        if let Some(value) = map.get(key) {
            expect_f64(value, layer, &join_path(path, key))?;
        }
    }
    if let Some(value) = map.get("options") {
        validate_string_array(value, layer, &join_path(path, "options"))?;
    }
    if let Some(value) = map.get("description") {
        expect_string(value, layer, &join_path(path, "description"))?;
    }
    if let Some(value) = map.get("default") {
        if value.is_null() || value.is_array() || value.is_object() {
            return Err(invalid_field(
                layer,
                &join_path(path, "default"),
                "expected string, number, or bool",
            ));
        }
    }
    Ok(())
}

/// Validate `env_files`: either a list or a map of tier name to list.
fn validate_env_files(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    match value {
        Value::Array(_) => validate_string_array(value, layer, path),
        Value::Object(map) => {
            for (tier, files) in map {
                validate_string_array(files, layer, &join_path(path, tier))?;
            }
            Ok(())
        }
        _ => Err(invalid_field(layer, path, "expected array or object")),
    }
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

/// Expect a JSON array or return a typed error.
fn expect_array<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Vec<Value>, ConfigError> {
    match value {
        Value::Array(arr) => Ok(arr),
        _ => Err(invalid_field(layer, path, "expected array")),
    }
}

/// Expect a JSON string or return a typed error.
fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.as_str().is_some() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

/// Expect a JSON boolean or return a typed error.
fn expect_bool(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if matches!(value, Value::Bool(_)) {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected bool"))
    }
}

/// Expect a JSON number or return a typed error.
fn expect_f64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_f64() || value.is_u64() || value.is_i64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected number"))
    }
}

/// Validate that a value is an array of strings.
fn validate_string_array(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let arr = expect_array(value, layer, path)?;
    for (idx, entry) in arr.iter().enumerate() {
        if entry.as_str().is_none() {
            return Err(invalid_field(
                layer,
                &format!("{path}[{idx}]"),
                "expected string",
            ));
        }
    }
    Ok(())
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(layer, &join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
