//! Built-in schema over flat string variables.

use crate::error::EnvGuardError;
use crate::schema::{FieldDescriptor, Issue, IssueKind, Schema};
use crate::types::EnvMap;
use envguard_config::{FieldKind, FieldSpec, is_identifier};
use serde_json::{Map, Number, Value};
use std::collections::BTreeSet;
use url::Url;

/// Validation rules for a single variable.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    kind: FieldKind,
    optional: bool,
    default: Option<Value>,
    min: Option<f64>,
    max: Option<f64>,
    options: Vec<String>,
    description: Option<String>,
}

impl FieldSchema {
    fn of(kind: FieldKind) -> Self {
        Self {
            kind,
            optional: false,
            default: None,
            min: None,
            max: None,
            options: Vec::new(),
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::of(FieldKind::String)
    }

    /// Any finite number.
    pub fn number() -> Self {
        Self::of(FieldKind::Number)
    }

    pub fn integer() -> Self {
        Self::of(FieldKind::Integer)
    }

    pub fn boolean() -> Self {
        Self::of(FieldKind::Boolean)
    }

    pub fn url() -> Self {
        Self::of(FieldKind::Url)
    }

    pub fn enumeration<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut schema = Self::of(FieldKind::Enum);
        schema.options = options.into_iter().map(Into::into).collect();
        schema
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Typed value used when the variable is absent.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Minimum length for strings and urls, minimum value for numbers.
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Maximum length for strings and urls, maximum value for numbers.
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Coerce and check one raw value.
    fn check(&self, name: &str, raw: &str) -> Result<Value, Issue> {
        match self.kind {
            FieldKind::String => {
                self.check_length(name, raw)?;
                Ok(Value::String(raw.to_string()))
            }
            FieldKind::Number => {
                let number = parse_number(raw)
                    .ok_or_else(|| invalid_type(name, "number", received_for(raw)))?;
                self.check_range(name, number)?;
                Ok(number_value(number))
            }
            FieldKind::Integer => {
                let Some(number) = parse_number(raw) else {
                    return Err(invalid_type(name, "integer", received_for(raw)));
                };
                if number.fract() != 0.0 {
                    return Err(invalid_type(name, "integer", "float"));
                }
                self.check_range(name, number)?;
                Ok(number_value(number))
            }
            FieldKind::Boolean => parse_bool(raw)
                .map(Value::Bool)
                .ok_or_else(|| invalid_type(name, "boolean", "string")),
            FieldKind::Enum => {
                if self.options.iter().any(|option| option == raw) {
                    return Ok(Value::String(raw.to_string()));
                }
                let expected = self
                    .options
                    .iter()
                    .map(|option| format!("'{option}'"))
                    .collect::<Vec<_>>()
                    .join(" | ");
                Err(Issue::new(
                    name,
                    IssueKind::InvalidEnumValue {
                        options: self.options.clone(),
                        received: raw.to_string(),
                    },
                    format!("Invalid enum value. Expected {expected}, received '{raw}'"),
                ))
            }
            FieldKind::Url => {
                if Url::parse(raw).is_err() {
                    return Err(Issue::new(
                        name,
                        IssueKind::InvalidString {
                            validation: "url".to_string(),
                        },
                        "Invalid url",
                    ));
                }
                self.check_length(name, raw)?;
                Ok(Value::String(raw.to_string()))
            }
        }
    }

    fn check_length(&self, name: &str, raw: &str) -> Result<(), Issue> {
        let length = raw.chars().count() as f64;
        if let Some(min) = self.min
            && length < min
        {
            return Err(Issue::new(
                name,
                IssueKind::TooSmall { minimum: min },
                format!("String must contain at least {min} character(s)"),
            ));
        }
        if let Some(max) = self.max
            && length > max
        {
            return Err(Issue::new(
                name,
                IssueKind::TooBig { maximum: max },
                format!("String must contain at most {max} character(s)"),
            ));
        }
        Ok(())
    }

    fn check_range(&self, name: &str, number: f64) -> Result<(), Issue> {
        if let Some(min) = self.min
            && number < min
        {
            return Err(Issue::new(
                name,
                IssueKind::TooSmall { minimum: min },
                format!("Number must be greater than or equal to {min}"),
            ));
        }
        if let Some(max) = self.max
            && number > max
        {
            return Err(Issue::new(
                name,
                IssueKind::TooBig { maximum: max },
                format!("Number must be less than or equal to {max}"),
            ));
        }
        Ok(())
    }
}

impl From<&FieldSpec> for FieldSchema {
    fn from(spec: &FieldSpec) -> Self {
        Self {
            kind: spec.kind,
            optional: spec.optional,
            default: spec.default.clone(),
            min: spec.min,
            max: spec.max,
            options: spec.options.clone(),
            description: spec.description.clone(),
        }
    }
}

/// Object schema: an ordered set of named fields.
///
/// Validation coerces each raw string to its declared type. Absent fields take
/// their default, or are omitted from the output when optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    fields: Vec<(String, FieldSchema)>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field. Redeclaring a name replaces the earlier rules in place.
    pub fn field(mut self, name: impl Into<String>, schema: FieldSchema) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = schema,
            None => self.fields.push((name, schema)),
        }
        self
    }

    /// Build from declarative field specs.
    pub fn from_specs(specs: &[FieldSpec]) -> Result<Self, EnvGuardError> {
        let mut seen = BTreeSet::new();
        let mut fields = Vec::with_capacity(specs.len());
        for spec in specs {
            if !is_identifier(&spec.name) {
                return Err(EnvGuardError::InvalidSchema(format!(
                    "invalid field name {:?}",
                    spec.name
                )));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(EnvGuardError::InvalidSchema(format!(
                    "field {} declared more than once",
                    spec.name
                )));
            }
            if spec.kind == FieldKind::Enum && spec.options.is_empty() {
                return Err(EnvGuardError::InvalidSchema(format!(
                    "enum field {} has no options",
                    spec.name
                )));
            }
            fields.push((spec.name.clone(), FieldSchema::from(spec)));
        }
        Ok(Self { fields })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Schema for ObjectSchema {
    type Output = Map<String, Value>;

    fn fields(&self) -> Vec<FieldDescriptor> {
        self.fields
            .iter()
            .map(|(name, schema)| FieldDescriptor {
                name: name.clone(),
                optional: schema.optional,
                default: schema.default.clone(),
                description: schema.description.clone(),
            })
            .collect()
    }

    fn validate(&self, values: &EnvMap) -> Result<Self::Output, Vec<Issue>> {
        let mut data = Map::new();
        let mut issues = Vec::new();

        for (name, schema) in &self.fields {
            match values.get(name) {
                Some(raw) => match schema.check(name, raw) {
                    Ok(value) => {
                        data.insert(name.clone(), value);
                    }
                    Err(issue) => issues.push(issue),
                },
                None => {
                    if let Some(default) = &schema.default {
                        data.insert(name.clone(), default.clone());
                    } else if !schema.optional {
                        issues.push(Issue::missing(name, schema.kind.as_str()));
                    }
                }
            }
        }

        if issues.is_empty() {
            Ok(data)
        } else {
            Err(issues)
        }
    }
}

fn invalid_type(name: &str, expected: &str, received: &str) -> Issue {
    Issue::new(
        name,
        IssueKind::InvalidType {
            expected: expected.to_string(),
            received: received.to_string(),
        },
        format!("Expected {expected}, received {received}"),
    )
}

fn received_for(raw: &str) -> &'static str {
    if raw.trim().parse::<f64>().is_ok() {
        "nan"
    } else {
        "string"
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let number = raw.trim().parse::<f64>().ok()?;
    number.is_finite().then_some(number)
}

/// Whole numbers become JSON integers so `3000` compares equal to `json!(3000)`.
fn number_value(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
        return Value::from(number as i64);
    }
    Number::from_f64(number).map_or(Value::Null, Value::Number)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> EnvMap {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn coerces_numbers_and_strings() {
        let schema = ObjectSchema::new()
            .field("PORT", FieldSchema::number())
            .field("HOST", FieldSchema::string());
        let data = schema
            .validate(&env(&[("PORT", "3000"), ("HOST", "localhost")]))
            .expect("valid");
        assert_eq!(data["PORT"], json!(3000));
        assert_eq!(data["HOST"], json!("localhost"));
    }

    #[test]
    fn keeps_fractional_numbers() {
        let schema = ObjectSchema::new().field("RATIO", FieldSchema::number());
        let data = schema.validate(&env(&[("RATIO", "0.25")])).expect("valid");
        assert_eq!(data["RATIO"], json!(0.25));
    }

    #[test]
    fn applies_defaults_and_omits_optional() {
        let schema = ObjectSchema::new()
            .field("PORT", FieldSchema::number().default(8080))
            .field("DEBUG", FieldSchema::boolean().optional());
        let data = schema.validate(&EnvMap::new()).expect("valid");
        assert_eq!(data.get("PORT"), Some(&json!(8080)));
        assert!(!data.contains_key("DEBUG"));
    }

    #[test]
    fn reports_missing_required_field() {
        let schema = ObjectSchema::new().field("REQUIRED", FieldSchema::string());
        let issues = schema.validate(&EnvMap::new()).unwrap_err();
        assert_eq!(issues, vec![Issue::missing("REQUIRED", "string")]);
    }

    #[test]
    fn issues_follow_declaration_order() {
        let schema = ObjectSchema::new()
            .field("ZETA", FieldSchema::string())
            .field("ALPHA", FieldSchema::number())
            .field("MID", FieldSchema::boolean());
        let issues = schema
            .validate(&env(&[("ALPHA", "abc"), ("MID", "maybe")]))
            .unwrap_err();
        let fields: Vec<_> = issues.iter().map(|issue| issue.field.as_str()).collect();
        assert_eq!(fields, vec!["ZETA", "ALPHA", "MID"]);
        assert_eq!(issues[1].message, "Expected number, received string");
    }

    #[test]
    fn empty_string_is_not_a_number() {
        let schema = ObjectSchema::new().field("PORT", FieldSchema::number());
        let issues = schema.validate(&env(&[("PORT", "")])).unwrap_err();
        assert!(matches!(issues[0].kind, IssueKind::InvalidType { .. }));
    }

    #[test]
    fn integer_rejects_fractions() {
        let schema = ObjectSchema::new().field("POOL", FieldSchema::integer());
        let issues = schema.validate(&env(&[("POOL", "2.5")])).unwrap_err();
        assert_eq!(
            issues[0].kind,
            IssueKind::InvalidType {
                expected: "integer".to_string(),
                received: "float".to_string()
            }
        );
    }

    #[test]
    fn string_length_constraints() {
        let schema = ObjectSchema::new().field("API_KEY", FieldSchema::string().min(20.0));
        let issues = schema
            .validate(&env(&[("API_KEY", "1234567890")]))
            .unwrap_err();
        assert_eq!(issues[0].kind, IssueKind::TooSmall { minimum: 20.0 });
        assert_eq!(
            issues[0].message,
            "String must contain at least 20 character(s)"
        );
    }

    #[test]
    fn number_range_constraints() {
        let schema =
            ObjectSchema::new().field("PORT", FieldSchema::number().min(1.0).max(65535.0));
        let issues = schema.validate(&env(&[("PORT", "70000")])).unwrap_err();
        assert_eq!(issues[0].kind, IssueKind::TooBig { maximum: 65535.0 });
        assert_eq!(issues[0].message, "Number must be less than or equal to 65535");
    }

    #[test]
    fn boolean_forms() {
        let schema = ObjectSchema::new()
            .field("A", FieldSchema::boolean())
            .field("B", FieldSchema::boolean());
        let data = schema
            .validate(&env(&[("A", "Yes"), ("B", "0")]))
            .expect("valid");
        assert_eq!(data["A"], json!(true));
        assert_eq!(data["B"], json!(false));
    }

    #[test]
    fn enum_violation_lists_options() {
        let schema = ObjectSchema::new().field(
            "NODE_ENV",
            FieldSchema::enumeration(["development", "production"]),
        );
        let issues = schema
            .validate(&env(&[("NODE_ENV", "staging")]))
            .unwrap_err();
        assert_eq!(
            issues[0].message,
            "Invalid enum value. Expected 'development' | 'production', received 'staging'"
        );
    }

    #[test]
    fn url_must_be_absolute() {
        let schema = ObjectSchema::new().field("DATABASE_URL", FieldSchema::url());
        assert!(
            schema
                .validate(&env(&[("DATABASE_URL", "postgres://localhost/db")]))
                .is_ok()
        );
        let issues = schema
            .validate(&env(&[("DATABASE_URL", "localhost/db")]))
            .unwrap_err();
        assert_eq!(issues[0].message, "Invalid url");
    }

    #[test]
    fn from_specs_mirrors_config_fields() {
        let schema = ObjectSchema::from_specs(&[
            FieldSpec::number("PORT").with_default(3000),
            FieldSpec::string("HOST"),
        ])
        .expect("schema");
        let fields = schema.fields();
        assert_eq!(fields.len(), 2);
        assert!(fields[0].is_optional());
        assert_eq!(fields[0].default_value(), Some(&json!(3000)));
        assert!(!fields[1].is_optional());
    }

    #[test]
    fn from_specs_rejects_enum_without_options() {
        let mut spec = FieldSpec::string("MODE");
        spec.kind = FieldKind::Enum;
        let err = ObjectSchema::from_specs(&[spec]).unwrap_err();
        assert!(matches!(err, EnvGuardError::InvalidSchema(_)));
    }

    #[test]
    fn redeclaring_replaces_in_place() {
        let schema = ObjectSchema::new()
            .field("A", FieldSchema::string())
            .field("B", FieldSchema::string())
            .field("A", FieldSchema::number());
        let names: Vec<_> = schema.fields().into_iter().map(|field| field.name).collect();
        assert_eq!(names, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(schema.len(), 2);
    }
}
