use envguard_core::{EnvMap, FieldDescriptor, Issue, Schema};
use parking_lot::Mutex;
use std::sync::Arc;

/// Schema that declares fixed fields and returns fixed issues.
///
/// With no issues it accepts any mapping and echoes it back.
#[derive(Debug, Clone, Default)]
pub struct FixedSchema {
    fields: Vec<FieldDescriptor>,
    issues: Vec<Issue>,
}

impl FixedSchema {
    /// Accept everything and declare `names` as required fields.
    pub fn accepting<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: names.into_iter().map(FieldDescriptor::new).collect(),
            issues: Vec::new(),
        }
    }

    /// Reject every mapping with `issues`.
    pub fn rejecting(issues: Vec<Issue>) -> Self {
        let fields = issues
            .iter()
            .map(|issue| FieldDescriptor::new(issue.field.clone()))
            .collect();
        Self { fields, issues }
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }
}

impl Schema for FixedSchema {
    type Output = EnvMap;

    fn fields(&self) -> Vec<FieldDescriptor> {
        self.fields.clone()
    }

    fn validate(&self, values: &EnvMap) -> Result<EnvMap, Vec<Issue>> {
        if self.issues.is_empty() {
            Ok(values.clone())
        } else {
            Err(self.issues.clone())
        }
    }
}

/// Schema that accepts everything and records the mapping it was given.
#[derive(Debug, Clone)]
pub struct RecordingSchema {
    fields: Vec<FieldDescriptor>,
    seen: Arc<Mutex<Vec<EnvMap>>>,
}

impl RecordingSchema {
    pub fn new<I, S>(names: I) -> (Self, Arc<Mutex<Vec<EnvMap>>>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let seen = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                fields: names.into_iter().map(FieldDescriptor::new).collect(),
                seen: seen.clone(),
            },
            seen,
        )
    }
}

impl Schema for RecordingSchema {
    type Output = EnvMap;

    fn fields(&self) -> Vec<FieldDescriptor> {
        self.fields.clone()
    }

    fn validate(&self, values: &EnvMap) -> Result<EnvMap, Vec<Issue>> {
        self.seen.lock().push(values.clone());
        Ok(values.clone())
    }
}
