//! Environment validation engine for envguard.
//!
//! This crate owns env file parsing and merging, placeholder expansion, the
//! schema capability and its built-in object schema, and the staged
//! validation pipeline that turns failures into located diagnostics.

pub mod diagnostic;
pub mod env;
pub mod error;
pub mod expand;
pub mod format;
pub mod handle;
pub mod merge;
pub mod object_schema;
mod outcome;
pub mod parser;
pub mod redact;
pub mod schema;
pub mod types;
pub mod validator;

/// Diagnostics and their rendering.
pub use diagnostic::{Diagnostic, suggestion_for};
pub use format::{format_errors, format_outcome, format_success};
/// Process environment access.
pub use env::{EnvSource, ProcessEnv, StaticEnv};
pub use error::EnvGuardError;
pub use handle::ValidatedEnv;
pub use merge::{MergedEnvironment, load_files};
/// Schema capability and the built-in implementation.
pub use object_schema::{FieldSchema, ObjectSchema};
pub use outcome::ValidationOutcome;
pub use parser::{ParsedFile, parse_file, parse_str};
pub use redact::redact_if_secret;
pub use schema::{FieldDescriptor, Issue, IssueKind, Schema};
pub use types::{EnvMap, Provenance, VarSource};
pub use validator::EnvValidator;
