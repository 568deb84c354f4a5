//! Test helpers shared across envguard crates.

pub mod fixture;
pub mod schema;

pub use fixture::EnvFixture;
pub use schema::{FixedSchema, RecordingSchema};
