//! Configuration model and loading for envguard.
//!
//! This crate owns the declarative description of what an application's
//! environment must look like (fields, env file lists, tier policy) and the
//! JSON5 document loader used to read it from disk.

mod error;
mod loader;
mod model;
mod tier;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Config discovery constants.
pub use loader::{DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILE};
/// Configuration models.
pub use model::*;
/// Deployment tier.
pub use tier::Tier;

/// Returns true when `name` matches `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

#[cfg(test)]
mod tests {
    use super::is_identifier;

    #[test]
    fn identifier_grammar() {
        assert!(is_identifier("PORT"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("api_key_2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2FAST"));
        assert!(!is_identifier("MY-VAR"));
        assert!(!is_identifier("MY VAR"));
        assert!(!is_identifier("CAFÉ"));
    }
}
