//! Process environment access.
//!
//! The engine never reads `std::env` directly; it goes through an
//! [`EnvSource`] so embedding code and tests can supply a fixed environment.

use std::collections::BTreeMap;

/// Read-only view of a process environment.
pub trait EnvSource {
    /// Value of a single variable, if set.
    fn var(&self, name: &str) -> Option<String>;

    /// Every variable in the environment.
    fn vars(&self) -> Vec<(String, String)>;
}

/// The real process environment.
///
/// Entries whose name or value is not valid UTF-8 are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }
}

/// An in-memory environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticEnv {
    vars: BTreeMap<String, String>,
}

impl StaticEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a variable.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }
}

impl<K, V> FromIterator<(K, V)> for StaticEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl EnvSource for StaticEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.vars
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn static_env_lookup() {
        let env = StaticEnv::new().with("HOST", "localhost").with("PORT", "3000");
        assert_eq!(env.var("HOST").as_deref(), Some("localhost"));
        assert_eq!(env.var("MISSING"), None);
        assert_eq!(env.vars().len(), 2);
    }

    #[test]
    fn static_env_from_iter() {
        let env: StaticEnv = [("A", "1"), ("B", "2")].into_iter().collect();
        assert_eq!(
            env.vars(),
            vec![
                ("A".to_string(), "1".to_string()),
                ("B".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn process_env_sees_path() {
        let env = ProcessEnv;
        let from_vars = env.vars().into_iter().find(|(key, _)| key == "PATH");
        assert_eq!(from_vars.map(|(_, value)| value), env.var("PATH"));
    }
}
