use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary project directory holding env files.
#[derive(Debug)]
pub struct EnvFixture {
    dir: TempDir,
}

impl EnvFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Write `contents` to `name` inside the fixture and return the fixture.
    pub fn with_file(self, name: &str, contents: &str) -> Self {
        self.write(name, contents);
        self
    }

    /// Write a file, creating parent directories as needed.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture dir");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Default for EnvFixture {
    fn default() -> Self {
        Self::new()
    }
}
