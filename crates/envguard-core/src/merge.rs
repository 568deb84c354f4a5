//! Merging env files by priority.

use crate::error::EnvGuardError;
use crate::parser::parse_file;
use crate::types::{EnvMap, Provenance, VarSource};
use log::debug;
use std::path::{Path, PathBuf};

/// Variables merged from several env files, with their origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedEnvironment {
    pub values: EnvMap,
    /// For every key in `values`, the file (and line) that supplied it.
    pub sources: Provenance,
    /// Files that existed and were read, in priority order.
    pub loaded_files: Vec<PathBuf>,
}

/// Load `paths` (highest priority first) and merge them.
///
/// The first file that defines a key wins; later definitions are discarded.
/// Missing files contribute nothing.
pub fn load_files<P: AsRef<Path>>(
    base_dir: &Path,
    paths: &[P],
) -> Result<MergedEnvironment, EnvGuardError> {
    let mut merged = MergedEnvironment::default();

    for path in paths {
        let parsed = parse_file(base_dir, path)?;
        if !parsed.exists {
            continue;
        }
        let mut contributed = 0usize;
        for (name, value) in parsed.variables {
            if merged.values.contains_key(&name) {
                debug!(
                    "{name} from {} shadowed by higher-priority file",
                    parsed.path.display()
                );
                continue;
            }
            let line = parsed.lines.get(&name).copied().unwrap_or_default();
            merged
                .sources
                .insert(name.clone(), VarSource::new(parsed.path.clone(), line));
            merged.values.insert(name, value);
            contributed += 1;
        }
        debug!(
            "merged {} vars from {}",
            contributed,
            parsed.path.display()
        );
        merged.loaded_files.push(parsed.path);
    }

    Ok(merged)
}
