use crate::diagnostic::Diagnostic;
use crate::types::Provenance;
use std::path::PathBuf;

/// Result of one validation run.
///
/// Provenance is carried by both variants so callers can always report where
/// values came from. `loaded_files` lists the env files that were read, highest
/// priority first.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome<T> {
    Success {
        data: T,
        loaded_from: Provenance,
        loaded_files: Vec<PathBuf>,
    },
    /// `diagnostics` is never empty.
    Failure {
        diagnostics: Vec<Diagnostic>,
        loaded_from: Provenance,
        loaded_files: Vec<PathBuf>,
    },
}

impl<T> ValidationOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ValidationOutcome::Success { .. })
    }

    pub fn loaded_from(&self) -> &Provenance {
        match self {
            ValidationOutcome::Success { loaded_from, .. }
            | ValidationOutcome::Failure { loaded_from, .. } => loaded_from,
        }
    }

    pub fn loaded_files(&self) -> &[PathBuf] {
        match self {
            ValidationOutcome::Success { loaded_files, .. }
            | ValidationOutcome::Failure { loaded_files, .. } => loaded_files,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ValidationOutcome::Success { data, .. } => Some(data),
            ValidationOutcome::Failure { .. } => None,
        }
    }

    /// Diagnostics of a failed run; empty on success.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            ValidationOutcome::Success { .. } => &[],
            ValidationOutcome::Failure { diagnostics, .. } => diagnostics,
        }
    }

    pub fn into_result(self) -> Result<(T, Provenance), (Vec<Diagnostic>, Provenance)> {
        match self {
            ValidationOutcome::Success {
                data, loaded_from, ..
            } => Ok((data, loaded_from)),
            ValidationOutcome::Failure {
                diagnostics,
                loaded_from,
                ..
            } => Err((diagnostics, loaded_from)),
        }
    }
}
