//! Workspace management
//!
//! Each pipeline run owns one workspace directory named after its project.
//! A pre-existing directory of the same name is removed before creation, so
//! a run never inherits stale state from an earlier attempt.

use boiler_core::StageError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix for workspace directory names
pub const WORKSPACE_PREFIX: &str = "boiler_";

/// Workspace directory name for a project
pub fn directory_name(project_name: &str) -> String {
    format!("{WORKSPACE_PREFIX}{project_name}")
}

/// Creates a fresh workspace directory under `work_root`
///
/// Removes any existing directory of the same name first. There are no
/// merge semantics: the returned directory is always empty.
pub fn create_fresh(work_root: &Path, name: &str) -> Result<PathBuf, StageError> {
    let path = work_root.join(name);

    if path.is_dir() {
        debug!("Removing stale workspace at {}", path.display());
        fs::remove_dir_all(&path).map_err(|e| StageError::workspace(&path, e))?;
    }

    fs::create_dir_all(&path).map_err(|e| StageError::workspace(&path, e))?;

    Ok(path)
}

/// Removes a workspace directory
///
/// Best-effort: an already-missing directory is not an error, but a
/// permission failure is surfaced to the caller.
pub fn destroy(path: &Path) -> Result<(), StageError> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StageError::workspace(path, e)),
    }
}
