//! Version-control access
//!
//! Fetching a tagged revision is the only version-control operation the
//! pipeline performs, plus stripping the metadata directory afterwards so
//! deployed trees carry no repository history.

use boiler_core::StageError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Name of the metadata directory stripped after a fetch
const VCS_METADATA_DIR: &str = ".git";

/// Narrow interface over the version-control tool
///
/// Implementations must fail when the external process exits non-zero or
/// when the destination directory ends up absent or empty, since every
/// later stage depends on the fetched contents unconditionally.
pub trait VcsClient: Send + Sync {
    /// Checks that the version-control tool is installed and working
    fn check(&self) -> Result<(), StageError>;

    /// Fetches `revision` of `remote` into `dest`
    ///
    /// Performs a shallow, single-branch, submodule-inclusive checkout.
    fn fetch(&self, remote: &str, revision: &str, dest: &Path) -> Result<(), StageError>;
}

/// Standard implementation shelling out to the `git` binary
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl VcsClient for GitCli {
    fn check(&self) -> Result<(), StageError> {
        let output = Command::new("git").arg("--version").output().map_err(|e| {
            StageError::RequirementsNotMet(format!(
                "failed to execute 'git --version', is git installed? ({e})"
            ))
        })?;

        if !output.status.success() {
            return Err(StageError::RequirementsNotMet(
                "git is not working correctly".to_string(),
            ));
        }

        let version = String::from_utf8_lossy(&output.stdout);
        debug!("git is available: {}", version.trim());

        Ok(())
    }

    fn fetch(&self, remote: &str, revision: &str, dest: &Path) -> Result<(), StageError> {
        info!("Cloning {} at {} into {}", remote, revision, dest.display());

        let output = Command::new("git")
            .arg("clone")
            .arg("-b")
            .arg(revision)
            .arg("--single-branch")
            .arg("--recurse-submodules")
            .arg(remote)
            .arg(dest)
            .output()
            .map_err(|e| StageError::fetch(remote, revision, format!("failed to run git: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !stdout.trim().is_empty() {
            debug!("git clone stdout: {}", stdout.trim());
        }
        if !stderr.trim().is_empty() {
            debug!("git clone stderr: {}", stderr.trim());
        }

        if !output.status.success() {
            let exit_code = output.status.code().unwrap_or(-1);
            return Err(StageError::fetch(
                remote,
                revision,
                format!("git clone exited with code {}: {}", exit_code, stderr.trim()),
            ));
        }

        // A "successful" clone of a missing ref can still leave nothing
        // usable behind; treat an absent or empty destination as a failure.
        let populated = fs::read_dir(dest)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false);
        if !populated {
            return Err(StageError::fetch(
                remote,
                revision,
                "clone left the destination directory absent or empty",
            ));
        }

        Ok(())
    }
}

/// Removes the version-control metadata directory inside a fetched project
///
/// A missing metadata directory is ignored; any other failure (typically
/// permissions) is surfaced.
pub fn scrub_metadata(project_dir: &Path) -> Result<(), StageError> {
    let metadata = project_dir.join(VCS_METADATA_DIR);

    match fs::remove_dir_all(&metadata) {
        Ok(()) => {
            debug!("Removed {}", metadata.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StageError::workspace(&metadata, e)),
    }
}
