//! Container lifecycle control
//!
//! Wraps the external container-orchestration tool. The three lifecycle
//! operations report the subprocess's success flag instead of erroring:
//! whether a failure aborts the run is the pipeline's decision, not this
//! layer's.

use boiler_core::StageError;
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// Narrow interface over the container-orchestration tool
pub trait ContainerEngine: Send + Sync {
    /// Checks that the tool is installed and working
    fn check(&self) -> Result<(), StageError>;

    /// Builds the service images from the workspace's compose descriptor
    fn build(&self, workspace: &Path) -> bool;

    /// Stops and removes the currently running containers
    fn stop(&self, workspace: &Path) -> bool;

    /// Starts the new containers detached
    fn start(&self, workspace: &Path) -> bool;
}

/// Standard implementation shelling out to `docker-compose`
///
/// Every invocation runs with the workspace as its working directory, so
/// the compose descriptor and `.env` extracted there are picked up.
pub struct ComposeCli;

impl ComposeCli {
    pub fn new() -> Self {
        Self
    }

    fn run(&self, workspace: &Path, args: &[&str]) -> bool {
        debug!("Running docker-compose {:?} in {}", args, workspace.display());

        let output = match Command::new("docker-compose")
            .args(args)
            .current_dir(workspace)
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                warn!("Failed to execute docker-compose {:?}: {}", args, e);
                return false;
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !stdout.trim().is_empty() {
            debug!("docker-compose stdout: {}", stdout.trim());
        }
        if !stderr.trim().is_empty() {
            debug!("docker-compose stderr: {}", stderr.trim());
        }

        if !output.status.success() {
            warn!(
                "docker-compose {:?} exited with code {}",
                args,
                output.status.code().unwrap_or(-1)
            );
        }

        output.status.success()
    }
}

impl Default for ComposeCli {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerEngine for ComposeCli {
    fn check(&self) -> Result<(), StageError> {
        let output = Command::new("docker-compose")
            .arg("version")
            .output()
            .map_err(|e| {
                StageError::RequirementsNotMet(format!(
                    "failed to execute 'docker-compose version', is docker-compose installed? ({e})"
                ))
            })?;

        if !output.status.success() {
            return Err(StageError::RequirementsNotMet(
                "docker-compose is not working correctly".to_string(),
            ));
        }

        let version = String::from_utf8_lossy(&output.stdout);
        debug!("docker-compose is available: {}", version.trim());

        Ok(())
    }

    fn build(&self, workspace: &Path) -> bool {
        self.run(workspace, &["build"])
    }

    fn stop(&self, workspace: &Path) -> bool {
        self.run(workspace, &["down"])
    }

    fn start(&self, workspace: &Path) -> bool {
        self.run(workspace, &["up", "-d"])
    }
}
