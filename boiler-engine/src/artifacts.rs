//! Deployment artifact extraction
//!
//! Deployed repositories carry a reserved `.boiler/` directory with their
//! deployment contract files: a compose descriptor, a container build
//! recipe, and optionally a reverse-proxy site definition. Secrets live
//! outside the repository, in the operator's configuration directory.

use boiler_core::StageError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reserved in-repository directory holding deployment contract files
pub const CONTRACT_DIR: &str = ".boiler";

/// Compose-style multi-container descriptor
pub const COMPOSE_FILE: &str = "docker-compose.yml";

/// Container build recipe
pub const DOCKERFILE: &str = "Dockerfile";

/// Optional reverse-proxy site definition
pub const NGINX_SITE: &str = "nginx";

/// Copies the deployment configuration out of a fetched project
///
/// The compose descriptor lands at the workspace root (where the container
/// engine is invoked); the build recipe lands inside the project directory,
/// which is the compose file's build context.
pub fn copy_deploy_config(project_dir: &Path, workspace: &Path) -> Result<(), StageError> {
    let contract = project_dir.join(CONTRACT_DIR);

    copy_artifact(&contract.join(COMPOSE_FILE), &workspace.join(COMPOSE_FILE))?;
    copy_artifact(&contract.join(DOCKERFILE), &project_dir.join(DOCKERFILE))?;

    Ok(())
}

/// Copies the project's environment file into the workspace as `.env`
///
/// The source lives in the operator's own configuration directory as
/// `<project>.env`, never in the fetched repository.
pub fn copy_env_config(
    config_dir: &Path,
    project_name: &str,
    workspace: &Path,
) -> Result<(), StageError> {
    let source = config_dir.join(format!("{project_name}.env"));
    copy_artifact(&source, &workspace.join(".env"))
}

/// Location of the optional proxy site definition in a fetched project
pub fn nginx_site_path(project_dir: &Path) -> PathBuf {
    project_dir.join(CONTRACT_DIR).join(NGINX_SITE)
}

fn copy_artifact(source: &Path, dest: &Path) -> Result<(), StageError> {
    if !source.is_file() {
        return Err(StageError::artifact_missing(source));
    }

    fs::copy(source, dest).map_err(|e| StageError::workspace(dest, e))?;
    debug!("Copied {} to {}", source.display(), dest.display());

    Ok(())
}
