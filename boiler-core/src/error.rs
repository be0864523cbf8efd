//! Error types for pipeline stages

use std::path::PathBuf;
use thiserror::Error;

/// Errors a pipeline stage can abort with
///
/// Every variant is terminal for its run: the pipeline performs no retries
/// and no rollback of container state already changed. Soft-failing stages
/// (build/stop/start) never produce these; their subprocess result is
/// inspected by the pipeline directly.
#[derive(Debug, Error)]
pub enum StageError {
    /// The host is missing a capability the pipeline needs
    #[error("requirements not met: {0}")]
    RequirementsNotMet(String),

    /// Workspace directory could not be created or removed
    #[error("workspace operation failed at {path}: {source}")]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The revision fetch failed or produced no content
    #[error("failed to fetch {remote} at {revision}: {reason}")]
    Fetch {
        remote: String,
        revision: String,
        reason: String,
    },

    /// A contract file the pipeline expected is absent
    #[error("cannot copy config, missing {path}")]
    ArtifactMissing { path: PathBuf },

    /// The reverse-proxy site definition could not be installed
    #[error("cannot copy proxy config: {0}")]
    ProxyConfig(String),
}

impl StageError {
    /// Workspace error with its path context
    pub fn workspace(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Workspace {
            path: path.into(),
            source,
        }
    }

    /// Fetch error for a remote/revision pair
    pub fn fetch(
        remote: impl Into<String>,
        revision: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Fetch {
            remote: remote.into(),
            revision: revision.into(),
            reason: reason.into(),
        }
    }

    /// Missing-artifact error naming the absent path
    pub fn artifact_missing(path: impl Into<PathBuf>) -> Self {
        Self::ArtifactMissing { path: path.into() }
    }

    /// Check if this error names a missing artifact
    pub fn is_artifact_missing(&self) -> bool {
        matches!(self, Self::ArtifactMissing { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_missing_names_path() {
        let err = StageError::artifact_missing("/tmp/ws/app/.boiler/Dockerfile");
        assert!(err.is_artifact_missing());
        assert!(err.to_string().contains(".boiler/Dockerfile"));
    }

    #[test]
    fn test_fetch_error_message() {
        let err = StageError::fetch("git@example.com:org/app.git", "v1.0", "exit status 128");
        assert!(err.to_string().contains("v1.0"));
        assert!(err.to_string().contains("exit status 128"));
    }
}
