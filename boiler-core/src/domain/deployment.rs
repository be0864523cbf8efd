//! Deployment requests, pipeline stages and run outcomes
//!
//! Structure shared between the webhook front-end (constructs requests) and
//! the engine (executes them). Execution logic lives in boiler-engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single deployment to perform
///
/// Immutable once constructed; one instance per pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentRequest {
    /// Source-control remote locator, e.g. `git@host:org/name.git`
    pub repository: String,
    /// Explicit project name; derived from the repository when absent
    pub project_name: Option<String>,
    /// Branch or tag to deploy
    pub revision: String,
    /// Stop after extracting configuration, leaving the workspace on disk
    pub skip_build: bool,
    /// Keep the workspace on disk after a successful deploy
    pub skip_clean: bool,
}

impl DeploymentRequest {
    /// Creates a request with default settings (deploy `master`, no skips)
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            project_name: None,
            revision: "master".to_string(),
            skip_build: false,
            skip_clean: false,
        }
    }

    /// Overrides the derived project name
    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    /// Deploys a specific branch or tag instead of `master`
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }

    /// Stops the pipeline after configuration extraction
    pub fn with_skip_build(mut self, skip: bool) -> Self {
        self.skip_build = skip;
        self
    }

    /// Retains the workspace after a successful deploy
    pub fn with_skip_clean(mut self, skip: bool) -> Self {
        self.skip_clean = skip;
        self
    }

    /// The project name for this run, explicit or derived
    pub fn resolved_project_name(&self) -> String {
        self.project_name
            .clone()
            .unwrap_or_else(|| project_name_from_repository(&self.repository))
    }
}

/// Derives a project name from a repository locator
///
/// Takes the text after the last `/` of the path portion (everything after
/// the first `:`, or the whole locator when there is none) and strips a
/// trailing `.git` suffix.
pub fn project_name_from_repository(repository: &str) -> String {
    let path = repository
        .split_once(':')
        .map(|(_, rest)| rest)
        .unwrap_or(repository);
    let last = path.rsplit('/').next().unwrap_or(path);
    last.strip_suffix(".git").unwrap_or(last).to_string()
}

/// A discrete step of the deployment pipeline
///
/// Stages execute strictly in this order; each carries its own failure
/// policy in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Requirements,
    Workspace,
    Fetch,
    ScrubVcsMetadata,
    ExtractDeployConfig,
    ExtractEnvConfig,
    Build,
    StopContainers,
    StartContainers,
    ProxyInstall,
    Clean,
}

impl Stage {
    /// Human-readable label used in logs and console output
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Requirements => "check requirements",
            Stage::Workspace => "create workspace",
            Stage::Fetch => "fetch revision",
            Stage::ScrubVcsMetadata => "remove vcs metadata",
            Stage::ExtractDeployConfig => "extract deploy config",
            Stage::ExtractEnvConfig => "extract env config",
            Stage::Build => "build containers",
            Stage::StopContainers => "stop old containers",
            Stage::StartContainers => "start new containers",
            Stage::ProxyInstall => "install proxy config",
            Stage::Clean => "clean workspace",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one pipeline run
///
/// Produced exactly once per run; never mutated after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentOutcome {
    pub run_id: Uuid,
    pub stage_reached: Stage,
    pub success: bool,
    pub message: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub finished_at: chrono::DateTime<chrono::Utc>,
}

impl DeploymentOutcome {
    /// Builds a successful outcome ending at `stage`
    pub fn completed(
        run_id: Uuid,
        started_at: chrono::DateTime<chrono::Utc>,
        stage: Stage,
        message: impl Into<String>,
    ) -> Self {
        Self {
            run_id,
            stage_reached: stage,
            success: true,
            message: message.into(),
            started_at,
            finished_at: chrono::Utc::now(),
        }
    }

    /// Builds a failed outcome that aborted at `stage`
    pub fn failed_at(
        run_id: Uuid,
        started_at: chrono::DateTime<chrono::Utc>,
        stage: Stage,
        message: impl Into<String>,
    ) -> Self {
        Self {
            run_id,
            stage_reached: stage,
            success: false,
            message: message.into(),
            started_at,
            finished_at: chrono::Utc::now(),
        }
    }
}
