//! Deployment pipeline
//!
//! A straight-line stage machine: each stage is gated on the success of the
//! previous one, with two explicit skip short-circuits and an optional
//! proxy stage. There is no retry of any stage and no rollback of container
//! state already changed.
//!
//! Failure policy per stage:
//! - requirements, workspace, fetch, metadata scrub, config extraction and
//!   proxy install are fatal
//! - build is soft by default (configurable fatal), stop/start are soft: a
//!   broken build should not keep an operator from inspecting the
//!   half-built workspace

use boiler_core::StageError;
use boiler_core::domain::{DeploymentOutcome, DeploymentRequest, Stage};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};
use uuid::Uuid;

use crate::artifacts;
use crate::config::EngineConfig;
use crate::container::{ComposeCli, ContainerEngine};
use crate::locks::ProjectLocks;
use crate::progress::{ProgressSink, TracingSink};
use crate::proxy::{NginxCli, ProxyService};
use crate::vcs::{self, GitCli, VcsClient};
use crate::workspace;

/// The deployment pipeline
///
/// Holds the engine configuration and the external-tool collaborators.
/// One instance serves the whole process; concurrent `run` calls are
/// serialized per project name.
pub struct DeployPipeline {
    config: EngineConfig,
    vcs: Arc<dyn VcsClient>,
    containers: Arc<dyn ContainerEngine>,
    proxy: Arc<dyn ProxyService>,
    progress: Arc<dyn ProgressSink>,
    project_locks: ProjectLocks,
    // Proxy site directories are shared across projects; installs are
    // last-writer-wins per project but must not interleave.
    proxy_lock: Mutex<()>,
}

impl DeployPipeline {
    /// Creates a pipeline with explicit collaborators
    pub fn new(
        config: EngineConfig,
        vcs: Arc<dyn VcsClient>,
        containers: Arc<dyn ContainerEngine>,
        proxy: Arc<dyn ProxyService>,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            config,
            vcs,
            containers,
            proxy,
            progress,
            project_locks: ProjectLocks::new(),
            proxy_lock: Mutex::new(()),
        }
    }

    /// Creates a pipeline backed by the standard subprocess tools
    pub fn standard(config: EngineConfig) -> Self {
        let proxy = NginxCli::new(
            config.sites_available.clone(),
            config.sites_enabled.clone(),
        );

        Self::new(
            config,
            Arc::new(GitCli::new()),
            Arc::new(ComposeCli::new()),
            Arc::new(proxy),
            Arc::new(TracingSink),
        )
    }

    /// Replaces the progress sink
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Probes whether the host can run deployments at all
    pub fn check_requirements(&self) -> Result<(), StageError> {
        self.vcs.check()?;
        self.containers.check()
    }

    /// Executes one deployment run
    ///
    /// Never panics and never returns an error: failures are encoded in the
    /// outcome. Holds the project's lock for the full duration, so at most
    /// one run per project name executes at a time.
    pub fn run(&self, request: &DeploymentRequest) -> DeploymentOutcome {
        let run_id = Uuid::new_v4();
        let started_at = chrono::Utc::now();
        let project_name = request.resolved_project_name();

        info!(
            "Starting run {} for {} at {} (project {})",
            run_id, request.repository, request.revision, project_name
        );

        let lock = self.project_locks.handle(&project_name);
        let _guard = lock.lock().unwrap();

        let outcome = match self.execute(run_id, started_at, request, &project_name) {
            Ok(outcome) => outcome,
            Err((stage, err)) => {
                let detail = err.to_string();
                self.progress.stage_failed(stage, &detail);
                DeploymentOutcome::failed_at(run_id, started_at, stage, detail)
            }
        };

        self.progress.run_finished(&outcome);
        outcome
    }

    fn execute(
        &self,
        run_id: Uuid,
        started_at: chrono::DateTime<chrono::Utc>,
        request: &DeploymentRequest,
        project_name: &str,
    ) -> Result<DeploymentOutcome, (Stage, StageError)> {
        self.fatal_stage(Stage::Requirements, || self.check_requirements())?;

        let workspace_dir = self.fatal_stage(Stage::Workspace, || {
            workspace::create_fresh(
                &self.config.work_root,
                &workspace::directory_name(project_name),
            )
        })?;
        let project_dir = workspace_dir.join(project_name);

        self.fatal_stage(Stage::Fetch, || {
            self.vcs
                .fetch(&request.repository, &request.revision, &project_dir)
        })?;

        self.fatal_stage(Stage::ScrubVcsMetadata, || {
            vcs::scrub_metadata(&project_dir)
        })?;

        self.fatal_stage(Stage::ExtractDeployConfig, || {
            artifacts::copy_deploy_config(&project_dir, &workspace_dir)
        })?;

        self.fatal_stage(Stage::ExtractEnvConfig, || {
            artifacts::copy_env_config(&self.config.config_dir, project_name, &workspace_dir)
        })?;

        if request.skip_build {
            return Ok(DeploymentOutcome::completed(
                run_id,
                started_at,
                Stage::ExtractEnvConfig,
                "build skipped, workspace retained",
            ));
        }

        self.progress.stage_started(Stage::Build);
        if self.containers.build(&workspace_dir) {
            self.progress.stage_succeeded(Stage::Build);
        } else if self.config.fatal_build_errors {
            let detail = "container build failed";
            self.progress.stage_failed(Stage::Build, detail);
            return Ok(DeploymentOutcome::failed_at(
                run_id,
                started_at,
                Stage::Build,
                detail,
            ));
        } else {
            self.progress
                .stage_soft_failed(Stage::Build, "container build failed");
        }

        self.soft_stage(Stage::StopContainers, "cannot stop old containers", || {
            self.containers.stop(&workspace_dir)
        });
        self.soft_stage(Stage::StartContainers, "cannot start new containers", || {
            self.containers.start(&workspace_dir)
        });
        let mut stage_reached = Stage::StartContainers;

        let site_config = artifacts::nginx_site_path(&project_dir);
        if site_config.is_file() {
            let _proxy_guard = self.proxy_lock.lock().unwrap();
            self.fatal_stage(Stage::ProxyInstall, || {
                self.proxy.install(&site_config, project_name)
            })?;
            stage_reached = Stage::ProxyInstall;
        } else {
            debug!(
                "No proxy site definition at {}, skipping proxy stage",
                site_config.display()
            );
        }

        if request.skip_clean {
            return Ok(DeploymentOutcome::completed(
                run_id,
                started_at,
                stage_reached,
                "cleanup skipped, workspace retained",
            ));
        }

        self.progress.stage_started(Stage::Clean);
        if let Err(err) = workspace::destroy(&workspace_dir) {
            // The service is already live at this point; only cleanup failed.
            let detail = format!("service deployed but workspace cleanup failed: {err}");
            self.progress.stage_failed(Stage::Clean, &detail);
            return Ok(DeploymentOutcome::failed_at(
                run_id,
                started_at,
                Stage::Clean,
                detail,
            ));
        }
        self.progress.stage_succeeded(Stage::Clean);

        Ok(DeploymentOutcome::completed(
            run_id,
            started_at,
            Stage::Clean,
            "deployed",
        ))
    }

    fn fatal_stage<T>(
        &self,
        stage: Stage,
        f: impl FnOnce() -> Result<T, StageError>,
    ) -> Result<T, (Stage, StageError)> {
        self.progress.stage_started(stage);
        match f() {
            Ok(value) => {
                self.progress.stage_succeeded(stage);
                Ok(value)
            }
            Err(err) => Err((stage, err)),
        }
    }

    fn soft_stage(&self, stage: Stage, detail: &str, f: impl FnOnce() -> bool) {
        self.progress.stage_started(stage);
        if f() {
            self.progress.stage_succeeded(stage);
        } else {
            self.progress.stage_soft_failed(stage, detail);
        }
    }
}
