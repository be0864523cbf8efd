//! Pipeline progress reporting
//!
//! The pipeline announces stage transitions through a sink so that
//! different front-ends can render them their own way: the CLI prints
//! colored status lines, the webhook path only keeps the tracing output.

use boiler_core::domain::{DeploymentOutcome, Stage};
use tracing::{error, info, warn};

/// Sink for pipeline stage transitions
pub trait ProgressSink: Send + Sync {
    /// A stage is about to execute
    fn stage_started(&self, stage: Stage);

    /// A stage finished successfully
    fn stage_succeeded(&self, stage: Stage);

    /// A stage failed but the run continues
    fn stage_soft_failed(&self, stage: Stage, detail: &str);

    /// A stage failed and the run aborts
    fn stage_failed(&self, stage: Stage, detail: &str);

    /// The run produced its outcome
    fn run_finished(&self, outcome: &DeploymentOutcome);
}

/// Default sink that forwards transitions to the tracing subscriber
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn stage_started(&self, stage: Stage) {
        info!("Stage started: {}", stage);
    }

    fn stage_succeeded(&self, stage: Stage) {
        info!("Stage succeeded: {}", stage);
    }

    fn stage_soft_failed(&self, stage: Stage, detail: &str) {
        warn!("Stage failed (continuing): {}: {}", stage, detail);
    }

    fn stage_failed(&self, stage: Stage, detail: &str) {
        error!("Stage failed: {}: {}", stage, detail);
    }

    fn run_finished(&self, outcome: &DeploymentOutcome) {
        if outcome.success {
            info!(
                "Run {} finished at stage '{}': {}",
                outcome.run_id, outcome.stage_reached, outcome.message
            );
        } else {
            error!(
                "Run {} failed at stage '{}': {}",
                outcome.run_id, outcome.stage_reached, outcome.message
            );
        }
    }
}
