//! Domain types for the deployment agent.

pub mod deployment;
pub mod event;

pub use deployment::{DeploymentOutcome, DeploymentRequest, Stage, project_name_from_repository};
pub use event::ReleaseEvent;
