//! Boiler Engine
//!
//! The deployment pipeline and its collaborators.
//!
//! Architecture:
//! - Configuration: engine paths and failure policy, from environment or defaults
//! - Workspace: isolated per-run directory management
//! - Collaborator traits: version control, container engine, reverse proxy
//!   behind narrow interfaces with subprocess-backed standard implementations
//! - Pipeline: the fixed stage sequence with per-stage failure policy
//!
//! The engine is deliberately synchronous: every external invocation blocks
//! the calling thread, and callers that live in an async runtime wrap runs
//! in `spawn_blocking`. Concurrency control is a per-project lock held for
//! the duration of a run.

pub mod artifacts;
pub mod config;
pub mod container;
pub mod locks;
pub mod pipeline;
pub mod progress;
pub mod proxy;
pub mod vcs;
pub mod workspace;

pub use config::EngineConfig;
pub use container::{ComposeCli, ContainerEngine};
pub use pipeline::DeployPipeline;
pub use progress::{ProgressSink, TracingSink};
pub use proxy::{NginxCli, ProxyService};
pub use vcs::{GitCli, VcsClient};
