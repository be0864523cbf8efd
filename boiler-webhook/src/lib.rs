//! Boiler Webhook
//!
//! HTTP front-end of the deployment agent.
//!
//! A single endpoint accepts release notifications from the hosting
//! provider, authenticates them against a shared secret, filters for
//! published releases, and dispatches the deployment pipeline. The caller
//! only ever learns "authenticated and accepted" from the status code;
//! pipeline outcomes are never revealed over the network.

pub mod api;
pub mod config;
pub mod signature;

pub use api::{AppState, create_router, serve};
pub use config::{AgentConfig, ConfigError, WebhookSecret};
