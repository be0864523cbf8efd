//! Boiler Core
//!
//! Core types and abstractions for the Boiler deployment agent.
//!
//! This crate contains:
//! - Domain types: deployment requests, pipeline stages, outcomes
//! - Wire DTOs: release-event payloads received from the hosting provider
//! - The stage error taxonomy shared by the engine and its callers

pub mod domain;
pub mod error;

pub use error::StageError;
