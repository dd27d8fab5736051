//! Core domain types and configuration for the RenoProp agent.
//!
//! Everything here is deterministic and side-effect free: the configuration
//! layer resolves an explicit [`config::AppConfig`] once at process start,
//! and [`proposal`] carries the request details the agent collects before
//! drafting a document. Rendering, storage, and LLM access live in their
//! own crates.

pub mod config;
pub mod proposal;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions};
pub use proposal::{ProposalRequest, SAMPLE_PROPOSAL, PROPOSAL_OBJECT_NAME};
