//! Core traits, types, and error handling for linear-mcp.
//!
//! This crate provides the abstractions shared by the Linear client and the
//! MCP server: the [`IssueTracker`] trait, the entities it returns, and the
//! configuration loader.

pub mod config;
pub mod error;
pub mod provider;
pub mod types;

pub use config::{Config, Credentials};
pub use error::{Error, Result};
pub use provider::IssueTracker;
pub use types::{CreateIssueInput, Issue, Team, User, WorkflowState};
