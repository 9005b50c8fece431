//! Linear provider implementation for linear-mcp.
//!
//! Talks to the Linear GraphQL API for teams, workflow states, users and
//! issue creation.

mod client;
mod types;

pub use client::LinearClient;
pub use types::*;

/// Default Linear GraphQL endpoint.
pub const DEFAULT_LINEAR_URL: &str = "https://api.linear.app/graphql";
