//! MCP (Model Context Protocol) server for linear-mcp.
//!
//! This crate implements the MCP server that exposes Linear teams, issue
//! creation and an issue-planning prompt to AI assistants.

pub mod handlers;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod transport;

pub use registry::CapabilityRegistry;
pub use server::McpServer;
