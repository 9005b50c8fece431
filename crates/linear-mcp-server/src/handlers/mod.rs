//! Capability handlers for the MCP server.
//!
//! Handlers compute a tagged [`HandlerResult`] and only flatten it into the
//! protocol's text content at the very end, so callers inside the crate can
//! tell success from failure even where the wire format cannot.

mod create_issue;
mod task_template;
mod teams;

#[cfg(test)]
pub(crate) mod test_support;

pub use create_issue::CreateIssueTool;
pub use task_template::{FetchFailure, FetchStep, TaskTemplatePrompt, TemplateContext};
pub use teams::{TeamsResource, TEAMS_URI};

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// What went wrong inside a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Arguments missing or of the wrong type
    InvalidArguments,
    /// The upstream service call failed; carries the core error kind
    Upstream(&'static str),
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArguments => "invalid_arguments",
            ErrorKind::Upstream(kind) => *kind,
        }
    }
}

/// Handler failure with a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerError {
    pub kind: ErrorKind,
    pub message: String,
}

impl HandlerError {
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidArguments,
            message: message.into(),
        }
    }

    /// JSON object carried in-band by tool results.
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "error": self.kind.as_str(),
            "message": self.message,
        })
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HandlerError {}

impl From<linear_mcp_core::Error> for HandlerError {
    fn from(err: linear_mcp_core::Error) -> Self {
        Self {
            kind: ErrorKind::Upstream(err.kind()),
            message: err.to_string(),
        }
    }
}

/// Result type for handler internals.
pub type HandlerResult<T> = std::result::Result<T, HandlerError>;

/// Deserialize call arguments; absent arguments behave like an empty object.
pub(crate) fn parse_arguments<T: DeserializeOwned>(arguments: Option<Value>) -> HandlerResult<T> {
    let value = arguments.unwrap_or_else(|| Value::Object(Default::default()));
    serde_json::from_value(value).map_err(|e| HandlerError::invalid_arguments(e.to_string()))
}

/// Pretty JSON for text payloads.
pub(crate) fn to_pretty_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
}
