//! Linear GraphQL request and response types.
//!
//! These types represent the raw JSON exchanged with the Linear API.
//! They are deserialized and then mapped to the core types.

use serde::{Deserialize, Serialize};

// =============================================================================
// GraphQL envelope
// =============================================================================

/// Body of a GraphQL POST.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<'a, V: Serialize> {
    pub query: &'a str,
    pub variables: V,
}

/// GraphQL response envelope. Errors may arrive alongside a 200 status.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// A single GraphQL error.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// Relay-style connection; only the first page is read.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub nodes: Vec<T>,
}

// =============================================================================
// Entities
// =============================================================================

/// Linear team.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearTeam {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub key: Option<String>,
}

/// Linear workflow state.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearWorkflowState {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub state_type: Option<String>,
}

/// Linear user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Reference to a team embedded in an issue.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearTeamRef {
    pub id: String,
}

/// Linear issue as returned by `issueCreate`.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearIssue {
    pub id: String,
    #[serde(default)]
    pub identifier: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Linear reports priority as a float.
    pub priority: f64,
    #[serde(default)]
    pub url: Option<String>,
    pub team: LinearTeamRef,
}

// =============================================================================
// Query payloads
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct TeamsData {
    pub teams: Connection<LinearTeam>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamData {
    pub team: Option<LinearTeam>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStatesData {
    pub workflow_states: Connection<LinearWorkflowState>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsersData {
    pub users: Connection<LinearUser>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCreateData {
    pub issue_create: IssuePayload,
}

/// Result of a mutation.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuePayload {
    pub success: bool,
    #[serde(default)]
    pub issue: Option<LinearIssue>,
}
