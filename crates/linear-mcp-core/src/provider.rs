//! Issue tracker trait consumed by the MCP handlers.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CreateIssueInput, Issue, Team, User, WorkflowState};

/// Operations the adapter needs from an issue-tracking service.
///
/// Every method is a single upstream round trip; implementations do not
/// cache or retry.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// List all teams visible to the credential.
    async fn list_teams(&self) -> Result<Vec<Team>>;

    /// Get a single team by ID.
    async fn get_team(&self, id: &str) -> Result<Team>;

    /// List workflow states belonging to a team.
    async fn list_workflow_states(&self, team_id: &str) -> Result<Vec<WorkflowState>>;

    /// List all users in the workspace (not team-filtered).
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Create an issue.
    async fn create_issue(&self, input: CreateIssueInput) -> Result<Issue>;

    /// Provider name (e.g. "linear").
    fn provider_name(&self) -> &'static str;
}
