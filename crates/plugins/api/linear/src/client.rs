//! Linear GraphQL client implementation.

use async_trait::async_trait;
use linear_mcp_core::{
    CreateIssueInput, Error, Issue, IssueTracker, Result, Team, User, WorkflowState,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::types::{
    GraphQlError, GraphQlRequest, GraphQlResponse, IssueCreateData, LinearIssue, LinearTeam,
    LinearUser, LinearWorkflowState, TeamData, TeamsData, UsersData, WorkflowStatesData,
};
use crate::DEFAULT_LINEAR_URL;

const TEAMS_QUERY: &str = "query Teams { teams { nodes { id name key } } }";

const TEAM_QUERY: &str = "query Team($id: String!) { team(id: $id) { id name key } }";

const WORKFLOW_STATES_QUERY: &str = "query WorkflowStates($teamId: ID!) { \
     workflowStates(filter: { team: { id: { eq: $teamId } } }) { nodes { id name type } } }";

const USERS_QUERY: &str = "query Users { users { nodes { id name displayName } } }";

const ISSUE_CREATE_MUTATION: &str = "mutation IssueCreate($input: IssueCreateInput!) { \
     issueCreate(input: $input) { success \
     issue { id identifier title description priority url team { id } } } }";

/// Linear API client.
pub struct LinearClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl LinearClient {
    /// Create a new Linear client.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_LINEAR_URL, api_key)
    }

    /// Create a new Linear client with a custom endpoint (for testing).
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("linear-mcp")
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    /// GraphQL endpoint this client posts to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a GraphQL operation and return its `data` payload.
    async fn query<T: DeserializeOwned, V: Serialize>(
        &self,
        operation: &str,
        query: &str,
        variables: V,
    ) -> Result<T> {
        debug!(operation = operation, "Linear GraphQL request");

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&GraphQlRequest { query, variables })
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let envelope: GraphQlResponse<T> = self.handle_response(response).await?;

        if !envelope.errors.is_empty() {
            let message = join_errors(&envelope.errors);
            warn!(operation = operation, message = %message, "Linear GraphQL errors");
            return Err(Error::Api {
                status: 200,
                message,
            });
        }

        envelope.data.ok_or_else(|| {
            Error::InvalidData(format!("No data in Linear response for {}", operation))
        })
    }

    /// Handle response and map errors.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let status_code = status.as_u16();
            let body = response.text().await.unwrap_or_default();
            // Linear reports validation and auth failures in a GraphQL errors body.
            let message = serde_json::from_str::<GraphQlResponse<serde_json::Value>>(&body)
                .ok()
                .filter(|r| !r.errors.is_empty())
                .map(|r| join_errors(&r.errors))
                .unwrap_or(body);
            warn!(
                status = status_code,
                message = %message,
                "Linear API error response"
            );
            return Err(Error::from_status(status_code, message));
        }

        response
            .json()
            .await
            .map_err(|e| Error::InvalidData(format!("Failed to parse response: {}", e)))
    }
}

fn join_errors(errors: &[GraphQlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Mapping functions: Linear types -> core types
// =============================================================================

fn map_team(team: LinearTeam) -> Team {
    Team {
        id: team.id,
        name: team.name,
        key: team.key,
    }
}

fn map_state(state: LinearWorkflowState) -> WorkflowState {
    WorkflowState {
        id: state.id,
        name: state.name,
        state_type: state.state_type,
    }
}

fn map_user(user: LinearUser) -> User {
    User {
        id: user.id,
        name: user.name.unwrap_or_default(),
        display_name: user.display_name,
    }
}

fn map_issue(issue: LinearIssue) -> Issue {
    Issue {
        id: issue.id,
        identifier: issue.identifier,
        team_id: issue.team.id,
        title: issue.title,
        description: issue.description,
        priority: issue.priority.round() as i64,
        url: issue.url,
    }
}

// =============================================================================
// Trait implementation
// =============================================================================

#[async_trait]
impl IssueTracker for LinearClient {
    async fn list_teams(&self) -> Result<Vec<Team>> {
        let data: TeamsData = self
            .query("teams", TEAMS_QUERY, serde_json::json!({}))
            .await?;
        Ok(data.teams.nodes.into_iter().map(map_team).collect())
    }

    async fn get_team(&self, id: &str) -> Result<Team> {
        let data: TeamData = self
            .query("team", TEAM_QUERY, serde_json::json!({ "id": id }))
            .await?;
        data.team
            .map(map_team)
            .ok_or_else(|| Error::NotFound(format!("Team {} not found", id)))
    }

    async fn list_workflow_states(&self, team_id: &str) -> Result<Vec<WorkflowState>> {
        let data: WorkflowStatesData = self
            .query(
                "workflowStates",
                WORKFLOW_STATES_QUERY,
                serde_json::json!({ "teamId": team_id }),
            )
            .await?;
        Ok(data.workflow_states.nodes.into_iter().map(map_state).collect())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let data: UsersData = self
            .query("users", USERS_QUERY, serde_json::json!({}))
            .await?;
        Ok(data.users.nodes.into_iter().map(map_user).collect())
    }

    async fn create_issue(&self, input: CreateIssueInput) -> Result<Issue> {
        let data: IssueCreateData = self
            .query(
                "issueCreate",
                ISSUE_CREATE_MUTATION,
                serde_json::json!({ "input": input }),
            )
            .await?;

        let payload = data.issue_create;
        match (payload.success, payload.issue) {
            (true, Some(issue)) => Ok(map_issue(issue)),
            _ => Err(Error::Api {
                status: 200,
                message: "Linear reported issueCreate as unsuccessful".to_string(),
            }),
        }
    }

    fn provider_name(&self) -> &'static str {
        "linear"
    }
}
