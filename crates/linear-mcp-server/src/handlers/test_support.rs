//! Test doubles for the issue tracker.

use std::sync::Mutex;

use async_trait::async_trait;
use linear_mcp_core::{
    CreateIssueInput, Error, Issue, IssueTracker, Result, Team, User, WorkflowState,
};

/// In-memory tracker with canned data and per-operation failure switches.
#[derive(Default)]
pub struct StubTracker {
    pub fail_teams: bool,
    pub fail_team: bool,
    pub fail_states: bool,
    pub fail_users: bool,
    pub fail_create: bool,
    pub created: Mutex<Vec<CreateIssueInput>>,
}

impl StubTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn failure(op: &str) -> Error {
        Error::Api {
            status: 400,
            message: format!("{} failed", op),
        }
    }
}

pub fn sample_teams() -> Vec<Team> {
    vec![
        Team {
            id: "team-eng".to_string(),
            name: "Engineering".to_string(),
            key: Some("ENG".to_string()),
        },
        Team {
            id: "team-des".to_string(),
            name: "Design".to_string(),
            key: Some("DES".to_string()),
        },
    ]
}

pub fn sample_states() -> Vec<WorkflowState> {
    vec![
        WorkflowState {
            id: "state-todo".to_string(),
            name: "Todo".to_string(),
            state_type: Some("unstarted".to_string()),
        },
        WorkflowState {
            id: "state-done".to_string(),
            name: "Done".to_string(),
            state_type: Some("completed".to_string()),
        },
    ]
}

pub fn sample_users() -> Vec<User> {
    vec![
        User {
            id: "user-ada".to_string(),
            name: "Ada Lovelace".to_string(),
            display_name: Some("ada".to_string()),
        },
        User {
            id: "user-grace".to_string(),
            name: String::new(),
            display_name: Some("grace".to_string()),
        },
    ]
}

#[async_trait]
impl IssueTracker for StubTracker {
    async fn list_teams(&self) -> Result<Vec<Team>> {
        if self.fail_teams {
            return Err(Self::failure("teams"));
        }
        Ok(sample_teams())
    }

    async fn get_team(&self, id: &str) -> Result<Team> {
        if self.fail_team {
            return Err(Self::failure("team"));
        }
        sample_teams()
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(format!("Team {} not found", id)))
    }

    async fn list_workflow_states(&self, _team_id: &str) -> Result<Vec<WorkflowState>> {
        if self.fail_states {
            return Err(Self::failure("workflowStates"));
        }
        Ok(sample_states())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        if self.fail_users {
            return Err(Self::failure("users"));
        }
        Ok(sample_users())
    }

    async fn create_issue(&self, input: CreateIssueInput) -> Result<Issue> {
        if self.fail_create {
            return Err(Self::failure("issueCreate"));
        }
        self.created.lock().unwrap().push(input.clone());
        Ok(Issue {
            id: "issue-1".to_string(),
            identifier: Some("ENG-1".to_string()),
            team_id: input.team_id,
            title: input.title,
            description: Some(input.description),
            priority: input.priority,
            url: None,
        })
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }
}
