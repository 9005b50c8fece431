//! `create-task-template` prompt.
//!
//! Gathers team metadata through an ordered pipeline of fetch steps and
//! composes a single instructional message. The first failing step aborts
//! the pipeline and the prompt degrades to a fallback message; partial data
//! is never rendered.

use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use linear_mcp_core::{IssueTracker, Team, User, WorkflowState};
use serde::Deserialize;
use serde_json::Value;

use super::teams::TEAMS_URI;
use super::{parse_arguments, HandlerError, HandlerResult};
use crate::protocol::{PromptArgument, PromptDefinition, PromptGetResult, PromptMessage};
use crate::registry::PromptHandler;

/// Priority legend shown to the assistant, kept verbatim.
const PRIORITY_LEGEND: &str = "0 - No priority\n\
                               1 - Urgent\n\
                               2 - High\n\
                               3 - Medium\n\
                               4 - Low";

/// Named fetch steps of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStep {
    Team,
    WorkflowStates,
    Users,
}

impl FetchStep {
    pub fn label(&self) -> &'static str {
        match self {
            FetchStep::Team => "team",
            FetchStep::WorkflowStates => "workflow states",
            FetchStep::Users => "users",
        }
    }
}

impl fmt::Display for FetchStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A pipeline step that failed, with its cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub step: FetchStep,
    pub error: HandlerError,
}

/// Data gathered by a completed pipeline.
#[derive(Debug, Clone)]
pub struct TemplateContext {
    pub team: Team,
    pub states: Vec<WorkflowState>,
    pub users: Vec<User>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskTemplateArgs {
    team_id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
}

/// Prompt guiding an assistant through filling in a new issue.
pub struct TaskTemplatePrompt {
    tracker: Arc<dyn IssueTracker>,
}

impl TaskTemplatePrompt {
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self { tracker }
    }

    /// Run the fetch steps in order, stopping at the first failure.
    pub async fn gather(&self, team_id: &str) -> Result<TemplateContext, FetchFailure> {
        let team = run_step(FetchStep::Team, self.tracker.get_team(team_id).await)?;
        let states = run_step(
            FetchStep::WorkflowStates,
            self.tracker.list_workflow_states(team_id).await,
        )?;
        let users = run_step(FetchStep::Users, self.tracker.list_users().await)?;

        Ok(TemplateContext {
            team,
            states,
            users,
        })
    }

    /// Build the prompt messages; fetch failures become the fallback message.
    async fn build(&self, args: TaskTemplateArgs) -> PromptGetResult {
        let text = match self.gather(&args.team_id).await {
            Ok(ctx) => compose_message(&ctx, &args.title, args.description.as_deref()),
            Err(failure) => fallback_message(&args.team_id, &failure),
        };

        PromptGetResult {
            description: Some("Template for creating a new Linear issue".to_string()),
            messages: vec![PromptMessage::user(text)],
        }
    }
}

fn run_step<T>(step: FetchStep, result: linear_mcp_core::Result<T>) -> Result<T, FetchFailure> {
    match result {
        Ok(value) => {
            tracing::debug!(step = %step, "Prompt fetch step completed");
            Ok(value)
        }
        Err(e) => {
            tracing::warn!(step = %step, error = %e, "Prompt fetch step failed");
            Err(FetchFailure {
                step,
                error: e.into(),
            })
        }
    }
}

/// Compose the instructional message from gathered data.
pub fn compose_message(ctx: &TemplateContext, title: &str, description: Option<&str>) -> String {
    let mut text = String::new();

    let _ = writeln!(
        text,
        "Hello! Let's create a new issue for the {} team.",
        ctx.team.name
    );
    text.push('\n');
    let _ = writeln!(text, "Title: {}", title);
    let _ = writeln!(
        text,
        "Description: {}",
        description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("No description provided")
    );
    text.push('\n');

    text.push_str("Please choose a priority for this issue:\n");
    text.push_str(PRIORITY_LEGEND);
    text.push_str("\n\n");

    text.push_str("Team members who can be assigned:\n");
    if ctx.users.is_empty() {
        text.push_str("- none\n");
    }
    for user in &ctx.users {
        let _ = writeln!(text, "- {} (ID: {})", user.label(), user.id);
    }
    text.push('\n');

    text.push_str("Available workflow states:\n");
    if ctx.states.is_empty() {
        text.push_str("- none\n");
    }
    for state in &ctx.states {
        let _ = writeln!(text, "- {} (ID: {})", state.name, state.id);
    }
    text.push('\n');

    let _ = write!(
        text,
        "Once the details are settled, call the create-issue tool with teamId \"{}\", \
         the title, the description and the chosen priority.",
        ctx.team.id
    );

    text
}

/// Message returned when any fetch step fails.
pub fn fallback_message(team_id: &str, failure: &FetchFailure) -> String {
    format!(
        "Error fetching data for team {} ({}): {}. Please check that the team ID is valid; \
         read the {} resource to list available teams.",
        team_id, failure.step, failure.error, TEAMS_URI
    )
}

#[async_trait]
impl PromptHandler for TaskTemplatePrompt {
    fn definition(&self) -> PromptDefinition {
        PromptDefinition {
            name: "create-task-template".to_string(),
            description: Some(
                "Gather team members, workflow states and priorities to plan a new issue"
                    .to_string(),
            ),
            arguments: vec![
                PromptArgument {
                    name: "teamId".to_string(),
                    description: Some("The team ID to create the issue in".to_string()),
                    required: true,
                },
                PromptArgument {
                    name: "title".to_string(),
                    description: Some("Issue title".to_string()),
                    required: true,
                },
                PromptArgument {
                    name: "description".to_string(),
                    description: Some("Issue description".to_string()),
                    required: false,
                },
            ],
        }
    }

    async fn get(&self, arguments: Option<Value>) -> HandlerResult<PromptGetResult> {
        let args: TaskTemplateArgs = parse_arguments(arguments)?;
        Ok(self.build(args).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{
        sample_states, sample_teams, sample_users, StubTracker,
    };
    use crate::handlers::ErrorKind;
    use crate::protocol::Role;
    use linear_mcp_core::{CreateIssueInput, Error, Issue};
    use mockall::mock;

    mock! {
        pub Tracker {}

        #[async_trait]
        impl IssueTracker for Tracker {
            async fn list_teams(&self) -> linear_mcp_core::Result<Vec<Team>>;
            async fn get_team(&self, id: &str) -> linear_mcp_core::Result<Team>;
            async fn list_workflow_states(&self, team_id: &str) -> linear_mcp_core::Result<Vec<WorkflowState>>;
            async fn list_users(&self) -> linear_mcp_core::Result<Vec<User>>;
            async fn create_issue(&self, input: CreateIssueInput) -> linear_mcp_core::Result<Issue>;
            fn provider_name(&self) -> &'static str;
        }
    }

    fn prompt_args(team_id: &str) -> Option<Value> {
        Some(serde_json::json!({
            "teamId": team_id,
            "title": "Fix login",
            "description": "Broken on Safari"
        }))
    }

    fn single_text(result: &PromptGetResult) -> &str {
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].role, Role::User);
        result.messages[0].content.as_text()
    }

    #[tokio::test]
    async fn test_greeting_contains_team_name() {
        let prompt = TaskTemplatePrompt::new(Arc::new(StubTracker::new()));

        for team in sample_teams() {
            let result = prompt.get(prompt_args(&team.id)).await.unwrap();
            let text = single_text(&result);
            let greeting = text.lines().next().unwrap();
            assert!(greeting.contains(&team.name), "greeting: {}", greeting);
        }
    }

    #[tokio::test]
    async fn test_message_enumerates_members_and_states() {
        let prompt = TaskTemplatePrompt::new(Arc::new(StubTracker::new()));
        let result = prompt.get(prompt_args("team-eng")).await.unwrap();
        let text = single_text(&result);

        assert!(text.contains("Title: Fix login"));
        assert!(text.contains("Description: Broken on Safari"));
        assert!(text.contains(PRIORITY_LEGEND));
        assert!(text.contains("- Ada Lovelace (ID: user-ada)"));
        assert!(text.contains("- grace (ID: user-grace)"));
        assert!(text.contains("- Todo (ID: state-todo)"));
        assert!(text.contains("- Done (ID: state-done)"));
        assert!(text.contains("teamId \"team-eng\""));
    }

    #[tokio::test]
    async fn test_description_optional() {
        let prompt = TaskTemplatePrompt::new(Arc::new(StubTracker::new()));
        let result = prompt
            .get(Some(serde_json::json!({"teamId": "team-eng", "title": "Fix login"})))
            .await
            .unwrap();

        assert!(single_text(&result).contains("Description: No description provided"));
    }

    #[tokio::test]
    async fn test_missing_title_is_invalid_arguments() {
        let prompt = TaskTemplatePrompt::new(Arc::new(StubTracker::new()));
        let err = prompt
            .get(Some(serde_json::json!({"teamId": "team-eng"})))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::InvalidArguments);
    }

    fn missing_team_tracker() -> MockTracker {
        let mut tracker = MockTracker::new();
        tracker
            .expect_get_team()
            .times(1)
            .returning(|_| Err(Error::NotFound("Entity not found".to_string())));
        tracker.expect_list_workflow_states().never();
        tracker.expect_list_users().never();
        tracker
    }

    #[tokio::test]
    async fn test_team_failure_short_circuits() {
        let prompt = TaskTemplatePrompt::new(Arc::new(missing_team_tracker()));
        let failure = prompt.gather("bogus").await.unwrap_err();

        assert_eq!(failure.step, FetchStep::Team);
        assert_eq!(failure.error.kind, ErrorKind::Upstream("not_found"));
    }

    #[tokio::test]
    async fn test_team_failure_renders_single_fallback() {
        let prompt = TaskTemplatePrompt::new(Arc::new(missing_team_tracker()));
        let result = prompt.get(prompt_args("bogus")).await.unwrap();
        let text = single_text(&result);
        assert!(text.starts_with("Error fetching data for team bogus (team)"));
        assert!(text.contains("linear://teams"));
        assert!(text.contains("Entity not found"));
        assert!(!text.contains("(ID:"));
    }

    #[tokio::test]
    async fn test_states_failure_short_circuits() {
        let mut tracker = MockTracker::new();
        tracker
            .expect_get_team()
            .times(1)
            .returning(|_| Ok(sample_teams().remove(0)));
        tracker
            .expect_list_workflow_states()
            .times(1)
            .returning(|_| Err(Error::Http("connection reset".to_string())));
        tracker.expect_list_users().never();

        let prompt = TaskTemplatePrompt::new(Arc::new(tracker));
        let result = prompt.get(prompt_args("team-eng")).await.unwrap();
        let text = single_text(&result);

        assert!(text.contains("team-eng"));
        assert!(text.contains("workflow states"));
        assert!(text.contains("linear://teams"));
        assert!(!text.contains("Engineering"));
        assert!(!text.contains("Team members"));
        assert!(!text.contains("(ID:"));
    }

    #[tokio::test]
    async fn test_steps_run_in_order() {
        let mut seq = mockall::Sequence::new();
        let mut tracker = MockTracker::new();
        tracker
            .expect_get_team()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(sample_teams().remove(0)));
        tracker
            .expect_list_workflow_states()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(sample_states()));
        tracker
            .expect_list_users()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(sample_users()));

        let prompt = TaskTemplatePrompt::new(Arc::new(tracker));
        let ctx = prompt.gather("team-eng").await.unwrap();

        assert_eq!(ctx.team.name, "Engineering");
        assert_eq!(ctx.states.len(), 2);
        assert_eq!(ctx.users.len(), 2);
    }

    #[tokio::test]
    async fn test_users_failure_uses_fallback() {
        let tracker = StubTracker {
            fail_users: true,
            ..Default::default()
        };
        let prompt = TaskTemplatePrompt::new(Arc::new(tracker));
        let result = prompt.get(prompt_args("team-eng")).await.unwrap();
        let text = single_text(&result);

        assert!(text.starts_with("Error fetching data for team team-eng (users)"));
        assert!(!text.contains("(ID:"));
    }

    #[test]
    fn test_empty_lists_render_none() {
        let ctx = TemplateContext {
            team: sample_teams().remove(1),
            states: vec![],
            users: vec![],
        };
        let text = compose_message(&ctx, "Refresh icons", None);

        assert!(text.starts_with("Hello! Let's create a new issue for the Design team."));
        assert_eq!(text.matches("- none").count(), 2);
    }
}
