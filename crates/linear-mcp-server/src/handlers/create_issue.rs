//! `create-issue` tool.

use std::sync::Arc;

use async_trait::async_trait;
use linear_mcp_core::{CreateIssueInput, Issue, IssueTracker};
use serde_json::Value;

use super::{parse_arguments, to_pretty_json, HandlerResult};
use crate::protocol::{ToolCallResult, ToolDefinition};
use crate::registry::ToolHandler;

/// Tool creating an issue in a team.
pub struct CreateIssueTool {
    tracker: Arc<dyn IssueTracker>,
}

impl CreateIssueTool {
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self { tracker }
    }

    /// Parse arguments and forward them unchanged to the tracker.
    pub async fn run(&self, arguments: Option<Value>) -> HandlerResult<Issue> {
        let input: CreateIssueInput = parse_arguments(arguments)?;
        tracing::debug!(
            team_id = %input.team_id,
            priority = input.priority,
            "Creating issue"
        );
        let issue = self.tracker.create_issue(input).await?;
        tracing::info!(issue_id = %issue.id, "Issue created");
        Ok(issue)
    }

    /// Flatten into a single text item. Errors stay in-band and unflagged.
    pub fn render(result: HandlerResult<Issue>) -> ToolCallResult {
        match result {
            Ok(issue) => ToolCallResult::text(to_pretty_json(&issue)),
            Err(e) => {
                tracing::warn!(error = %e, "create-issue failed");
                ToolCallResult::text(to_pretty_json(&e.to_json()))
            }
        }
    }
}

#[async_trait]
impl ToolHandler for CreateIssueTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "create-issue".to_string(),
            description: "Create a new issue in Linear".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "teamId": {
                        "type": "string",
                        "description": "The team ID to create the issue in"
                    },
                    "title": {
                        "type": "string",
                        "description": "Issue title"
                    },
                    "description": {
                        "type": "string",
                        "description": "Issue description (markdown)"
                    },
                    "priority": {
                        "type": "number",
                        "description": "Issue priority (0-4): 0 = No priority, 1 = Urgent, 2 = High, 3 = Medium, 4 = Low"
                    }
                },
                "required": ["teamId", "title", "description", "priority"]
            }),
        }
    }

    async fn call(&self, arguments: Option<Value>) -> ToolCallResult {
        Self::render(self.run(arguments).await)
    }
}
