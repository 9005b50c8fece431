//! `linear://teams` resource.

use std::sync::Arc;

use async_trait::async_trait;
use linear_mcp_core::{IssueTracker, Team};

use super::{to_pretty_json, HandlerResult};
use crate::protocol::{ResourceContents, ResourceDefinition, ResourceReadResult};
use crate::registry::ResourceHandler;

pub const TEAMS_URI: &str = "linear://teams";

/// Resource listing every team visible to the credential.
pub struct TeamsResource {
    tracker: Arc<dyn IssueTracker>,
}

impl TeamsResource {
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self { tracker }
    }

    /// Fetch the team list.
    pub async fn fetch(&self) -> HandlerResult<Vec<Team>> {
        let teams = self.tracker.list_teams().await?;
        tracing::debug!(count = teams.len(), "Fetched teams");
        Ok(teams)
    }

    /// Flatten a fetch result into resource contents.
    pub fn render(uri: &str, result: HandlerResult<Vec<Team>>) -> ResourceContents {
        match result {
            Ok(teams) => ResourceContents {
                uri: uri.to_string(),
                mime_type: Some("application/json".to_string()),
                text: to_pretty_json(&teams),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch teams");
                ResourceContents {
                    uri: uri.to_string(),
                    mime_type: Some("text/plain".to_string()),
                    text: format!("Error fetching teams: {}", e),
                }
            }
        }
    }
}

#[async_trait]
impl ResourceHandler for TeamsResource {
    fn definition(&self) -> ResourceDefinition {
        ResourceDefinition {
            uri: TEAMS_URI.to_string(),
            name: "teams".to_string(),
            description: Some("List of all teams in the Linear workspace".to_string()),
            mime_type: Some("application/json".to_string()),
        }
    }

    async fn read(&self, uri: &str) -> ResourceReadResult {
        let result = self.fetch().await;
        ResourceReadResult {
            contents: vec![Self::render(uri, result)],
        }
    }
}
