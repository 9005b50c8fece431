//! Capability registry.
//!
//! Resources, tools and prompts are registered once at startup with their
//! definitions and handlers; the server looks them up per request.

use std::sync::Arc;

use async_trait::async_trait;
use linear_mcp_core::{Error, IssueTracker, Result};
use serde_json::Value;

use crate::handlers::{CreateIssueTool, HandlerResult, TaskTemplatePrompt, TeamsResource};
use crate::protocol::{
    PromptDefinition, PromptGetResult, PromptsCapability, ResourceDefinition, ResourceReadResult,
    ResourcesCapability, ServerCapabilities, ToolCallResult, ToolDefinition, ToolsCapability,
};

/// A read-only resource addressed by URI.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    fn definition(&self) -> ResourceDefinition;

    /// Read the resource. Failures are reported inside the contents.
    async fn read(&self, uri: &str) -> ResourceReadResult;
}

/// An invocable tool.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    /// Run the tool. Failures are reported inside the content.
    async fn call(&self, arguments: Option<Value>) -> ToolCallResult;
}

/// A prompt template.
#[async_trait]
pub trait PromptHandler: Send + Sync {
    fn definition(&self) -> PromptDefinition;

    /// Render the prompt.
    ///
    /// `Err` means the arguments were rejected. Upstream failures are
    /// rendered into the returned messages.
    async fn get(&self, arguments: Option<Value>) -> HandlerResult<PromptGetResult>;
}

/// Registered capabilities, kept in registration order.
#[derive(Default)]
pub struct CapabilityRegistry {
    resources: Vec<Arc<dyn ResourceHandler>>,
    tools: Vec<Arc<dyn ToolHandler>>,
    prompts: Vec<Arc<dyn PromptHandler>>,
}

impl CapabilityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the Linear teams resource, create-issue tool and
    /// create-task-template prompt, all sharing one tracker.
    pub fn linear(tracker: Arc<dyn IssueTracker>) -> Result<Self> {
        let mut registry = Self::new();
        registry.register_resource(Arc::new(TeamsResource::new(tracker.clone())))?;
        registry.register_tool(Arc::new(CreateIssueTool::new(tracker.clone())))?;
        registry.register_prompt(Arc::new(TaskTemplatePrompt::new(tracker)))?;
        Ok(registry)
    }

    /// Register a resource. Rejects a duplicate URI or name.
    pub fn register_resource(&mut self, handler: Arc<dyn ResourceHandler>) -> Result<()> {
        let def = handler.definition();
        if self.resources.iter().any(|r| {
            let existing = r.definition();
            existing.uri == def.uri || existing.name == def.name
        }) {
            return Err(Error::Config(format!(
                "Resource '{}' ({}) is already registered",
                def.name, def.uri
            )));
        }
        tracing::debug!(uri = %def.uri, "Registered resource");
        self.resources.push(handler);
        Ok(())
    }

    /// Register a tool. Rejects a duplicate name.
    pub fn register_tool(&mut self, handler: Arc<dyn ToolHandler>) -> Result<()> {
        let name = handler.definition().name;
        if self.tool(&name).is_some() {
            return Err(Error::Config(format!("Tool '{}' is already registered", name)));
        }
        tracing::debug!(tool = %name, "Registered tool");
        self.tools.push(handler);
        Ok(())
    }

    /// Register a prompt. Rejects a duplicate name.
    pub fn register_prompt(&mut self, handler: Arc<dyn PromptHandler>) -> Result<()> {
        let name = handler.definition().name;
        if self.prompt(&name).is_some() {
            return Err(Error::Config(format!(
                "Prompt '{}' is already registered",
                name
            )));
        }
        tracing::debug!(prompt = %name, "Registered prompt");
        self.prompts.push(handler);
        Ok(())
    }

    pub fn resource(&self, uri: &str) -> Option<&Arc<dyn ResourceHandler>> {
        self.resources.iter().find(|r| r.definition().uri == uri)
    }

    pub fn tool(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.tools.iter().find(|t| t.definition().name == name)
    }

    pub fn prompt(&self, name: &str) -> Option<&Arc<dyn PromptHandler>> {
        self.prompts.iter().find(|p| p.definition().name == name)
    }

    pub fn resource_definitions(&self) -> Vec<ResourceDefinition> {
        self.resources.iter().map(|r| r.definition()).collect()
    }

    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    pub fn prompt_definitions(&self) -> Vec<PromptDefinition> {
        self.prompts.iter().map(|p| p.definition()).collect()
    }

    /// Capabilities to advertise, derived from what is registered.
    pub fn capabilities(&self) -> ServerCapabilities {
        ServerCapabilities {
            tools: (!self.tools.is_empty()).then(ToolsCapability::default),
            resources: (!self.resources.is_empty()).then(ResourcesCapability::default),
            prompts: (!self.prompts.is_empty()).then(PromptsCapability::default),
        }
    }
}
