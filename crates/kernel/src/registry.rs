use anyhow::anyhow;
use std::sync::Arc;

use crate::tool::DebugTool;

/// Registry of debug tools a host has chosen to expose
pub struct DebugRegistry {
    tools: Vec<Arc<dyn DebugTool>>,
}

impl DebugRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool, replacing any earlier tool with the same name
    pub fn register(&mut self, tool: Arc<dyn DebugTool>) {
        if let Some(existing) = self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            tracing::warn!(
                tool = tool.name(),
                "replacing previously registered debug tool"
            );
            *existing = tool;
            return;
        }

        tracing::debug!(tool = tool.name(), "registered debug tool");
        self.tools.push(tool);
    }

    /// All registered tools in registration order
    pub fn tools(&self) -> &[Arc<dyn DebugTool>] {
        &self.tools
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn DebugTool>> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a tool by name
    pub async fn invoke(&self, name: &str) -> anyhow::Result<serde_json::Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| anyhow!("no debug tool registered under '{}'", name))?;

        tracing::info!(tool = name, "invoking debug tool");
        tool.invoke().await
    }
}

impl Default for DebugRegistry {
    fn default() -> Self {
        Self::new()
    }
}
