use crate::error::Result;
use crate::traits::{ChatMessage, ChatResponse, Tool, ToolResult, ToolRunner, ToolSpec};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

pub struct ToolRegistry {
    tools: Mutex<Vec<Arc<dyn Tool>>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Mutex::new(Vec::new()),
        }
    }

    pub fn register(&self, tool: Box<dyn Tool>) {
        let mut tools = self.tools.lock().unwrap();
        tools.push(Arc::from(tool));
    }

    pub fn get_specs(&self) -> Vec<ToolSpec> {
        let tools = self.tools.lock().unwrap();
        tools.iter().map(|t| t.spec()).collect()
    }

    pub async fn execute(&self, name: &str, args: serde_json::Value) -> ToolResult {
        let tool = {
            let tools = self.tools.lock().unwrap();
            tools.iter().find(|t| t.name() == name).cloned()
        };

        match tool {
            Some(tool) => {
                tracing::debug!(tool = name, "executing tool");
                match tool.execute(args).await {
                    Ok(result) => result,
                    Err(e) => ToolResult::error(format!("Execution failed: {}", e)),
                }
            }
            None => ToolResult::error(format!("Tool '{}' not found", name)),
        }
    }
}

#[async_trait]
impl ToolRunner for ToolRegistry {
    fn list_tools(&self) -> Vec<ToolSpec> {
        self.get_specs()
    }

    async fn execute_requested(&self, response: &ChatResponse) -> Result<Vec<ChatMessage>> {
        let mut entries = Vec::new();

        for call in &response.tool_calls {
            let result = match serde_json::from_str(&call.arguments) {
                Ok(args) => self.execute(&call.name, args).await,
                Err(e) => ToolResult::error(format!("Malformed arguments: {}", e)),
            };
            if !result.success {
                tracing::warn!(tool = %call.name, error = ?result.error, "tool reported failure");
            }

            entries.push(ChatMessage::tool_result(
                call.id.clone(),
                serde_json::to_string(&result).unwrap_or_default(),
            ));
        }

        Ok(entries)
    }
}
