// Tool trait, registry, and schema helpers

mod wolfram;

pub use wolfram::{AskLlmTool, SimpleAnswerTool, ValidateKeyTool};

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;

use crate::protocol::{CallToolResult, ToolSchema};

/// A named tool exposed over MCP.
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Declaration listed by `tools/list`.
    fn schema(&self) -> ToolSchema;

    /// Execute the tool. Vendor and argument failures should come back as
    /// `isError` content via `Ok`; an `Err` is reserved for faults the tool
    /// cannot phrase as content.
    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult>;
}

/// Registry mapping tool names to implementations.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn McpTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool under its schema name.
    pub fn register(&mut self, tool: Arc<dyn McpTool>) {
        self.tools.insert(tool.schema().name, tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn McpTool>> {
        self.tools.get(name).cloned()
    }

    /// Schemas of every registered tool.
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Helpers for building JSON-schema input shapes

pub fn json_schema_object(
    properties: serde_json::Value,
    required: Vec<&str>,
) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ToolSchema;

    struct StaticTool;

    #[async_trait::async_trait]
    impl McpTool for StaticTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "static".to_string(),
                description: "Always answers the same".to_string(),
                input_schema: json_schema_object(serde_json::json!({}), vec![]),
            }
        }

        async fn execute(&self, _arguments: serde_json::Value) -> Result<CallToolResult> {
            Ok(CallToolResult::text("42"))
        }
    }

    #[test]
    fn registry_resolves_tools_by_schema_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(StaticTool));

        assert!(registry.get("static").is_some());
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.schemas().len(), 1);
    }

    #[test]
    fn object_schema_lists_required_properties() {
        let schema = json_schema_object(
            serde_json::json!({ "query": json_schema_string("The query") }),
            vec!["query"],
        );

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"][0], "query");
        assert_eq!(schema["properties"]["query"]["type"], "string");
    }
}
