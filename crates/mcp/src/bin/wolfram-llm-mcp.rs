// WolframAlpha LLM MCP server binary

use std::sync::Arc;

use anyhow::Result;
use wolfram_llm_mcp::client::WolframClient;
use wolfram_llm_mcp::config::WolframConfig;
use wolfram_llm_mcp::server::McpServer;
use wolfram_llm_mcp::tools::{AskLlmTool, SimpleAnswerTool, ToolRegistry, ValidateKeyTool};

#[tokio::main]
async fn main() -> Result<()> {
    // Stdout carries protocol traffic, so all logging goes to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = WolframConfig::from_env()?;
    let client = Arc::new(WolframClient::new(config)?);

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(AskLlmTool::new(client.clone())));
    registry.register(Arc::new(SimpleAnswerTool::new(client.clone())));
    registry.register(Arc::new(ValidateKeyTool::new(client)));

    tracing::info!("Registered {} tools", registry.schemas().len());
    tracing::info!("WolframAlpha LLM MCP server running on stdio");

    McpServer::new(registry).run().await
}
