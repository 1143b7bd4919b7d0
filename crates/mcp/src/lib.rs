// MCP server for the WolframAlpha LLM API
// Exposes the ask_llm / get_simple_answer / validate_key tool catalog to
// agent clients over newline-delimited JSON-RPC on stdio.

pub mod client;
pub mod config;
pub mod protocol;
pub mod server;
pub mod tools;

pub use client::{WolframClient, WolframError};
pub use config::WolframConfig;
pub use server::McpServer;
