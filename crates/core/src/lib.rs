// Core answer model for the WolframAlpha LLM MCP server

pub mod answer;

pub use answer::{AnswerSection, ParseError, ParsedAnswer};
