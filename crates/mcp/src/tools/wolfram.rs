// The WolframAlpha tool catalog: ask_llm, get_simple_answer, validate_key

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use wolfram_llm_core::ParsedAnswer;

use crate::client::WolframClient;
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, json_schema_string, McpTool};

#[derive(Debug, Deserialize)]
struct QueryArgs {
    query: String,
}

/// Ask WolframAlpha and return the structured answer as a text block.
pub struct AskLlmTool {
    client: Arc<WolframClient>,
}

impl AskLlmTool {
    pub fn new(client: Arc<WolframClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl McpTool for AskLlmTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "ask_llm".to_string(),
            description:
                "Ask WolframAlpha a query and get an LLM-optimized structured response".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "query": json_schema_string("The query to ask WolframAlpha")
                }),
                vec!["query"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: QueryArgs =
            serde_json::from_value(arguments).context("Invalid arguments for ask_llm")?;

        let raw = match self.client.ask(&args.query).await {
            Ok(raw) => raw,
            Err(err) => return Ok(CallToolResult::error(err.to_string())),
        };

        match ParsedAnswer::parse(&raw) {
            Ok(answer) => Ok(CallToolResult::text(render_answer(&answer))),
            Err(err) => Ok(CallToolResult::error(format!(
                "Failed to parse WolframAlpha response: {err}"
            ))),
        }
    }
}

/// Get the deduplicated answer body alone, capped on the backend side.
pub struct SimpleAnswerTool {
    client: Arc<WolframClient>,
}

impl SimpleAnswerTool {
    pub fn new(client: Arc<WolframClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl McpTool for SimpleAnswerTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_simple_answer".to_string(),
            description:
                "Get a simplified, LLM-friendly answer focusing on the most relevant information"
                    .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "query": json_schema_string("The query to ask WolframAlpha")
                }),
                vec!["query"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: QueryArgs =
            serde_json::from_value(arguments).context("Invalid arguments for get_simple_answer")?;

        let raw = match self.client.ask_simplified(&args.query).await {
            Ok(raw) => raw,
            Err(err) => return Ok(CallToolResult::error(err.to_string())),
        };

        match ParsedAnswer::parse(&raw) {
            Ok(answer) => Ok(CallToolResult::text(answer.principal_text)),
            Err(err) => Ok(CallToolResult::error(format!(
                "Failed to parse WolframAlpha response: {err}"
            ))),
        }
    }
}

/// Check that the configured app id is accepted by the API.
pub struct ValidateKeyTool {
    client: Arc<WolframClient>,
}

impl ValidateKeyTool {
    pub fn new(client: Arc<WolframClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl McpTool for ValidateKeyTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "validate_key".to_string(),
            description: "Validate the WolframAlpha LLM API key".to_string(),
            input_schema: json_schema_object(serde_json::json!({}), vec![]),
        }
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<CallToolResult> {
        let valid = self.client.validate_app_id().await;
        Ok(CallToolResult::text(if valid {
            "API key is valid"
        } else {
            "API key is invalid"
        }))
    }
}

/// Render a parsed answer into the user-facing text block: query line,
/// interpretation when the answer carried one, the principal text, and the
/// full-results link.
fn render_answer(answer: &ParsedAnswer) -> String {
    let mut text = format!("Query: {}\n", answer.query);

    if let Some(interpretation) = answer.section("Input interpretation") {
        text.push_str(&format!("Interpretation: {}\n", interpretation.content));
    }

    text.push_str(&format!("\nResult: {}\n", answer.principal_text));

    if let Some(url) = &answer.url {
        text.push_str(&format!("\nFull results: {url}"));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WolframConfig;
    use crate::protocol::ToolContent;
    use url::Url;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn mock_client(server: &MockServer) -> Arc<WolframClient> {
        let mut config = WolframConfig::new("TEST-APPID");
        config.base_url = Url::parse(&format!("{}/llm-api", server.uri())).unwrap();
        Arc::new(WolframClient::new(config).unwrap())
    }

    fn content_text(result: &CallToolResult) -> &str {
        match &result.content[0] {
            ToolContent::Text { text } => text,
        }
    }

    #[test]
    fn rendered_answer_lists_query_interpretation_and_result() {
        let answer = ParsedAnswer::parse(
            "Query: \"what is 2+2?\"\n\nInput interpretation: 2 + 2\n\nResult: 4",
        )
        .unwrap();

        assert_eq!(
            render_answer(&answer),
            "Query: what is 2+2?\nInterpretation: 2 + 2\n\n\
             Result: Input interpretation: 2 + 2\n\nResult: 4\n",
        );
    }

    #[test]
    fn rendered_answer_ends_with_the_full_results_link() {
        let answer = ParsedAnswer::parse(
            "Query: \"q\"\n\nResult: 4\n\n\
             Wolfram|Alpha website result for \"q\": https://www.wolframalpha.com/input?i=q",
        )
        .unwrap();

        let rendered = render_answer(&answer);
        assert!(rendered.ends_with("\nFull results: https://www.wolframalpha.com/input?i=q"));
    }

    #[test]
    fn rendered_answer_omits_absent_parts() {
        let answer = ParsedAnswer::parse("Query: \"q\"\n\nResult: 4").unwrap();

        assert_eq!(render_answer(&answer), "Query: q\n\nResult: Result: 4\n");
    }

    #[tokio::test]
    async fn ask_llm_returns_the_rendered_answer() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("input", "what is 2+2?"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("Query: \"what is 2+2?\"\n\nResult: 4"),
            )
            .mount(&server)
            .await;

        let tool = AskLlmTool::new(mock_client(&server));
        let result = tool
            .execute(serde_json::json!({ "query": "what is 2+2?" }))
            .await
            .unwrap();

        assert!(result.is_error.is_none());
        assert!(content_text(&result).contains("Query: what is 2+2?"));
        assert!(content_text(&result).contains("Result: 4"));
    }

    #[tokio::test]
    async fn ask_llm_surfaces_uninterpretable_input_as_error_content() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(501).set_body_string("uninterpretable"))
            .mount(&server)
            .await;

        let tool = AskLlmTool::new(mock_client(&server));
        let result = tool
            .execute(serde_json::json!({ "query": "xyzzy glorp" }))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert!(content_text(&result).contains("cannot be interpreted"));
    }

    #[tokio::test]
    async fn ask_llm_rejects_missing_query_argument() {
        let server = MockServer::start().await;
        let tool = AskLlmTool::new(mock_client(&server));

        let err = tool.execute(serde_json::json!({})).await.unwrap_err();
        assert!(err.to_string().contains("Invalid arguments"));
    }

    #[tokio::test]
    async fn get_simple_answer_returns_the_principal_text_alone() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("maxchars", "500"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("Query: \"q\"\n\nResult: Paris is the capital of France"),
            )
            .mount(&server)
            .await;

        let tool = SimpleAnswerTool::new(mock_client(&server));
        let result = tool
            .execute(serde_json::json!({ "query": "q" }))
            .await
            .unwrap();

        assert_eq!(
            content_text(&result),
            "Result: Paris is the capital of France",
        );
    }

    #[tokio::test]
    async fn get_simple_answer_reports_unparseable_responses() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("no query paragraph here"))
            .mount(&server)
            .await;

        let tool = SimpleAnswerTool::new(mock_client(&server));
        let result = tool
            .execute(serde_json::json!({ "query": "q" }))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert!(content_text(&result).contains("missing query"));
    }

    #[tokio::test]
    async fn validate_key_reports_both_outcomes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Query: \"2+2\"\n\nResult: 4"))
            .mount(&server)
            .await;

        let tool = ValidateKeyTool::new(mock_client(&server));
        let result = tool.execute(serde_json::Value::Null).await.unwrap();
        assert_eq!(content_text(&result), "API key is valid");

        let rejecting = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Invalid appid"))
            .mount(&rejecting)
            .await;

        let tool = ValidateKeyTool::new(mock_client(&rejecting));
        let result = tool.execute(serde_json::Value::Null).await.unwrap();
        assert_eq!(content_text(&result), "API key is invalid");
    }

    #[tokio::test]
    async fn tool_schemas_declare_the_catalog_names() {
        let server = MockServer::start().await;
        let client = mock_client(&server);

        assert_eq!(AskLlmTool::new(client.clone()).schema().name, "ask_llm");
        assert_eq!(
            SimpleAnswerTool::new(client.clone()).schema().name,
            "get_simple_answer",
        );
        assert_eq!(ValidateKeyTool::new(client).schema().name, "validate_key");
    }
}
