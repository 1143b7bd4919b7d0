// HTTP client for the WolframAlpha LLM API

use reqwest::StatusCode;

use crate::config::WolframConfig;

/// Errors that can occur when talking to the WolframAlpha LLM API.
#[derive(Debug, thiserror::Error)]
pub enum WolframError {
    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered 501: it could not interpret the input.
    #[error("input cannot be interpreted, try rephrasing the query")]
    Uninterpretable,

    /// Any other non-success answer from the API.
    #[error("WolframAlpha API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Client for the WolframAlpha LLM API.
///
/// Holds one `reqwest` connection pool; share it behind an `Arc` across
/// tools. Requests are sent once, without retries.
pub struct WolframClient {
    http: reqwest::Client,
    config: WolframConfig,
}

impl WolframClient {
    pub fn new(config: WolframConfig) -> Result<Self, WolframError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("wolfram-llm-mcp/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self { http, config })
    }

    /// Fetch the full answer text for a natural-language query.
    pub async fn ask(&self, input: &str) -> Result<String, WolframError> {
        self.fetch(input, None).await
    }

    /// Fetch a shortened answer; `maxchars` caps the response on the backend
    /// side.
    pub async fn ask_simplified(&self, input: &str) -> Result<String, WolframError> {
        self.fetch(input, Some(self.config.max_answer_chars)).await
    }

    /// Probe the configured app id with a trivial query. A usable id yields
    /// an answer carrying a `Result:` paragraph; any failure reports an
    /// invalid id rather than propagating.
    pub async fn validate_app_id(&self) -> bool {
        match self.ask("2+2").await {
            Ok(body) => body.contains("Result:"),
            Err(err) => {
                tracing::debug!(error = %err, "app id validation request failed");
                false
            }
        }
    }

    async fn fetch(&self, input: &str, max_chars: Option<u32>) -> Result<String, WolframError> {
        let mut request = self
            .http
            .get(self.config.base_url.clone())
            .query(&[("appid", self.config.app_id.as_str()), ("input", input)]);

        if let Some(max_chars) = max_chars {
            request = request.query(&[("maxchars", max_chars.to_string())]);
        }

        tracing::debug!(input, ?max_chars, "querying WolframAlpha LLM API");

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_IMPLEMENTED {
            return Err(WolframError::Uninterpretable);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(WolframError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> WolframClient {
        let mut config = WolframConfig::new("TEST-APPID");
        config.base_url = Url::parse(&format!("{}/llm-api", server.uri())).unwrap();
        WolframClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn ask_sends_app_id_and_input() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/llm-api"))
            .and(query_param("appid", "TEST-APPID"))
            .and(query_param("input", "what is 2+2?"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("Query: \"what is 2+2?\"\n\nResult: 4"),
            )
            .mount(&server)
            .await;

        let body = test_client(&server).ask("what is 2+2?").await.unwrap();
        assert!(body.contains("Result: 4"));
    }

    #[tokio::test]
    async fn simplified_request_carries_the_length_cap() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/llm-api"))
            .and(query_param("maxchars", "500"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Query: \"q\"\n\nResult: 4"))
            .mount(&server)
            .await;

        let body = test_client(&server).ask_simplified("q").await.unwrap();
        assert!(body.contains("Result: 4"));
    }

    #[tokio::test]
    async fn status_501_maps_to_uninterpretable() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(501).set_body_string("uninterpretable input"))
            .mount(&server)
            .await;

        let err = test_client(&server).ask("xyzzy glorp").await.unwrap_err();
        assert!(matches!(err, WolframError::Uninterpretable));
    }

    #[tokio::test]
    async fn other_error_statuses_map_to_api_errors() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Invalid appid"))
            .mount(&server)
            .await;

        let err = test_client(&server).ask("2+2").await.unwrap_err();
        match err {
            WolframError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Invalid appid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn validate_app_id_accepts_answers_with_a_result() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("input", "2+2"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Query: \"2+2\"\n\nResult: 4"))
            .mount(&server)
            .await;

        assert!(test_client(&server).validate_app_id().await);
    }

    #[tokio::test]
    async fn validate_app_id_rejects_failures() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Invalid appid"))
            .mount(&server)
            .await;

        assert!(!test_client(&server).validate_app_id().await);
    }
}
