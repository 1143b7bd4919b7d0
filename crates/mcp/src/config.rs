// Configuration for the WolframAlpha LLM API client

use std::time::Duration;

use url::Url;

use crate::client::WolframError;

/// Official LLM API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.wolframalpha.com/api/v1/llm-api";

/// Length cap (in characters) requested for simplified answers.
pub const DEFAULT_MAX_ANSWER_CHARS: u32 = 500;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`WolframClient`](crate::client::WolframClient).
#[derive(Debug, Clone)]
pub struct WolframConfig {
    /// WolframAlpha application id used to authenticate requests.
    pub app_id: String,
    /// LLM API endpoint.
    pub base_url: Url,
    /// Request timeout.
    pub timeout: Duration,
    /// Backend-side length cap passed as `maxchars` for simplified answers.
    pub max_answer_chars: u32,
}

impl WolframConfig {
    /// Create a configuration with the default endpoint, timeout, and
    /// simplified-answer cap.
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            // The default endpoint is a valid URL
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL parses"),
            timeout: DEFAULT_TIMEOUT,
            max_answer_chars: DEFAULT_MAX_ANSWER_CHARS,
        }
    }

    /// Load configuration from the environment.
    ///
    /// `WOLFRAM_LLM_APP_ID` is required; `WOLFRAM_LLM_BASE_URL` optionally
    /// overrides the endpoint.
    pub fn from_env() -> Result<Self, WolframError> {
        let app_id = std::env::var("WOLFRAM_LLM_APP_ID")
            .map_err(|_| WolframError::Config("WOLFRAM_LLM_APP_ID is not set".to_string()))?;

        let mut config = Self::new(app_id);

        if let Ok(base_url) = std::env::var("WOLFRAM_LLM_BASE_URL") {
            config.base_url = Url::parse(&base_url).map_err(|e| {
                WolframError::Config(format!("invalid WOLFRAM_LLM_BASE_URL: {e}"))
            })?;
        }

        Ok(config)
    }
}
