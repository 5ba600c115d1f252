//! OpenAI-compatible chat completions client.
//!
//! Sends the page to a chat model and returns its rating together with
//! token usage.
//!
//! ### Specification
//!
//! - **Endpoint**: `{endpoint}/chat/completions`
//! - **Authentication**: `Authorization: Bearer <key>`.
//! - **Messages**: configured system prompt, then the user prompt with the
//!   page text substituted for `{{ wiki_content }}`.
//! - **Result**: first choice content (trimmed), the model name reported by
//!   the endpoint, and `usage.prompt_tokens` / `usage.completion_tokens`.

pub mod error;
pub mod prompt;
pub mod response;

pub use error::ChatError;
pub use prompt::render_user_prompt;
pub use response::{ChatMessage, ChatRequest, ChatResponse};

use std::sync::Arc;
use std::time::{Duration, Instant};

use pagepulse_core::Error;
use pagepulse_core::config::AiConfig;
use pagepulse_core::rating::{ModelReply, RatingModel, RatingRequest};
use reqwest::header;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = concat!("pagepulse/", env!("CARGO_PKG_VERSION"));

/// Chat client configuration.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: String,
    /// Base URL, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Request timeout (default: 30s).
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: String::new(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AiConfig> for ChatConfig {
    fn from(config: &AiConfig) -> Self {
        Self {
            api_key: config.api_key.clone().unwrap_or_default(),
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
            ..Default::default()
        }
    }
}

/// Chat completions client.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    config: ChatConfig,
}

impl ChatClient {
    /// Create a new chat client with the given configuration.
    pub fn new(config: ChatConfig) -> Result<Self, ChatError> {
        if config.api_key.is_empty() {
            return Err(ChatError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ChatError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Send one chat completion request.
    pub async fn complete(&self, req: &ChatRequest) -> Result<ChatResponse, ChatError> {
        let start = Instant::now();

        tracing::debug!("requesting chat completion: model={}", req.model);

        let http_response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .json(req)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!("chat completion response status: {}", status);

        if status == 401 || status == 403 {
            return Err(ChatError::AuthError);
        }

        if status == 429 {
            return Err(ChatError::RateLimited);
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(ChatError::HttpError { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await?;
        let response: ChatResponse = serde_json::from_slice(&bytes).map_err(|e| ChatError::Parse(e.to_string()))?;

        tracing::debug!("chat completion finished in {:?}", start.elapsed());

        Ok(response)
    }

    /// Build the chat request for a rating.
    pub fn build_request(request: &RatingRequest) -> ChatRequest {
        ChatRequest {
            model: request.model.clone(),
            messages: vec![
                ChatMessage::system(&request.system_prompt),
                ChatMessage::user(render_user_prompt(&request.user_prompt_template, &request.content)),
            ],
            max_tokens: request.sampling.max_tokens,
            temperature: request.sampling.temperature,
            top_p: request.sampling.top_p,
        }
    }

    /// Convert a raw response into a rating reply.
    ///
    /// Falls back to the requested model name when the endpoint omits it.
    pub fn into_reply(response: ChatResponse, requested_model: &str) -> Result<ModelReply, ChatError> {
        let answer = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ChatError::EmptyResponse("no answer in first choice".into()))?;

        let usage = response.usage.unwrap_or_default();

        Ok(ModelReply {
            answer,
            model: response.model.unwrap_or_else(|| requested_model.to_string()),
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
        })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl RatingModel for ChatClient {
    async fn rate(&self, request: &RatingRequest) -> Result<ModelReply, Error> {
        let chat_request = Self::build_request(request);
        let response = self.complete(&chat_request).await?;
        Ok(Self::into_reply(response, &request.model)?)
    }
}
