// OpenAI chat-completions client

use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenUsage};
use crate::types::Message;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{json, Value};

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI client (HTTP direct, no SDK)
pub struct OpenAIClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenAIClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: OPENAI_API_BASE.to_string(),
        })
    }

    /// Point the client at a compatible endpoint (proxy, mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build chat completion request payload
    fn build_chat_request(model: &str, messages: &[Message], options: &ChatOptions) -> Value {
        let openai_messages: Vec<Value> = messages.iter().map(Self::convert_message).collect();

        let mut request = json!({
            "model": model,
            "messages": openai_messages,
        });

        if let Some(obj) = request.as_object_mut() {
            if let Some(temp) = options.temperature {
                obj.insert("temperature".to_string(), json!(temp));
            }
            if let Some(max_tokens) = options.max_tokens {
                obj.insert("max_tokens".to_string(), json!(max_tokens));
            }
        }

        request
    }

    fn convert_message(message: &Message) -> Value {
        json!({
            "role": message.role(),
            "content": message.content().as_text(),
        })
    }
}

#[async_trait]
impl ChatClient for OpenAIClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = Self::build_chat_request(&request.model, &request.messages, &request.options);

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error ({}): {}", status, error_text);
        }

        let raw: OpenAIChatResponse = response
            .json()
            .await
            .context("Failed to parse response")?;

        let choice = raw.choices.into_iter().next();
        Ok(ChatResponse {
            content: choice.as_ref().and_then(|c| c.message.content.clone()),
            finish_reason: choice.and_then(|c| c.finish_reason),
            usage: Some(TokenUsage {
                input_tokens: raw.usage.prompt_tokens,
                output_tokens: raw.usage.completion_tokens,
                total_tokens: raw.usage.total_tokens,
            }),
            model: raw.model,
        })
    }
}

// ============================================================================
// OPENAI-SPECIFIC RESPONSE TYPES
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
struct OpenAIChatResponse {
    model: String,
    choices: Vec<Choice>,
    usage: Usage,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
