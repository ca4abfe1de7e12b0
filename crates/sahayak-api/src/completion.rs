use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use sahayak_llm::{ChatClient, ChatOptions, ChatRequest, Message};
use sahayak_persist::{ChatRecord, PersistenceClient};

use crate::config::LlmConfig;
use crate::error::{ApiError, ApiResult};
use crate::quota::{now_ms, QuotaTracker};

pub const NEPALI_SYSTEM_PROMPT: &str =
    "तपाईं सहायक हुनुहुन्छ, नेपाली उपयोगकर्ताहरूलाई मद्दत गर्ने AI सहायक। नेपाली भाषामा जवाफ दिनुहोस्।";

pub const ENGLISH_SYSTEM_PROMPT: &str =
    "You are Sahayak, a helpful AI assistant for Nepali users. Respond in English.";

/// One earlier turn replayed to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContextTurn {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub is_user: bool,
}

/// Validated completion request
#[derive(Debug, Clone)]
pub struct CompletionInput {
    pub user_id: String,
    pub prompt: String,
    pub language: Option<String>,
    pub context: Vec<ContextTurn>,
}

/// `ne` selects the Nepali prompt; anything else, including no tag, English
pub fn system_prompt(language: Option<&str>) -> &'static str {
    match language {
        Some("ne") => NEPALI_SYSTEM_PROMPT,
        _ => ENGLISH_SYSTEM_PROMPT,
    }
}

/// System prompt, then the transcript in order, then the new prompt
pub fn build_messages(language: Option<&str>, context: &[ContextTurn], prompt: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(context.len() + 2);
    messages.push(Message::system(system_prompt(language)));
    messages.extend(context.iter().map(|turn| {
        if turn.is_user {
            Message::human(turn.text.as_str())
        } else {
            Message::ai(turn.text.as_str())
        }
    }));
    messages.push(Message::human(prompt));
    messages
}

/// Gate, generate, audit, stamp
#[derive(Clone)]
pub struct CompletionOrchestrator {
    llm: Arc<dyn ChatClient>,
    store: Arc<dyn PersistenceClient>,
    quota: QuotaTracker,
    settings: LlmConfig,
}

impl CompletionOrchestrator {
    pub fn new(
        llm: Arc<dyn ChatClient>,
        store: Arc<dyn PersistenceClient>,
        quota: QuotaTracker,
        settings: LlmConfig,
    ) -> Self {
        Self { llm, store, quota, settings }
    }

    pub async fn complete(&self, input: CompletionInput) -> ApiResult<String> {
        self.quota.check(&input.user_id, now_ms()).await?;

        let messages = build_messages(input.language.as_deref(), &input.context, &input.prompt);
        let request = ChatRequest::new(self.settings.model.clone(), messages).with_options(
            ChatOptions::new()
                .temperature(self.settings.temperature)
                .max_tokens(self.settings.max_tokens),
        );

        tracing::debug!(
            user_id = %input.user_id,
            turns = input.context.len(),
            model = %self.settings.model,
            "Requesting completion"
        );
        let response = self.llm.chat(request).await?;

        let text = response
            .text()
            .ok_or_else(|| ApiError::Upstream("Language model returned no completion".to_string()))?
            .to_string();
        let usage = response
            .usage
            .ok_or_else(|| ApiError::Upstream("Language model reported no token usage".to_string()))?;

        self.store
            .save_chat(ChatRecord {
                user_id: input.user_id.clone(),
                prompt: input.prompt,
                response: text.clone(),
                language: input.language,
                timestamp: Utc::now(),
                tokens_used: usage.total_tokens,
            })
            .await?;

        self.quota.record(&input.user_id, now_ms()).await?;

        tracing::info!(
            user_id = %input.user_id,
            tokens = usage.total_tokens,
            "Completion served"
        );
        Ok(text)
    }
}
