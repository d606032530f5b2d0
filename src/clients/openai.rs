use std::time::Duration;

use async_trait::async_trait;
use openai::chat::{ChatCompletion, ChatCompletionMessage, ChatCompletionMessageRole};
use openai::Credentials;

use super::Completer;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::prompt::SYSTEM_INSTRUCTION;

pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u64 = 600;

pub struct OpenAiClient {
    creds: Credentials,
    model: String,
    timeout: Duration,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            creds: Credentials::new(config.api_key.expose().to_string(), config.base_url.clone()),
            model: config.model.clone(),
            timeout: config.upstream_timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn message(role: ChatCompletionMessageRole, content: &str) -> ChatCompletionMessage {
    ChatCompletionMessage {
        role,
        content: Some(content.to_string()),
        name: None,
        function_call: None,
        tool_calls: None,
        tool_call_id: None,
    }
}

#[async_trait]
impl Completer for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "requesting chat completion");
        let messages = vec![
            message(ChatCompletionMessageRole::System, SYSTEM_INSTRUCTION),
            message(ChatCompletionMessageRole::User, prompt),
        ];

        let request = ChatCompletion::builder(&self.model, messages)
            .temperature(TEMPERATURE)
            .max_tokens(MAX_TOKENS)
            .credentials(self.creds.clone())
            .create();

        let resp = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| {
                AppError::Upstream(format!("no response within {}s", self.timeout.as_secs()))
            })?
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let text = extract_completion_text(resp.choices.into_iter().map(|c| c.message.content))?;
        tracing::debug!(completion_len = text.len(), "chat completion received");
        Ok(text)
    }
}

/// Reduces the provider's choice list to the first choice's trimmed text.
/// An empty list, missing content, or blank content is an upstream failure.
pub fn extract_completion_text<I>(contents: I) -> Result<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    let first = contents
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Upstream("completion returned no choices".into()))?;
    let text = first
        .map(|c| c.trim().to_string())
        .ok_or_else(|| AppError::Upstream("first choice has no content".into()))?;
    if text.is_empty() {
        return Err(AppError::Upstream("first choice content is empty".into()));
    }
    Ok(text)
}
