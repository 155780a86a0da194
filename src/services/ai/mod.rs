pub mod openai;
pub mod prompt;

use async_trait::async_trait;

use crate::models::ChatMessage;

/// Chat-completion gateway. Returns the assistant's reply for one turn.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn chat(&self, system_prompt: &str, messages: &[ChatMessage]) -> anyhow::Result<String>;
}
