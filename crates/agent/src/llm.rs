use anyhow::Result;
use async_trait::async_trait;

use crate::prompt::NegotiationPrompt;

/// Generative-text backend. Returns the raw completion text.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &NegotiationPrompt) -> Result<String>;
}
