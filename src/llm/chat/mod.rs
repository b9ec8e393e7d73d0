pub mod groq;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use super::LlmConfig;
use self::groq::GroqChatClient;
use crate::models::chat::Turn;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key is required for {0}")]
    MissingApiKey(String),
    #[error("Invalid API key format: {0}")]
    InvalidApiKey(String),
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Rate limited by provider")]
    RateLimited,
    #[error("Provider returned status {status}: {body}")]
    Status {
        status: u16,
        body: String,
    },
    #[error("No choices in completion response")]
    EmptyResponse,
}

/// Chat-completion semantics: ordered turns in, one assistant text out.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, messages: &[Turn]) -> Result<String, LlmError>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> String;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, LlmError> {
    let client: Arc<dyn ChatClient> = Arc::new(GroqChatClient::from_config(config)?);
    Ok(client)
}
