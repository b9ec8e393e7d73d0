use async_trait::async_trait;
use log::{ debug, warn };
use std::sync::Arc;

use super::{ ResponderError, ResponderGateway };
use crate::config::prompt::PromptConfig;
use crate::history::format_history_for_log;
use crate::llm::{ ChatClient, LlmError };
use crate::models::chat::Turn;

/// Delegates to a hosted chat-completion API, prefixing the persona as a
/// system turn. Built without a client when the credential is missing; every
/// call then fails as unavailable.
pub struct RemoteResponder {
    client: Option<Arc<dyn ChatClient>>,
    prompts: Arc<PromptConfig>,
}

impl RemoteResponder {
    pub fn new(client: Arc<dyn ChatClient>, prompts: Arc<PromptConfig>) -> Self {
        Self { client: Some(client), prompts }
    }

    pub fn unconfigured(prompts: Arc<PromptConfig>) -> Self {
        Self { client: None, prompts }
    }

    fn build_messages(&self, history: &[Turn]) -> Vec<Turn> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(Turn::system(self.prompts.system_prompt.clone()));
        messages.extend(history.iter().cloned());
        messages
    }
}

impl From<LlmError> for ResponderError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::RateLimited => ResponderError::RateLimited,
            other => ResponderError::ServiceUnavailable(other.to_string()),
        }
    }
}

#[async_trait]
impl ResponderGateway for RemoteResponder {
    async fn produce_reply(&self, history: &[Turn]) -> Result<String, ResponderError> {
        let client = self.client
            .as_ref()
            .ok_or_else(|| ResponderError::ServiceUnavailable(self.prompts.config_error_notice.clone()))?;

        let messages = self.build_messages(history);
        debug!("Remote completion request:\n{}", format_history_for_log(&messages));

        client.complete(&messages).await.map_err(|e| {
            warn!("Completion call to {} failed: {}", client.get_base_url(), e);
            ResponderError::from(e)
        })
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
