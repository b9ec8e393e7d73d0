use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::{ ResponderError, ResponderGateway };
use crate::config::prompt::PromptConfig;
use crate::lead::digit_value;
use crate::models::chat::{ Role, Turn };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyBranch {
    Pricing,
    Destination,
    ContactAck,
    Fallback,
}

/// Offline keyword responder. Stateless and deterministic; never fails.
pub struct LocalResponder {
    prompts: Arc<PromptConfig>,
    delay: Duration,
}

impl LocalResponder {
    pub fn new(prompts: Arc<PromptConfig>, delay: Duration) -> Self {
        Self { prompts, delay }
    }

    /// First match wins: price keywords, then destinations, then any digit.
    pub fn classify(&self, message: &str) -> ReplyBranch {
        let lowered = message.to_lowercase();
        let local = &self.prompts.local;
        let mentions = |keywords: &[String]| {
            keywords.iter().any(|k| !k.is_empty() && lowered.contains(&k.to_lowercase()))
        };

        if mentions(local.price_keywords.as_slice()) {
            ReplyBranch::Pricing
        } else if mentions(local.destination_keywords.as_slice()) {
            ReplyBranch::Destination
        } else if lowered.chars().any(|c| digit_value(c).is_some()) {
            ReplyBranch::ContactAck
        } else {
            ReplyBranch::Fallback
        }
    }

    pub fn reply_for(&self, branch: ReplyBranch) -> &str {
        let local = &self.prompts.local;
        match branch {
            ReplyBranch::Pricing => &local.pricing_reply,
            ReplyBranch::Destination => &local.destination_reply,
            ReplyBranch::ContactAck => &local.contact_ack_reply,
            ReplyBranch::Fallback => &local.fallback_reply,
        }
    }
}

#[async_trait]
impl ResponderGateway for LocalResponder {
    async fn produce_reply(&self, history: &[Turn]) -> Result<String, ResponderError> {
        let latest = history
            .iter()
            .rev()
            .find(|t| t.role() == Role::User)
            .map(|t| t.content())
            .unwrap_or_default();
        Ok(self.reply_for(self.classify(latest)).to_string())
    }

    fn presentation_delay(&self) -> Duration {
        self.delay
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
