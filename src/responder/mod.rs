pub mod local;
pub mod remote;

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::models::chat::Turn;

pub use local::LocalResponder;
pub use remote::RemoteResponder;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponderError {
    #[error("completion service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("completion service rate limited the request")]
    RateLimited,
}

/// Produces the next assistant message from the full conversation history.
#[async_trait]
pub trait ResponderGateway: Send + Sync {
    async fn produce_reply(&self, history: &[Turn]) -> Result<String, ResponderError>;

    /// Cosmetic pause the transport applies before showing the reply.
    fn presentation_delay(&self) -> Duration {
        Duration::ZERO
    }

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponderType {
    Remote,
    Local,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseResponderTypeError {
    message: String,
}

impl fmt::Display for ParseResponderTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseResponderTypeError {}

impl FromStr for ResponderType {
    type Err = ParseResponderTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "remote" => Ok(ResponderType::Remote),
            "local" => Ok(ResponderType::Local),
            _ =>
                Err(ParseResponderTypeError {
                    message: format!("Invalid responder type: '{}' (expected remote or local)", s),
                }),
        }
    }
}
