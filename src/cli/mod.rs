use clap::Parser;

use crate::session::SessionLimits;

pub const DEFAULT_CONTACT_MESSAGE: &str =
    "Hi! This is BinMajid Tourism. We received your request through our AI assistant. How can we help you further?";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Responder Args ---
    /// Reply strategy: remote (hosted chat completion) or local (keyword rules)
    #[arg(long, env = "RESPONDER_TYPE", default_value = "remote")]
    pub responder_type: String,

    /// Cosmetic delay in milliseconds before the local responder's reply is shown
    #[arg(long, env = "LOCAL_REPLY_DELAY_MS", default_value = "1000")]
    pub local_reply_delay_ms: u64,

    // --- Chat LLM Provider Args ---
    /// Type of LLM provider for chat completion (groq, openai, ollama)
    #[arg(long, env = "CHAT_LLM_TYPE", default_value = "groq")]
    pub chat_llm_type: String,

    /// Base URL for the Chat LLM provider API (e.g., https://api.groq.com/openai/v1)
    #[arg(long, env = "CHAT_BASE_URL")] // No default, let adapters handle defaults if None
    pub chat_base_url: Option<String>,

    /// API Key for the Chat LLM provider
    #[arg(long, env = "CHAT_API_KEY", default_value = "", hide_env_values = true)]
    pub chat_api_key: String,

    /// Alternate name for the chat API key, read when CHAT_API_KEY is empty
    #[arg(long, env = "GROQ_API_KEY", default_value = "", hide_env_values = true)]
    pub groq_api_key: String,

    /// Model name for chat completion (e.g., llama-3.3-70b-versatile)
    #[arg(long, env = "CHAT_MODEL")] // No default, rely on adapter defaults if None
    pub chat_model: Option<String>,

    /// Sampling temperature for chat completion
    #[arg(long, env = "CHAT_TEMPERATURE", default_value = "0.7")]
    pub chat_temperature: f32,

    /// Upper bound on tokens generated per reply
    #[arg(long, env = "CHAT_MAX_TOKENS", default_value = "1024")]
    pub chat_max_tokens: u32,

    /// Timeout in seconds for one completion call
    #[arg(long, env = "CHAT_TIMEOUT_SECS", default_value = "30")]
    pub chat_timeout_secs: u64,

    // --- Persona Args ---
    /// Optional path to a prompt configuration file overriding the built-in persona.
    #[arg(long, env = "PROMPTS_PATH")]
    pub prompts_path: Option<String>,

    // --- Admin / Lead Args ---
    /// Shared secret unlocking the leads dashboard. Empty keeps it locked.
    #[arg(long, env = "ADMIN_CODE", default_value = "", hide_env_values = true)]
    pub admin_code: String,

    /// Messaging deep-link domain used for the contact action
    #[arg(long, env = "CONTACT_DOMAIN", default_value = "wa.me")]
    pub contact_domain: String,

    /// Message pre-filled in the contact deep link
    #[arg(long, env = "CONTACT_MESSAGE", default_value = DEFAULT_CONTACT_MESSAGE)]
    pub contact_message: String,

    /// Characters of the triggering message kept on each lead
    #[arg(long, env = "EXCERPT_LEN", default_value = "30")]
    pub excerpt_len: usize,

    /// Turns kept per session before the oldest are dropped. 0 means no limit.
    #[arg(long, env = "MAX_TURNS", default_value = "200")]
    pub max_turns: usize,

    /// Leads kept per session before the oldest are dropped. 0 means no limit.
    #[arg(long, env = "MAX_LEADS", default_value = "500")]
    pub max_leads: usize,

    // --- General App Args ---
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,
}

impl Args {
    /// `CHAT_API_KEY` wins over `GROQ_API_KEY`; `None` when both are empty.
    pub fn resolved_api_key(&self) -> Option<String> {
        [&self.chat_api_key, &self.groq_api_key]
            .into_iter()
            .find(|k| !k.trim().is_empty())
            .cloned()
    }

    pub fn session_limits(&self) -> SessionLimits {
        SessionLimits {
            max_turns: Some(self.max_turns).filter(|n| *n > 0),
            max_leads: Some(self.max_leads).filter(|n| *n > 0),
            excerpt_len: self.excerpt_len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["concierge-agent"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn chat_key_takes_precedence() {
        let args = parse(&["--chat-api-key", "primary", "--groq-api-key", "fallback"]);
        assert_eq!(args.resolved_api_key().as_deref(), Some("primary"));

        let args = parse(&["--chat-api-key", "", "--groq-api-key", "fallback"]);
        assert_eq!(args.resolved_api_key().as_deref(), Some("fallback"));
    }

    #[test]
    fn zero_limits_mean_unbounded() {
        let args = parse(&["--max-turns", "0", "--max-leads", "10"]);
        let limits = args.session_limits();
        assert_eq!(limits.max_turns, None);
        assert_eq!(limits.max_leads, Some(10));
    }
}
