use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::sync::Arc;
use log::info;

const DEFAULT_PROMPTS_JSON: &str = include_str!("../../json/prompts.json");

#[derive(Debug)]
pub enum PromptError {
    TemplateNotFound(String),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::TemplateNotFound(key) => write!(f, "Prompt template '{}' is missing or empty", key),
            PromptError::IoError(e) => write!(f, "Prompt file IO error: {}", e),
            PromptError::JsonError(e) => write!(f, "Prompt JSON parsing error: {}", e),
        }
    }
}

impl Error for PromptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PromptError::IoError(e) => Some(e),
            PromptError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PromptError {
    fn from(err: std::io::Error) -> Self {
        PromptError::IoError(err)
    }
}

impl From<serde_json::Error> for PromptError {
    fn from(err: serde_json::Error) -> Self {
        PromptError::JsonError(err)
    }
}

/// Keyword lists and scripted replies for the offline responder.
#[derive(Deserialize, Debug, Clone)]
pub struct LocalReplies {
    pub price_keywords: Vec<String>,
    pub destination_keywords: Vec<String>,
    pub pricing_reply: String,
    pub destination_reply: String,
    pub contact_ack_reply: String,
    pub fallback_reply: String,
}

/// Persona and business text. Loaded once at startup and shared read-only.
#[derive(Deserialize, Debug, Clone)]
pub struct PromptConfig {
    #[serde(default)]
    pub version: u32,
    pub system_prompt: String,
    pub retry_notice: String,
    pub config_error_notice: String,
    pub local: LocalReplies,
}

impl PromptConfig {
    fn validate(&self) -> Result<(), PromptError> {
        let required = [
            ("system_prompt", &self.system_prompt),
            ("retry_notice", &self.retry_notice),
            ("config_error_notice", &self.config_error_notice),
            ("local:pricing_reply", &self.local.pricing_reply),
            ("local:destination_reply", &self.local.destination_reply),
            ("local:contact_ack_reply", &self.local.contact_ack_reply),
            ("local:fallback_reply", &self.local.fallback_reply),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(PromptError::TemplateNotFound(key.to_string()));
            }
        }
        if self.local.price_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(PromptError::TemplateNotFound("local:price_keywords".to_string()));
        }
        if self.local.destination_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(PromptError::TemplateNotFound("local:destination_keywords".to_string()));
        }
        Ok(())
    }
}

pub fn load_prompts_from_str(json: &str) -> Result<Arc<PromptConfig>, PromptError> {
    let config: PromptConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(Arc::new(config))
}

/// The persona compiled into the binary from `json/prompts.json`.
pub fn default_prompts() -> Result<Arc<PromptConfig>, PromptError> {
    load_prompts_from_str(DEFAULT_PROMPTS_JSON)
}

pub fn load_prompts(path: &str) -> Result<Arc<PromptConfig>, PromptError> {
    let file_content = fs::read_to_string(path)?;
    let config = load_prompts_from_str(&file_content)?;
    info!("Loaded prompt configuration v{} from '{}'", config.version, path);
    Ok(config)
}

/// Uses `path` when given, the built-in persona otherwise.
pub fn resolve_prompts(path: Option<&str>) -> Result<Arc<PromptConfig>, PromptError> {
    match path {
        Some(p) if !p.trim().is_empty() => load_prompts(p),
        _ => {
            info!("Using built-in prompt configuration");
            default_prompts()
        }
    }
}
