pub mod chat;

use serde::{ Deserialize, Serialize };
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub use chat::{ ChatClient, LlmError, new_client };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmType {
    Groq,
    OpenAI,
    Ollama,
}

impl LlmType {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            LlmType::Groq => "https://api.groq.com/openai/v1",
            LlmType::OpenAI => "https://api.openai.com/v1",
            LlmType::Ollama => "http://localhost:11434/v1",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, LlmType::Ollama)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseLlmTypeError {
    message: String,
}

impl fmt::Display for ParseLlmTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseLlmTypeError {}

impl FromStr for LlmType {
    type Err = ParseLlmTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "groq" => Ok(LlmType::Groq),
            "openai" => Ok(LlmType::OpenAI),
            "ollama" => Ok(LlmType::Ollama),
            _ =>
                Err(ParseLlmTypeError {
                    message: format!("Invalid LLM type: '{}'", s),
                }),
        }
    }
}

impl fmt::Display for LlmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LlmType::Groq => "groq",
            LlmType::OpenAI => "openai",
            LlmType::Ollama => "ollama",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub llm_type: LlmType,
    pub api_key: Option<String>,
    pub completion_model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            llm_type: LlmType::Groq,
            api_key: None,
            completion_model: None,
            base_url: None,
            temperature: 0.7,
            max_tokens: 1024,
            timeout: Duration::from_secs(30),
        }
    }
}
