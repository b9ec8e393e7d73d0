use async_trait::async_trait;
use log::{ debug, warn };
use reqwest::{ Client as HttpClient, StatusCode, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::{ Deserialize, Serialize };

use super::{ ChatClient, LlmError };
use crate::llm::LlmConfig;
use crate::models::chat::Turn;

const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
const COMPLETIONS_ROUTE: &str = "/chat/completions";

/// Client for Groq's OpenAI-compatible chat completions endpoint. Any provider
/// speaking the same wire format works by pointing `base_url` at it.
pub struct GroqChatClient {
    http: HttpClient,
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize)]
struct GroqMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct GroqRequest {
    messages: Vec<GroqMessage>,
    model: String,
    temperature: f32,
    #[serde(rename = "max_tokens")]
    max_tokens: u32,
}

#[derive(Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
}

#[derive(Deserialize)]
struct GroqChoice {
    message: GroqMessage,
}

impl GroqChatClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config.api_key.clone().filter(|k| !k.trim().is_empty());
        if api_key.is_none() && config.llm_type.requires_api_key() {
            return Err(LlmError::MissingApiKey(config.llm_type.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", key)).map_err(|e|
                    LlmError::InvalidApiKey(e.to_string())
                )?
            );
        }

        let http = HttpClient::builder().default_headers(headers).timeout(config.timeout).build()?;

        Ok(Self {
            http,
            model: config.completion_model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: config.base_url
                .clone()
                .unwrap_or_else(|| config.llm_type.default_base_url().to_string()),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn build_request(&self, messages: &[Turn]) -> GroqRequest {
        GroqRequest {
            messages: messages
                .iter()
                .map(|t| GroqMessage {
                    role: t.role().as_str().to_string(),
                    content: t.content().to_string(),
                })
                .collect(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

fn first_choice(resp: GroqResponse) -> Result<String, LlmError> {
    resp.choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or(LlmError::EmptyResponse)
}

#[async_trait]
impl ChatClient for GroqChatClient {
    async fn complete(&self, messages: &[Turn]) -> Result<String, LlmError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), COMPLETIONS_ROUTE);
        let req = self.build_request(messages);
        debug!("Sending {} messages to {} (model {})", req.messages.len(), url, self.model);

        let resp = self.http.post(&url).json(&req).send().await?;
        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Completion API rate limited the request");
            return Err(LlmError::RateLimited);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Status { status: status.as_u16(), body });
        }

        first_choice(resp.json::<GroqResponse>().await?)
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmType;

    fn config(api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            api_key: api_key.map(str::to_string),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn missing_key_is_rejected_for_hosted_provider() {
        let err = GroqChatClient::from_config(&config(Some("  "))).err().unwrap();
        assert!(matches!(err, LlmError::MissingApiKey(p) if p == "groq"));
    }

    #[test]
    fn local_provider_needs_no_key() {
        let cfg = LlmConfig { llm_type: LlmType::Ollama, ..LlmConfig::default() };
        let client = GroqChatClient::from_config(&cfg).unwrap();
        assert_eq!(client.get_base_url(), "http://localhost:11434/v1");
    }

    #[test]
    fn defaults_model_and_base_url() {
        let client = GroqChatClient::from_config(&config(Some("gsk_test"))).unwrap();
        assert_eq!(client.get_model(), "llama-3.3-70b-versatile");
        assert_eq!(client.get_base_url(), "https://api.groq.com/openai/v1");
    }

    #[test]
    fn request_carries_roles_in_order() {
        let client = GroqChatClient::from_config(&config(Some("gsk_test"))).unwrap();
        let req = client.build_request(&[Turn::system("persona"), Turn::user("hi")]);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert_eq!(json["model"], "llama-3.3-70b-versatile");
    }

    #[test]
    fn parses_first_choice() {
        let body =
            r#"{"choices":[{"message":{"role":"assistant","content":"Marhaba!"}}],"id":"x"}"#;
        let resp: GroqResponse = serde_json::from_str(body).unwrap();
        assert_eq!(first_choice(resp).unwrap(), "Marhaba!");

        let empty: GroqResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(first_choice(empty), Err(LlmError::EmptyResponse)));
    }
}
