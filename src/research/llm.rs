//! Client for OpenAI-compatible chat completion endpoints.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{HttpClient, ResearchConfig};

/// A model that answers a single system + user prompt pair.
pub trait LanguageModel {
    /// Returns the model's answer. With `json_mode` the answer is requested as a JSON object.
    fn complete(&self, system: &str, user: &str, json_mode: bool) -> Result<String, LlmError>;
}

/// Failure of a chat completion request.
#[derive(Debug)]
pub enum LlmError {
    /// The request failed or returned an error status.
    Http(ureq::Error),
    /// The response is not a chat completion.
    Decode(serde_json::Error),
    /// The completion carried no message content.
    EmptyResponse,
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(err) => write!(f, "chat request failed: {err}"),
            Self::Decode(err) => write!(f, "unexpected chat response: {err}"),
            Self::EmptyResponse => f.write_str("chat response has no content"),
        }
    }
}

impl std::error::Error for LlmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::EmptyResponse => None,
        }
    }
}

impl From<ureq::Error> for LlmError {
    fn from(err: ureq::Error) -> Self {
        Self::Http(err)
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

/// Chat completions over HTTP.
pub struct ChatClient {
    http: HttpClient,
    endpoint: String,
    api_key: String,
    model: String,
}

impl ChatClient {
    /// Creates a client for `{base_url}/chat/completions`.
    pub fn new(
        http: HttpClient,
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Creates a client when an API key is configured.
    pub fn from_config(config: &ResearchConfig, http: HttpClient) -> Option<Self> {
        let api_key = config.openai_api_key.as_deref()?;
        Some(Self::new(http, &config.llm_base_url, api_key, config.model.clone()))
    }

    /// Full URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl LanguageModel for ChatClient {
    fn complete(&self, system: &str, user: &str, json_mode: bool) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            response_format: json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };
        let authorization = format!("Bearer {}", self.api_key);
        let body = self
            .http
            .post_json(&self.endpoint, &[("Authorization", &authorization)], &request)?;
        parse_completion(&body)
    }
}

/// Extracts the first choice's message content from a chat completion response.
pub fn parse_completion(body: &str) -> Result<String, LlmError> {
    let response: ChatResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(LlmError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn completion_content_is_extracted() {
        let body = r#"{"id": "x", "choices": [
            {"index": 0, "message": {"role": "assistant", "content": "Summary text"}}
        ]}"#;
        assert_eq!(parse_completion(body).expect("valid completion"), "Summary text");
    }

    #[test]
    fn missing_content_is_empty() {
        assert!(matches!(
            parse_completion(r#"{"choices": []}"#),
            Err(LlmError::EmptyResponse)
        ));
        assert!(matches!(
            parse_completion(r#"{"choices": [{"message": {"content": null}}]}"#),
            Err(LlmError::EmptyResponse)
        ));
        assert!(matches!(parse_completion("oops"), Err(LlmError::Decode(_))));
    }

    #[test]
    fn json_mode_sets_response_format() {
        let request = ChatRequest {
            model: "gpt-oss",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "s",
                },
                ChatMessage {
                    role: "user",
                    content: "u",
                },
            ],
            response_format: Some(ResponseFormat {
                kind: "json_object",
            }),
        };
        let value = serde_json::to_value(&request).expect("serializable");
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["messages"][1]["role"], "user");
    }

    #[test]
    fn client_needs_a_key() {
        let http = HttpClient::new(Duration::from_secs(1));
        assert!(ChatClient::from_config(&ResearchConfig::default(), http.clone()).is_none());

        let config = ResearchConfig {
            openai_api_key: Some("key".into()),
            llm_base_url: "http://localhost:11434/v1/".into(),
            ..ResearchConfig::default()
        };
        let client = ChatClient::from_config(&config, http).expect("key configured");
        assert_eq!(client.endpoint(), "http://localhost:11434/v1/chat/completions");
    }
}
