//! OpenAI chat-completions client.
//!
//! Implements the domain `TextGenerator` port over the
//! `POST {base_url}/chat/completions` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use domain::services::{CompletionRequest, GenerationError, TextGenerator};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AiConfig;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions API.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl OpenAiClient {
    pub fn new(config: &AiConfig, api_key: &str) -> Result<Self, reqwest::Error> {
        let timeout = config.timeout();
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn build_request<'a>(model: &'a str, request: &'a CompletionRequest) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: &request.system_prompt,
            },
            ChatMessage {
                role: "user",
                content: &request.user_message,
            },
        ],
        temperature: request.temperature,
        max_tokens: request.max_tokens,
        response_format: request.json_response.then_some(ResponseFormat {
            kind: "json_object",
        }),
    }
}

/// Content of the first choice. A choice with null content yields `""`.
fn first_choice_content(response: ChatResponse) -> Result<String, GenerationError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or_else(|| GenerationError::Malformed("Response contained no choices".to_string()))
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
        let body = build_request(&self.model, &request);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(self.timeout)
                } else {
                    GenerationError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "Chat completion request rejected");
            return Err(GenerationError::Status(status.as_u16()));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;

        first_choice_content(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion(json_response: bool) -> CompletionRequest {
        CompletionRequest {
            system_prompt: "You help care staff.".to_string(),
            user_message: "Resident fell".to_string(),
            json_response,
            temperature: 0.7,
            max_tokens: 500,
        }
    }

    #[test]
    fn test_endpoint_from_base_url() {
        let config = AiConfig {
            base_url: "https://api.openai.com/v1/".to_string(),
            ..AiConfig::default()
        };
        let client = OpenAiClient::new(&config, "sk-test").unwrap();
        assert_eq!(client.endpoint(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_request_body_json_mode() {
        let request = completion(true);
        let body = serde_json::to_value(build_request("gpt-4o", &request)).unwrap();

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Resident fell");
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn test_request_body_text_mode_omits_response_format() {
        let request = completion(false);
        let body = serde_json::to_value(build_request("gpt-4o", &request)).unwrap();
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn test_first_choice_content() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Call the GP."}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice_content(parsed).unwrap(), "Call the GP.");
    }

    #[test]
    fn test_null_content_is_empty() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(first_choice_content(parsed).unwrap(), "");
    }

    #[test]
    fn test_no_choices_is_malformed() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            first_choice_content(parsed),
            Err(GenerationError::Malformed(_))
        ));
    }
}
