//! AI assistance for incident reporting.
//!
//! [`AiAssistant`] asks an external text generator for incident-report
//! suggestions and free-form guidance. It never fails: when no generator is
//! configured, or the call errors, times out or returns something unusable,
//! the caller gets fixed fallback content with `ai_available = false`.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Suggestions returned whenever the generator cannot supply its own.
pub const FALLBACK_SUGGESTIONS: [&str; 4] = [
    "Document all relevant details including time, location, persons involved, and immediate actions taken in response to the incident.",
    "Assess whether this incident requires notification to regulatory authorities or other external stakeholders under safeguarding protocols.",
    "Schedule a follow-up meeting with relevant staff to discuss preventative measures and avoid similar incidents in the future.",
    "Update the resident's care plan to reflect any new information or requirements revealed by this incident.",
];

/// Prompt response when no generator is configured.
pub const UNCONFIGURED_PROMPT_RESPONSE: &str = "I'm unable to process custom prompts without an OpenAI API key. Please check your environment configuration.";

/// Prompt response when the generator call fails.
pub const FAILED_PROMPT_RESPONSE: &str = "I encountered an error while processing your request. Please try again later or contact support if the issue persists.";

/// Prompt response when the generator returns no content.
pub const EMPTY_PROMPT_RESPONSE: &str =
    "I'm sorry, I couldn't generate a response. Please try rephrasing your question.";

const SUGGESTIONS_SYSTEM_PROMPT: &str = "You are an expert assistant for care home staff who helps with incident reporting. \
Provide 3-4 helpful, specific, and actionable suggestions for incident reports based on the description provided. \
Focus on regulatory compliance, safeguarding, documentation requirements, and follow-up actions. \
Each suggestion should be a separate item in a JSON array.";

const PROMPT_SYSTEM_PROMPT: &str = "You are an expert assistant for care home staff. \
Provide helpful, specific, and actionable guidance in response to queries about incident reporting, \
resident care, safeguarding, and regulatory compliance. Be concise but thorough.";

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 500;

/// A single chat-completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_message: String,
    /// Ask the generator for a JSON object instead of prose.
    pub json_response: bool,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Errors from a text generator.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Request to text generator failed: {0}")]
    Request(String),

    #[error("Text generator returned status {0}")]
    Status(u16),

    #[error("Malformed text generator response: {0}")]
    Malformed(String),

    #[error("Text generator timed out after {0:?}")]
    Timeout(Duration),
}

/// Port for an external chat-completion service.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the message content of the first completion choice.
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError>;
}

/// Result of [`AiAssistant::suggest_incident_notes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsOutcome {
    pub suggestions: Vec<String>,
    pub ai_available: bool,
}

impl SuggestionsOutcome {
    fn fallback() -> Self {
        Self {
            suggestions: FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            ai_available: false,
        }
    }
}

/// Result of [`AiAssistant::answer_prompt`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptOutcome {
    pub response: String,
    pub ai_available: bool,
}

impl PromptOutcome {
    fn fallback(response: &str) -> Self {
        Self {
            response: response.to_string(),
            ai_available: false,
        }
    }
}

/// Incident-reporting assistant with fixed fallbacks.
#[derive(Clone)]
pub struct AiAssistant {
    generator: Option<Arc<dyn TextGenerator>>,
    timeout: Duration,
}

impl std::fmt::Debug for AiAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiAssistant")
            .field("configured", &self.is_configured())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AiAssistant {
    /// Creates an assistant. `None` runs in fallback-only mode.
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Whether a generator is configured.
    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    /// Suggests follow-up notes for an incident description.
    pub async fn suggest_incident_notes(&self, description: &str) -> SuggestionsOutcome {
        let Some(generator) = &self.generator else {
            tracing::debug!("No text generator configured, returning fallback suggestions");
            return SuggestionsOutcome::fallback();
        };

        let request = CompletionRequest {
            system_prompt: SUGGESTIONS_SYSTEM_PROMPT.to_string(),
            user_message: description.to_string(),
            json_response: true,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let content = match self.call(generator.as_ref(), request).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(error = %e, "Incident suggestion generation failed");
                return SuggestionsOutcome::fallback();
            }
        };

        match parse_suggestions(&content) {
            Some(suggestions) => SuggestionsOutcome {
                suggestions,
                ai_available: true,
            },
            None => {
                tracing::warn!(
                    content_len = content.len(),
                    "Text generator returned unusable suggestions"
                );
                SuggestionsOutcome::fallback()
            }
        }
    }

    /// Answers a free-form question from care staff.
    pub async fn answer_prompt(&self, prompt: &str) -> PromptOutcome {
        let Some(generator) = &self.generator else {
            tracing::debug!("No text generator configured, returning fallback prompt response");
            return PromptOutcome::fallback(UNCONFIGURED_PROMPT_RESPONSE);
        };

        let request = CompletionRequest {
            system_prompt: PROMPT_SYSTEM_PROMPT.to_string(),
            user_message: prompt.to_string(),
            json_response: false,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        match self.call(generator.as_ref(), request).await {
            Ok(content) if content.trim().is_empty() => {
                tracing::warn!("Text generator returned an empty prompt response");
                PromptOutcome::fallback(EMPTY_PROMPT_RESPONSE)
            }
            Ok(content) => PromptOutcome {
                response: content,
                ai_available: true,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Prompt generation failed");
                PromptOutcome::fallback(FAILED_PROMPT_RESPONSE)
            }
        }
    }

    async fn call(
        &self,
        generator: &dyn TextGenerator,
        request: CompletionRequest,
    ) -> Result<String, GenerationError> {
        tokio::time::timeout(self.timeout, generator.complete(request))
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout))?
    }
}

/// Extracts a non-empty list of strings from `{"suggestions": [...]}`.
fn parse_suggestions(content: &str) -> Option<Vec<String>> {
    let parsed: Value = serde_json::from_str(content).ok()?;
    let items = parsed.get("suggestions")?.as_array()?;
    if items.is_empty() {
        return None;
    }

    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mock::MockTextGenerator;

    const TIMEOUT: Duration = Duration::from_millis(200);

    fn assistant(generator: MockTextGenerator) -> (AiAssistant, Arc<MockTextGenerator>) {
        let generator = Arc::new(generator);
        let assistant = AiAssistant::new(Some(generator.clone()), TIMEOUT);
        (assistant, generator)
    }

    fn fallback_suggestions() -> Vec<String> {
        FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_unconfigured_suggestions_fall_back() {
        let assistant = AiAssistant::new(None, TIMEOUT);
        let outcome = assistant.suggest_incident_notes("Resident fell").await;

        assert!(!outcome.ai_available);
        assert_eq!(outcome.suggestions, fallback_suggestions());
    }

    #[tokio::test]
    async fn test_unconfigured_prompt_falls_back() {
        let assistant = AiAssistant::new(None, TIMEOUT);
        let outcome = assistant.answer_prompt("What forms do I need?").await;

        assert!(!outcome.ai_available);
        assert_eq!(outcome.response, UNCONFIGURED_PROMPT_RESPONSE);
    }

    #[tokio::test]
    async fn test_suggestions_from_generator() {
        let (assistant, generator) = assistant(MockTextGenerator::replying(
            r#"{"suggestions": ["Record the time", "Inform the manager"]}"#,
        ));
        let outcome = assistant.suggest_incident_notes("Child fell in garden").await;

        assert!(outcome.ai_available);
        assert_eq!(outcome.suggestions, vec!["Record the time", "Inform the manager"]);

        let requests = generator.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].json_response);
        assert_eq!(requests[0].user_message, "Child fell in garden");
        assert_eq!(requests[0].max_tokens, 500);
    }

    #[tokio::test]
    async fn test_unusable_suggestions_fall_back() {
        let cases = [
            "not json at all",
            r#"{"ideas": ["x"]}"#,
            r#"{"suggestions": "x"}"#,
            r#"{"suggestions": []}"#,
            r#"{"suggestions": ["ok", 3]}"#,
        ];
        for content in cases {
            let (assistant, _) = assistant(MockTextGenerator::replying(content));
            let outcome = assistant.suggest_incident_notes("x").await;
            assert!(!outcome.ai_available, "content {:?}", content);
            assert_eq!(outcome.suggestions, fallback_suggestions());
        }
    }

    #[tokio::test]
    async fn test_failing_generator_falls_back() {
        let (assistant, _) = assistant(MockTextGenerator::failing());

        let suggestions = assistant.suggest_incident_notes("x").await;
        assert!(!suggestions.ai_available);
        assert_eq!(suggestions.suggestions.len(), 4);

        let prompt = assistant.answer_prompt("x").await;
        assert!(!prompt.ai_available);
        assert_eq!(prompt.response, FAILED_PROMPT_RESPONSE);
    }

    #[tokio::test]
    async fn test_hanging_generator_times_out() {
        let (assistant, _) = assistant(MockTextGenerator::hanging());

        let suggestions = assistant.suggest_incident_notes("x").await;
        assert!(!suggestions.ai_available);

        let prompt = assistant.answer_prompt("x").await;
        assert_eq!(prompt.response, FAILED_PROMPT_RESPONSE);
    }

    #[tokio::test]
    async fn test_prompt_answer_from_generator() {
        let (assistant, generator) =
            assistant(MockTextGenerator::replying("File an incident form within 24 hours."));
        let outcome = assistant.answer_prompt("When must I file?").await;

        assert!(outcome.ai_available);
        assert_eq!(outcome.response, "File an incident form within 24 hours.");
        assert!(!generator.requests()[0].json_response);
    }

    #[tokio::test]
    async fn test_empty_prompt_answer() {
        let (assistant, _) = assistant(MockTextGenerator::replying("   "));
        let outcome = assistant.answer_prompt("x").await;

        assert!(!outcome.ai_available);
        assert_eq!(outcome.response, EMPTY_PROMPT_RESPONSE);
    }

    #[test]
    fn test_outcome_wire_names() {
        let json = serde_json::to_value(SuggestionsOutcome::fallback()).unwrap();
        assert_eq!(json["aiAvailable"], false);
        assert_eq!(json["suggestions"].as_array().unwrap().len(), 4);
    }
}
