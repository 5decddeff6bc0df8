//! Scripted [`TextGenerator`] for tests.

use std::sync::Mutex;

use super::ai_assist::{CompletionRequest, GenerationError, TextGenerator};

/// Scripted behaviour for [`MockTextGenerator`].
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return this content.
    Reply(String),
    /// Fail with a request error.
    Fail,
    /// Never complete.
    Hang,
}

/// Text generator for tests and local development.
///
/// Records every request it receives.
#[derive(Debug)]
pub struct MockTextGenerator {
    behavior: MockBehavior,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockTextGenerator {
    /// A generator that always returns `content`.
    pub fn replying(content: impl Into<String>) -> Self {
        Self::with_behavior(MockBehavior::Reply(content.into()))
    }

    /// A generator whose calls always fail.
    pub fn failing() -> Self {
        Self::with_behavior(MockBehavior::Fail)
    }

    /// A generator whose calls never complete.
    pub fn hanging() -> Self {
        Self::with_behavior(MockBehavior::Hang)
    }

    pub fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl TextGenerator for MockTextGenerator {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        match &self.behavior {
            MockBehavior::Reply(content) => Ok(content.clone()),
            MockBehavior::Fail => Err(GenerationError::Request("Simulated failure".to_string())),
            MockBehavior::Hang => std::future::pending().await,
        }
    }
}
