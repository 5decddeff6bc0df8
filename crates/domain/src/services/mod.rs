//! Domain services for the care home backend.

pub mod ai_assist;
#[cfg(any(test, feature = "test-support"))]
pub mod mock;

pub use ai_assist::{
    AiAssistant, CompletionRequest, GenerationError, PromptOutcome, SuggestionsOutcome,
    TextGenerator,
};
#[cfg(any(test, feature = "test-support"))]
pub use mock::{MockBehavior, MockTextGenerator};
