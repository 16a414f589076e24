pub mod gemini;

use async_trait::async_trait;

use crate::error::ChatError;

pub use gemini::GeminiClient;

/// One outbound call: the fixed system text plus the latest user message.
///
/// Earlier turns of the transcript are deliberately absent. Grounding comes
/// from the profile in `system_instruction`, so every call stands alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system_instruction: String,
    pub user_text: String,
}

/// A service that turns a request into a plain-text completion.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ChatError>;
}
