use async_trait::async_trait;

use crate::error::GenerationError;

/// Capability seam for the chat-completion provider. One logical call maps
/// to exactly one network attempt; retry policy belongs to the caller.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
