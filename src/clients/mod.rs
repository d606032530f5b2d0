pub mod openai;

use async_trait::async_trait;

use crate::error::Result;

/// Turns a user prompt into model text. The production implementation is
/// [`openai::OpenAiClient`]; tests substitute their own.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}
