//! Upstream generative-language integration
//!
//! Provides the interface the proxy endpoint forwards prompts through, a
//! Gemini `generateContent` implementation, and a mock for tests.

pub mod gemini;
pub mod mock;

pub use gemini::GeminiClient;
pub use mock::MockGenerationClient;

use crate::Result;
use async_trait::async_trait;
use serde_json::value::RawValue;
use serde_json::Value;

#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Forward `prompt` upstream and return the response body as received.
    /// `None` means the caller sent no prompt at all.
    async fn generate(&self, prompt: Option<&Value>) -> Result<Box<RawValue>>;
}
