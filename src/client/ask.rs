use super::Assistant;
use crate::models::{GenerationResult, PromptRequest};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;

pub const NO_RESPONSE_FALLBACK: &str = "Sorry, I couldn't generate a response. Please try again.";
pub const CONNECTION_ERROR_FALLBACK: &str =
    "An error occurred while connecting to the AI service. Please try again later.";

/// Calls the proxy endpoint at a configured URL.
pub struct ProxyClient {
    client: Client,
    endpoint: String,
}

impl ProxyClient {
    pub fn new(endpoint: String) -> Self {
        Self::new_with_client(endpoint, Client::new())
    }

    pub fn new_with_client(endpoint: String, client: Client) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(&self, prompt: &str) -> Result<GenerationResult> {
        tracing::debug!("Sending prompt to proxy at {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&PromptRequest::new(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Assistant for ProxyClient {
    async fn ask(&self, prompt: &str) -> String {
        match self.request(prompt).await {
            Ok(result) => match result.text() {
                Some(text) if !text.is_empty() => text.to_string(),
                _ => NO_RESPONSE_FALLBACK.to_string(),
            },
            Err(e) => {
                tracing::error!("Error calling proxy endpoint: {}", e);
                CONNECTION_ERROR_FALLBACK.to_string()
            }
        }
    }
}
