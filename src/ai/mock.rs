use super::GenerationService;
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::value::RawValue;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Canned upstream used to exercise the proxy without a network.
#[derive(Clone)]
pub struct MockGenerationClient {
    responses: Arc<Mutex<Vec<String>>>,
    fail_with_status: Option<u16>,
    prompts: Arc<Mutex<Vec<Option<Value>>>>,
}

impl MockGenerationClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            fail_with_status: None,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a raw JSON body; bodies are replayed in a cycle.
    pub fn with_response(self, body: &str) -> Self {
        self.responses.lock().unwrap().push(body.to_string());
        self
    }

    /// Make every call fail as if the upstream answered with `status`.
    pub fn failing(mut self, status: u16) -> Self {
        self.fail_with_status = Some(status);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn get_prompts(&self) -> Vec<Option<Value>> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationService for MockGenerationClient {
    async fn generate(&self, prompt: Option<&Value>) -> Result<Box<RawValue>> {
        let call = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.cloned());
            prompts.len()
        };

        if let Some(status) = self.fail_with_status {
            return Err(Error::Upstream {
                status,
                body: "mock failure".to_string(),
            });
        }

        let responses = self.responses.lock().unwrap();
        let body = if responses.is_empty() {
            let text = prompt.and_then(Value::as_str).unwrap_or_default();
            serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": format!("Echo: {}", text) }] } }]
            })
            .to_string()
        } else {
            responses[(call - 1) % responses.len()].clone()
        };

        Ok(RawValue::from_string(body)?)
    }
}
