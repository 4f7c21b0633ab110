use super::Assistant;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted assistant. Replies are handed out in call order, each after its
/// own delay, so tests can force responses to arrive out of order.
#[derive(Clone)]
pub struct MockAssistant {
    replies: Arc<Mutex<VecDeque<(String, Duration)>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockAssistant {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_reply(self, reply: &str) -> Self {
        self.with_delayed_reply(reply, Duration::ZERO)
    }

    pub fn with_delayed_reply(self, reply: &str, delay: Duration) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back((reply.to_string(), delay));
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn get_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockAssistant {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Assistant for MockAssistant {
    async fn ask(&self, prompt: &str) -> String {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let next = self.replies.lock().unwrap().pop_front();

        match next {
            Some((reply, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                reply
            }
            None => format!("Mock reply #{}", self.get_call_count()),
        }
    }
}
