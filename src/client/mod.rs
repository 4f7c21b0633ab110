//! Headless model of the portfolio page script
//!
//! A [`Session`] owns all client-side state (modal, chat transcript, resume
//! context, fade-in targets) and turns UI events into prompts sent through an
//! [`Assistant`], normally the [`ProxyClient`].

pub mod ask;
pub mod fade;
pub mod mock;
pub mod page;
pub mod sequence;
pub mod session;

pub use ask::{ProxyClient, CONNECTION_ERROR_FALLBACK, NO_RESPONSE_FALLBACK};
pub use fade::{FadeObserver, FadeTarget, Viewport};
pub use mock::MockAssistant;
pub use page::{Page, PageSource};
pub use sequence::{RequestSequencer, Ticket};
pub use session::{ChatMessage, ModalClick, ModalState, Sender, Session, UiEvent};

use async_trait::async_trait;

/// The shared "ask AI" call used by both the description and chat flows.
///
/// Implementations never fail: any problem is logged and replaced by a
/// fixed user-facing string.
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn ask(&self, prompt: &str) -> String;
}
