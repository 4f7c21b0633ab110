use super::fade::{FadeObserver, Viewport};
use super::page::{normalize_whitespace, PageSource};
use super::sequence::{RequestSequencer, Ticket};
use super::Assistant;
use crate::{prompts, Error, Result};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Text shown in the transcript while a reply is outstanding.
pub const TYPING_PLACEHOLDER: &str = "...";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModalState {
    pub visible: bool,
    pub loading: bool,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    /// True while this is a typing placeholder waiting for its reply.
    pub pending: bool,
    /// Request that owns this assistant message.
    pub ticket: Option<Ticket>,
}

impl ChatMessage {
    fn user(text: &str) -> Self {
        Self {
            sender: Sender::User,
            text: text.to_string(),
            pending: false,
            ticket: None,
        }
    }

    fn placeholder(ticket: Ticket) -> Self {
        Self {
            sender: Sender::Assistant,
            text: TYPING_PLACEHOLDER.to_string(),
            pending: true,
            ticket: Some(ticket),
        }
    }
}

#[derive(Debug, Default)]
struct ChatPanel {
    open: bool,
    messages: Vec<ChatMessage>,
}

/// Where a click on the open modal landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalClick {
    Backdrop,
    Content,
}

/// A user action on the page.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    DescribeProject(usize),
    CloseModal,
    ModalClick(ModalClick),
    ToggleChat,
    SubmitChat(String),
    Scroll(Viewport),
}

/// Prompt built by the synchronous half of a flow, waiting to be sent.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub ticket: Ticket,
    pub prompt: String,
}

/// All client-side state for one page view.
///
/// Flows are split into a synchronous `begin_*` half, which updates the UI and
/// builds the prompt, and a `finish_*` half that renders the answer. The
/// network call in between may overlap with other flows.
pub struct Session {
    assistant: Arc<dyn Assistant>,
    page: Arc<dyn PageSource>,
    resume_context: OnceLock<String>,
    modal: Mutex<ModalState>,
    chat: Mutex<ChatPanel>,
    fade: Mutex<FadeObserver>,
    descriptions: RequestSequencer,
    chats: RequestSequencer,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Session {
    pub fn new(assistant: Arc<dyn Assistant>, page: Arc<dyn PageSource>) -> Self {
        let mut fade = FadeObserver::new();
        for target in page.fade_targets() {
            fade.observe(target);
        }

        Self {
            assistant,
            page,
            resume_context: OnceLock::new(),
            modal: Mutex::new(ModalState::default()),
            chat: Mutex::new(ChatPanel::default()),
            fade: Mutex::new(fade),
            descriptions: RequestSequencer::new(),
            chats: RequestSequencer::new(),
        }
    }

    pub fn modal(&self) -> ModalState {
        lock(&self.modal).clone()
    }

    pub fn close_modal(&self) {
        lock(&self.modal).visible = false;
    }

    pub fn click_modal(&self, click: ModalClick) {
        if click == ModalClick::Backdrop {
            self.close_modal();
        }
    }

    /// Open the modal in its loading state and build the description prompt.
    pub fn begin_description(&self, index: usize) -> Result<PendingRequest> {
        let card = self
            .page
            .project(index)
            .ok_or(Error::UnknownProject(index))?;
        let prompt = prompts::project_description(&card);

        let mut modal = lock(&self.modal);
        let ticket = self.descriptions.issue();
        modal.visible = true;
        modal.loading = true;
        modal.description.clear();

        Ok(PendingRequest { ticket, prompt })
    }

    /// Render a description unless a newer request has been started since.
    /// Returns the rendered text, or `None` when the answer was stale.
    pub fn finish_description(&self, ticket: Ticket, text: String) -> Option<String> {
        let mut modal = lock(&self.modal);
        if !self.descriptions.is_current(ticket) {
            debug!("Discarding stale description response #{}", ticket.value());
            return None;
        }

        modal.loading = false;
        modal.description = text.clone();
        Some(text)
    }

    pub async fn describe_project(&self, index: usize) -> Result<Option<String>> {
        let pending = self.begin_description(index)?;
        let text = self.assistant.ask(&pending.prompt).await;
        Ok(self.finish_description(pending.ticket, text))
    }

    /// Whitespace-normalised main content, extracted on first use only.
    pub fn resume_context(&self) -> &str {
        self.resume_context.get_or_init(|| {
            let context = normalize_whitespace(&self.page.main_content());
            info!("Built resume context ({} chars)", context.len());
            context
        })
    }

    /// Flip the chat panel; returns whether it is now open.
    pub fn toggle_chat(&self) -> bool {
        let open = {
            let mut chat = lock(&self.chat);
            chat.open = !chat.open;
            chat.open
        };

        if open {
            self.resume_context();
        }
        open
    }

    pub fn is_chat_open(&self) -> bool {
        lock(&self.chat).open
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        lock(&self.chat).messages.clone()
    }

    /// Append the question and a typing placeholder. Blank input is ignored.
    pub fn begin_chat(&self, input: &str) -> Option<PendingRequest> {
        let question = input.trim();
        if question.is_empty() {
            return None;
        }

        let prompt = prompts::resume_chat(&self.page.persona(), self.resume_context(), question);

        let mut chat = lock(&self.chat);
        let ticket = self.chats.issue();
        chat.messages.push(ChatMessage::user(question));
        chat.messages.push(ChatMessage::placeholder(ticket));

        Some(PendingRequest { ticket, prompt })
    }

    /// Replace the placeholder owned by `ticket` with the reply.
    pub fn finish_chat(&self, ticket: Ticket, reply: String) {
        let mut chat = lock(&self.chat);
        if let Some(message) = chat
            .messages
            .iter_mut()
            .find(|m| m.pending && m.ticket == Some(ticket))
        {
            message.text = reply;
            message.pending = false;
            return;
        }

        warn!("No placeholder for chat reply #{}", ticket.value());
        chat.messages.push(ChatMessage {
            sender: Sender::Assistant,
            text: reply,
            pending: false,
            ticket: Some(ticket),
        });
    }

    pub async fn submit_chat(&self, input: &str) -> Option<String> {
        let pending = self.begin_chat(input)?;
        let reply = self.assistant.ask(&pending.prompt).await;
        self.finish_chat(pending.ticket, reply.clone());
        Some(reply)
    }

    /// Feed a viewport change to the fade-in observer.
    pub fn scroll(&self, viewport: Viewport) -> Vec<String> {
        lock(&self.fade).update(viewport)
    }

    pub fn is_faded_in(&self, id: &str) -> bool {
        lock(&self.fade).is_active(id)
    }

    /// Handle one event. The synchronous part runs before this returns, so
    /// events start in the order they are dispatched. Network work is spawned
    /// and its handle returned.
    pub fn dispatch(self: &Arc<Self>, event: UiEvent) -> Result<Option<JoinHandle<()>>> {
        match event {
            UiEvent::DescribeProject(index) => {
                let pending = self.begin_description(index)?;
                let session = Arc::clone(self);
                Ok(Some(tokio::spawn(async move {
                    let text = session.assistant.ask(&pending.prompt).await;
                    session.finish_description(pending.ticket, text);
                })))
            }
            UiEvent::SubmitChat(input) => Ok(self.begin_chat(&input).map(|pending| {
                let session = Arc::clone(self);
                tokio::spawn(async move {
                    let reply = session.assistant.ask(&pending.prompt).await;
                    session.finish_chat(pending.ticket, reply);
                })
            })),
            UiEvent::CloseModal => {
                self.close_modal();
                Ok(None)
            }
            UiEvent::ModalClick(click) => {
                self.click_modal(click);
                Ok(None)
            }
            UiEvent::ToggleChat => {
                self.toggle_chat();
                Ok(None)
            }
            UiEvent::Scroll(viewport) => {
                self.scroll(viewport);
                Ok(None)
            }
        }
    }

    /// Dispatch events until the channel closes, then wait for outstanding
    /// requests to render.
    pub async fn run(self: Arc<Self>, mut events: mpsc::UnboundedReceiver<UiEvent>) {
        let mut in_flight: Vec<JoinHandle<()>> = Vec::new();

        while let Some(event) = events.recv().await {
            in_flight.retain(|handle| !handle.is_finished());
            match self.dispatch(event) {
                Ok(Some(handle)) => in_flight.push(handle),
                Ok(None) => {}
                Err(e) => warn!("Ignoring UI event: {}", e),
            }
        }

        for handle in in_flight {
            if let Err(e) = handle.await {
                warn!("UI task failed: {}", e);
            }
        }
    }
}
