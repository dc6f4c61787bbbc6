pub mod filter;
pub mod transport;
pub mod view;

pub use filter::{ KeywordFilter, TopicFilter };
pub use transport::{ ClientError, HttpRelayTransport, RelayTransport };
pub use view::{ ChatView, MessageId, Speaker, TerminalView };

use crate::config::persona::Persona;
use crate::models::chat::Conversation;
use log::{ debug, error, warn };
use std::sync::Arc;

pub const DEFAULT_HISTORY_WINDOW: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackReason {
    EmptyReply,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing rendered, nothing recorded.
    Ignored,
    /// Refused locally by the topic filter; no request made.
    Refused,
    Replied,
    Fallback(FallbackReason),
}

/// Owns one conversation and drives a view through each user turn.
///
/// `submit_user_message` borrows the manager mutably for the whole round
/// trip, so a second send from the same conversation cannot start until the
/// first has finished.
pub struct ConversationManager<V: ChatView> {
    persona: Persona,
    conversation: Conversation,
    transport: Arc<dyn RelayTransport>,
    filter: Arc<dyn TopicFilter>,
    view: V,
    history_window: usize,
}

impl<V: ChatView> ConversationManager<V> {
    pub fn new(
        persona: Persona,
        transport: Arc<dyn RelayTransport>,
        filter: Arc<dyn TopicFilter>,
        view: V
    ) -> Self {
        let conversation = Conversation::new(persona.system_prompt.clone());
        Self {
            persona,
            conversation,
            transport,
            filter,
            view,
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Shows the greeting. It is display-only and never enters the history.
    pub fn greet(&mut self) {
        let greeting = self.persona.greeting.clone();
        if !greeting.trim().is_empty() {
            self.view.render(Speaker::Assistant, &greeting);
        }
        self.view.focus_input();
    }

    pub async fn submit_user_message(&mut self, text: &str) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored;
        }

        self.view.render(Speaker::User, text);
        self.view.clear_input();
        self.conversation.push_user(text);

        if self.filter.is_off_topic(text) {
            debug!("Refusing off-topic message locally");
            let refusal = self.persona.refusal.clone();
            self.view.render(Speaker::Assistant, &refusal);
            self.conversation.push_synthetic(refusal);
            self.view.focus_input();
            return SubmitOutcome::Refused;
        }

        let placeholder = self.view.render(Speaker::Assistant, &self.persona.thinking);
        self.view.set_input_enabled(false);

        let outbound = self.conversation.outbound(self.history_window);
        debug!("Sending {} of {} turns", outbound.len(), self.conversation.len());

        let outcome = match self.transport.send(&outbound).await {
            Ok(Some(reply)) if !reply.trim().is_empty() => {
                self.view.replace(placeholder, &reply);
                self.conversation.push_assistant(reply);
                SubmitOutcome::Replied
            }
            Ok(_) => {
                warn!("Relay answered without a reply");
                let fallback = self.persona.empty_reply.clone();
                self.view.replace(placeholder, &fallback);
                self.conversation.push_synthetic(fallback);
                SubmitOutcome::Fallback(FallbackReason::EmptyReply)
            }
            Err(e) => {
                error!("Chat request failed: {}", e);
                let fallback = self.persona.error_reply.clone();
                self.view.replace(placeholder, &fallback);
                self.conversation.push_synthetic(fallback);
                SubmitOutcome::Fallback(FallbackReason::Failed)
            }
        };

        self.view.set_input_enabled(true);
        self.view.focus_input();
        self.view.scroll_to_latest();
        outcome
    }
}
