use serde::{ Serialize, Deserialize };

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of a conversation. Turns are never edited after creation.
///
/// `synthetic` marks assistant turns produced locally (refusals and
/// fallbacks) instead of by the model. It is kept out of the wire format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    role: Role,
    content: String,
    #[serde(skip)]
    synthetic: bool,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into(), synthetic: false }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into(), synthetic: false }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into(), synthetic: false }
    }

    pub fn synthetic_assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into(), synthetic: true }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }
}

/// Client-side history. The first turn is always the system turn and it is
/// the only system turn the conversation ever holds.
#[derive(Clone, Debug)]
pub struct Conversation {
    turns: Vec<ChatTurn>,
}

impl Conversation {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self { turns: vec![ChatTurn::system(system_prompt)] }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(ChatTurn::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(ChatTurn::assistant(content));
    }

    pub fn push_synthetic(&mut self, content: impl Into<String>) {
        self.turns.push(ChatTurn::synthetic_assistant(content));
    }

    pub fn system(&self) -> &ChatTurn {
        &self.turns[0]
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    /// Builds the list sent per request: the system turn followed by the
    /// last `window` non-system turns, in order.
    pub fn outbound(&self, window: usize) -> Vec<ChatTurn> {
        let rest = &self.turns[1..];
        let start = rest.len().saturating_sub(window);
        let mut out = Vec::with_capacity(rest.len() - start + 1);
        out.push(self.turns[0].clone());
        out.extend_from_slice(&rest[start..]);
        out
    }
}
