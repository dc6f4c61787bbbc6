use std::io::{ self, Stdout, Write };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::User => "you",
            Speaker::Assistant => "assistant",
        }
    }
}

/// Handle to a rendered message, used to swap a placeholder for the reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub usize);

/// Where the conversation is shown and typed into.
pub trait ChatView {
    fn render(&mut self, speaker: Speaker, text: &str) -> MessageId;
    fn replace(&mut self, id: MessageId, text: &str);
    fn clear_input(&mut self);
    fn set_input_enabled(&mut self, enabled: bool);
    fn focus_input(&mut self);
    fn scroll_to_latest(&mut self);
}

/// Line-oriented view for a terminal. A placeholder that is still the last
/// line on screen is overwritten in place; otherwise the reply is printed
/// below it.
pub struct TerminalView<W: Write> {
    out: W,
    next_id: usize,
    last: Option<(MessageId, Speaker)>,
    input_enabled: bool,
}

impl TerminalView<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out, next_id: 0, last: None, input_enabled: true }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    fn write_line(&mut self, speaker: Speaker, text: &str) {
        // a broken stdout leaves nothing to report to
        let _ = writeln!(self.out, "{}: {}", speaker.label(), text);
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn render(&mut self, speaker: Speaker, text: &str) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.write_line(speaker, text);
        self.last = Some((id, speaker));
        id
    }

    fn replace(&mut self, id: MessageId, text: &str) {
        match self.last {
            Some((last_id, speaker)) if last_id == id => {
                let _ = write!(self.out, "\x1b[1A\x1b[2K\r");
                self.write_line(speaker, text);
            }
            _ => self.write_line(Speaker::Assistant, text),
        }
    }

    fn clear_input(&mut self) {}

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    fn focus_input(&mut self) {
        if self.input_enabled {
            let _ = write!(self.out, "> ");
        }
        let _ = self.out.flush();
    }

    fn scroll_to_latest(&mut self) {
        let _ = self.out.flush();
    }
}
