use crate::error::Result;
use crate::state::chat::ChatMessage;
use crate::store::KeyValueStore;

pub const TRANSCRIPT_KEY: &str = "chat_history";

pub const GREETING: &str = "Hello! I'm Demeter, your virtual assistant. How can I help you today?";
pub const NO_REPLY: &str = "(no reply)";
pub const FAILURE_REPLY: &str =
    "Sorry, I had a problem processing your message. Could you try again?";

/// Assistant chat history. Persisted only when `persist` is set, which the
/// dashboard ties to the operator being logged in.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    persist: bool,
}

impl ChatTranscript {
    pub fn new(persist: bool) -> Self {
        Self {
            messages: vec![ChatMessage::assistant(GREETING)],
            persist,
        }
    }

    /// Restore the stored transcript, or start over from the greeting when
    /// there is none, it is unreadable, or persistence is off.
    pub fn load(store: &dyn KeyValueStore, persist: bool) -> Self {
        if !persist {
            return Self::new(false);
        }
        let Some(raw) = store.get(TRANSCRIPT_KEY) else {
            return Self::new(true);
        };
        match serde_json::from_str::<Vec<ChatMessage>>(&raw) {
            Ok(messages) if !messages.is_empty() => Self { messages, persist },
            Ok(_) => Self::new(true),
            Err(e) => {
                tracing::warn!("Discarding unreadable chat history: {e}");
                Self::new(true)
            }
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Record a user turn and the assistant's answer. `None` means the
    /// request failed and is shown as `FAILURE_REPLY`; a blank answer as `NO_REPLY`.
    pub fn record_exchange(&mut self, user: &str, reply: Option<&str>) {
        self.push(ChatMessage::user(user));
        let answer = match reply {
            Some(text) if !text.trim().is_empty() => text,
            Some(_) => NO_REPLY,
            None => FAILURE_REPLY,
        };
        self.push(ChatMessage::assistant(answer));
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        if !self.persist {
            return Ok(());
        }
        store.set(TRANSCRIPT_KEY, serde_json::to_string(&self.messages)?)
    }

    /// Forget the stored history, e.g. on logout, and start over.
    pub fn clear(&mut self, store: &mut dyn KeyValueStore) -> Result<()> {
        self.messages = vec![ChatMessage::assistant(GREETING)];
        store.remove(TRANSCRIPT_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::chat::ChatRole;
    use crate::store::MemoryStore;

    #[test]
    fn starts_with_greeting() {
        let t = ChatTranscript::new(true);
        assert_eq!(t.messages(), &[ChatMessage::assistant(GREETING)]);
    }

    #[test]
    fn persisted_transcript_round_trips() {
        let mut store = MemoryStore::new();
        let mut t = ChatTranscript::new(true);
        t.record_exchange("How is silo 3?", Some("Stable at **24 C**."));
        t.save(&mut store).unwrap();

        let restored = ChatTranscript::load(&store, true);
        assert_eq!(restored, t);
        assert_eq!(restored.messages().len(), 3);
        assert_eq!(restored.messages()[1].role, ChatRole::User);
    }

    #[test]
    fn persistence_off_never_writes() {
        let mut store = MemoryStore::new();
        let mut t = ChatTranscript::new(false);
        t.record_exchange("hi", Some(""));
        t.save(&mut store).unwrap();
        assert!(store.is_empty());
        assert_eq!(t.messages()[2].content, NO_REPLY);
    }

    #[test]
    fn failures_and_corruption() {
        let mut store = MemoryStore::new();
        let mut t = ChatTranscript::new(true);
        t.record_exchange("hi", None);
        assert_eq!(t.messages()[2].content, FAILURE_REPLY);

        store.set(TRANSCRIPT_KEY, "[{\"role\":\"robot\"}]".to_string()).unwrap();
        assert_eq!(ChatTranscript::load(&store, true), ChatTranscript::new(true));

        t.save(&mut store).unwrap();
        t.clear(&mut store).unwrap();
        assert!(store.get(TRANSCRIPT_KEY).is_none());
        assert_eq!(t.messages().len(), 1);
    }
}
