//! Append-only conversation transcript.

use kete_core::types::{Message, Sender};

/// Ordered history of exchanged messages.
///
/// Entries are only ever appended, and only by the owning session: there is
/// no way to remove, reorder or edit a message once it is recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript holding a single bot greeting.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::bot(greeting)],
        }
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages sent by `sender`.
    pub fn count_from(&self, sender: Sender) -> usize {
        self.messages.iter().filter(|m| m.sender() == sender).count()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transcript_is_empty() {
        let transcript = Transcript::new();
        assert!(transcript.is_empty());
        assert!(transcript.last().is_none());
    }

    #[test]
    fn test_with_greeting_has_one_bot_message() {
        let transcript = Transcript::with_greeting("Kia ora");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.last().unwrap().sender(), Sender::Bot);
        assert_eq!(transcript.last().unwrap().text(), "Kia ora");
    }

    #[test]
    fn test_push_preserves_insertion_order() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("first"));
        transcript.push(Message::bot("second"));
        transcript.push(Message::user("third"));

        let texts: Vec<&str> = transcript.iter().map(|m| m.text()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("same"));
        transcript.push(Message::user("same"));
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn test_count_from() {
        let mut transcript = Transcript::with_greeting("hello");
        transcript.push(Message::user("a"));
        transcript.push(Message::bot("b"));
        assert_eq!(transcript.count_from(Sender::Bot), 2);
        assert_eq!(transcript.count_from(Sender::User), 1);
    }
}
