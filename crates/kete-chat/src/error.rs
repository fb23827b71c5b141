//! Error types for the chat session.

/// Reasons a submission is refused before any request is made.
///
/// None of these mutate the transcript. Query failures are not listed here:
/// the session absorbs them and reports them as a bot message instead.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyInput,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("a query is already in flight")]
    SubmitInFlight,
    #[error("session is closed")]
    SessionClosed,
}
