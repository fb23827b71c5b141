use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Message, OrderDescriptor, ResultSet, Timestamp};

/// Everything a chat session reports to its host.
///
/// Events are emitted by the session after its own state has changed and
/// are consumed by:
/// - The result grid (`ResultsChanged` replaces the displayed set)
/// - The front end renderer (transcript lines, modal box)
/// - Logs and tests
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SessionEvent {
    /// A message was appended to the transcript.
    MessageAppended {
        session_id: Uuid,
        message: Message,
        timestamp: Timestamp,
    },

    /// The order modal opened, or its content was replaced.
    OrderOpened {
        session_id: Uuid,
        order: OrderDescriptor,
        timestamp: Timestamp,
    },

    /// The user closed the order modal.
    OrderClosed {
        session_id: Uuid,
        order: OrderDescriptor,
        /// `true` when closed by confirming, `false` when dismissed.
        confirmed: bool,
        timestamp: Timestamp,
    },

    /// A response carried a result set; the displayed set must be replaced.
    ResultsChanged {
        session_id: Uuid,
        results: ResultSet,
        timestamp: Timestamp,
    },

    /// A query failed and a failure notice was appended.
    QueryFailed {
        session_id: Uuid,
        sequence: u64,
        reason: String,
        timestamp: Timestamp,
    },

    /// The session was torn down.
    SessionClosed {
        session_id: Uuid,
        timestamp: Timestamp,
    },
}

impl SessionEvent {
    pub fn session_id(&self) -> Uuid {
        match self {
            SessionEvent::MessageAppended { session_id, .. }
            | SessionEvent::OrderOpened { session_id, .. }
            | SessionEvent::OrderClosed { session_id, .. }
            | SessionEvent::ResultsChanged { session_id, .. }
            | SessionEvent::QueryFailed { session_id, .. }
            | SessionEvent::SessionClosed { session_id, .. } => *session_id,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        match self {
            SessionEvent::MessageAppended { timestamp, .. }
            | SessionEvent::OrderOpened { timestamp, .. }
            | SessionEvent::OrderClosed { timestamp, .. }
            | SessionEvent::ResultsChanged { timestamp, .. }
            | SessionEvent::QueryFailed { timestamp, .. }
            | SessionEvent::SessionClosed { timestamp, .. } => *timestamp,
        }
    }

    /// Returns a short event name for logging.
    pub fn event_name(&self) -> &'static str {
        match self {
            SessionEvent::MessageAppended { .. } => "message_appended",
            SessionEvent::OrderOpened { .. } => "order_opened",
            SessionEvent::OrderClosed { .. } => "order_closed",
            SessionEvent::ResultsChanged { .. } => "results_changed",
            SessionEvent::QueryFailed { .. } => "query_failed",
            SessionEvent::SessionClosed { .. } => "session_closed",
        }
    }
}
