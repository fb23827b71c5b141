//! Chat session controller: central coordinator for one conversation.
//!
//! Takes the user's text, records it, sends it to the query endpoint and
//! applies the reply to the transcript, the order modal and (through a
//! `ResultsChanged` event) the host's result grid.
//!
//! Only one query runs at a time. Each query is tagged with a sequence
//! number and a completion is applied only if its number matches the query
//! currently in flight, so cancelled or abandoned requests can never write
//! into the conversation. After [`ChatSession::close`] nothing mutates the
//! session any more.

use std::sync::Arc;

use kete_core::config::SessionConfig;
use kete_core::events::SessionEvent;
use kete_core::types::{Message, OrderDescriptor, QueryResponse, Timestamp};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::client::{QueryClient, QueryError};
use crate::error::ChatError;
use crate::modal::OrderModal;
use crate::transcript::Transcript;

/// Smallest event buffer a session will use. One submission emits up to four
/// events in a row, so smaller buffers would make subscribers lag.
pub const MIN_EVENT_CAPACITY: usize = 16;

/// A query that has been recorded in the transcript and is awaiting its
/// response.
///
/// Obtained from [`ChatSession::begin`] and handed back to
/// [`ChatSession::complete`].
#[derive(Debug)]
pub struct PendingQuery {
    sequence: u64,
    text: String,
}

impl PendingQuery {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// How a completed query was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The bot reply was appended.
    Answered {
        order_opened: bool,
        results_changed: bool,
    },
    /// The query failed; a failure notice was appended instead.
    Failed(QueryError),
    /// The completion was stale or arrived after teardown and was ignored.
    Discarded,
}

/// One conversation with the query endpoint.
pub struct ChatSession<C: QueryClient> {
    id: Uuid,
    client: Arc<C>,
    config: SessionConfig,
    transcript: Transcript,
    modal: OrderModal,
    input: String,
    next_sequence: u64,
    in_flight: Option<u64>,
    closed: bool,
    events: broadcast::Sender<SessionEvent>,
}

impl<C: QueryClient> ChatSession<C> {
    /// Create a session talking through `client`.
    ///
    /// The transcript starts empty, or with the configured greeting.
    pub fn new(client: Arc<C>, config: SessionConfig) -> Self {
        let transcript = match config.greeting.as_deref() {
            Some(greeting) if !greeting.trim().is_empty() => Transcript::with_greeting(greeting),
            _ => Transcript::new(),
        };
        let (events, _) = broadcast::channel(config.event_capacity.max(MIN_EVENT_CAPACITY));
        let id = Uuid::new_v4();
        tracing::debug!(session_id = %id, "Chat session created");

        Self {
            id,
            client,
            config,
            transcript,
            modal: OrderModal::new(),
            input: String::new(),
            next_sequence: 1,
            in_flight: None,
            closed: false,
            events,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn modal(&self) -> &OrderModal {
        &self.modal
    }

    /// The pending, not yet submitted input.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Shared handle to the query client, for hosts that run the request
    /// on their own task.
    pub fn client(&self) -> Arc<C> {
        Arc::clone(&self.client)
    }

    /// Receive every event emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    // -- Submission --

    /// Submit `text`, wait for the endpoint and apply its reply.
    ///
    /// Query failures are absorbed: they come back as
    /// [`SubmitOutcome::Failed`] with a notice already in the transcript.
    /// Only rejections made before sending are returned as errors.
    ///
    /// If the returned future is dropped before it finishes, the query stays
    /// marked as in flight until [`ChatSession::cancel_pending`] is called.
    pub async fn submit(&mut self, text: &str) -> Result<SubmitOutcome, ChatError> {
        let pending = self.begin(text)?;
        let client = Arc::clone(&self.client);
        let outcome = client.query(pending.text()).await;
        Ok(self.complete(pending, outcome))
    }

    /// Submit the pending input buffer.
    pub async fn submit_input(&mut self) -> Result<SubmitOutcome, ChatError> {
        let text = self.input.clone();
        self.submit(&text).await
    }

    /// First half of [`ChatSession::submit`]: validate `text`, append it as a
    /// user message, clear the input buffer and claim the in-flight slot.
    ///
    /// The caller sends `pending.text()` to the client and passes the result
    /// to [`ChatSession::complete`].
    pub fn begin(&mut self, text: &str) -> Result<PendingQuery, ChatError> {
        if self.closed {
            return Err(ChatError::SessionClosed);
        }
        if text.trim().is_empty() {
            return Err(ChatError::EmptyInput);
        }
        let max = self.config.max_message_length;
        if text.chars().count() > max {
            return Err(ChatError::MessageTooLong(max));
        }
        if self.in_flight.is_some() {
            return Err(ChatError::SubmitInFlight);
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.in_flight = Some(sequence);

        self.append(Message::user(text));
        self.input.clear();

        tracing::info!(session_id = %self.id, sequence, "Query dispatched");
        Ok(PendingQuery {
            sequence,
            text: text.to_string(),
        })
    }

    /// Second half of [`ChatSession::submit`]: apply the endpoint's reply.
    ///
    /// On success the bot reply is appended, a non-blank order opens the
    /// modal and a present result set is announced with `ResultsChanged`.
    /// An absent result set leaves the host's grid as it was, and an
    /// order-less reply leaves the modal as it was. On failure a bot notice is
    /// appended and nothing else changes.
    pub fn complete(
        &mut self,
        pending: PendingQuery,
        outcome: Result<QueryResponse, QueryError>,
    ) -> SubmitOutcome {
        if self.closed {
            tracing::debug!(
                session_id = %self.id,
                sequence = pending.sequence,
                "Response arrived after session close; discarded"
            );
            return SubmitOutcome::Discarded;
        }
        if self.in_flight != Some(pending.sequence) {
            tracing::warn!(
                session_id = %self.id,
                sequence = pending.sequence,
                in_flight = ?self.in_flight,
                "Stale response discarded"
            );
            return SubmitOutcome::Discarded;
        }
        self.in_flight = None;

        match outcome {
            Ok(response) => self.apply_response(response),
            Err(e) => {
                tracing::warn!(
                    session_id = %self.id,
                    sequence = pending.sequence,
                    error = %e,
                    "Query failed"
                );
                self.append(Message::bot(self.config.failure_notice.clone()));
                self.emit(SessionEvent::QueryFailed {
                    session_id: self.id,
                    sequence: pending.sequence,
                    reason: e.to_string(),
                    timestamp: Timestamp::now(),
                });
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Give up on the query in flight, if any.
    ///
    /// Its response, should it still arrive, is discarded as stale. Returns
    /// the abandoned sequence number.
    pub fn cancel_pending(&mut self) -> Option<u64> {
        let cancelled = self.in_flight.take();
        if let Some(sequence) = cancelled {
            tracing::info!(session_id = %self.id, sequence, "Pending query cancelled");
        }
        cancelled
    }

    // -- Modal --

    /// Dismiss the order modal. Returns the order it showed, if it was open.
    pub fn close_modal(&mut self) -> Option<OrderDescriptor> {
        self.close_order(false)
    }

    /// Confirm the order shown in the modal, closing it.
    pub fn confirm_order(&mut self) -> Option<OrderDescriptor> {
        self.close_order(true)
    }

    // -- Teardown --

    /// Tear the session down. Later completions are discarded and new
    /// submissions are refused.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.in_flight = None;
        tracing::info!(
            session_id = %self.id,
            messages = self.transcript.len(),
            "Chat session closed"
        );
        self.emit(SessionEvent::SessionClosed {
            session_id: self.id,
            timestamp: Timestamp::now(),
        });
    }

    // -- Private helpers --

    fn apply_response(&mut self, response: QueryResponse) -> SubmitOutcome {
        let order = response.order_descriptor();
        let QueryResponse {
            response_text,
            results,
            ..
        } = response;

        self.append(Message::bot(response_text));

        let order_opened = match order {
            Some(order) => {
                tracing::info!(session_id = %self.id, "Order received; opening modal");
                self.modal.open(order.clone());
                self.emit(SessionEvent::OrderOpened {
                    session_id: self.id,
                    order,
                    timestamp: Timestamp::now(),
                });
                true
            }
            None => false,
        };

        let results_changed = match results {
            Some(results) => {
                tracing::debug!(session_id = %self.id, count = results.len(), "Results changed");
                self.emit(SessionEvent::ResultsChanged {
                    session_id: self.id,
                    results,
                    timestamp: Timestamp::now(),
                });
                true
            }
            None => false,
        };

        SubmitOutcome::Answered {
            order_opened,
            results_changed,
        }
    }

    fn close_order(&mut self, confirmed: bool) -> Option<OrderDescriptor> {
        if self.closed {
            return None;
        }
        let order = self.modal.close()?;
        tracing::info!(session_id = %self.id, confirmed, "Order modal closed");
        self.emit(SessionEvent::OrderClosed {
            session_id: self.id,
            order: order.clone(),
            confirmed,
            timestamp: Timestamp::now(),
        });
        Some(order)
    }

    fn append(&mut self, message: Message) {
        self.transcript.push(message.clone());
        self.emit(SessionEvent::MessageAppended {
            session_id: self.id,
            message,
            timestamp: Timestamp::now(),
        });
    }

    fn emit(&self, event: SessionEvent) {
        // Sending only fails when nobody is subscribed.
        if self.events.send(event).is_err() {
            tracing::trace!(session_id = %self.id, "No event subscribers");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
